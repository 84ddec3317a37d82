//! Maintenance commands: status, backup, check.

mod backup;
mod check;
mod status;

pub use backup::handle_backup;
pub use check::handle_check;
pub use status::handle_status;
