//! Entry commands: write, read, list, search, delete.

mod delete;
mod list;
mod read;
mod search;
mod write;

pub use delete::handle_delete;
pub use list::handle_list;
pub use read::handle_read;
pub use search::handle_search;
pub use write::handle_write;
