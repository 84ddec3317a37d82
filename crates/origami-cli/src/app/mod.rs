//! Application-level utilities for the Origami CLI.
//!
//! This module provides:
//! - Application context for unified CLI + config handling
//! - Path resolution for config and journal files
//! - Password unlock with retry logic

mod context;
mod resolver;
mod unlock;

pub use context::AppContext;
pub use resolver::resolve_config_path;
pub use unlock::unlock_with_retry;
