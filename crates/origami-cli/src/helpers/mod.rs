//! Helper functions for the Origami CLI.
//!
//! This module provides:
//! - Password and entry body input
//! - Date parsing

mod input;
mod parsing;

pub use input::{env_password, prompt_password, read_entry_body, read_new_password, read_password};
pub use parsing::parse_date;
