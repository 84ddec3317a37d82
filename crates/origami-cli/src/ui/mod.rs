//! UI primitives for the Origami CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens, owo-colors styles, symbols
//! - **Render**: Tables, headers, receipts, hints
//! - **Progress**: Spinner for password derivation
//! - **Format**: String utilities (truncate, wrap, durations)
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{badge, header, print, Badge, UiContext};
//!
//! let ui = UiContext::from_env(args.json, cli.no_color, cli.ascii);
//! print(&ui, &header(&ui, "list", None));
//! print(&ui, &badge(&ui, Badge::Ok, "Saved"));
//! ```

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{
    badge, blank_line, divider, header, hint, kv, print, print_error, print_json, receipt,
    simple_table, Column,
};

pub use progress::{Spinner, StepList};

pub use format::{format_bytes, format_datetime, format_duration, format_mood, preview, wrap};
