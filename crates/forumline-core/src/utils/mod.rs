//! Utility functions for string formatting and display.

pub mod format;

pub use format::{author_display, format_date, format_optional, truncate_string, ANONYMOUS};
