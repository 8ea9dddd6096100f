//! Utility modules for rendering and parsing values.

pub mod datetime;
pub mod text;

pub use datetime::{format_timestamp, parse_timestamp, DateTimeParseError};
pub use text::{quote, unquote};
