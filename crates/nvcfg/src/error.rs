//! Error types for settings decoding, encoding and editing.

use thiserror::Error;

use crate::context::Format;

/// Stable error codes, one per error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: No group registered under the requested tag or alias
    UnknownGroup,
    /// E002: Buffer shorter than the resolved layout
    TruncatedInput,
    /// E003: Integer outside its declared range at encode time
    ValueOutOfRange,
    /// E004: Element or byte count exceeds what the length prefix can hold
    ListTooLong,
    /// E005: Dotted path does not resolve
    FieldNotFound,
    /// E006: Group has no layout for the requested format
    UnsupportedVariant,
    /// E007: Text could not be parsed into a value
    InvalidValue,
    /// E008: Registry already holds the tag or alias
    DuplicateGroup,
    /// E009: Malformed record header
    BadRecordHeader,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnknownGroup => "E001",
            ErrorCode::TruncatedInput => "E002",
            ErrorCode::ValueOutOfRange => "E003",
            ErrorCode::ListTooLong => "E004",
            ErrorCode::FieldNotFound => "E005",
            ErrorCode::UnsupportedVariant => "E006",
            ErrorCode::InvalidValue => "E007",
            ErrorCode::DuplicateGroup => "E008",
            ErrorCode::BadRecordHeader => "E009",
        }
    }
}

/// Error raised by any codec operation.
///
/// Field paths start out empty at the leaf that fails and are extended by
/// every enclosing compound or container on the way out, so the caller sees
/// the full dotted path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("[E001] unknown group: {name}")]
    UnknownGroup { name: String },

    #[error("[E002] truncated input at offset {offset} while reading {field}: need {needed} bytes, {available} available")]
    TruncatedInput {
        field: String,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("[E003] {field} at offset {offset}: value {value} out of range [{min}, {max}]")]
    ValueOutOfRange {
        field: String,
        offset: usize,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("[E004] {field} at offset {offset}: length {len} exceeds maximum {max}")]
    ListTooLong {
        field: String,
        offset: usize,
        len: usize,
        max: usize,
    },

    #[error("[E005] field not found: '{segment}' in path '{path}'")]
    FieldNotFound { path: String, segment: String },

    #[error("[E006] group {group} has no {format} layout")]
    UnsupportedVariant { group: String, format: Format },

    #[error("[E007] invalid value {value:?} for {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: &'static str,
    },

    #[error("[E008] group already registered: {name}")]
    DuplicateGroup { name: String },

    #[error("[E009] bad record header at offset {offset}: size {size}")]
    BadRecordHeader { offset: usize, size: usize },
}

impl Error {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::UnknownGroup { .. } => ErrorCode::UnknownGroup,
            Error::TruncatedInput { .. } => ErrorCode::TruncatedInput,
            Error::ValueOutOfRange { .. } => ErrorCode::ValueOutOfRange,
            Error::ListTooLong { .. } => ErrorCode::ListTooLong,
            Error::FieldNotFound { .. } => ErrorCode::FieldNotFound,
            Error::UnsupportedVariant { .. } => ErrorCode::UnsupportedVariant,
            Error::InvalidValue { .. } => ErrorCode::InvalidValue,
            Error::DuplicateGroup { .. } => ErrorCode::DuplicateGroup,
            Error::BadRecordHeader { .. } => ErrorCode::BadRecordHeader,
        }
    }

    /// Prepends `segment` to the field path carried by this error.
    ///
    /// Errors without a field path are returned unchanged.
    pub fn in_field(mut self, segment: &str) -> Self {
        match &mut self {
            Error::TruncatedInput { field, .. }
            | Error::ValueOutOfRange { field, .. }
            | Error::ListTooLong { field, .. }
            | Error::InvalidValue { field, .. } => {
                *field = if field.is_empty() {
                    segment.to_string()
                } else {
                    format!("{segment}.{field}")
                };
            }
            _ => {}
        }
        self
    }

    pub(crate) fn invalid(value: &str, reason: &'static str) -> Self {
        Error::InvalidValue {
            field: String::new(),
            value: value.to_string(),
            reason,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_field_builds_dotted_path() {
        let err = Error::TruncatedInput {
            field: String::new(),
            offset: 12,
            needed: 4,
            available: 1,
        };
        let err = err.in_field("dest").in_field("3").in_field("port_forwards");
        match err {
            Error::TruncatedInput { field, offset, .. } => {
                assert_eq!(field, "port_forwards.3.dest");
                assert_eq!(offset, 12);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_in_field_ignores_pathless_errors() {
        let err = Error::UnknownGroup { name: "nope".into() };
        assert_eq!(err.clone().in_field("x"), err);
    }

    #[test]
    fn test_codes() {
        assert_eq!(Error::UnknownGroup { name: "x".into() }.code().code(), "E001");
        assert_eq!(
            Error::FieldNotFound { path: "a".into(), segment: "a".into() }.code(),
            ErrorCode::FieldNotFound
        );
    }
}
