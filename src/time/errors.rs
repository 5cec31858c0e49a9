//! Error types for the time system

use thiserror::Error;

/// Errors raised by time operations
///
/// Each variant carries the name of the thing that triggered it, for example
/// `"Duration"`, `"Instant"` or a scale name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// A value in its undefined state was used where a defined one is needed
    #[error("{0} is undefined")]
    Undefined(String),

    /// A defined value that is not acceptable for the operation
    #[error("Wrong {0}")]
    Wrong(String),

    /// A value outside the supported span (calendar window, leap-second table, integer range)
    #[error("{0} is out of range")]
    OutOfRange(String),

    /// A recognized scale or conversion that has no implementation
    #[error("{0} is not implemented")]
    NotImplemented(String),

    /// A string that does not match any accepted format
    #[error("Cannot parse {kind} string [{input}]")]
    Parse {
        /// What was being parsed
        kind: &'static str,
        /// The rejected input
        input: String,
    },
}

impl TimeError {
    pub(crate) fn undefined(what: &str) -> Self {
        TimeError::Undefined(what.to_string())
    }

    pub(crate) fn wrong(what: &str) -> Self {
        TimeError::Wrong(what.to_string())
    }

    pub(crate) fn out_of_range(what: &str) -> Self {
        TimeError::OutOfRange(what.to_string())
    }

    pub(crate) fn parse(kind: &'static str, input: &str) -> Self {
        TimeError::Parse {
            kind,
            input: input.to_string(),
        }
    }
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            TimeError::undefined("Duration").to_string(),
            "Duration is undefined"
        );
        assert_eq!(TimeError::wrong("Scale").to_string(), "Wrong Scale");
        assert_eq!(
            TimeError::NotImplemented("UT1".into()).to_string(),
            "UT1 is not implemented"
        );
        assert_eq!(
            TimeError::parse("Duration", "abc").to_string(),
            "Cannot parse Duration string [abc]"
        );
    }
}
