//! Shared error types for the analysis engine

use thiserror::Error;

/// Main error type for pyqual operations.
///
/// `Configuration` is the only fatal, process-level failure; a `Parse`
/// error is scoped to its unit and surfaces as one CRITICAL issue there.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed source input, positioned in the unit text (1-based).
    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Out-of-range or contradictory configuration values, rejected at the
    /// boundary before any analysis runs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors (boundary collaborators only; the core does no IO).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_displays_location() {
        let err = Error::parse(3, 7, "invalid syntax");
        assert_eq!(err.to_string(), "Parse error at 3:7: invalid syntax");
    }

    #[test]
    fn configuration_error_displays_message() {
        let err = Error::configuration("max_complexity must be positive");
        assert!(err.to_string().contains("max_complexity"));
    }
}
