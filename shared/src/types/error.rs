//! Common error types for the voting backend

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommonError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CommonError::InvalidInput("unknown vote option 'x'".to_string()).to_string(),
            "Invalid input: unknown vote option 'x'"
        );
        assert_eq!(
            CommonError::InvalidConfig("LOG_FORMAT".to_string()).to_string(),
            "Invalid configuration: LOG_FORMAT"
        );
    }
}
