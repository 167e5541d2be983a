//! Dashboard error types

use thiserror::Error;

/// A selection value that is not part of the supported sets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Chain token is not in the supported chain list
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    /// Granularity is not one of 1, 2 or 4 weeks
    #[error("Invalid granularity: {0} (expected 1, 2 or 4)")]
    InvalidGranularity(u32),
}

/// Errors from talking to a running dashboard controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Dashboard controller has stopped")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SelectionError::UnsupportedChain("dogechain".to_string());
        assert_eq!(err.to_string(), "Unsupported chain: dogechain");

        let err = SelectionError::InvalidGranularity(3);
        assert_eq!(err.to_string(), "Invalid granularity: 3 (expected 1, 2 or 4)");
    }
}
