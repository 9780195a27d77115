//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, construction of an engine with the wrong distance policy,
//! operations a sampling mode does not support, and point conversions across dimensions.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("the fixed density sampler does not accept a distance function")]
    DistanceFunctionNotAllowed,

    #[error("the variable density sampler requires a distance function")]
    MissingDistanceFunction,

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_message_includes_reason() {
        let err = Error::InvalidConfig("shape must not be empty".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: shape must not be empty"
        );
    }

    #[test]
    fn unsupported_names_the_operation() {
        let err = Error::Unsupported("get_all_points_with_distance");
        assert!(matches!(err, Error::Unsupported(op) if op == "get_all_points_with_distance"));
        assert!(err.to_string().contains("get_all_points_with_distance"));
    }
}
