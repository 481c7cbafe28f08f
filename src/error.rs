//! Router error definitions.

use thiserror::Error;

/// Errors raised while validating or invoking routes.
///
/// A request that matches nothing is not an error; see
/// [`Outcome`](crate::routing::Outcome).
#[derive(Debug, Error)]
pub enum RouterError {
    /// Effective route pattern is not a valid regular expression.
    #[error("Invalid route pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// No controller or function is registered under this name.
    #[error("Unknown handler: {0}")]
    UnknownHandler(String),

    /// Controller exists but does not define the action.
    #[error("Controller `{controller}` has no action `{action}`")]
    UnknownAction { controller: String, action: String },
}

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::UnknownHandler("Greeter::hi".into());
        assert_eq!(err.to_string(), "Unknown handler: Greeter::hi");

        let err = RouterError::UnknownAction {
            controller: "Greeter".into(),
            action: "bye".into(),
        };
        assert!(err.to_string().contains("bye"));
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = RouterError::InvalidPattern {
            pattern: "(".into(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Invalid route pattern `(`"));
    }
}
