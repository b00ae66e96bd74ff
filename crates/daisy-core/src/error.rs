//! Error Types

use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, DaisyError>;

/// Daisy SDK error types
#[derive(Error, Debug)]
pub enum DaisyError {
    /// Caller supplied missing or contradictory arguments.
    /// Always raised before any network call.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Submitted agreement references a plan the manager does not expose
    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    /// Network, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Remote service answered with a non-success status
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl DaisyError {
    /// Shorthand for the lookup guard error
    pub fn missing_arguments() -> Self {
        DaisyError::Argument("Missing arguments".into())
    }

    /// Whether the error was raised locally, before touching the network
    pub fn is_argument(&self) -> bool {
        matches!(self, DaisyError::Argument(_))
    }

    /// Status code returned by the remote service, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            DaisyError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            DaisyError::Argument(msg) => msg.clone(),
            DaisyError::PlanNotFound(_) => "Plan not found".into(),
            DaisyError::Status { status: 401 | 403, .. } => {
                "Authentication failed. Please check your Daisy credentials.".into()
            }
            DaisyError::Status { status: 404, .. } => "Resource not found.".into(),
            DaisyError::Status { .. } | DaisyError::Transport(_) => {
                "The billing service is currently unavailable. Please try again.".into()
            }
            DaisyError::Decode(_) => "The billing service returned an unexpected response.".into(),
            DaisyError::Config(_) => "Service configuration error.".into(),
            DaisyError::Other(_) => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for DaisyError {
    fn from(err: anyhow::Error) -> Self {
        DaisyError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_not_found_message() {
        let err = DaisyError::PlanNotFound("P2".into());
        assert!(err.to_string().starts_with("Plan not found"));
        assert_eq!(err.user_message(), "Plan not found");
    }

    #[test]
    fn test_status_accessor() {
        let err = DaisyError::Status { status: 401, body: String::new() };
        assert_eq!(err.status(), Some(401));
        assert!(err.user_message().contains("Authentication failed"));
        assert_eq!(DaisyError::missing_arguments().status(), None);
        assert!(DaisyError::missing_arguments().is_argument());
    }
}
