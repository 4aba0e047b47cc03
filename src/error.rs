use reqwest::StatusCode;
use thiserror::Error;

use crate::{
    configuration::ConfigurationError, exit_codes::EyExitCode, token_store::TokenStoreError,
};

/// Errors surfaced by the token store, the transport, the API client and
/// the resource records.
///
/// Transport errors travel through the API client unchanged, with one
/// exception: a 401 on an authenticated call becomes `InvalidCredentials`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A named application, environment, key or log could not be found
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// The server rejected the email/password pair or the stored token
    #[error("Invalid credentials. Run 'ey login' to authenticate again.")]
    InvalidCredentials,

    /// Any other 4xx response
    #[error("Request rejected by the server ({status}){}", message_suffix(.message))]
    ClientError {
        status: StatusCode,
        message: Option<String>,
    },

    /// 5xx responses and network failures (no status)
    #[error("{}", describe_server_error(.status, .message))]
    ServerError {
        status: Option<StatusCode>,
        message: String,
    },

    /// A status that is neither success nor an error, such as a redirect
    /// the transport did not follow
    #[error("Unexpected response status ({status}){}", message_suffix(.message))]
    UnexpectedStatus {
        status: StatusCode,
        message: Option<String>,
    },

    /// A response body that is not the structured data we asked for
    #[error("Unexpected response from the server: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// A name fragment matched several records and none of them exactly
    #[error("The name '{fragment}' is ambiguous; it matches several {kind}s: {}", .candidates.join(", "))]
    Ambiguous {
        kind: &'static str,
        fragment: String,
        candidates: Vec<String>,
    },

    /// A record lacks an attribute required to build a follow-up request
    #[error("{kind} has no {name}")]
    MissingAttribute {
        kind: &'static str,
        name: &'static str,
    },

    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),

    #[error("Failed to read credentials: {0}")]
    PromptFailed(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(": {}", message),
        _ => String::new(),
    }
}

fn describe_server_error(status: &Option<StatusCode>, message: &str) -> String {
    match status {
        Some(status) if message.is_empty() => format!("Server error ({})", status),
        Some(status) => format!("Server error ({}): {}", status, message),
        None => format!("Network error: {}", message),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::ServerError {
            status: error.status(),
            message: error.to_string(),
        }
    }
}

impl ApiError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> EyExitCode {
        match self {
            ApiError::NotFound { .. } => EyExitCode::NotFound,
            ApiError::InvalidCredentials => EyExitCode::AuthError,
            ApiError::ClientError { .. } => EyExitCode::ApiError,
            ApiError::ServerError { .. } => EyExitCode::ServerError,
            ApiError::UnexpectedStatus { .. } => EyExitCode::ApiError,
            ApiError::DecodeError(_) => EyExitCode::DataError,
            ApiError::Ambiguous { .. } => EyExitCode::UsageError,
            ApiError::MissingAttribute { .. } => EyExitCode::DataError,
            ApiError::TokenStore(TokenStoreError::NotFound { .. }) => EyExitCode::AuthError,
            ApiError::TokenStore(_) => EyExitCode::IoError,
            ApiError::PromptFailed(_) => EyExitCode::UsageError,
            ApiError::Configuration(_) => EyExitCode::ConfigError,
            ApiError::Io(_) => EyExitCode::NoInput,
        }
    }

    /// Whether running the same command again might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::ServerError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_message_includes_server_text() {
        let error = ApiError::ClientError {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: Some("Name has already been taken".to_string()),
        };
        let text = error.to_string();
        assert!(text.contains("422"));
        assert!(text.ends_with(": Name has already been taken"));
    }

    #[test]
    fn test_network_error_has_no_status() {
        let error = ApiError::ServerError {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(error.to_string(), "Network error: connection refused");
        assert!(error.is_retryable());
        assert_eq!(error.exit_code(), EyExitCode::ServerError);
    }

    #[test]
    fn test_ambiguous_lists_candidates() {
        let error = ApiError::Ambiguous {
            kind: "environment",
            fragment: "engineyard".to_string(),
            candidates: vec![
                "engineyard_production".to_string(),
                "engineyard_staging".to_string(),
            ],
        };
        assert!(error
            .to_string()
            .contains("engineyard_production, engineyard_staging"));
        assert_eq!(error.exit_code(), EyExitCode::UsageError);
        assert!(!error.is_retryable());
    }
}
