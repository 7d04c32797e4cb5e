//! Error taxonomy for admin API calls.
//!
//! Every variant renders a one-line, user-facing message via `Display`;
//! views show that message inline and nothing here is ever retried.

use std::fmt;

/// The API operation an error belongs to. Drives fallback messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    QuizList,
    EventList,
    PolicyList,
}

impl Operation {
    /// Request path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Login => "/api/auth/admin-login",
            Operation::QuizList => "/api/quizzes",
            Operation::EventList => "/api/events",
            Operation::PolicyList => "/api/reward-policies",
        }
    }

    /// Short label used in messages ("quiz list request failed ...").
    pub fn label(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::QuizList => "quiz list",
            Operation::EventList => "event list",
            Operation::PolicyList => "policy list",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors surfaced by the admin API client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Base URL missing or invalid. Blocks the action.
    #[error("{0}")]
    Configuration(String),

    /// Non-2xx response. `message` is the server text, or a status-coded fallback.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Response decoded but failed shape validation.
    #[error("{0}")]
    MalformedResponse(String),

    /// Transport-level failure (connect, timeout, body read).
    #[error("{message}")]
    Network { message: String, details: String },
}

impl ApiError {
    /// Error for a missing base URL.
    pub fn missing_base_url() -> Self {
        ApiError::Configuration(
            "API URL is not configured. Set api_url in config.toml or EVENTDESK_API_URL."
                .to_string(),
        )
    }

    /// Error for a non-success status.
    ///
    /// Uses the response body verbatim unless it is empty.
    pub fn http_status(operation: Operation, status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("{operation} request failed (status {status})")
        } else {
            body.to_string()
        };
        ApiError::Http { status, message }
    }

    /// Error for a transport failure. The cause is kept for logs, not for display.
    pub fn network(operation: Operation, cause: &dyn std::error::Error) -> Self {
        let message = match operation {
            Operation::Login => "A network error occurred while logging in.".to_string(),
            _ => format!("A network error occurred while requesting the {operation}."),
        };
        ApiError::Network {
            message,
            details: cause.to_string(),
        }
    }

    /// Error for a body that does not have the expected shape.
    pub fn unexpected_shape(operation: Operation) -> Self {
        ApiError::MalformedResponse(format!("{operation} response has an unexpected shape"))
    }

    /// Message suitable for inline display.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, when the error came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for admin API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
