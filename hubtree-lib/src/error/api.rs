//! API error types

use std::time::Duration;

use super::AuthError;

/// Errors that can occur while fetching one level of the catalog.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response from the API.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// No usable access token for the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),
}

/// Whether a failure is worth retrying as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network trouble or a server-side error.
    Transient,
    /// Not found, forbidden, malformed. Unlikely to change on retry.
    Permanent,
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classifies the failure.
    ///
    /// 4xx responses are permanent, 5xx responses and transport failures
    /// are transient.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http { status, .. } if *status >= 500 => FailureKind::Transient,
            Self::Http { .. } => FailureKind::Permanent,
            Self::Network(e) => match e.status() {
                Some(status) if status.is_client_error() => FailureKind::Permanent,
                _ => FailureKind::Transient,
            },
            Self::Timeout(_) => FailureKind::Transient,
            Self::InvalidUrl(_) | Self::Parse { .. } | Self::Unauthorized(_) => {
                FailureKind::Permanent
            }
        }
    }

    /// Returns `true` if this error is transient.
    pub fn is_transient(&self) -> bool {
        self.kind() == FailureKind::Transient
    }
}
