//! Authentication error types

/// Errors a token provider can report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// No session is available for the caller.
    #[error("Not authorized")]
    NotAuthorized,

    /// Access token expired and could not be renewed.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },

    /// The provider failed for another reason.
    #[error("Token provider failed: {0}")]
    Provider(String),
}
