//! Charger status lookup error types.

/// Errors from a charger status lookup.
///
/// `Clone` because a single failed lookup is fanned out to every caller
/// that joined the deduplicated in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// The lookup did not complete within the time bound.
    #[error("charger status lookup timed out")]
    Timeout,

    /// HTTP request failed (connection error, DNS, etc.)
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The API returned a non-success status code.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered 200 but reported an error in its envelope.
    #[error("upstream error {code}: {message}")]
    Upstream { code: String, message: String },

    /// Response body could not be decoded.
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

impl From<reqwest::Error> for StatusError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StatusError::Timeout
        } else {
            StatusError::Http {
                message: err.to_string(),
            }
        }
    }
}
