//! Error type returned by every Chatwork operation.

use reqwest::StatusCode;

/// Errors that can occur while talking to the Chatwork API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure, timeout, or failure to build the HTTP client.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Chatwork answered with a non-2xx status.
    #[error("Chatwork API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// The response body was not valid JSON.
    #[error("failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a local file for upload failed.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The API token contains characters that cannot be sent in a header.
    #[error("API token is not a valid header value")]
    InvalidToken,

    /// No API token was supplied to the builder or the environment.
    #[error("missing Chatwork API token")]
    MissingToken,
}

impl Error {
    /// HTTP status of an [`Error::Api`]; `None` for every other variant.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Messages from Chatwork's `{"errors": [...]}` payload, if present.
    pub fn api_errors(&self) -> Vec<String> {
        let Error::Api { body, .. } = self else {
            return Vec::new();
        };

        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("errors").and_then(|e| e.as_array()).map(|arr| {
                    arr.iter()
                        .filter_map(|m| m.as_str().map(str::to_string))
                        .collect()
                })
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_extracts_messages() {
        let err = Error::Api {
            status: StatusCode::UNAUTHORIZED,
            body: r#"{"errors":["Invalid API token"]}"#.to_string(),
        };
        assert_eq!(err.api_errors(), vec!["Invalid API token".to_string()]);
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn api_errors_empty_for_non_json_body() {
        let err = Error::Api {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert!(err.api_errors().is_empty());
        assert!(Error::InvalidToken.api_errors().is_empty());
        assert_eq!(Error::MissingToken.status(), None);
    }
}
