//! Client error types

use thiserror::Error;

/// Client error type
///
/// Every variant is a transport-level failure from the caller's point of
/// view: surfaced to the user as a transient message, never retried here.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success status
    #[error("Gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error (malformed JSON in either direction)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Gateway reported `success: false`
    #[error("Rejected by store: {0}")]
    Rejected(String),
}

impl ClientError {
    /// Message suitable for a transient user-facing notice
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(e) if e.is_timeout() => {
                "A loja não respondeu a tempo. Tente novamente.".to_string()
            }
            ClientError::Http(_) | ClientError::Status { .. } => {
                "Não foi possível falar com a loja. Verifique sua conexão e tente novamente.".to_string()
            }
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                "A loja enviou uma resposta inesperada. Tente novamente.".to_string()
            }
            ClientError::Rejected(message) => message.clone(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let offline = ClientError::Status {
            status: 503,
            body: "down".into(),
        };
        assert_eq!(
            offline.user_message(),
            "Não foi possível falar com a loja. Verifique sua conexão e tente novamente."
        );
        assert_eq!(
            ClientError::InvalidResponse("empty body".into()).user_message(),
            "A loja enviou uma resposta inesperada. Tente novamente."
        );
        assert_eq!(
            ClientError::Rejected("Planilha cheia".into()).user_message(),
            "Planilha cheia"
        );
    }
}
