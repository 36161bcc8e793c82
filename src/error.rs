use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Gateway returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    #[error("Malformed game state: {0}")]
    MalformedState(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Batch {batch_id} is invalid: {}", reasons.join("; "))]
    BatchInvalid {
        batch_id: String,
        reasons: Vec<String>,
    },
}

impl AppError {
    /// Whether the failure happened on the wire and re-issuing the same
    /// request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Transport(_) => true,
            AppError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_server_errors_are_transient() {
        assert!(AppError::Transport("connection refused".into()).is_transient());
        assert!(AppError::Http {
            status: 503,
            body: String::new()
        }
        .is_transient());
    }

    #[test]
    fn client_side_errors_are_not_transient() {
        assert!(!AppError::Http {
            status: 400,
            body: "bad batch".into()
        }
        .is_transient());
        assert!(!AppError::NotFound("game".into()).is_transient());
        assert!(!AppError::MalformedResponse("empty".into()).is_transient());
    }

    #[test]
    fn batch_invalid_message_lists_reasons() {
        let err = AppError::BatchInvalid {
            batch_id: "abc".into(),
            reasons: vec!["Space already taken".into(), "Game over".into()],
        };
        assert_eq!(
            err.to_string(),
            "Batch abc is invalid: Space already taken; Game over"
        );
    }
}
