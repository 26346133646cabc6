use thiserror::Error;

/// Rejected form input. Raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A data de início não pode ser posterior à data de fim.")]
    InvertedRange,
    #[error("Selecione pelo menos um tipo de OP")]
    NoOperationKind,
}

/// Failure talking to the backend. Rendered inline; never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Erro {status}: {status_text}")]
    Status { status: u16, status_text: String },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

impl RequestError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        RequestError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RequestError::Decode(err.to_string())
        } else {
            RequestError::Transport(err.to_string())
        }
    }
}
