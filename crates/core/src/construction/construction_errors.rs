use thiserror::Error;

/// Failures talking to the construction or rebalance services.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Error calling portfolio service: {0}")]
    Transport(String),

    #[error("Portfolio service returned {status}: {detail}")]
    Failed { status: u16, detail: String },

    #[error("Malformed response from portfolio service: {0}")]
    Malformed(String),
}

impl CollaboratorError {
    /// Text suitable for showing to the user after a failure prefix.
    pub fn detail(&self) -> String {
        match self {
            CollaboratorError::Failed { detail, .. } => detail.clone(),
            CollaboratorError::Transport(_) => "Error calling portfolio service.".to_string(),
            CollaboratorError::Malformed(_) => "Unknown error from API".to_string(),
        }
    }
}
