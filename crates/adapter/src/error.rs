use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FreshdeskError {
    /// Freshdesk answered, but not with `201 Created`.
    #[error("Freshdesk responded with HTTP {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("request to Freshdesk failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid Freshdesk client configuration: {0}")]
    Configuration(String),
}
