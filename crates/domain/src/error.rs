use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid webhook payload. Request body is empty.")]
    EmptyBody,

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid webhook payload. Expected a JSON object.")]
    NotAnObject,

    #[error("Invalid webhook payload. 'ticket' object is missing.")]
    MissingTicket,

    #[error("Invalid webhook payload. 'ticket.id' is missing.")]
    MissingChildId,

    #[error("Invalid ticket id in '{field}': {value}")]
    InvalidTicketId { field: String, value: String },
}
