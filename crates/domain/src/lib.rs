mod error;
mod models;
pub mod protocol;

pub use error::PayloadError;
pub use models::{NoteRequest, ThreadSource, TicketId, WebhookPayload};
pub use protocol::{plan_relay, RelayDecision, RelayPlan, SkipReason};
