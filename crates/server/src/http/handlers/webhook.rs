use axum::{body::Bytes, extract::State, Json};
use domain::{plan_relay, RelayDecision, WebhookPayload};
use serde::Serialize;
use tracing::{debug, info};

use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Copies the latest reply or note of a child ticket onto its parent as a
/// private note.
///
/// The body is read raw so that malformed JSON maps to a 400 with our own
/// error shape instead of axum's rejection.
pub async fn handle_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let payload = WebhookPayload::from_slice(&body)?;

    let plan = match plan_relay(&payload, &state.parent_field)? {
        RelayDecision::Relay(plan) => plan,
        RelayDecision::Skip(reason) => {
            debug!(?reason, "Webhook skipped");
            return Ok(MessageResponse::new(reason.message()));
        }
    };

    info!(
        child = %plan.child_id,
        parent = %plan.parent_id,
        source = %plan.source,
        "Relaying thread update to parent ticket"
    );

    state
        .desk
        .create_private_note(plan.parent_id, &plan.note_request())
        .await?;

    Ok(MessageResponse::new(format!(
        "Successfully added note to parent ticket #{}",
        plan.parent_id
    )))
}
