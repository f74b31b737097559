use crate::error::PayloadError;
use crate::models::{NoteRequest, ThreadSource, TicketId, WebhookPayload};
use serde_json::{Map, Value};

pub const DEFAULT_PARENT_FIELD: &str = "cf_parent_ticket_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayPlan {
    pub parent_id: TicketId,
    pub child_id: TicketId,
    pub source: ThreadSource,
    pub text: String,
}

impl RelayPlan {
    pub fn note_body(&self) -> String {
        compose_note_body(self.source, self.child_id, &self.text)
    }

    pub fn note_request(&self) -> NoteRequest {
        NoteRequest::private(self.note_body())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotAChildTicket,
    NoThreadContent,
}

impl SkipReason {
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::NotAChildTicket => "Not a child ticket, or parent ID is missing.",
            SkipReason::NoThreadContent => "No new reply or note found in the payload.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayDecision {
    Relay(RelayPlan),
    Skip(SkipReason),
}

pub fn compose_note_body(source: ThreadSource, child_id: TicketId, text: &str) -> String {
    format!("--- {} from Child Ticket #{} ---\n{}", source, child_id, text)
}

/// Decides what, if anything, should be copied onto the parent ticket.
///
/// A missing parent id is not an error: most tickets are not children.
/// The public reply wins over the private note when both are present.
pub fn plan_relay(payload: &WebhookPayload, parent_field: &str) -> Result<RelayDecision, PayloadError> {
    let ticket = payload.ticket()?;

    let parent_id = match TicketId::from_field(parent_field, lookup_field(ticket, parent_field))? {
        Some(id) => id,
        None => return Ok(RelayDecision::Skip(SkipReason::NotAChildTicket)),
    };

    let (source, text) = match latest_thread(payload) {
        Some(found) => found,
        None => return Ok(RelayDecision::Skip(SkipReason::NoThreadContent)),
    };

    let child_id = TicketId::from_field("id", ticket.get("id"))?.ok_or(PayloadError::MissingChildId)?;

    Ok(RelayDecision::Relay(RelayPlan {
        parent_id,
        child_id,
        source,
        text: text.to_string(),
    }))
}

fn lookup_field<'a>(ticket: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    ticket.get(field).or_else(|| {
        ticket
            .get("custom_fields")
            .and_then(Value::as_object)
            .and_then(|custom| custom.get(field))
    })
}

fn latest_thread(payload: &WebhookPayload) -> Option<(ThreadSource, &str)> {
    payload
        .public_reply_text()
        .map(|text| (ThreadSource::Reply, text))
        .or_else(|| payload.note_text().map(|text| (ThreadSource::Note, text)))
}
