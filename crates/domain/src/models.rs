use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::PayloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(u64);

impl TicketId {
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    /// Reads a ticket id out of a loosely typed webhook field.
    ///
    /// Freshdesk placeholders render custom fields as numbers or strings
    /// depending on the field type, and an unset field arrives as `null`,
    /// `""` or `0`. All of those mean "no ticket" and yield `Ok(None)`.
    pub fn from_field(field: &str, value: Option<&Value>) -> Result<Option<Self>, PayloadError> {
        let invalid = || PayloadError::InvalidTicketId {
            field: field.to_string(),
            value: value.map(Value::to_string).unwrap_or_default(),
        };

        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
            Some(Value::Number(n)) => match n.as_u64() {
                Some(id) => Ok(Self::new(id)),
                None if n.as_f64() == Some(0.0) => Ok(None),
                None => Err(invalid()),
            },
            Some(Value::String(s)) => {
                let s = s.trim().trim_start_matches('#').trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<u64>().map(Self::new).map_err(|_| invalid())
            }
            Some(_) => Err(invalid()),
        }
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Incoming Freshdesk automation webhook.
///
/// Fields are kept as raw JSON: custom fields are looked up by name at
/// runtime, and placeholders Freshdesk renders empty (`""`) must not fail
/// the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub ticket: Option<Value>,
    #[serde(default)]
    pub latest_public_comment: Option<Value>,
    #[serde(default)]
    pub latest_note: Option<Value>,
}

impl WebhookPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, PayloadError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(PayloadError::EmptyBody);
        }
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(PayloadError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn ticket(&self) -> Result<&Map<String, Value>, PayloadError> {
        self.ticket
            .as_ref()
            .and_then(Value::as_object)
            .ok_or(PayloadError::MissingTicket)
    }

    pub fn public_reply_text(&self) -> Option<&str> {
        body_text(self.latest_public_comment.as_ref())
    }

    pub fn note_text(&self) -> Option<&str> {
        body_text(self.latest_note.as_ref())
    }
}

/// `body_text` of a thread entry, if the entry is an object holding a string.
fn body_text(entry: Option<&Value>) -> Option<&str> {
    entry?.as_object()?.get("body_text")?.as_str()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadSource {
    Reply,
    Note,
}

impl fmt::Display for ThreadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadSource::Reply => write!(f, "Reply"),
            ThreadSource::Note => write!(f, "Note"),
        }
    }
}

/// Body of `POST /api/v2/tickets/{id}/notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRequest {
    pub body: String,
    pub private: bool,
}

impl NoteRequest {
    pub fn private(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            private: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ticket_id_accepts_numbers_and_numeric_strings() {
        let id = TicketId::from_field("id", Some(&json!(42))).unwrap();
        assert_eq!(id, TicketId::new(42));

        let id = TicketId::from_field("id", Some(&json!(" #1337 "))).unwrap();
        assert_eq!(id.map(|t| t.get()), Some(1337));
    }

    #[test]
    fn ticket_id_treats_unset_values_as_absent() {
        for value in [json!(null), json!(""), json!("  "), json!(0), json!(false)] {
            assert_eq!(TicketId::from_field("cf", Some(&value)).unwrap(), None);
        }
        assert_eq!(TicketId::from_field("cf", None).unwrap(), None);
    }

    #[test]
    fn ticket_id_rejects_garbage() {
        let err = TicketId::from_field("cf_parent_ticket_id", Some(&json!("abc"))).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidTicketId { ref field, .. } if field == "cf_parent_ticket_id"));

        assert!(TicketId::from_field("cf", Some(&json!(-3))).is_err());
        assert!(TicketId::from_field("cf", Some(&json!({"id": 1}))).is_err());
    }

    #[test]
    fn payload_requires_a_json_object() {
        assert!(matches!(
            WebhookPayload::from_slice(b""),
            Err(PayloadError::EmptyBody)
        ));
        assert!(matches!(
            WebhookPayload::from_slice(b"not json"),
            Err(PayloadError::Json(_))
        ));
        assert!(matches!(
            WebhookPayload::from_slice(b"[1, 2]"),
            Err(PayloadError::NotAnObject)
        ));
    }

    #[test]
    fn payload_ticket_must_be_an_object() {
        let payload = WebhookPayload::from_slice(br#"{"ticket": "nope"}"#).unwrap();
        assert!(matches!(payload.ticket(), Err(PayloadError::MissingTicket)));

        let payload = WebhookPayload::from_slice(br#"{"ticket": {"id": 1}}"#).unwrap();
        assert!(payload.ticket().is_ok());
    }

    #[test]
    fn thread_entries_of_the_wrong_shape_count_as_absent() {
        let payload = WebhookPayload::from_slice(
            br#"{"ticket": {"id": 1}, "latest_public_comment": "", "latest_note": {"body_text": 123}}"#,
        )
        .unwrap();
        assert_eq!(payload.public_reply_text(), None);
        assert_eq!(payload.note_text(), None);

        let payload = WebhookPayload::from_slice(
            br#"{"ticket": {"id": 1}, "latest_public_comment": null, "latest_note": {"body_text": ""}}"#,
        )
        .unwrap();
        assert_eq!(payload.public_reply_text(), None);
        assert_eq!(payload.note_text(), Some(""));
    }

    #[test]
    fn note_request_serializes_as_private() {
        let json = serde_json::to_value(NoteRequest::private("hi")).unwrap();
        assert_eq!(json, json!({"body": "hi", "private": true}));
    }
}
