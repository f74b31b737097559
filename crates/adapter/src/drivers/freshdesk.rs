use async_trait::async_trait;
use domain::{NoteRequest, TicketId};
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::FreshdeskError;
use crate::traits::HelpDesk;
use crate::CreatedNote;

const USER_AGENT: &str = concat!("freshdesk-relay/", env!("CARGO_PKG_VERSION"));

/// Freshdesk's API key auth: the key is the basic-auth user, the password is ignored.
const API_KEY_PASSWORD: &str = "X";

#[derive(Clone)]
pub struct FreshdeskConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl FreshdeskConfig {
    pub fn for_domain(domain: &str, api_key: impl Into<String>) -> Self {
        Self {
            base_url: format!("https://{}", domain.trim()),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for FreshdeskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreshdeskConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct FreshdeskClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FreshdeskClient {
    pub fn new(config: FreshdeskConfig) -> Result<Self, FreshdeskError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FreshdeskError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn notes_url(&self, ticket_id: TicketId) -> String {
        format!("{}/api/v2/tickets/{}/notes", self.base_url, ticket_id)
    }
}

#[async_trait]
impl HelpDesk for FreshdeskClient {
    async fn create_private_note(
        &self,
        ticket_id: TicketId,
        note: &NoteRequest,
    ) -> Result<CreatedNote, FreshdeskError> {
        let url = self.notes_url(ticket_id);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api_key, Some(API_KEY_PASSWORD))
            .json(note)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::CREATED {
            warn!(%status, "Freshdesk rejected note for ticket #{}", ticket_id);
            return Err(FreshdeskError::Rejected { status, body });
        }

        // The created conversation is echoed back; its id is informational only.
        let id = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("id").and_then(Value::as_u64));

        info!(note_id = ?id, "Created private note on ticket #{}", ticket_id);
        Ok(CreatedNote { id })
    }
}
