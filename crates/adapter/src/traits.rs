use async_trait::async_trait;
use domain::{NoteRequest, TicketId};

use crate::error::FreshdeskError;
use crate::CreatedNote;

#[async_trait]
pub trait HelpDesk: Send + Sync {
    async fn create_private_note(
        &self,
        ticket_id: TicketId,
        note: &NoteRequest,
    ) -> Result<CreatedNote, FreshdeskError>;
}
