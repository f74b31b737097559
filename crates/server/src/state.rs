use adapter::HelpDesk;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<dyn HelpDesk>,
    /// Ticket field holding the parent ticket id.
    pub parent_field: Arc<str>,
}

impl AppState {
    pub fn new(desk: Arc<dyn HelpDesk>, parent_field: &str) -> Self {
        Self {
            desk,
            parent_field: Arc::from(parent_field),
        }
    }
}
