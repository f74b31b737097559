mod drivers;
mod error;
mod traits;

pub use drivers::freshdesk::{FreshdeskClient, FreshdeskConfig};
pub use error::FreshdeskError;
pub use traits::HelpDesk;

/// A note Freshdesk acknowledged with `201 Created`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedNote {
    pub id: Option<u64>,
}
