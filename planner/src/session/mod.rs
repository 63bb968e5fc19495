//! Session state and persistence
//!
//! SessionStore owns the product name, Q&A history and content ideas for a
//! planning run and persists them to a single JSON file.

mod error;
mod store;
mod types;

pub use error::SessionError;
pub use store::SessionStore;
pub use types::{ContentIdea, QaRecord, SessionDocument, SessionSummary};
