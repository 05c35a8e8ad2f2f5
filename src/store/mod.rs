//! Persistence API seam
//!
//! The page builder's backend stores whole records; `update_site` replaces the
//! record wholesale and `delete_site` removes it. Controllers only ever see the
//! [`SiteStore`] trait.

mod http;
mod memory;

pub use http::HttpSiteStore;
pub use memory::{MemorySiteStore, StoreCall};

use async_trait::async_trait;

use crate::model::PageRecord;

/// Remote mutation failure. `Display` is the message shown next to the control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("not found")]
    NotFound,

    #[error("Server error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("{message}")]
    Rejected { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl StoreError {
    pub fn rejected(message: impl Into<String>) -> Self {
        StoreError::Rejected {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait SiteStore: Send + Sync {
    /// Replace the record stored under `id` and return what the server kept
    async fn update_site(&self, id: &str, record: &PageRecord) -> Result<PageRecord, StoreError>;

    async fn delete_site(&self, id: &str) -> Result<(), StoreError>;
}
