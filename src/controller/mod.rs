//! Controllers for one page's settings
//!
//! Both controllers are cheap to clone and share their state behind an async
//! mutex, so several UI events can drive the same page concurrently. The lock
//! is never held across a remote call.

mod lifecycle;
mod page_settings;

pub use lifecycle::{DeleteOutcome, DeleteStatus, PageLifecycleController};
pub use page_settings::PageSettingsController;

use std::sync::Arc;

/// Fire-and-forget navigation primitive
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// Called with no arguments when the settings UI closes or a destructive action finishes
pub type OnComplete = Arc<dyn Fn() + Send + Sync>;

/// Result of a save action. Remote failures are already recorded on the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Failed(String),
    /// Nothing to save, or a save was already in flight
    Ignored,
}
