//! Settings management for a single page of a hosted multi-page site.
//!
//! Edits stay in local drafts until an explicit save; each save issues one
//! whole-record update against the persistence API and reconciles the draft
//! with what the server acknowledged. Remote failures become inline error
//! state on the affected editor and never escape the controllers.

pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod kv;
pub mod logging;
pub mod model;
pub mod panel;
pub mod store;

pub use controller::{
    DeleteOutcome, Navigator, OnComplete, PageLifecycleController, PageSettingsController,
    SubmitOutcome,
};
pub use editor::{EditorState, KeyValueEditor, NameEditor};
pub use error::{Result, SettingsError};
pub use kv::{KeyValueModel, RowId};
pub use model::{Head, PageRecord};
pub use panel::{SettingsPanel, SettingsTab};
pub use store::{HttpSiteStore, SiteStore, StoreError};
