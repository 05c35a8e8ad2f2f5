//! PageLifecycleController - deleting a page
//!
//! The controller does not ask for confirmation; the caller gates
//! [`delete_page`](PageLifecycleController::delete_page) behind its own prompt.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{Navigator, OnComplete};
use crate::model::{site_root_path, PageRecord};
use crate::store::SiteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    Idle,
    Deleting,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed(String),
    /// A delete is already in flight or has already succeeded
    Ignored,
}

struct LifecycleState {
    status: DeleteStatus,
    last_error: Option<String>,
}

#[derive(Clone)]
pub struct PageLifecycleController {
    page_id: String,
    site_name: String,
    store: Arc<dyn SiteStore>,
    navigator: Arc<dyn Navigator>,
    on_complete: OnComplete,
    inner: Arc<Mutex<LifecycleState>>,
}

impl PageLifecycleController {
    pub fn new(
        record: &PageRecord,
        store: Arc<dyn SiteStore>,
        navigator: Arc<dyn Navigator>,
        on_complete: OnComplete,
    ) -> Self {
        Self {
            page_id: record.id.clone(),
            site_name: record.site_name.clone(),
            store,
            navigator,
            on_complete,
            inner: Arc::new(Mutex::new(LifecycleState {
                status: DeleteStatus::Idle,
                last_error: None,
            })),
        }
    }

    pub async fn status(&self) -> DeleteStatus {
        self.inner.lock().await.status
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }

    /// Prompt shown before the caller confirms. The page may have been renamed
    /// since this controller was built, so the current name is passed in.
    pub fn confirmation_prompt(page_name: &str) -> (String, &'static str) {
        (
            format!("Are you sure you want to delete {}?", page_name),
            "It cannot be recovered in the editor.",
        )
    }

    /// Delete the page, then navigate to the site root and signal completion.
    ///
    /// On failure the error is kept for display and the call may be retried.
    pub async fn delete_page(&self) -> DeleteOutcome {
        {
            let mut state = self.inner.lock().await;
            if state.status != DeleteStatus::Idle {
                tracing::debug!("Delete of page {} ignored ({:?})", self.page_id, state.status);
                return DeleteOutcome::Ignored;
            }
            state.status = DeleteStatus::Deleting;
        }

        tracing::info!("Deleting page {} from site {}", self.page_id, self.site_name);
        match self.store.delete_site(&self.page_id).await {
            Ok(()) => {
                {
                    let mut state = self.inner.lock().await;
                    state.status = DeleteStatus::Deleted;
                    state.last_error = None;
                }
                self.navigator.navigate_to(&site_root_path(&self.site_name));
                (self.on_complete)();
                DeleteOutcome::Deleted
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Delete of page {} failed: {}", self.page_id, message);
                let mut state = self.inner.lock().await;
                state.status = DeleteStatus::Idle;
                state.last_error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }
}
