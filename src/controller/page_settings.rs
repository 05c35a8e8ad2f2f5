//! PageSettingsController - page name and head metadata for one page
//!
//! The two sub-editors have independent save cycles. Each save re-sends the
//! whole record as last known here with only its own field replaced, because
//! the persistence API replaces records wholesale. Two saves racing against
//! the same record can therefore undo each other's field; there is no version
//! token to detect it.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{Navigator, SubmitOutcome};
use crate::editor::{EditorState, KeyValueEditor, NameEditor};
use crate::kv::KeyValueModel;
use crate::model::{page_path, Head, PageRecord};
use crate::store::SiteStore;

struct SettingsState {
    /// Last record acknowledged by the server or handed in from outside
    record: PageRecord,
    name: NameEditor,
    head: KeyValueEditor,
}

#[derive(Clone)]
pub struct PageSettingsController {
    store: Arc<dyn SiteStore>,
    navigator: Arc<dyn Navigator>,
    inner: Arc<Mutex<SettingsState>>,
}

impl PageSettingsController {
    pub fn new(
        record: PageRecord,
        store: Arc<dyn SiteStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let name = NameEditor::new(record.page_name.clone());
        let head = KeyValueEditor::new(record.head_or_default());
        Self {
            store,
            navigator,
            inner: Arc::new(Mutex::new(SettingsState { record, name, head })),
        }
    }

    pub async fn record(&self) -> PageRecord {
        self.inner.lock().await.record.clone()
    }

    // ── Page name ───────────────────────────────────────────────────────────

    pub async fn page_name_draft(&self) -> String {
        self.inner.lock().await.name.draft().clone()
    }

    /// Replace the candidate name. Returns false while a rename is in flight.
    pub async fn set_page_name(&self, name: &str) -> bool {
        self.inner
            .lock()
            .await
            .name
            .edit(|draft| *draft = name.to_string())
            .is_some()
    }

    /// Save affordance: the candidate differs from the committed name
    pub async fn can_rename(&self) -> bool {
        self.inner.lock().await.name.can_submit()
    }

    pub async fn name_state(&self) -> EditorState {
        self.inner.lock().await.name.state()
    }

    pub async fn name_error(&self) -> Option<String> {
        self.inner.lock().await.name.last_error().map(str::to_string)
    }

    pub async fn cancel_rename(&self) {
        self.inner.lock().await.name.cancel();
    }

    /// Save the candidate name and navigate to the page's new path on success
    pub async fn submit_rename(&self) -> SubmitOutcome {
        let (id, payload) = {
            let mut state = self.inner.lock().await;
            let Some(name) = state.name.begin_submit() else {
                tracing::debug!("Rename submit ignored ({})", state.name.state());
                return SubmitOutcome::Ignored;
            };
            (state.record.id.clone(), state.record.renamed(&name))
        };

        tracing::info!("Renaming page {} to '{}'", id, payload.page_name);
        match self.store.update_site(&id, &payload).await {
            Ok(stored) => {
                let path = {
                    let mut state = self.inner.lock().await;
                    state.name.submit_succeeded(stored.page_name.clone());
                    state.record.page_name = stored.page_name.clone();
                    page_path(&stored.site_name, &stored.page_name)
                };
                self.navigator.navigate_to(&path);
                SubmitOutcome::Saved
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Rename of page {} failed: {}", id, message);
                self.inner.lock().await.name.submit_failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    // ── Head metadata ───────────────────────────────────────────────────────

    /// Apply an edit to the head draft. Returns `None` while a head save is in flight.
    pub async fn edit_head<R>(&self, change: impl FnOnce(&mut KeyValueModel) -> R) -> Option<R> {
        self.inner.lock().await.head.edit(change)
    }

    /// Read the head editor without holding on to the lock
    pub async fn with_head<R>(&self, read: impl FnOnce(&KeyValueEditor) -> R) -> R {
        read(&self.inner.lock().await.head)
    }

    pub async fn head_state(&self) -> EditorState {
        self.inner.lock().await.head.state()
    }

    pub async fn head_error(&self) -> Option<String> {
        self.inner.lock().await.head.last_error().map(str::to_string)
    }

    pub async fn cancel_head(&self) {
        self.inner.lock().await.head.cancel();
    }

    /// Save the head draft as part of a full-record update
    pub async fn submit_head(&self) -> SubmitOutcome {
        let (id, head, payload) = {
            let mut state = self.inner.lock().await;
            let Some(head) = state.head.begin_submit() else {
                tracing::debug!("Head submit ignored ({})", state.head.state());
                return SubmitOutcome::Ignored;
            };
            let payload = state.record.with_replaced_head(head.clone());
            (state.record.id.clone(), head, payload)
        };

        tracing::info!("Saving head for page {} ({} entries)", id, head.len());
        match self.store.update_site(&id, &payload).await {
            Ok(stored) => {
                let acknowledged: Head = stored.page.head.unwrap_or(head);
                let mut state = self.inner.lock().await;
                state.head.submit_succeeded(acknowledged.clone());
                state.record.page.head = Some(acknowledged);
                SubmitOutcome::Saved
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Head update for page {} failed: {}", id, message);
                self.inner.lock().await.head.submit_failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    // ── External updates ────────────────────────────────────────────────────

    /// A new copy of the record arrived from the data-loading layer.
    ///
    /// Clean editors adopt it; editors with local edits keep their drafts.
    pub async fn receive_record(&self, record: PageRecord) {
        let mut state = self.inner.lock().await;
        if state.record == record {
            return;
        }
        let name_adopted = state.name.external_update(record.page_name.clone());
        let head_adopted = state.head.external_update(record.head_or_default());
        if !name_adopted || !head_adopted {
            tracing::debug!(
                "Record {} refreshed; kept local drafts (name: {}, head: {})",
                record.id,
                !name_adopted,
                !head_adopted
            );
        }
        state.record = record;
    }
}
