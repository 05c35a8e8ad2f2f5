//! Settings panel for one page
//!
//! Composes the page controllers into three tabs and owns the UI-level policy
//! around them: the delete confirmation step, the raw record view, closing the
//! panel, and the site deploy trigger. Rendering is left to the embedding UI.

use std::sync::Arc;

use async_trait::async_trait;

use crate::controller::{
    DeleteOutcome, Navigator, OnComplete, PageLifecycleController, PageSettingsController,
};
use crate::error::Result;
use crate::model::PageRecord;
use crate::store::{SiteStore, StoreError};

/// Longest site name shown in full before the page name field
const SITE_LABEL_MAX: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTab {
    PageSettings,
    SiteSettings,
    Delete,
}

impl SettingsTab {
    pub const ALL: &'static [SettingsTab] = &[
        SettingsTab::PageSettings,
        SettingsTab::SiteSettings,
        SettingsTab::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsTab::PageSettings => "Page Settings",
            SettingsTab::SiteSettings => "Site Settings",
            SettingsTab::Delete => "Delete",
        }
    }
}

/// Publishes a whole site to a content-addressed network
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Returns the content identifier of the published site
    async fn deploy(&self, site_name: &str) -> std::result::Result<String, StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployState {
    pub in_flight: bool,
    pub last_cid: Option<String>,
    pub error: Option<String>,
}

pub struct SettingsPanel {
    site_name: String,
    tab: SettingsTab,
    settings: PageSettingsController,
    lifecycle: PageLifecycleController,
    deployer: Option<Arc<dyn Deployer>>,
    deploy: DeployState,
    show_raw_record: bool,
    delete_requested: bool,
    on_complete: OnComplete,
}

impl SettingsPanel {
    pub fn new(
        record: PageRecord,
        store: Arc<dyn SiteStore>,
        navigator: Arc<dyn Navigator>,
        on_complete: OnComplete,
    ) -> Self {
        let lifecycle = PageLifecycleController::new(
            &record,
            store.clone(),
            navigator.clone(),
            on_complete.clone(),
        );
        Self {
            site_name: record.site_name.clone(),
            tab: SettingsTab::PageSettings,
            settings: PageSettingsController::new(record, store, navigator),
            lifecycle,
            deployer: None,
            deploy: DeployState::default(),
            show_raw_record: false,
            delete_requested: false,
            on_complete,
        }
    }

    pub fn with_deployer(mut self, deployer: Arc<dyn Deployer>) -> Self {
        self.deployer = Some(deployer);
        self
    }

    pub fn settings(&self) -> &PageSettingsController {
        &self.settings
    }

    pub fn lifecycle(&self) -> &PageLifecycleController {
        &self.lifecycle
    }

    pub fn tab(&self) -> SettingsTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: SettingsTab) {
        if tab != SettingsTab::Delete {
            self.delete_requested = false;
        }
        self.tab = tab;
    }

    /// Close button / backdrop click
    pub fn close(&self) {
        (self.on_complete)();
    }

    /// Prefix shown before the page name input, e.g. `shop/`
    pub fn site_label(&self) -> String {
        format!("{}/", trim_if_longer_than(&self.site_name, SITE_LABEL_MAX))
    }

    pub fn site_notice(&self) -> String {
        format!("Site settings affect all pages under {}", self.site_name)
    }

    // ── Dev tools ───────────────────────────────────────────────────────────

    pub fn toggle_raw_record(&mut self) -> bool {
        self.show_raw_record = !self.show_raw_record;
        self.show_raw_record
    }

    /// Pretty-printed record while the raw view is open
    pub async fn raw_record(&self) -> Result<Option<String>> {
        if !self.show_raw_record {
            return Ok(None);
        }
        Ok(Some(self.settings.record().await.to_pretty_json()?))
    }

    // ── Delete ──────────────────────────────────────────────────────────────

    /// Show the confirmation step on the Delete tab
    pub fn request_delete(&mut self) {
        self.tab = SettingsTab::Delete;
        self.delete_requested = true;
    }

    pub fn cancel_delete(&mut self) {
        self.delete_requested = false;
    }

    /// Question and warning for the confirmation step, naming the page as it
    /// is currently stored
    pub async fn delete_prompt(&self) -> (String, &'static str) {
        let page_name = self.settings.record().await.page_name;
        PageLifecycleController::confirmation_prompt(&page_name)
    }

    pub fn is_delete_requested(&self) -> bool {
        self.delete_requested
    }

    /// Run the delete once the user confirmed. Without a pending request nothing happens.
    pub async fn confirm_delete(&mut self) -> DeleteOutcome {
        if !self.delete_requested {
            return DeleteOutcome::Ignored;
        }
        let outcome = self.lifecycle.delete_page().await;
        if outcome == DeleteOutcome::Deleted {
            self.delete_requested = false;
        }
        outcome
    }

    // ── Site settings ───────────────────────────────────────────────────────

    pub fn deploy_state(&self) -> &DeployState {
        &self.deploy
    }

    pub async fn deploy_site(&mut self) -> Option<String> {
        let Some(deployer) = self.deployer.clone() else {
            self.deploy.error = Some("Deployment is not available".to_string());
            return None;
        };
        if self.deploy.in_flight {
            return None;
        }

        self.deploy.in_flight = true;
        tracing::info!("Deploying site {}", self.site_name);
        let result = deployer.deploy(&self.site_name).await;
        self.deploy.in_flight = false;

        match result {
            Ok(cid) => {
                self.deploy.error = None;
                self.deploy.last_cid = Some(cid.clone());
                Some(cid)
            }
            Err(e) => {
                tracing::warn!("Deploy of site {} failed: {}", self.site_name, e);
                self.deploy.error = Some(e.to_string());
                None
            }
        }
    }
}

fn trim_if_longer_than(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count > max {
        let tail: String = text.chars().skip(count - max).collect();
        format!("...{}", tail)
    } else {
        text.to_string()
    }
}
