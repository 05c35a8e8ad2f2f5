//! Page records as the persistence API stores them
//!
//! Records are replaced whole on update, so every field we do not model
//! explicitly is carried through `extra` untouched.

mod head;

pub use head::{Head, DEFAULT_TITLE, DISCRIMINATOR_KEY, DISCRIMINATOR_VALUE};

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SettingsError};

/// One page of a site, in the shape the persistence API returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// Back-reference to the owning site, by name
    pub site_name: String,
    pub page_name: String,
    #[serde(default)]
    pub page: PageBody,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page content; only the head is interpreted here
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Head>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageRecord {
    pub fn new(
        id: impl Into<String>,
        site_name: impl Into<String>,
        page_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            site_name: site_name.into(),
            page_name: page_name.into(),
            page: PageBody::default(),
            extra: Map::new(),
        }
    }

    pub fn with_head(mut self, head: Head) -> Self {
        self.page.head = Some(head);
        self
    }

    /// Stored head, or the starter head for pages that never had one
    pub fn head_or_default(&self) -> Head {
        self.page.head.clone().unwrap_or_else(Head::default_for_page)
    }

    /// Full record with only the page name replaced
    pub fn renamed(&self, page_name: &str) -> Self {
        Self {
            page_name: page_name.to_string(),
            ..self.clone()
        }
    }

    /// Full record with only `page.head` replaced
    pub fn with_replaced_head(&self, head: Head) -> Self {
        let mut record = self.clone();
        record.page.head = Some(head);
        record
    }

    /// Navigation target for this page, `{siteName}/{pageName}`
    pub fn page_path(&self) -> String {
        page_path(&self.site_name, &self.page_name)
    }

    /// Navigation target for the owning site's root
    pub fn site_root_path(&self) -> String {
        site_root_path(&self.site_name)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

pub fn page_path(site_name: &str, page_name: &str) -> String {
    format!(
        "{}/{}",
        urlencoding::encode(site_name),
        urlencoding::encode(page_name)
    )
}

pub fn site_root_path(site_name: &str) -> String {
    format!("/{}", urlencoding::encode(site_name))
}
