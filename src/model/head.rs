//! Head metadata block
//!
//! A head is an ordered string mapping attached to a page. On the wire it is a
//! JSON object that always carries `"type": "head"`; the discriminator is not
//! stored as an entry and is re-asserted on every serialization.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved key carrying the block's logical type
pub const DISCRIMINATOR_KEY: &str = "type";
/// Fixed value of the discriminator for head blocks
pub const DISCRIMINATOR_VALUE: &str = "head";

/// Title used when a page has no head block yet
pub const DEFAULT_TITLE: &str = "My Dragd Page";

/// Ordered key/value metadata for one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Head {
    entries: Vec<(String, String)>,
}

impl Head {
    pub fn new() -> Self {
        Self::default()
    }

    /// The head a page starts with before anyone edited it
    pub fn default_for_page() -> Self {
        Self::from_entries([
            ("title", DEFAULT_TITLE),
            ("description", ""),
            ("keywords", ""),
            ("image", ""),
        ])
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut head = Self::new();
        for (key, value) in entries {
            head.insert(key, value);
        }
        head
    }

    /// Insert or overwrite in place. The discriminator key is reserved and ignored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key == DISCRIMINATOR_KEY {
            return;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if key == DISCRIMINATOR_KEY {
            return Some(DISCRIMINATOR_VALUE);
        }
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn discriminator(&self) -> &'static str {
        DISCRIMINATOR_VALUE
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries, not counting the discriminator
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Head {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 1))?;
        map.serialize_entry(DISCRIMINATOR_KEY, DISCRIMINATOR_VALUE)?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct HeadVisitor;

impl<'de> Visitor<'de> for HeadVisitor {
    type Value = Head;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a head object mapping keys to strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Head, A::Error> {
        let mut head = Head::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            // Stored heads occasionally carry numbers or booleans; keep their text form.
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            head.insert(key, value);
        }
        Ok(head)
    }
}

impl<'de> Deserialize<'de> for Head {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HeadVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serialize_puts_discriminator_first() {
        let head = Head::from_entries([("title", "Home"), ("description", "")]);
        let text = serde_json::to_string(&head).unwrap();
        assert_eq!(text, r#"{"type":"head","title":"Home","description":""}"#);
    }

    #[test]
    fn test_deserialize_drops_tampered_discriminator() {
        let head: Head = serde_json::from_value(json!({
            "type": "not-a-head",
            "title": "Shop",
        }))
        .unwrap();
        assert_eq!(head.len(), 1);
        assert_eq!(head.get("type"), Some("head"));
        assert_eq!(head.get("title"), Some("Shop"));
    }

    #[test]
    fn test_deserialize_stringifies_scalars() {
        let head: Head = serde_json::from_value(json!({
            "robots": null,
            "priority": 3,
            "indexed": true,
        }))
        .unwrap();
        assert_eq!(head.get("robots"), Some(""));
        assert_eq!(head.get("priority"), Some("3"));
        assert_eq!(head.get("indexed"), Some("true"));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut head = Head::from_entries([("a", "1"), ("b", "2")]);
        head.insert("a", "3");
        head.insert(DISCRIMINATOR_KEY, "page");
        let keys: Vec<_> = head.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(head.get("a"), Some("3"));
    }

    #[test]
    fn test_default_for_page() {
        let head = Head::default_for_page();
        let keys: Vec<_> = head.keys().collect();
        assert_eq!(keys, vec!["title", "description", "keywords", "image"]);
        assert_eq!(head.get("title"), Some(DEFAULT_TITLE));
    }
}
