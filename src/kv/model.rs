use std::collections::HashMap;

use crate::model::{Head, DISCRIMINATOR_KEY};

/// Synthetic identity of a row, independent of its key text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    key: String,
    value: String,
}

impl Row {
    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Rows with a blank key are staged only and never submitted
    pub fn is_staged(&self) -> bool {
        self.key.trim().is_empty()
    }
}

/// Ordered rows plus an id -> position index
#[derive(Debug, Clone, Default)]
pub struct KeyValueModel {
    rows: Vec<Row>,
    index: HashMap<RowId, usize>,
    next_id: u64,
}

impl KeyValueModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_head(head: &Head) -> Self {
        let mut model = Self::new();
        for (key, value) in head.iter() {
            model.push(key.to_string(), value.to_string());
        }
        model
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.index.get(&id).map(|&i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row currently holding `key`, if any. Blank keys never match.
    pub fn find(&self, key: &str) -> Option<RowId> {
        if key.trim().is_empty() {
            return None;
        }
        self.rows.iter().find(|r| r.key == key).map(|r| r.id)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).and_then(|id| self.row(id)).map(|r| r.value())
    }

    /// Insert or overwrite. A blank key performs no mutation.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        if key.trim().is_empty() {
            return false;
        }
        match self.find(key) {
            Some(id) => self.set_row_value(id, value),
            None => {
                self.push(key.to_string(), value.to_string());
                true
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        match self.find(key) {
            Some(id) => self.remove_row(id),
            None => false,
        }
    }

    /// Rename by key text.
    ///
    /// A blank `new_key` removes the entry. If `new_key` already belongs to a
    /// different row, that row is dropped and the renamed row keeps its place.
    pub fn rename(&mut self, old_key: &str, new_key: &str) -> bool {
        let Some(id) = self.find(old_key) else {
            return false;
        };
        if new_key.trim().is_empty() {
            return self.remove_row(id);
        }
        self.set_row_key(id, new_key)
    }

    /// Append an empty staging row and return its id
    pub fn add_row(&mut self) -> RowId {
        self.push(String::new(), String::new())
    }

    /// Retype a row's key in place.
    ///
    /// Unlike [`rename`](Self::rename) a blank key keeps the row around as
    /// staged input. A collision with another row drops the other row.
    pub fn set_row_key(&mut self, id: RowId, key: &str) -> bool {
        let Some(&pos) = self.index.get(&id) else {
            return false;
        };
        if self.rows[pos].key == key {
            return false;
        }
        if let Some(other) = self.find(key).filter(|&other| other != id) {
            self.remove_row(other);
        }
        // Position may have shifted after the removal above.
        let pos = self.index[&id];
        self.rows[pos].key = key.to_string();
        true
    }

    pub fn set_row_value(&mut self, id: RowId, value: &str) -> bool {
        let Some(&pos) = self.index.get(&id) else {
            return false;
        };
        if self.rows[pos].value == value {
            return false;
        }
        self.rows[pos].value = value.to_string();
        true
    }

    pub fn remove_row(&mut self, id: RowId) -> bool {
        let Some(pos) = self.index.remove(&id) else {
            return false;
        };
        self.rows.remove(pos);
        for (i, row) in self.rows.iter().enumerate().skip(pos) {
            self.index.insert(row.id, i);
        }
        true
    }

    /// Outgoing head: staged rows dropped, discriminator forced.
    pub fn to_submittable(&self) -> Head {
        let mut head = Head::new();
        for row in self.rows.iter().filter(|r| !r.is_staged()) {
            if row.key == DISCRIMINATOR_KEY {
                continue;
            }
            head.insert(row.key.clone(), row.value.clone());
        }
        head
    }

    fn push(&mut self, key: String, value: String) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.rows.len());
        self.rows.push(Row { id, key, value });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn keys(model: &KeyValueModel) -> Vec<&str> {
        model.rows().iter().map(|r| r.key()).collect()
    }

    #[test]
    fn test_set_appends_to_submittable() {
        let mut model =
            KeyValueModel::from_head(&Head::from_entries([("title", "Home"), ("description", "")]));
        assert!(model.set("keywords", "shop,sale"));

        let head = model.to_submittable();
        assert_eq!(
            serde_json::to_value(&head).unwrap(),
            json!({
                "type": "head",
                "title": "Home",
                "description": "",
                "keywords": "shop,sale",
            })
        );
        assert_eq!(head.keys().collect::<Vec<_>>(), vec!["title", "description", "keywords"]);
    }

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("\t\n", true)]
    #[case("og:title", false)]
    #[case(" padded ", false)]
    fn test_blank_keys_never_submitted(#[case] key: &str, #[case] omitted: bool) {
        let mut model = KeyValueModel::new();
        model.set(key, "value");
        let head = model.to_submittable();
        assert_eq!(head.get(key).is_none(), omitted);
    }

    #[test]
    fn test_discriminator_always_forced() {
        let mut model = KeyValueModel::new();
        model.set("type", "tampered");
        model.set("title", "x");
        let head = model.to_submittable();
        assert_eq!(head.get("type"), Some("head"));
        assert_eq!(serde_json::to_value(&head).unwrap()["type"], json!("head"));

        let empty = KeyValueModel::new().to_submittable();
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({ "type": "head" }));
    }

    #[test]
    fn test_rename_chain_leaves_single_entry() {
        let mut model = KeyValueModel::new();
        model.set("a", "1");
        model.set("z", "end");
        assert!(model.rename("a", "b"));
        model.set("b", "2");
        assert!(model.rename("b", "c"));

        assert_eq!(model.get("a"), None);
        assert_eq!(model.get("b"), None);
        assert_eq!(model.get("c"), Some("2"));
        assert_eq!(keys(&model), vec!["c", "z"]);
    }

    #[test]
    fn test_rename_to_blank_removes() {
        let mut model = KeyValueModel::new();
        model.set("title", "x");
        assert!(model.rename("title", ""));
        assert!(model.is_empty());
    }

    #[test]
    fn test_rename_collision_last_write_wins() {
        let mut model = KeyValueModel::new();
        model.set("title", "old");
        model.set("og:title", "new");
        model.set("image", "i.png");

        assert!(model.rename("og:title", "title"));
        assert_eq!(keys(&model), vec!["title", "image"]);
        assert_eq!(model.get("title"), Some("new"));
    }

    #[test]
    fn test_rename_missing_is_noop() {
        let mut model = KeyValueModel::new();
        assert!(!model.rename("nope", "x"));
        assert!(!model.remove("nope"));
    }

    #[test]
    fn test_row_identity_survives_retyping() {
        let mut model = KeyValueModel::new();
        model.set("title", "t");
        let id = model.add_row();
        model.set("image", "i");

        // Typing "author" one keystroke at a time
        for partial in ["a", "au", "aut", "auth", "autho", "author"] {
            model.set_row_key(id, partial);
        }
        model.set_row_value(id, "me");

        assert_eq!(keys(&model), vec!["title", "author", "image"]);
        assert_eq!(model.row(id).unwrap().value(), "me");
    }

    #[test]
    fn test_staged_row_visible_but_not_submitted() {
        let mut model = KeyValueModel::new();
        model.set("title", "t");
        let id = model.add_row();
        model.set_row_value(id, "orphan");

        assert_eq!(model.len(), 2);
        assert!(model.row(id).unwrap().is_staged());
        assert_eq!(model.to_submittable().len(), 1);

        // Clearing an existing key keeps the row staged
        let title = model.find("title").unwrap();
        model.set_row_key(title, "");
        assert_eq!(model.len(), 2);
        assert!(model.to_submittable().is_empty());
    }

    #[test]
    fn test_remove_row_reindexes() {
        let mut model = KeyValueModel::new();
        model.set("a", "1");
        model.set("b", "2");
        model.set("c", "3");
        let c = model.find("c").unwrap();

        assert!(model.remove("a"));
        assert_eq!(model.row(c).unwrap().value(), "3");
        assert!(model.set_row_value(c, "4"));
        assert_eq!(model.get("c"), Some("4"));
        assert!(model.remove_row(c));
        assert!(model.row(c).is_none());
        assert_eq!(keys(&model), vec!["b"]);
    }

    #[test]
    fn test_submitting_unchanged_draft_is_idempotent() {
        let model = KeyValueModel::from_head(&Head::default_for_page());
        assert_eq!(model.to_submittable(), model.to_submittable());
        assert_eq!(model.to_submittable(), Head::default_for_page());
    }
}
