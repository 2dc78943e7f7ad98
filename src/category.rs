//! Classification tables: which category each template id belongs to, and
//! which folder each category is written to.

use std::collections::HashSet;

use crate::error::{MigrateError, Result};

/// Ordered id -> category label table used by the categorize pass.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    entries: Vec<(String, String)>,
}

impl CategoryMap {
    pub fn new<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (id, label) in pairs {
            let id = id.into();
            let label = label.into();
            if id.trim().is_empty() || label.trim().is_empty() {
                return Err(MigrateError::InvalidTable(format!(
                    "empty id or category in assignment ('{id}' -> '{label}')"
                )));
            }
            if !seen.insert(id.clone()) {
                return Err(MigrateError::InvalidTable(format!(
                    "id '{id}' is assigned twice"
                )));
            }
            entries.push((id, label));
        }
        Ok(CategoryMap { entries })
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered category label -> folder token table. Iteration order drives the
/// grouping of the generated index.
#[derive(Debug, Clone)]
pub struct FolderMap {
    entries: Vec<(String, String)>,
    fallback: String,
}

impl FolderMap {
    pub fn new<I, K, V>(pairs: I, fallback: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fallback = fallback.into();
        if !is_folder_token(&fallback) {
            return Err(MigrateError::InvalidTable(format!(
                "fallback folder '{fallback}' is not a plain directory name"
            )));
        }
        let mut labels = HashSet::new();
        let mut entries = Vec::new();
        for (label, folder) in pairs {
            let label = label.into();
            let folder = folder.into();
            if label.trim().is_empty() {
                return Err(MigrateError::InvalidTable("empty category label".into()));
            }
            if !is_folder_token(&folder) {
                return Err(MigrateError::InvalidTable(format!(
                    "folder '{folder}' for category '{label}' is not a plain directory name"
                )));
            }
            if !labels.insert(label.clone()) {
                return Err(MigrateError::InvalidTable(format!(
                    "category '{label}' has more than one folder"
                )));
            }
            entries.push((label, folder));
        }
        Ok(FolderMap { entries, fallback })
    }

    /// Folder for `label`, or the fallback token when the label is unknown.
    pub fn folder_for(&self, label: &str) -> &str {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, f)| f.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Category labels assigned by `categories` that have no folder entry, in
/// first-use order.
pub fn unmapped_labels<'a>(categories: &'a CategoryMap, folders: &FolderMap) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    categories
        .iter()
        .map(|(_, label)| label)
        .filter(|label| !folders.contains(label))
        .filter(|label| seen.insert(*label))
        .collect()
}

fn is_folder_token(token: &str) -> bool {
    !token.is_empty()
        && token != "."
        && token != ".."
        && !token.contains(['/', '\\'])
        && !token.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folders() -> FolderMap {
        FolderMap::new([("社交通讯", "social"), ("生活消费", "life")], "other").unwrap()
    }

    #[test]
    fn folder_lookup_falls_back() {
        let f = folders();
        assert_eq!(f.folder_for("生活消费"), "life");
        assert_eq!(f.folder_for("未知"), "other");
        assert_eq!(f.labels().collect::<Vec<_>>(), vec!["社交通讯", "生活消费"]);
    }

    #[test]
    fn duplicate_id_rejected() {
        let err = CategoryMap::new([("receipt", "生活消费"), ("receipt", "工作学习")]).unwrap_err();
        assert!(matches!(err, MigrateError::InvalidTable(_)));
    }

    #[test]
    fn folder_tokens_must_be_plain_names() {
        assert!(FolderMap::new([("生活消费", "../life")], "other").is_err());
        assert!(FolderMap::new([("生活消费", "life")], "").is_err());
        assert!(FolderMap::new([("生活消费", "life"), ("生活消费", "life2")], "other").is_err());
    }

    #[test]
    fn reports_labels_without_folder() {
        let c = CategoryMap::new([
            ("receipt", "生活消费"),
            ("x", "神秘"),
            ("y", "神秘"),
        ])
        .unwrap();
        assert_eq!(unmapped_labels(&c, &folders()), vec!["神秘"]);
        assert_eq!(c.get("receipt"), Some("生活消费"));
        assert_eq!(c.get("nope"), None);
    }
}
