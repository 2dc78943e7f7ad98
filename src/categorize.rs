use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::category::CategoryMap;
use crate::render::quote;

/// `id: '<value>',` followed by whitespace only and then the `name:` key.
/// A record that already has a category between the two no longer matches.
static ID_THEN_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(id:\s*(?:'([^'\\\n]*)'|"([^"\\\n]*)"),)(\s+)(name\s*:)"#).unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizeReport {
    /// Number of entries in the category map.
    pub applied: usize,
    /// Category lines actually inserted.
    pub inserted: usize,
    /// Mapped ids that matched nothing, in map order.
    pub missing: Vec<String>,
    /// Mapped ids that matched more than once; every occurrence was updated.
    pub repeated: Vec<(String, usize)>,
}

#[derive(Debug, Clone)]
pub struct Categorized {
    pub text: String,
    pub report: CategorizeReport,
}

/// Insert `category: '<label>',` between the id and name of every record
/// whose id is in `categories`. Unmapped ids are left byte-for-byte intact.
pub fn categorize(text: &str, categories: &CategoryMap) -> Categorized {
    let mut hits: HashMap<String, usize> = HashMap::new();

    let out = ID_THEN_NAME_RE.replace_all(text, |caps: &Captures| {
        let id = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match categories.get(id) {
            Some(label) => {
                *hits.entry(id.to_string()).or_default() += 1;
                debug!(id, category = label, "inserting category");
                let gap = &caps[4];
                format!("{}{gap}category: {},{gap}{}", &caps[1], quote(label), &caps[5])
            }
            None => caps[0].to_string(),
        }
    });

    let mut report = CategorizeReport {
        applied: categories.len(),
        ..Default::default()
    };
    for (id, _) in categories.iter() {
        match hits.get(id).copied().unwrap_or(0) {
            0 => report.missing.push(id.to_string()),
            1 => report.inserted += 1,
            n => {
                report.inserted += n;
                report.repeated.push((id.to_string(), n));
            }
        }
    }

    Categorized {
        text: out.into_owned(),
        report,
    }
}
