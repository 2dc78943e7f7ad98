use std::fmt;

use crate::scan::{line_col, scan_objects, ObjectLiteral, PropertyValue};

/// One template entry recovered from the source. `body` is the verbatim
/// object literal, braces included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    pub id: String,
    pub category: String,
    pub name: String,
    pub body: String,
    pub line: usize,
}

/// Non-fatal problems found while extracting records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An `id`-led object that lacks a required field.
    Malformed {
        id: String,
        line: usize,
        column: usize,
        problems: Vec<String>,
    },
    /// Scanning stopped at an unclosed lexeme or object.
    Unterminated {
        what: &'static str,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Malformed {
                id,
                line,
                column,
                problems,
            } => write!(
                f,
                "{line}:{column}: skipped record '{id}': {}",
                problems.join(", ")
            ),
            Diagnostic::Unterminated { what, line, column } => {
                write!(f, "{line}:{column}: unterminated {what}, scan stopped here")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<TemplateRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

const STRING_FIELDS: &[&str] = &["id", "category", "name"];
const PRESENT_FIELDS: &[&str] = &["keywords", "fields"];
const TEMPLATE_FIELD: &str = "htmlTemplate";

/// Pull every well-formed template record out of `text`, in source order.
pub fn extract_records(text: &str) -> Extraction {
    let scan = scan_objects(text);
    let mut out = Extraction::default();

    for obj in &scan.objects {
        let (line, column) = line_col(text, obj.span.start);
        let problems = check_shape(obj);
        let id = match obj.get("id") {
            Some(PropertyValue::BadEscape(raw)) => raw.clone(),
            _ => obj.str_value("id").unwrap_or_default().to_string(),
        };
        if !problems.is_empty() {
            out.diagnostics.push(Diagnostic::Malformed {
                id,
                line,
                column,
                problems,
            });
            continue;
        }
        out.records.push(TemplateRecord {
            id,
            category: obj.str_value("category").unwrap_or_default().to_string(),
            name: obj.str_value("name").unwrap_or_default().to_string(),
            body: text[obj.span.clone()].to_string(),
            line,
        });
    }

    if let Some(err) = scan.error {
        let (line, column) = line_col(text, err.offset);
        out.diagnostics.push(Diagnostic::Unterminated {
            what: err.unterminated,
            line,
            column,
        });
    }
    out
}

fn check_shape(obj: &ObjectLiteral) -> Vec<String> {
    let mut problems = Vec::new();
    for key in STRING_FIELDS {
        match obj.get(key) {
            None => problems.push(format!("missing {key}")),
            Some(PropertyValue::Str(_)) => {}
            Some(PropertyValue::BadEscape(_)) => {
                problems.push(format!("{key} has an invalid escape"))
            }
            Some(_) => problems.push(format!("{key} is not a string literal")),
        }
    }
    for key in PRESENT_FIELDS {
        if obj.get(key).is_none() {
            problems.push(format!("missing {key}"));
        }
    }
    match obj.get(TEMPLATE_FIELD) {
        None => problems.push(format!("missing {TEMPLATE_FIELD}")),
        Some(PropertyValue::Template) => {}
        Some(_) => problems.push(format!("{TEMPLATE_FIELD} is not a template string")),
    }
    problems
}
