use std::collections::HashMap;

use crate::error::{MigrateError, Result};
use crate::record::TemplateRecord;

const SYMBOL_SUFFIX: &str = "Template";

/// Exported constant name for a template id: `train_ticket` -> `trainTicketTemplate`.
pub fn symbol_name(id: &str) -> String {
    let joined: String = id.split('_').map(capitalize).collect::<String>() + SYMBOL_SUFFIX;
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => joined,
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Symbol for each record, in record order. Fails before anything is written
/// if two records share an id or two ids collapse to the same symbol.
pub fn assign_symbols(records: &[TemplateRecord]) -> Result<Vec<String>> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut symbols = Vec::with_capacity(records.len());
    for record in records {
        let symbol = symbol_name(&record.id);
        if let Some(&first) = owners.get(&symbol) {
            if first == record.id {
                return Err(MigrateError::DuplicateId(record.id.clone()));
            }
            return Err(MigrateError::NameCollision {
                name: symbol,
                first: first.to_string(),
                second: record.id.clone(),
            });
        }
        owners.insert(symbol.clone(), &record.id);
        symbols.push(symbol);
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> TemplateRecord {
        TemplateRecord {
            id: id.to_string(),
            category: "c".into(),
            name: "n".into(),
            body: "{}".into(),
            line: 1,
        }
    }

    #[test]
    fn derives_camel_case_symbols() {
        assert_eq!(symbol_name("train_ticket"), "trainTicketTemplate");
        assert_eq!(symbol_name("hospital_registration"), "hospitalRegistrationTemplate");
        assert_eq!(symbol_name("receipt"), "receiptTemplate");
        assert_eq!(symbol_name("watch_qq"), "watchQqTemplate");
        assert_eq!(symbol_name("Menu"), "menuTemplate");
    }

    #[test]
    fn empty_segments_vanish() {
        assert_eq!(symbol_name("a__b"), "aBTemplate");
        assert_eq!(symbol_name(""), "template");
    }

    #[test]
    fn collisions_fail_loudly() {
        let err = assign_symbols(&[record("check_in"), record("checkIn")]).unwrap_err();
        match err {
            MigrateError::NameCollision { name, first, second } => {
                assert_eq!(name, "checkInTemplate");
                assert_eq!(first, "check_in");
                assert_eq!(second, "checkIn");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_ids_fail() {
        let err = assign_symbols(&[record("memo"), record("memo")]).unwrap_err();
        assert!(matches!(err, MigrateError::DuplicateId(id) if id == "memo"));
    }

    #[test]
    fn symbols_follow_record_order() {
        let symbols = assign_symbols(&[record("menu"), record("call_log")]).unwrap();
        assert_eq!(symbols, vec!["menuTemplate", "callLogTemplate"]);
    }
}
