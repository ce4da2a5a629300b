//! Selectable entity listing.

use std::collections::HashSet;

use crate::domain::CaseTable;

/// Distinct entity identifiers in the order they first appear in the table.
pub fn list_entities(table: &CaseTable) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .records
        .iter()
        .filter(|r| seen.insert(r.entity.as_str()))
        .map(|r| r.entity.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaseRecord, TableSchema};

    fn table(entities: &[&str]) -> CaseTable {
        CaseTable {
            source: None,
            schema: TableSchema::default(),
            records: entities
                .iter()
                .map(|e| CaseRecord {
                    entity: e.to_string(),
                    day: "2020-01-01".to_string(),
                    biweekly_cases: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn keeps_first_seen_order() {
        let t = table(&["Zambia", "Brazil", "Zambia", "Albania", "Brazil"]);
        assert_eq!(list_entities(&t), vec!["Zambia", "Brazil", "Albania"]);
    }

    #[test]
    fn empty_table_lists_nothing() {
        assert!(list_entities(&table(&[])).is_empty());
    }

    #[test]
    fn distinct_by_exact_text() {
        let t = table(&["france", "France"]);
        assert_eq!(list_entities(&t), vec!["france", "France"]);
    }
}
