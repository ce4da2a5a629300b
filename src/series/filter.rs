//! Projection of the table onto one entity.

use crate::domain::{CaseRecord, CaseTable};

/// Copies of the rows whose entity equals `entity` exactly, in table order.
///
/// An unknown entity yields an empty vector; that is a valid selection.
pub fn filter_entity(table: &CaseTable, entity: &str) -> Vec<CaseRecord> {
    table
        .records
        .iter()
        .filter(|r| r.entity == entity)
        .cloned()
        .collect()
}
