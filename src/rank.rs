//! Triage ordering of fetched records.

use std::cmp::Ordering;

use crate::model::Record;

/// Status priority, then sub-species (case-insensitive), then numeric
/// product id.
pub fn compare(a: &Record, b: &Record) -> Ordering {
    a.status
        .priority()
        .cmp(&b.status.priority())
        .then_with(|| a.sub_species.to_uppercase().cmp(&b.sub_species.to_uppercase()))
        .then_with(|| a.product_number().cmp(&b.product_number()))
}

/// Stable in-place sort; full ties keep their input order.
pub fn rank(records: &mut [Record]) {
    records.sort_by(compare);
}

pub fn ranked(mut records: Vec<Record>) -> Vec<Record> {
    rank(&mut records);
    records
}
