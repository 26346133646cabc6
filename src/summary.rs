use std::collections::HashMap;

use serde::Serialize;

use crate::model::Record;

pub const UNSPECIFIED_SPECIES: &str = "Não especificado";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub species: String,
    pub planned: f64,
    pub registered: f64,
}

impl SummaryRow {
    fn new(species: String) -> Self {
        Self { species, planned: 0.0, registered: 0.0 }
    }

    /// Registered over planned, percent, two decimals. 0 without a plan.
    pub fn completion_pct(&self) -> f64 {
        completion_pct(self.planned, self.registered)
    }
}

/// Per-species sums in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn from_records(records: &[Record]) -> Self {
        let mut rows: Vec<SummaryRow> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for rec in records {
            let species = if rec.species.is_empty() {
                UNSPECIFIED_SPECIES.to_string()
            } else {
                rec.species.clone()
            };
            let slot = *index.entry(species.clone()).or_insert_with(|| {
                rows.push(SummaryRow::new(species));
                rows.len() - 1
            });
            rows[slot].planned += rec.planned_qty;
            rows[slot].registered += rec.registered_qty;
        }
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Grand total across groups. Derived, never stored. Summed per group,
    /// so with fractional quantities it may differ from a per-record sum in
    /// the last bits.
    pub fn total(&self) -> SummaryRow {
        SummaryRow {
            species: "TOTAL".to_string(),
            planned: self.rows.iter().map(|r| r.planned).sum(),
            registered: self.rows.iter().map(|r| r.registered).sum(),
        }
    }
}

pub fn completion_pct(planned: f64, registered: f64) -> f64 {
    if planned == 0.0 {
        return 0.0;
    }
    (registered / planned * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(species: &str, planned: f64, registered: f64) -> Record {
        Record {
            species: species.into(),
            planned_qty: planned,
            registered_qty: registered,
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let s = Summary::from_records(&[
            rec("SUINO", 10.0, 4.0),
            rec("BOVINO", 5.0, 5.0),
            rec("SUINO", 2.5, 1.0),
            rec("", 1.0, 0.0),
        ]);
        let names: Vec<_> = s.rows.iter().map(|r| r.species.as_str()).collect();
        assert_eq!(names, ["SUINO", "BOVINO", UNSPECIFIED_SPECIES]);
        assert_eq!(s.rows[0].planned, 12.5);
        assert_eq!(s.rows[0].registered, 5.0);
    }

    #[test]
    fn test_total_matches_input_sums() {
        let records = vec![
            rec("A", 3.0, 1.0),
            rec("B", 7.0, 2.0),
            rec("A", 11.0, 13.0),
            rec("", 0.0, 4.0),
        ];
        let s = Summary::from_records(&records);
        let total = s.total();
        let planned: f64 = records.iter().map(|r| r.planned_qty).sum();
        let registered: f64 = records.iter().map(|r| r.registered_qty).sum();
        assert_eq!(total.planned, planned);
        assert_eq!(total.registered, registered);
        assert_eq!(s.rows.iter().map(|r| r.planned).sum::<f64>(), planned);
    }

    #[test]
    fn test_total_with_fractional_quantities() {
        let records = vec![
            rec("A", 0.1, 0.7),
            rec("B", 0.2, 0.1),
            rec("A", 0.3, 0.2),
            rec("C", 1.05, 0.35),
        ];
        let total = Summary::from_records(&records).total();
        let planned: f64 = records.iter().map(|r| r.planned_qty).sum();
        let registered: f64 = records.iter().map(|r| r.registered_qty).sum();
        assert!((total.planned - planned).abs() < 1e-9);
        assert!((total.registered - registered).abs() < 1e-9);
    }

    #[test]
    fn test_empty_records() {
        assert!(Summary::from_records(&[]).is_empty());
    }

    #[test]
    fn test_completion_pct() {
        assert_eq!(completion_pct(0.0, 5.0), 0.0);
        assert_eq!(completion_pct(3.0, 1.0), 33.33);
        assert_eq!(completion_pct(4.0, 5.0), 125.0);
    }
}
