use serde::Serialize;

use crate::dates::{normalize_for_wire, DateRange};
use crate::error::ValidationError;

/// Which operation kinds the query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFilter {
    Both,
    Line,
    CustomOrder,
}

impl KindFilter {
    pub fn from_toggles(line: bool, custom_order: bool) -> Result<Self, ValidationError> {
        match (line, custom_order) {
            (true, true) => Ok(KindFilter::Both),
            (true, false) => Ok(KindFilter::Line),
            (false, true) => Ok(KindFilter::CustomOrder),
            (false, false) => Err(ValidationError::NoOperationKind),
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            KindFilter::Both => "ambos",
            KindFilter::Line => "linha",
            KindFilter::CustomOrder => "sob_encomenda",
        }
    }
}

/// Raw form state, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    pub range: DateRange,
    pub sub_species: String,
    pub product_id: String,
    pub op_code: String,
    pub line: bool,
    pub custom_order: bool,
}

impl FilterForm {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            sub_species: String::new(),
            product_id: String::new(),
            op_code: String::new(),
            line: true,
            custom_order: true,
        }
    }

    /// Validate and build the query. Range first, then kinds.
    pub fn build(&self) -> Result<Query, ValidationError> {
        if self.range.is_inverted() {
            return Err(ValidationError::InvertedRange);
        }
        let kind = KindFilter::from_toggles(self.line, self.custom_order)?;
        Ok(Query {
            start: normalize_for_wire(&self.range.start),
            end: normalize_for_wire(&self.range.end),
            sub_species: self.sub_species.clone(),
            product_id: self.product_id.clone(),
            op_code: self.op_code.clone(),
            kind,
        })
    }
}

/// Validated query, dates already in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub start: String,
    pub end: String,
    pub sub_species: String,
    pub product_id: String,
    pub op_code: String,
    pub kind: KindFilter,
}

impl Query {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("data_inicio", self.start.clone()),
            ("data_fim", self.end.clone()),
            ("subespecie", self.sub_species.clone()),
            ("id_produto", self.product_id.clone()),
            ("cod_op", self.op_code.clone()),
            ("tipo_op", self.kind.as_param().to_string()),
        ]
    }
}
