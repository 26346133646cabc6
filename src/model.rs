use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status label as sent by the backend. The four known labels form a
/// closed set; anything else is kept verbatim and sorts last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    RegisteredOver,
    RegisteredOk,
    Registering,
    Pending,
    #[default]
    Missing,
    Unknown(String),
}

impl Status {
    pub const OVER_LABEL: &'static str = "⚠️ Registro a maior";
    pub const OK_LABEL: &'static str = "✅ Registro OK";
    pub const REGISTERING_LABEL: &'static str = "✅ Registrando";
    pub const PENDING_LABEL: &'static str = "🔴 Pendente";

    pub fn parse(label: &str) -> Self {
        match label {
            Self::OVER_LABEL => Status::RegisteredOver,
            Self::OK_LABEL => Status::RegisteredOk,
            Self::REGISTERING_LABEL => Status::Registering,
            Self::PENDING_LABEL => Status::Pending,
            "" => Status::Missing,
            other => Status::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Status::RegisteredOver => Self::OVER_LABEL,
            Status::RegisteredOk => Self::OK_LABEL,
            Status::Registering => Self::REGISTERING_LABEL,
            Status::Pending => Self::PENDING_LABEL,
            Status::Missing => "",
            Status::Unknown(text) => text,
        }
    }

    /// Triage priority: problems, then OK, then in progress, then pending.
    pub fn priority(&self) -> u8 {
        match self {
            Status::RegisteredOver => 1,
            Status::RegisteredOk => 2,
            Status::Registering => 3,
            Status::Pending => 4,
            Status::Missing | Status::Unknown(_) => 9,
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        de_text(deserializer).map(|t| Status::parse(&t))
    }
}

impl Serialize for Status {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// `LIN_PROD`: regular production-line run.
    Line,
    /// `SOB_ENC`: made-to-order run.
    CustomOrder,
    #[default]
    Other,
}

impl OpKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "LIN_PROD" => OpKind::Line,
            "SOB_ENC" => OpKind::CustomOrder,
            _ => OpKind::Other,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            OpKind::Line => "🏭",
            OpKind::CustomOrder => "🪡",
            OpKind::Other => "",
        }
    }
}

impl<'de> Deserialize<'de> for OpKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        de_text(deserializer).map(|t| OpKind::parse(&t))
    }
}

/// One production order ("OP") as returned by `/api/ops`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "STATUS", default)]
    pub status: Status,
    #[serde(rename = "CODIGO_OP", default, deserialize_with = "de_text")]
    pub op_code: String,
    #[serde(rename = "ID_PRODUTO", default, deserialize_with = "de_text")]
    pub product_id: String,
    #[serde(rename = "NOME_PRODUTO", default, deserialize_with = "de_text")]
    pub product_name: String,
    #[serde(rename = "ESPECIE", default, deserialize_with = "de_text")]
    pub species: String,
    #[serde(rename = "SUB_ESPECIE", default, deserialize_with = "de_text")]
    pub sub_species: String,
    #[serde(rename = "QTD_PREVISTA", default, deserialize_with = "de_qty")]
    pub planned_qty: f64,
    #[serde(rename = "QTD_REGISTRADA", default, deserialize_with = "de_qty")]
    pub registered_qty: f64,
    #[serde(rename = "TIPO_OP", default)]
    pub kind: OpKind,
}

impl Record {
    /// Leading integer of the product id, 0 when there is none.
    pub fn product_number(&self) -> i64 {
        leading_int(&self.product_id).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpsResponse {
    pub ops: Vec<Record>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltersResponse {
    #[serde(default, deserialize_with = "de_text_list")]
    pub subespecies: Vec<String>,
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(value_text)
}

/// A list of labels; `null` or a non-list is empty, elements go through
/// the same text coercion as single fields.
fn de_text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(value_text).collect(),
        _ => Vec::new(),
    })
}

fn de_qty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_qty(&s),
        _ => 0.0,
    })
}

/// Whole-string numeric parse; blanks and junk count as 0.
pub fn parse_qty(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Digit runs past the i64 range saturate instead of counting as 0.
    Some(match digits[..end].parse::<i64>() {
        Ok(n) => sign * n,
        Err(_) if sign < 0 => i64::MIN,
        Err(_) => i64::MAX,
    })
}
