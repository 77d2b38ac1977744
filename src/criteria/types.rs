use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CriteriaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriteriaOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
    In,
    Nin,
    Between,
    Null,
    Nnull,
}

/// One row of a structured filter: `{ "field": "status", "op": "eq", "value": "open" }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub field: String,
    pub op: CriteriaOp,
    #[serde(default)]
    pub value: Value,
}

impl Criterion {
    pub fn new(field: impl Into<String>, op: CriteriaOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, CriteriaOp::Eq, value)
    }

    pub fn neq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, CriteriaOp::Neq, value)
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, CriteriaOp::Null, Value::Null)
    }

    /// Parse a JSON array of criterion objects, as received on the wire
    pub fn parse_list(value: &Value) -> Result<Vec<Criterion>, CriteriaError> {
        match value {
            Value::Null => Ok(vec![]),
            Value::Array(_) => Ok(serde_json::from_value(value.clone())?),
            _ => Err(CriteriaError::InvalidCriteria(
                "criteria must be an array of {field, op, value} objects".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Result<Self, CriteriaError> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(CriteriaError::InvalidDirection(other.to_string())),
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

// Identifiers are interpolated into SQL, so they stay strictly alphanumeric
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.chars().all(|c| c.is_alphanumeric() || c == '_')
}
