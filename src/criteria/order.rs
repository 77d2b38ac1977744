use serde_json::Value;

use super::error::CriteriaError;
use super::types::{is_valid_identifier, OrderSpec, SortDirection};

pub struct CriteriaOrder;

impl CriteriaOrder {
    /// Accepts `"updated_at desc"`, `["updated_at desc", "name asc"]`, or
    /// `{ "updated_at": "desc", "name": "asc" }`. Directions are validated
    /// strictly; anything but asc/desc is an error.
    pub fn validate_and_parse(order: &Value) -> Result<Vec<OrderSpec>, CriteriaError> {
        match order {
            Value::Null => Ok(vec![]),
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                let mut out = Vec::new();
                for v in arr {
                    match v {
                        Value::String(s) => out.extend(Self::parse_order_string(s)?),
                        other => {
                            return Err(CriteriaError::InvalidCriteria(format!(
                                "order entries must be strings, got: {}",
                                other
                            )))
                        }
                    }
                }
                Ok(out)
            }
            Value::Object(obj) => {
                // { "updated_at": "desc" }
                let mut out = Vec::new();
                for (field, dir) in obj {
                    let dir = dir.as_str().ok_or_else(|| {
                        CriteriaError::InvalidDirection(dir.to_string())
                    })?;
                    out.push(OrderSpec::new(field.clone(), SortDirection::parse(dir)?));
                }
                Ok(out)
            }
            _ => Err(CriteriaError::InvalidCriteria(
                "order must be a string, array, or object".to_string(),
            )),
        }
    }

    fn parse_order_string(s: &str) -> Result<Vec<OrderSpec>, CriteriaError> {
        // split on commas, then each token into field and direction
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            if let Some(field) = it.next() {
                let direction = match it.next() {
                    Some(dir) => SortDirection::parse(dir)?,
                    None => SortDirection::Asc,
                };
                out.push(OrderSpec::new(field, direction));
            }
        }
        Ok(out)
    }

    pub fn generate(specs: &[OrderSpec]) -> Result<String, CriteriaError> {
        if specs.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(specs.len());
        for spec in specs {
            if !is_valid_identifier(&spec.field) {
                return Err(CriteriaError::InvalidField(spec.field.clone()));
            }
            parts.push(format!("\"{}\" {}", spec.field, spec.direction.to_sql()));
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_form() {
        let specs = CriteriaOrder::validate_and_parse(&json!("updated_at desc, name")).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0], OrderSpec::new("updated_at", SortDirection::Desc));
        assert_eq!(specs[1], OrderSpec::new("name", SortDirection::Asc));
    }

    #[test]
    fn parses_object_form() {
        let specs = CriteriaOrder::validate_and_parse(&json!({ "created_at": "desc" })).unwrap();
        assert_eq!(specs, vec![OrderSpec::new("created_at", SortDirection::Desc)]);
    }

    #[test]
    fn rejects_invalid_direction() {
        let err = CriteriaOrder::validate_and_parse(&json!({ "name": "upward" })).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidDirection(_)));
    }

    #[test]
    fn generates_order_by_clause() {
        let specs = vec![
            OrderSpec::new("updated_at", SortDirection::Desc),
            OrderSpec::new("id", SortDirection::Asc),
        ];
        let sql = CriteriaOrder::generate(&specs).unwrap();
        assert_eq!(sql, "ORDER BY \"updated_at\" DESC, \"id\" ASC");
    }

    #[test]
    fn empty_specs_generate_nothing() {
        assert_eq!(CriteriaOrder::generate(&[]).unwrap(), "");
    }

    #[test]
    fn generate_rejects_bad_field() {
        let specs = vec![OrderSpec::new("no good", SortDirection::Asc)];
        assert!(CriteriaOrder::generate(&specs).is_err());
    }
}
