use serde_json::Value;

use super::error::CriteriaError;
use super::types::{is_valid_identifier, CriteriaOp, Criterion};

/// Builds a parameterized WHERE clause from a flat criterion list.
/// All criteria are joined with AND; placeholders are numbered `$1..` from
/// `starting_param_index`.
pub struct CriteriaWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl CriteriaWhere {
    pub fn generate(
        criteria: &[Criterion],
        starting_param_index: usize,
    ) -> Result<(String, Vec<Value>), CriteriaError> {
        let mut builder = Self {
            param_values: vec![],
            param_index: starting_param_index,
        };

        let mut conditions = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            conditions.push(builder.build_condition(criterion)?);
        }

        Ok((conditions.join(" AND "), builder.param_values))
    }

    fn build_condition(&mut self, criterion: &Criterion) -> Result<String, CriteriaError> {
        if !is_valid_identifier(&criterion.field) {
            return Err(CriteriaError::InvalidField(criterion.field.clone()));
        }

        let quoted_column = format!("\"{}\"", criterion.field);
        match criterion.op {
            CriteriaOp::Eq => {
                if criterion.value.is_null() {
                    Ok(format!("{} IS NULL", quoted_column))
                } else {
                    let param = self.scalar_param(criterion, "eq")?;
                    Ok(format!("{} = {}", quoted_column, param))
                }
            }
            CriteriaOp::Neq => {
                if criterion.value.is_null() {
                    Ok(format!("{} IS NOT NULL", quoted_column))
                } else {
                    let param = self.scalar_param(criterion, "neq")?;
                    Ok(format!("{} <> {}", quoted_column, param))
                }
            }
            CriteriaOp::Gt => {
                let param = self.scalar_param(criterion, "gt")?;
                Ok(format!("{} > {}", quoted_column, param))
            }
            CriteriaOp::Gte => {
                let param = self.scalar_param(criterion, "gte")?;
                Ok(format!("{} >= {}", quoted_column, param))
            }
            CriteriaOp::Lt => {
                let param = self.scalar_param(criterion, "lt")?;
                Ok(format!("{} < {}", quoted_column, param))
            }
            CriteriaOp::Lte => {
                let param = self.scalar_param(criterion, "lte")?;
                Ok(format!("{} <= {}", quoted_column, param))
            }
            CriteriaOp::Like => {
                let param = self.scalar_param(criterion, "like")?;
                Ok(format!("{} LIKE {}", quoted_column, param))
            }
            CriteriaOp::ILike => {
                let param = self.scalar_param(criterion, "ilike")?;
                Ok(format!("{} ILIKE {}", quoted_column, param))
            }
            CriteriaOp::In => {
                let values = Self::require_array(criterion, "in")?;
                if values.is_empty() {
                    return Ok("1=0".to_string());
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
            }
            CriteriaOp::Nin => {
                let values = Self::require_array(criterion, "nin")?;
                if values.is_empty() {
                    return Ok("1=1".to_string());
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("{} NOT IN ({})", quoted_column, params.join(", ")))
            }
            CriteriaOp::Between => {
                let values = Self::require_array(criterion, "between")?;
                if values.len() != 2 {
                    return Err(CriteriaError::InvalidOperatorData(
                        "between requires exactly 2 values".to_string(),
                    ));
                }
                Ok(format!(
                    "{} BETWEEN {} AND {}",
                    quoted_column,
                    self.param(values[0].clone()),
                    self.param(values[1].clone())
                ))
            }
            CriteriaOp::Null => Ok(format!("{} IS NULL", quoted_column)),
            CriteriaOp::Nnull => Ok(format!("{} IS NOT NULL", quoted_column)),
        }
    }

    fn require_array<'a>(
        criterion: &'a Criterion,
        op_name: &str,
    ) -> Result<&'a Vec<Value>, CriteriaError> {
        let values = criterion.value.as_array().ok_or_else(|| {
            CriteriaError::InvalidOperatorData(format!("{} requires an array value", op_name))
        })?;
        // Nested arrays have no bind representation
        for value in values {
            if value.is_array() {
                return Err(CriteriaError::InvalidOperatorData(format!(
                    "{} values must be scalars",
                    op_name
                )));
            }
        }
        Ok(values)
    }

    /// Bind a single comparison value. Arrays are rejected here: they have
    /// no direct bind representation and only appear expanded through the
    /// list operators.
    fn scalar_param(
        &mut self,
        criterion: &Criterion,
        op_name: &str,
    ) -> Result<String, CriteriaError> {
        if criterion.value.is_array() {
            return Err(CriteriaError::InvalidOperatorData(format!(
                "{} requires a scalar value",
                op_name
            )));
        }
        Ok(self.param(criterion.value.clone()))
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_binds_a_parameter() {
        let criteria = vec![Criterion::eq("status", json!("open"))];
        let (sql, params) = CriteriaWhere::generate(&criteria, 0).unwrap();
        assert_eq!(sql, "\"status\" = $1");
        assert_eq!(params, vec![json!("open")]);
    }

    #[test]
    fn eq_null_becomes_is_null() {
        let criteria = vec![Criterion::eq("deleted_at", Value::Null)];
        let (sql, params) = CriteriaWhere::generate(&criteria, 0).unwrap();
        assert_eq!(sql, "\"deleted_at\" IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn neq_null_becomes_is_not_null() {
        let criteria = vec![Criterion::neq("owner_id", Value::Null)];
        let (sql, _) = CriteriaWhere::generate(&criteria, 0).unwrap();
        assert_eq!(sql, "\"owner_id\" IS NOT NULL");
    }

    #[test]
    fn multiple_criteria_join_with_and_and_number_params() {
        let criteria = vec![
            Criterion::eq("status", json!("open")),
            Criterion::new("age", CriteriaOp::Gte, json!(18)),
        ];
        let (sql, params) = CriteriaWhere::generate(&criteria, 0).unwrap();
        assert_eq!(sql, "\"status\" = $1 AND \"age\" >= $2");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn in_expands_values_and_empty_in_matches_nothing() {
        let criteria = vec![Criterion::new("id", CriteriaOp::In, json!([1, 2, 3]))];
        let (sql, params) = CriteriaWhere::generate(&criteria, 0).unwrap();
        assert_eq!(sql, "\"id\" IN ($1, $2, $3)");
        assert_eq!(params.len(), 3);

        let criteria = vec![Criterion::new("id", CriteriaOp::In, json!([]))];
        let (sql, params) = CriteriaWhere::generate(&criteria, 0).unwrap();
        assert_eq!(sql, "1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn between_requires_two_values() {
        let criteria = vec![Criterion::new("age", CriteriaOp::Between, json!([18]))];
        let err = CriteriaWhere::generate(&criteria, 0).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidOperatorData(_)));
    }

    #[test]
    fn scalar_operators_reject_array_values() {
        // An array under a scalar operator would otherwise emit a
        // placeholder whose parameter nothing can bind
        let criteria = vec![Criterion::eq("tags", json!([1, 2]))];
        let err = CriteriaWhere::generate(&criteria, 0).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidOperatorData(_)));

        for op in [
            CriteriaOp::Neq,
            CriteriaOp::Gt,
            CriteriaOp::Gte,
            CriteriaOp::Lt,
            CriteriaOp::Lte,
            CriteriaOp::Like,
            CriteriaOp::ILike,
        ] {
            let criteria = vec![Criterion::new("tags", op, json!([1, 2]))];
            assert!(
                CriteriaWhere::generate(&criteria, 0).is_err(),
                "{:?} accepted an array value",
                op
            );
        }
    }

    #[test]
    fn list_operators_reject_nested_arrays() {
        let criteria = vec![Criterion::new("id", CriteriaOp::In, json!([[1], 2]))];
        assert!(CriteriaWhere::generate(&criteria, 0).is_err());

        let criteria = vec![Criterion::new("age", CriteriaOp::Between, json!([[1], 2]))];
        assert!(CriteriaWhere::generate(&criteria, 0).is_err());
    }

    #[test]
    fn object_values_still_bind_as_json() {
        // Objects stay valid: the bind layer sends them as JSONB
        let criteria = vec![Criterion::eq("meta", json!({ "a": 1 }))];
        let (sql, params) = CriteriaWhere::generate(&criteria, 0).unwrap();
        assert_eq!(sql, "\"meta\" = $1");
        assert!(params[0].is_object());
    }

    #[test]
    fn starting_index_offsets_placeholders() {
        let criteria = vec![Criterion::eq("status", json!("open"))];
        let (sql, _) = CriteriaWhere::generate(&criteria, 3).unwrap();
        assert_eq!(sql, "\"status\" = $4");
    }

    #[test]
    fn bad_field_name_is_rejected() {
        let criteria = vec![Criterion::eq("id; DROP TABLE users", json!(1))];
        let err = CriteriaWhere::generate(&criteria, 0).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidField(_)));
    }
}
