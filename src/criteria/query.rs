use super::error::CriteriaError;
use super::order::CriteriaOrder;
use super::types::{is_valid_identifier, Criterion, OrderSpec, SqlResult};
use super::where_clause::CriteriaWhere;

/// Assembles a criterion list, order, and paging window into parameterized SQL.
pub struct Criteria {
    table_name: String,
    criteria: Vec<Criterion>,
    order: Vec<OrderSpec>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Criteria {
    pub fn new(table_name: impl Into<String>) -> Result<Self, CriteriaError> {
        let table_name = table_name.into();
        if !is_valid_identifier(&table_name) {
            return Err(CriteriaError::InvalidTableName(table_name));
        }
        Ok(Self {
            table_name,
            criteria: vec![],
            order: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn criteria(&mut self, criteria: &[Criterion]) -> Result<&mut Self, CriteriaError> {
        for criterion in criteria {
            if !is_valid_identifier(&criterion.field) {
                return Err(CriteriaError::InvalidField(criterion.field.clone()));
            }
        }
        self.criteria = criteria.to_vec();
        Ok(self)
    }

    pub fn order(&mut self, order: &[OrderSpec]) -> Result<&mut Self, CriteriaError> {
        for spec in order {
            if !is_valid_identifier(&spec.field) {
                return Err(CriteriaError::InvalidField(spec.field.clone()));
            }
        }
        self.order = order.to_vec();
        Ok(self)
    }

    /// Order from wire-format JSON (string, array, or object forms)
    pub fn order_json(&mut self, order: &serde_json::Value) -> Result<&mut Self, CriteriaError> {
        let specs = CriteriaOrder::validate_and_parse(order)?;
        self.order(&specs)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, CriteriaError> {
        if limit < 0 {
            return Err(CriteriaError::InvalidLimit(
                "Limit must be non-negative".to_string(),
            ));
        }
        if let Some(off) = offset {
            if off < 0 {
                return Err(CriteriaError::InvalidOffset(
                    "Offset must be non-negative".to_string(),
                ));
            }
        }

        // Apply max limit from config
        let max_limit = crate::config::CONFIG.paging.max_limit.unwrap_or(i64::MAX);
        let applied_limit = if limit > max_limit {
            if crate::config::CONFIG.paging.debug_logging {
                tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max_limit);
            }
            max_limit
        } else {
            limit
        };

        self.limit = Some(applied_limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, CriteriaError> {
        let (where_clause, params) = CriteriaWhere::generate(&self.criteria, 0)?;
        let order_clause = CriteriaOrder::generate(&self.order)?;
        let limit_clause = self.build_limit_clause();

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", self.table_name),
            if where_clause.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", where_clause)
            },
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, CriteriaError> {
        let (where_clause, params) = CriteriaWhere::generate(&self.criteria, 0)?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) as count FROM \"{}\"", self.table_name)
        } else {
            format!(
                "SELECT COUNT(*) as count FROM \"{}\" WHERE {}",
                self.table_name, where_clause
            )
        };
        Ok(SqlResult { query, params })
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            _ => String::new(),
        }
    }
}
