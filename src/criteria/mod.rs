pub mod error;
pub mod order;
pub mod query;
pub mod types;
pub mod where_clause;

pub use error::CriteriaError;
pub use query::Criteria;
pub use types::*;
