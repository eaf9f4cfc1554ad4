pub mod error;
pub mod filter;
pub mod pagination;
pub mod reshape;
pub mod schema;

pub use error::QueryError;
pub use filter::{compile, Direction, FilterParams, Predicate, QueryPlan, Scalar, Sort};
pub use pagination::{ContentRange, Range};
pub use reshape::{series_table, summary_table, Channel, IntegralResult, SeriesKind, Table};
pub use schema::{EntitySchema, Field, FieldKind, Relation, SearchJoin};

pub static CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
