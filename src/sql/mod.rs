//! SQL DDL to schema conversion.

mod clause;
mod column;
mod foreign_key;
mod parser;
mod patterns;
mod types;

pub use clause::{balanced_group, split_clause_spans, split_clauses};
pub use column::parse_column;
pub use foreign_key::{FkDeclaration, FkSource, resolve as resolve_foreign_keys};
pub use parser::{SqlParseError, SqlParser, parse_sql};
pub use patterns::Patterns;
