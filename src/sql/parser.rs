//! CREATE TABLE extraction and the `parse_sql` entry point.

use std::ops::Range;

use super::clause::split_clauses;
use super::column::parse_column;
use super::foreign_key;
use super::patterns::Patterns;
use super::types::{key_columns, unwrap_ident};
use crate::schema::{Schema, Table};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SqlParseError {
    #[error("Invalid DDL pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Parse a DDL script into a schema.
///
/// Malformed DDL never fails: unrecognized fragments are dropped. The
/// error only reports a pattern that failed to compile.
pub fn parse_sql(input: &str) -> Result<Schema, SqlParseError> {
    Ok(SqlParser::new()?.parse(input))
}

/// One `CREATE TABLE` statement located in the script.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CreateStatement<'a> {
    pub schema: Option<&'a str>,
    pub name: &'a str,
    /// Whole statement, `CREATE` through its terminator.
    pub span: Range<usize>,
    /// Text between the outer parentheses.
    pub body: Range<usize>,
}

pub struct SqlParser {
    patterns: Patterns,
}

impl SqlParser {
    pub fn new() -> Result<Self, SqlParseError> {
        Ok(Self {
            patterns: Patterns::compile()?,
        })
    }

    pub fn parse(&self, input: &str) -> Schema {
        let statements = self.create_statements(input);

        let mut schema = Schema {
            tables: statements
                .iter()
                .map(|stmt| self.extract_table(input, stmt))
                .collect(),
        };

        let declarations = foreign_key::collect_declarations(input, &statements, &self.patterns);
        let resolved = foreign_key::resolve(&mut schema, &declarations);

        info!(
            tables = schema.tables.len(),
            foreign_keys = resolved,
            declarations = declarations.len(),
            "parsed DDL script"
        );

        schema
    }

    pub(crate) fn create_statements<'a>(&self, input: &'a str) -> Vec<CreateStatement<'a>> {
        self.patterns
            .create_table
            .captures_iter(input)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(2)?;
                let body = caps.get(3)?;
                Some(CreateStatement {
                    schema: caps.get(1).map(|m| m.as_str()),
                    name: name.as_str(),
                    span: whole.range(),
                    body: body.range(),
                })
            })
            .collect()
    }

    fn extract_table(&self, input: &str, stmt: &CreateStatement<'_>) -> Table {
        let clauses = split_clauses(&input[stmt.body.clone()]);

        // First table-level PRIMARY KEY wins.
        let primary_key = clauses
            .iter()
            .find_map(|clause| self.patterns.table_primary_key.captures(clause))
            .and_then(|caps| caps.get(1))
            .map(|list| key_columns(list.as_str()))
            .unwrap_or_default();

        let mut columns = Vec::new();
        for clause in clauses {
            if self.patterns.is_table_constraint(clause) {
                continue;
            }
            match parse_column(clause, &primary_key, &self.patterns) {
                Some(column) => columns.push(column),
                None if !clause.trim().is_empty() => {
                    debug!(table = stmt.name, clause = clause.trim(), "skipped clause");
                }
                None => {}
            }
        }

        Table {
            name: unwrap_ident(stmt.name).to_string(),
            schema: stmt.schema.map(|s| unwrap_ident(s).to_string()),
            columns,
        }
    }
}
