//! Column definitions inside a CREATE TABLE body.

use super::clause::balanced_group;
use super::patterns::Patterns;
use super::types::clean_type;
use crate::schema::Column;

/// Parse one body clause into a column.
///
/// `table_pk` holds the columns of the table-level PRIMARY KEY. Returns
/// `None` for anything that is not `name type [modifiers]`.
pub fn parse_column(clause: &str, table_pk: &[String], patterns: &Patterns) -> Option<Column> {
    let caps = patterns.column.captures(clause)?;
    let name = caps.get(1)?.as_str();
    let typ = clean_type(caps.get(2)?.as_str(), patterns);
    let modifiers = caps.get(3).map_or("", |m| m.as_str()).trim();

    let mut column = Column::new(name, typ);
    column.is_primary_key =
        table_pk.iter().any(|pk| pk == name) || patterns.primary_key.is_match(modifiers);
    column.is_nullable = !patterns.not_null.is_match(modifiers);
    column.default_value = patterns
        .default_value
        .captures(modifiers)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty());

    // Only the first CHECK of a column is kept.
    if let Some(m) = patterns.check.find(modifiers) {
        if let Some(expr) = balanced_group(modifiers, m.end() - 1) {
            column.checks.push(expr.trim().to_string());
        }
    }

    Some(column)
}
