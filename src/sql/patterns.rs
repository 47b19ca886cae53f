//! Compiled regular expressions for the accepted DDL surface.

use regex::Regex;

/// Optionally quoted identifier, captured without its quotes.
const IDENT: &str = r#"[\[`"]?(\w+)[\]`"]?"#;

/// Optionally quoted identifier, not captured (constraint names).
const NAME: &str = r#"[\[`"]?\w+[\]`"]?"#;

/// `FOREIGN KEY (col) REFERENCES [schema.]table (col)`.
/// Captures: column, target schema, target table, target column.
fn foreign_key_clause() -> String {
    format!(
        r"FOREIGN\s+KEY\s*\(\s*{IDENT}\s*\)\s*REFERENCES\s+(?:{IDENT}\.)?{IDENT}\s*\(\s*{IDENT}\s*\)"
    )
}

pub struct Patterns {
    /// Captures: schema, table, body.
    pub create_table: Regex,
    /// Captures: the parenthesized column list.
    pub table_primary_key: Regex,
    /// Table-level constraint clauses that never describe a column.
    pub constraint_clause: Regex,
    /// MySQL `KEY name (cols)` / `INDEX name (cols)`. Captures: the list.
    /// Also matches a column named `key` or `index` with a sized type, see
    /// [`Patterns::is_table_constraint`].
    pub index_clause: Regex,
    /// Captures: name, type, modifiers.
    pub column: Regex,
    pub not_null: Regex,
    pub primary_key: Regex,
    /// Captures: the default expression.
    pub default_value: Regex,
    /// Matches up to and including the opening parenthesis.
    pub check: Regex,
    pub foreign_key_literal: Regex,
    /// Captures: schema, table, column, target schema, target table, target column.
    pub fk_statement: Regex,
    /// Captures: column, target schema, target table, target column.
    pub fk_body: Regex,
    /// Captures: column, target schema, target table, target column.
    pub column_reference: Regex,
    /// Captures: schema, table, column, target schema, target table, target column.
    pub alter_table_fk: Regex,
}

impl Patterns {
    pub fn compile() -> Result<Self, regex::Error> {
        let fk = foreign_key_clause();
        let table_name = format!(r"(?:IF\s+NOT\s+EXISTS\s+)?(?:{IDENT}\.)?{IDENT}");

        Ok(Self {
            create_table: Regex::new(&format!(
                r"(?i)CREATE\s+TABLE\s+{table_name}\s*\(((?s:.)*?)\)(?:\s*;|\s*\z|[ \t]*\r?\n\s*\n)"
            ))?,
            table_primary_key: Regex::new(&format!(
                r"(?i)^\s*(?:CONSTRAINT\s+{NAME}\s+)?PRIMARY\s+KEY(?:\s+(?:CLUSTERED|NONCLUSTERED))?\s*\(([^)]*)\)"
            ))?,
            constraint_clause: Regex::new(
                r"(?i)^\s*(?:CONSTRAINT\b|FOREIGN\s+KEY\b|PRIMARY\s+KEY\b|UNIQUE\s*(?:KEY\b|INDEX\b|\()|CHECK\s*\()",
            )?,
            index_clause: Regex::new(&format!(
                r"(?i)^\s*(?:INDEX|KEY)\s+{NAME}\s*\(([^)]*)\)"
            ))?,
            column: Regex::new(&format!(
                r"(?is)^\s*{IDENT}\s+(\w+(?:\s*\(\s*\w+(?:\s*,\s*\w+)?\s*\))?)(.*)$"
            ))?,
            not_null: Regex::new(r"(?i)\bNOT\s+NULL\b")?,
            primary_key: Regex::new(r"(?i)\bPRIMARY\s+KEY\b")?,
            default_value: Regex::new(r"(?is)\bDEFAULT\s+(.+)")?,
            check: Regex::new(r"(?i)\bCHECK\s*\(")?,
            foreign_key_literal: Regex::new(r"(?i)FOREIGN\s+KEY\s*")?,
            fk_statement: Regex::new(&format!(
                r"(?i)CREATE\s+TABLE\s+{table_name}\s*\((?s:.)*?{fk}"
            ))?,
            fk_body: Regex::new(&format!("(?i){fk}"))?,
            column_reference: Regex::new(&format!(
                r"(?is)^\s*{IDENT}\s+\w+.*?\bREFERENCES\s+(?:{IDENT}\.)?{IDENT}\s*\(\s*{IDENT}\s*\)"
            ))?,
            alter_table_fk: Regex::new(&format!(
                r"(?i)ALTER\s+TABLE\s+(?:{IDENT}\.)?{IDENT}\s+(?:WITH\s+(?:NO)?CHECK\s+)?ADD\s+(?:CONSTRAINT\s+{NAME}\s+)?{fk}"
            ))?,
        })
    }
}

impl Patterns {
    /// Whether a body clause is a table-level constraint rather than a
    /// column definition.
    pub fn is_table_constraint(&self, clause: &str) -> bool {
        if self.constraint_clause.is_match(clause) {
            return true;
        }
        // `key VARCHAR(255)` has the same shape as `KEY idx (col)`; only a
        // list of column names makes it an index.
        self.index_clause
            .captures(clause)
            .and_then(|caps| caps.get(1))
            .is_some_and(|list| !list.as_str().split(',').any(is_type_size))
    }
}

fn is_type_size(arg: &str) -> bool {
    let arg = arg.trim();
    arg.is_empty() || arg.eq_ignore_ascii_case("max") || arg.bytes().all(|b| b.is_ascii_digit())
}
