//! Identifier and type-string cleanup.

use super::patterns::Patterns;

/// Strip surrounding whitespace and `[]`, backtick or double-quote wrapping.
pub fn unwrap_ident(raw: &str) -> &str {
    let s = raw.trim();
    let s = s.strip_prefix(['[', '`', '"']).unwrap_or(s);
    s.strip_suffix([']', '`', '"']).unwrap_or(s)
}

/// Remove any literal `FOREIGN KEY` that leaked into a type string.
pub fn clean_type(raw: &str, patterns: &Patterns) -> String {
    patterns
        .foreign_key_literal
        .replace_all(raw, "")
        .trim()
        .to_string()
}

/// Column names of a `PRIMARY KEY (a, b DESC)` list.
pub fn key_columns(list: &str) -> Vec<String> {
    list.split(',')
        .filter_map(|part| part.split_whitespace().next())
        .map(|name| unwrap_ident(name).to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
