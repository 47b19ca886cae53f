//! Top-level clause splitting for CREATE TABLE bodies.

use std::ops::Range;

/// Byte ranges of the clauses in `body`, split on commas at parenthesis
/// depth 0.
///
/// Interior fragments are kept even when blank; only a whitespace-only
/// trailing fragment is dropped. Unbalanced parentheses are tolerated:
/// once depth goes negative no further comma splits, but the remaining
/// text is still emitted as the last clause.
pub fn split_clause_spans(body: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (i, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                spans.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }

    if !body[start..].trim().is_empty() {
        spans.push(start..body.len());
    }

    spans
}

/// Clauses of `body`, untrimmed, in declaration order.
pub fn split_clauses(body: &str) -> Vec<&str> {
    split_clause_spans(body)
        .into_iter()
        .map(|span| &body[span])
        .collect()
}

/// Text inside the parenthesis group opening at byte `open`.
///
/// Returns `None` if `open` is not a `(` or the group never closes.
pub fn balanced_group(text: &str, open: usize) -> Option<&str> {
    if !text[open..].starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trimmed(body: &str) -> Vec<&str> {
        split_clauses(body).into_iter().map(str::trim).collect()
    }

    #[test]
    fn test_split_respects_nested_parens() {
        let clauses = trimmed("a INT, b DECIMAL(10,2), c VARCHAR(5) CHECK(c <> '')");
        assert_eq!(
            clauses,
            vec!["a INT", "b DECIMAL(10,2)", "c VARCHAR(5) CHECK(c <> '')"]
        );
    }

    #[test]
    fn test_trailing_whitespace_fragment_dropped() {
        assert_eq!(trimmed("a INT,\n  b INT,\n  "), vec!["a INT", "b INT"]);
        assert!(split_clauses("   ").is_empty());
        assert!(split_clauses("").is_empty());
    }

    #[test]
    fn test_interior_blank_fragment_kept() {
        assert_eq!(trimmed("a INT,,b INT"), vec!["a INT", "", "b INT"]);
    }

    #[test]
    fn test_unbalanced_parens_still_terminate() {
        // Depth goes negative after the stray `)`; the rest stays one clause.
        assert_eq!(trimmed("a INT), b INT, c INT"), vec!["a INT), b INT, c INT"]);
        // Unclosed `(` swallows the rest.
        assert_eq!(trimmed("a DECIMAL(10, b INT"), vec!["a DECIMAL(10, b INT"]);
    }

    #[test]
    fn test_spans_index_into_body() {
        let body = "id INT, name TEXT";
        let spans = split_clause_spans(body);
        assert_eq!(spans, vec![0..6, 7..body.len()]);
    }

    #[test]
    fn test_balanced_group() {
        let text = "CHECK (len(x) > 0 AND (y < 3)) DEFAULT 1";
        let open = text.find('(').unwrap();
        assert_eq!(balanced_group(text, open), Some("len(x) > 0 AND (y < 3)"));
        assert_eq!(balanced_group(text, 0), None);
        assert_eq!(balanced_group("CHECK (x > 0", 6), None);
    }
}
