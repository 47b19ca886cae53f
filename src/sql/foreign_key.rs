//! Foreign key discovery and resolution.
//!
//! Declarations are gathered from every supported DDL shape into one list
//! ordered by script position, then applied in a single pass. For a given
//! `(table, column)` an `ALTER TABLE` declaration beats any inline one;
//! between declarations of equal precedence the earliest in the script
//! wins.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use regex::Captures;
use tracing::debug;

use super::clause::split_clause_spans;
use super::parser::CreateStatement;
use super::patterns::Patterns;
use crate::schema::{ColumnRef, Schema};

/// DDL shape a foreign key was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FkSource {
    /// First `FOREIGN KEY` of a CREATE TABLE statement, matched with the
    /// statement's own name.
    Statement,
    /// Any `FOREIGN KEY` found by re-scanning a CREATE TABLE body.
    Body,
    /// Column-level `col TYPE REFERENCES table(col)`.
    ColumnReference,
    /// `ALTER TABLE … ADD [CONSTRAINT x] FOREIGN KEY …`.
    AlterTable,
}

impl FkSource {
    fn precedence(self) -> u8 {
        match self {
            Self::AlterTable => 1,
            Self::Statement | Self::Body | Self::ColumnReference => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FkDeclaration {
    pub source: FkSource,
    /// Byte offset of the referencing column name in the script.
    pub offset: usize,
    pub table: String,
    pub column: String,
    pub references: ColumnRef,
}

/// Collect every foreign key declaration in the script, ordered by
/// position. A declaration matched by more than one shape is kept once.
pub(crate) fn collect_declarations(
    input: &str,
    statements: &[CreateStatement<'_>],
    patterns: &Patterns,
) -> Vec<FkDeclaration> {
    let mut declarations = Vec::new();

    for stmt in statements {
        let text = &input[stmt.span.clone()];
        if let Some(caps) = patterns.fk_statement.captures(text) {
            if let Some(decl) = declaration(FkSource::Statement, &caps, 2, 3, stmt.span.start) {
                declarations.push(decl);
            }
        }

        let body = &input[stmt.body.clone()];
        for caps in patterns.fk_body.captures_iter(body) {
            if let Some(mut decl) = declaration(FkSource::Body, &caps, 0, 1, stmt.body.start) {
                decl.table = stmt.name.to_string();
                declarations.push(decl);
            }
        }

        for span in split_clause_spans(body) {
            let clause = &body[span.clone()];
            if patterns.is_table_constraint(clause) {
                continue;
            }
            if let Some(caps) = patterns.column_reference.captures(clause) {
                let base = stmt.body.start + span.start;
                if let Some(mut decl) = declaration(FkSource::ColumnReference, &caps, 0, 1, base) {
                    decl.table = stmt.name.to_string();
                    declarations.push(decl);
                }
            }
        }
    }

    for caps in patterns.alter_table_fk.captures_iter(input) {
        if let Some(decl) = declaration(FkSource::AlterTable, &caps, 2, 3, 0) {
            declarations.push(decl);
        }
    }

    // Stable sort keeps `Statement` ahead of `Body` for the same match.
    declarations.sort_by_key(|d| d.offset);
    declarations.dedup_by(|later, earlier| later.offset == earlier.offset);
    declarations
}

/// Build a declaration from captures laid out as
/// `[table] column, target schema, target table, target column`.
///
/// `table_group` 0 means the pattern has no table capture; the caller
/// fills the table in.
fn declaration(
    source: FkSource,
    caps: &Captures<'_>,
    table_group: usize,
    column_group: usize,
    base: usize,
) -> Option<FkDeclaration> {
    let column = caps.get(column_group)?;
    let table = if table_group == 0 {
        String::new()
    } else {
        caps.get(table_group)?.as_str().to_string()
    };

    Some(FkDeclaration {
        source,
        offset: base + column.start(),
        table,
        column: column.as_str().to_string(),
        references: ColumnRef {
            schema: caps.get(column_group + 1).map(|m| m.as_str().to_string()),
            table: caps.get(column_group + 2)?.as_str().to_string(),
            column: caps.get(column_group + 3)?.as_str().to_string(),
        },
    })
}

/// Annotate columns with their winning foreign key declaration.
///
/// `fk_id` is `fk-<table>-<column>-<n>` where `n` is the 1-based position
/// of the declaration in `declarations`. Declarations whose table or
/// column does not exist are dropped. Returns the number of columns
/// annotated.
pub fn resolve(schema: &mut Schema, declarations: &[FkDeclaration]) -> usize {
    let mut winners: HashMap<(&str, &str), usize> = HashMap::new();

    for (idx, decl) in declarations.iter().enumerate() {
        match winners.entry((decl.table.as_str(), decl.column.as_str())) {
            Entry::Vacant(e) => {
                e.insert(idx);
            }
            Entry::Occupied(mut e) => {
                if decl.source.precedence() > declarations[*e.get()].source.precedence() {
                    e.insert(idx);
                }
            }
        }
    }

    let mut order: Vec<usize> = winners.into_values().collect();
    order.sort_unstable();

    let mut resolved = 0;
    for idx in order {
        let decl = &declarations[idx];
        let Some(table) = schema.table_mut(&decl.table) else {
            debug!(table = %decl.table, column = %decl.column, "foreign key owner table not found");
            continue;
        };
        let Some(column) = table.column_mut(&decl.column) else {
            debug!(table = %decl.table, column = %decl.column, "foreign key column not found");
            continue;
        };

        let fk_id = format!("fk-{}-{}-{}", decl.table, decl.column, idx + 1);
        column.set_foreign_key(fk_id, decl.references.clone());
        resolved += 1;
    }

    resolved
}

#[cfg(test)]
mod tests {
    use crate::schema::Column;
    use crate::sql::parse_sql;
    use crate::sql::parser::SqlParser;

    fn fk<'a>(schema: &'a crate::schema::Schema, table: &str, column: &str) -> &'a Column {
        schema.table(table).unwrap().column(column).unwrap()
    }

    #[test]
    fn test_inline_foreign_key() {
        let sql = r#"
            CREATE TABLE Parent (parentCol INT PRIMARY KEY);
            CREATE TABLE Child (
                id INT PRIMARY KEY,
                childCol INT,
                FOREIGN KEY (childCol) REFERENCES Parent(parentCol)
            );
        "#;
        let schema = parse_sql(sql).unwrap();
        let col = fk(&schema, "Child", "childCol");

        assert!(col.is_foreign_key);
        let refs = col.references.as_ref().unwrap();
        assert_eq!(refs.table, "Parent");
        assert_eq!(refs.column, "parentCol");
        assert_eq!(refs.schema, None);
        assert!(col.fk_id.as_deref().is_some_and(|id| id.starts_with("fk-Child-childCol-")));
        assert!(!fk(&schema, "Child", "id").is_foreign_key);
    }

    #[test]
    fn test_every_body_foreign_key_found() {
        let sql = r#"
            CREATE TABLE Users (Id INT PRIMARY KEY);
            CREATE TABLE Products (Id INT PRIMARY KEY);
            CREATE TABLE Reviews (
                Id INT PRIMARY KEY,
                UserId INT,
                ProductId INT,
                CONSTRAINT FK_User FOREIGN KEY ([UserId]) REFERENCES [dbo].[Users]([Id]),
                CONSTRAINT FK_Product FOREIGN KEY (ProductId) REFERENCES Products (Id)
            );
        "#;
        let schema = parse_sql(sql).unwrap();
        let user = fk(&schema, "Reviews", "UserId");
        let product = fk(&schema, "Reviews", "ProductId");

        assert_eq!(user.references.as_ref().unwrap().schema.as_deref(), Some("dbo"));
        assert_eq!(user.references.as_ref().unwrap().table, "Users");
        assert_eq!(product.references.as_ref().unwrap().table, "Products");
        assert_ne!(user.fk_id, product.fk_id);
    }

    #[test]
    fn test_column_level_references() {
        let sql = r#"
            CREATE TABLE users (id INT PRIMARY KEY);
            CREATE TABLE orders (
                id INT PRIMARY KEY,
                user_id INT NOT NULL REFERENCES users(id)
            );
        "#;
        let schema = parse_sql(sql).unwrap();
        let col = fk(&schema, "orders", "user_id");
        assert!(col.is_foreign_key);
        assert!(!col.is_nullable);
        assert_eq!(col.references.as_ref().unwrap().column, "id");
    }

    #[test]
    fn test_alter_table_foreign_key() {
        let sql = r#"
            CREATE TABLE [dbo].[Customers] ([Id] INT NOT NULL);
            CREATE TABLE [dbo].[Orders] ([Id] INT NOT NULL, [CustomerId] INT NULL);
            ALTER TABLE [dbo].[Orders] WITH CHECK ADD CONSTRAINT [FK_Orders_Customers]
                FOREIGN KEY([CustomerId]) REFERENCES [dbo].[Customers] ([Id]);
            ALTER TABLE Orders ADD FOREIGN KEY (Missing) REFERENCES Customers(Id);
        "#;
        let schema = parse_sql(sql).unwrap();
        let col = fk(&schema, "Orders", "CustomerId");
        assert!(col.is_foreign_key);
        assert_eq!(col.references.as_ref().unwrap().table, "Customers");
        assert_eq!(schema.foreign_key_count(), 1);
    }

    #[test]
    fn test_unresolvable_foreign_keys_dropped() {
        let sql = r#"
            CREATE TABLE Orders (
                Id INT,
                CustomerId INT,
                FOREIGN KEY (Nope) REFERENCES Customers(Id)
            );
            ALTER TABLE Ghost ADD CONSTRAINT fk FOREIGN KEY (CustomerId) REFERENCES Customers(Id);
        "#;
        let schema = parse_sql(sql).unwrap();
        assert_eq!(schema.foreign_key_count(), 0);
        let col = fk(&schema, "Orders", "CustomerId");
        assert!(col.fk_id.is_none() && col.references.is_none());
    }

    #[test]
    fn test_reference_to_undeclared_table_still_annotated() {
        let sql = "CREATE TABLE a (b_id INT, FOREIGN KEY (b_id) REFERENCES b(id));";
        let schema = parse_sql(sql).unwrap();
        assert!(fk(&schema, "a", "b_id").is_foreign_key);
    }

    #[test]
    fn test_statement_and_body_match_collapse() {
        let sql = r#"
            CREATE TABLE Parent (Id INT);
            CREATE TABLE Child (
                ParentId INT,
                FOREIGN KEY (ParentId) REFERENCES Parent(Id)
            );
        "#;
        let parser = SqlParser::new().unwrap();
        let statements = parser.create_statements(sql);
        let patterns = super::Patterns::compile().unwrap();
        let decls = super::collect_declarations(sql, &statements, &patterns);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].source, super::FkSource::Statement);
        assert_eq!(decls[0].table, "Child");
    }

    #[test]
    fn test_statement_pattern_stays_inside_its_statement() {
        // `Parent` has no foreign key; the one in `Child` must not be
        // attributed to it even though `Parent` also has a `ParentId`.
        let sql = r#"
            CREATE TABLE Parent (Id INT, ParentId INT);
            CREATE TABLE Child (
                ParentId INT,
                FOREIGN KEY (ParentId) REFERENCES Parent(Id)
            );
        "#;
        let schema = parse_sql(sql).unwrap();
        assert!(!fk(&schema, "Parent", "ParentId").is_foreign_key);
        assert!(fk(&schema, "Child", "ParentId").is_foreign_key);
    }

    #[test]
    fn test_alter_table_wins_over_inline() {
        let sql = r#"
            CREATE TABLE A (Id INT);
            CREATE TABLE B (Id INT);
            CREATE TABLE C (
                RefId INT,
                FOREIGN KEY (RefId) REFERENCES A(Id)
            );
            ALTER TABLE C ADD CONSTRAINT fk_c_b FOREIGN KEY (RefId) REFERENCES B(Id);
        "#;
        let schema = parse_sql(sql).unwrap();
        let col = fk(&schema, "C", "RefId");
        assert_eq!(col.references.as_ref().unwrap().table, "B");
        assert_eq!(col.fk_id.as_deref(), Some("fk-C-RefId-2"));
    }

    #[test]
    fn test_first_inline_declaration_wins() {
        let sql = r#"
            CREATE TABLE A (Id INT);
            CREATE TABLE B (Id INT);
            CREATE TABLE C (
                RefId INT,
                FOREIGN KEY (RefId) REFERENCES A(Id),
                FOREIGN KEY (RefId) REFERENCES B(Id)
            );
        "#;
        let schema = parse_sql(sql).unwrap();
        let col = fk(&schema, "C", "RefId");
        assert_eq!(col.references.as_ref().unwrap().table, "A");
        assert_eq!(col.fk_id.as_deref(), Some("fk-C-RefId-1"));
    }

    #[test]
    fn test_fk_ids_unique_across_schema() {
        let sql = r#"
            CREATE TABLE T (Id INT PRIMARY KEY, Parent INT, Other INT,
                FOREIGN KEY (Parent) REFERENCES T(Id));
            CREATE TABLE U (Id INT, TId INT REFERENCES T(Id));
            ALTER TABLE T ADD FOREIGN KEY (Other) REFERENCES U(Id);
        "#;
        let schema = parse_sql(sql).unwrap();
        let mut ids: Vec<&str> = schema
            .tables
            .iter()
            .flat_map(|t| &t.columns)
            .filter_map(|c| c.fk_id.as_deref())
            .collect();
        assert_eq!(ids.len(), 3);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
