use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub checks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fk_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnRef>,
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
    pub column: String,
}

/// How tables are identified when foreign keys and edges are resolved.
///
/// Only bare names are compared; two tables with the same name in
/// different schemas collide and the first declared one is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableIdentity {
    #[default]
    NameOnly,
}

impl TableIdentity {
    pub fn matches(self, table: &Table, name: &str) -> bool {
        match self {
            Self::NameOnly => table.name == name,
        }
    }

    /// Node id of a table in the diagram graph.
    pub fn node_id(self, table: &Table) -> String {
        match self {
            Self::NameOnly => table.name.clone(),
        }
    }
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| TableIdentity::NameOnly.matches(t, name))
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| TableIdentity::NameOnly.matches(t, name))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of columns carrying a foreign key.
    pub fn foreign_key_count(&self) -> usize {
        self.tables
            .iter()
            .flat_map(|t| &t.columns)
            .filter(|c| c.is_foreign_key)
            .count()
    }
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// `schema.name` when qualified, otherwise just the name.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            is_primary_key: false,
            is_foreign_key: false,
            is_nullable: true,
            default_value: None,
            checks: Vec::new(),
            fk_id: None,
            references: None,
        }
    }

    /// Marks the column as a foreign key. `is_foreign_key`, `fk_id` and
    /// `references` are only ever written together here.
    pub fn set_foreign_key(&mut self, fk_id: String, references: ColumnRef) {
        self.is_foreign_key = true;
        self.fk_id = Some(fk_id);
        self.references = Some(references);
    }
}
