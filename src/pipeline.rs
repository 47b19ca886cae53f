//! Script → schema → graph, with the checks a caller runs around the parser.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::ir::{Graph, GraphOptions};
use crate::layout::{LayoutStore, TableHandles};
use crate::schema::Schema;
use crate::sql::{SqlParseError, SqlParser};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("SQL script cannot be empty")]
    EmptyScript,
    #[error("No tables found in the SQL script. Make sure it contains CREATE TABLE statements.")]
    NoTables,
    #[error(transparent)]
    Parse(#[from] SqlParseError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a script, rejecting empty input and scripts without any table.
pub fn load_schema(script: &str) -> Result<Schema, ProcessError> {
    if script.trim().is_empty() {
        return Err(ProcessError::EmptyScript);
    }

    let schema = SqlParser::new()?.parse(script);
    if schema.is_empty() {
        warn!("no CREATE TABLE statement recognized");
        return Err(ProcessError::NoTables);
    }

    Ok(schema)
}

/// Everything a renderer needs, ready to serialize.
#[derive(Debug, Serialize)]
pub struct DiagramDocument<'a, 's> {
    pub schema: &'s Schema,
    #[serde(flatten)]
    pub graph: &'a Graph<'s>,
    pub handles: BTreeMap<&'a str, &'a TableHandles>,
}

impl<'a, 's> DiagramDocument<'a, 's> {
    pub fn new(schema: &'s Schema, store: &'a LayoutStore<'s>) -> Self {
        Self {
            schema,
            graph: store.graph(),
            handles: store.all_handles(),
        }
    }
}

/// Parse `script`, build its graph and serialize the diagram document.
pub fn render_json(script: &str, options: &GraphOptions, pretty: bool) -> Result<String, ProcessError> {
    let schema = load_schema(script)?;
    let store = LayoutStore::new(Graph::from_schema(&schema, options));

    info!(
        nodes = store.graph().nodes.len(),
        edges = store.graph().edges.len(),
        "built schema graph"
    );

    let document = DiagramDocument::new(&schema, &store);
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const SQL: &str = r#"
        CREATE TABLE Customers (Id INT PRIMARY KEY, Name NVARCHAR(100) NOT NULL);
        CREATE TABLE Orders (
            Id INT PRIMARY KEY,
            CustomerId INT,
            Total DECIMAL(10,2) DEFAULT 0
        );
        ALTER TABLE Orders ADD CONSTRAINT FK_Orders_Customers
            FOREIGN KEY (CustomerId) REFERENCES Customers(Id);
    "#;

    #[test]
    fn test_empty_script_rejected() {
        assert!(matches!(load_schema(""), Err(ProcessError::EmptyScript)));
        assert!(matches!(load_schema("  \n\t "), Err(ProcessError::EmptyScript)));
    }

    #[test]
    fn test_no_tables_signal() {
        let err = load_schema("SELECT * FROM Orders;").unwrap_err();
        assert!(matches!(err, ProcessError::NoTables));
        assert!(err.to_string().starts_with("No tables found"));
    }

    #[test]
    fn test_render_json_document() {
        let json = render_json(SQL, &GraphOptions::default(), false).unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(doc["schema"]["tables"].as_array().unwrap().len(), 2);
        assert_eq!(doc["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(doc["nodes"][1]["position"]["x"], 350.0);
        assert_eq!(doc["nodes"][1]["size"]["height"], "auto");

        let edge = &doc["edges"][0];
        assert_eq!(edge["id"], "edge-1");
        assert_eq!(edge["source"], "Orders");
        assert_eq!(edge["target"], "Customers");
        assert_eq!(edge["sourceColumn"], "CustomerId");
        assert_eq!(edge["targetHandle"], "Customers-Id-target");

        let customer_id = &doc["schema"]["tables"][1]["columns"][1];
        assert_eq!(customer_id["isForeignKey"], true);
        assert_eq!(customer_id["fkId"], "fk-Orders-CustomerId-1");
        assert_eq!(customer_id["references"]["table"], "Customers");

        assert_eq!(doc["handles"]["Orders"]["source"]["CustomerId"], "left");
        assert_eq!(doc["handles"]["Customers"]["target"]["Id"], "right");
    }

    #[test]
    fn test_pretty_output() {
        let json = render_json(SQL, &GraphOptions::default(), true).unwrap();
        assert!(json.contains("\n  \"schema\""));
    }
}
