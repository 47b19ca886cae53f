use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::layout::{GridLayout, NodeSize, Position};
use crate::measure::TextMetrics;
use crate::schema::{Schema, Table, TableIdentity};

/// Knobs for building a graph from a schema.
#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    pub grid: GridLayout,
    pub metrics: TextMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct Graph<'s> {
    pub nodes: Vec<Node<'s>>,
    pub edges: Vec<Edge>,
}

/// One table box. The table itself stays owned by the schema.
#[derive(Debug, Clone, Serialize)]
pub struct Node<'s> {
    pub id: String,
    pub position: Position,
    pub size: NodeSize,
    pub table: &'s Table,
}

/// One foreign key column drawn as a connector between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    pub source_column: String,
    pub target_column: String,
}

impl Edge {
    pub fn new(
        seq: usize,
        source: &str,
        source_column: &str,
        target: &str,
        target_column: &str,
    ) -> Self {
        Self {
            id: format!("edge-{}", seq),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: format!("{}-{}-source", source, source_column),
            target_handle: format!("{}-{}-target", target, target_column),
            source_column: source_column.to_string(),
            target_column: target_column.to_string(),
        }
    }

    pub fn is_self_ref(&self) -> bool {
        self.source == self.target
    }
}

impl<'s> Graph<'s> {
    pub fn from_schema(schema: &'s Schema, options: &GraphOptions) -> Self {
        let identity = TableIdentity::NameOnly;

        let nodes: Vec<Node<'s>> = schema
            .tables
            .iter()
            .enumerate()
            .map(|(i, table)| Node {
                id: identity.node_id(table),
                position: options.grid.position(i),
                size: options.metrics.node_size(table),
                table,
            })
            .collect();

        let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        let mut edges = Vec::new();
        for table in &schema.tables {
            let source = identity.node_id(table);
            for column in &table.columns {
                let Some(references) = column.references.as_ref().filter(|_| column.is_foreign_key)
                else {
                    continue;
                };
                // Target node ids are bare table names.
                if !node_ids.contains(references.table.as_str()) {
                    continue;
                }
                edges.push(Edge::new(
                    edges.len() + 1,
                    &source,
                    &column.name,
                    &references.table,
                    &references.column,
                ));
            }
        }

        Graph { nodes, edges }
    }

    /// Current position of every node, keyed by id. The first node wins
    /// when ids collide.
    pub fn node_positions(&self) -> HashMap<&str, Position> {
        let mut positions = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            positions.entry(node.id.as_str()).or_insert(node.position);
        }
        positions
    }
}
