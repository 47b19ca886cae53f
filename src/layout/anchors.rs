//! Connector side resolution for table nodes.
//!
//! Sides depend only on the horizontal order of the nodes an edge joins,
//! so they must be recomputed whenever a node moves.

use std::collections::HashMap;

use crate::ir::{Edge, Node};

use super::types::{ConnectorSide, Position, Side, TableHandles};

/// Side facing a node at `other_x` from a node at `own_x`.
fn side_toward(own_x: f64, other_x: f64) -> Side {
    if other_x < own_x { Side::Left } else { Side::Right }
}

/// Handle side of an outbound (foreign key) column.
fn outbound_side<'e>(
    table_id: &str,
    column: &str,
    own_x: f64,
    positions: &HashMap<&str, Position>,
    edges: impl IntoIterator<Item = &'e Edge>,
) -> Option<Side> {
    edges
        .into_iter()
        .filter(|e| e.source == table_id && e.source_column == column)
        .find_map(|e| positions.get(e.target.as_str()))
        .map(|target| side_toward(own_x, target.x))
}

/// Handle sides of an inbound (referenced) column.
fn inbound_sides<'e>(
    table_id: &str,
    column: &str,
    own_x: f64,
    positions: &HashMap<&str, Position>,
    edges: impl IntoIterator<Item = &'e Edge>,
) -> Option<ConnectorSide> {
    let (mut left, mut right) = (0, 0);
    for edge in edges {
        if edge.target != table_id || edge.target_column != column {
            continue;
        }
        let Some(source) = positions.get(edge.source.as_str()) else {
            continue;
        };
        match side_toward(own_x, source.x) {
            Side::Left => left += 1,
            Side::Right => right += 1,
        }
    }
    ConnectorSide::from_counts(left, right)
}

/// Where the handle(s) of `column` on `table_id` go for the current
/// positions. Combines the outbound side (the column references another
/// node) with the inbound sides (other nodes reference the column).
pub fn resolve_connector_side(
    table_id: &str,
    column: &str,
    positions: &HashMap<&str, Position>,
    edges: &[Edge],
) -> Option<ConnectorSide> {
    let own = positions.get(table_id)?;
    let outbound = outbound_side(table_id, column, own.x, positions, edges).map(ConnectorSide::from);
    let inbound = inbound_sides(table_id, column, own.x, positions, edges);
    match (outbound, inbound) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, b) => a.or(b),
    }
}

/// Resolve every handle of one node: foreign key columns get an outbound
/// side, primary key columns get the sides their referencing nodes sit on.
pub fn resolve_table_handles<'e, I>(
    node: &Node<'_>,
    positions: &HashMap<&str, Position>,
    edges: I,
) -> TableHandles
where
    I: IntoIterator<Item = &'e Edge> + Clone,
{
    let mut handles = TableHandles::default();
    let Some(own) = positions.get(node.id.as_str()) else {
        return handles;
    };

    for column in &node.table.columns {
        if column.is_foreign_key {
            if let Some(side) =
                outbound_side(&node.id, &column.name, own.x, positions, edges.clone())
            {
                handles.source.insert(column.name.clone(), side);
            }
        }
        if column.is_primary_key {
            if let Some(sides) =
                inbound_sides(&node.id, &column.name, own.x, positions, edges.clone())
            {
                handles.target.insert(column.name.clone(), sides);
            }
        }
    }

    handles
}
