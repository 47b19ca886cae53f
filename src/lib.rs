pub mod ir;
pub mod layout;
pub mod measure;
pub mod pipeline;
pub mod schema;
pub mod sql;

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use ir::{Edge, GraphOptions};
use layout::{GridLayout, Position, resolve_connector_side};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Parse a DDL script and return the diagram document as JSON
#[wasm_bindgen(js_name = "sqlToGraph")]
pub fn sql_to_graph(source: &str, columns: Option<usize>) -> Result<String, String> {
    let mut options = GraphOptions::default();
    if let Some(columns) = columns {
        options.grid = GridLayout {
            columns,
            ..options.grid
        };
    }

    pipeline::render_json(source, &options, false).map_err(|e| e.to_string())
}

/// Sides ("left" / "right") the handle of `column` on `table_id` renders on.
///
/// `positions_json` maps node id to `{x, y}`; `edges_json` is the `edges`
/// array of a diagram document.
#[wasm_bindgen(js_name = "connectorSides")]
pub fn connector_sides(
    table_id: &str,
    column: &str,
    positions_json: &str,
    edges_json: &str,
) -> Result<js_sys::Array, String> {
    let positions: HashMap<String, Position> =
        serde_json::from_str(positions_json).map_err(|e| e.to_string())?;
    let edges: Vec<Edge> = serde_json::from_str(edges_json).map_err(|e| e.to_string())?;

    let lookup: HashMap<&str, Position> = positions
        .iter()
        .map(|(id, pos)| (id.as_str(), *pos))
        .collect();

    let sides = js_sys::Array::new();
    if let Some(placement) = resolve_connector_side(table_id, column, &lookup, &edges) {
        for side in placement.sides() {
            sides.push(&JsValue::from_str(side.as_str()));
        }
    }
    Ok(sides)
}
