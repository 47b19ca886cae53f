//! Initial node placement.

use super::types::Position;

/// Row-major grid used for the first placement of table nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 3,
            cell_width: 350.0,
            cell_height: 350.0,
        }
    }
}

impl GridLayout {
    /// Position of the `index`-th table in declaration order.
    pub fn position(&self, index: usize) -> Position {
        let columns = self.columns.max(1);
        let col = index % columns;
        let row = index / columns;
        Position {
            x: col as f64 * self.cell_width,
            y: row as f64 * self.cell_height,
        }
    }
}
