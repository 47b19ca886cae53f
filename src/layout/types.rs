//! Data structures shared by placement and connector resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-left corner of a table box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeHeight {
    /// Sized by the renderer from its content.
    Auto,
    #[serde(untagged)]
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    pub width: f64,
    pub height: NodeHeight,
}

/// Edge of a table box a connector handle attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Handle placement for one column: a single side or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorSide {
    Left,
    Right,
    Both,
}

impl ConnectorSide {
    /// Placement for referencing nodes counted on each side, `None` when
    /// there are none.
    pub fn from_counts(left: usize, right: usize) -> Option<Self> {
        match (left > 0, right > 0) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Left),
            (false, true) => Some(Self::Right),
            (false, false) => None,
        }
    }

    pub fn union(self, other: Self) -> Self {
        if self == other { self } else { Self::Both }
    }

    pub fn sides(self) -> &'static [Side] {
        match self {
            Self::Left => &[Side::Left],
            Self::Right => &[Side::Right],
            Self::Both => &[Side::Left, Side::Right],
        }
    }

    pub fn has(self, side: Side) -> bool {
        self.sides().contains(&side)
    }
}

impl From<Side> for ConnectorSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Self::Left,
            Side::Right => Self::Right,
        }
    }
}

/// Resolved handles of one table node, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableHandles {
    /// Outbound handles of foreign key columns.
    pub source: BTreeMap<String, Side>,
    /// Inbound handles of primary key columns.
    pub target: BTreeMap<String, ConnectorSide>,
}

impl TableHandles {
    /// Every side a column has a handle on.
    pub fn column(&self, name: &str) -> Option<ConnectorSide> {
        let outbound = self.source.get(name).copied().map(ConnectorSide::from);
        let inbound = self.target.get(name).copied();
        match (outbound, inbound) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty() && self.target.is_empty()
    }
}
