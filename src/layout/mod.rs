//! Node placement and connector handle resolution.

mod anchors;
mod placement;
mod store;
mod types;

pub use anchors::{resolve_connector_side, resolve_table_handles};
pub use placement::GridLayout;
pub use store::{LayoutStore, SubscriptionId};
pub use types::{ConnectorSide, NodeHeight, NodeSize, Position, Side, TableHandles};
