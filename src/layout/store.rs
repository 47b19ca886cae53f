//! Mutable layout state with targeted connector recomputation.
//!
//! Moving or resizing a node can only change the handles of that node and
//! of the nodes it shares an edge with. The store indexes edges by node id
//! so only those are recomputed, and subscribers are notified only when
//! the handles of the node they watch actually changed.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::ir::Graph;

use super::anchors::resolve_table_handles;
use super::types::{NodeSize, Position, TableHandles};

pub type SubscriptionId = usize;

type HandleCallback<'s> = Box<dyn FnMut(&str, &TableHandles) + 's>;

struct Subscription<'s> {
    id: SubscriptionId,
    node_id: String,
    callback: HandleCallback<'s>,
}

pub struct LayoutStore<'s> {
    graph: Graph<'s>,
    /// Node id -> index into `graph.nodes` (first node wins on collision).
    node_index: HashMap<String, usize>,
    /// Node id -> indices into `graph.edges` touching that node.
    edges_by_node: HashMap<String, Vec<usize>>,
    handles: HashMap<String, TableHandles>,
    subscriptions: Vec<Subscription<'s>>,
    next_subscription: SubscriptionId,
}

impl<'s> LayoutStore<'s> {
    /// Take ownership of a freshly built graph and resolve every handle.
    pub fn new(graph: Graph<'s>) -> Self {
        let mut node_index = HashMap::new();
        for (idx, node) in graph.nodes.iter().enumerate() {
            node_index.entry(node.id.clone()).or_insert(idx);
        }

        let mut edges_by_node: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, edge) in graph.edges.iter().enumerate() {
            edges_by_node.entry(edge.source.clone()).or_default().push(idx);
            if !edge.is_self_ref() {
                edges_by_node.entry(edge.target.clone()).or_default().push(idx);
            }
        }

        let mut store = Self {
            graph,
            node_index,
            edges_by_node,
            handles: HashMap::new(),
            subscriptions: Vec::new(),
            next_subscription: 0,
        };
        let all: BTreeSet<String> = store.node_index.keys().cloned().collect();
        store.recompute(&all);
        store
    }

    pub fn graph(&self) -> &Graph<'s> {
        &self.graph
    }

    pub fn into_graph(self) -> Graph<'s> {
        self.graph
    }

    pub fn position(&self, node_id: &str) -> Option<Position> {
        self.node_index
            .get(node_id)
            .map(|&idx| self.graph.nodes[idx].position)
    }

    pub fn handles(&self, node_id: &str) -> Option<&TableHandles> {
        self.handles.get(node_id)
    }

    /// Handles of every node, ordered by node id.
    pub fn all_handles(&self) -> BTreeMap<&str, &TableHandles> {
        self.handles.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    /// Watch the handles of one node. The callback runs whenever they change.
    pub fn subscribe(
        &mut self,
        node_id: &str,
        callback: impl FnMut(&str, &TableHandles) + 's,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscriptions.push(Subscription {
            id,
            node_id: node_id.to_string(),
            callback: Box::new(callback),
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Move a node. Returns the ids of nodes whose handles changed.
    pub fn move_node(&mut self, node_id: &str, position: Position) -> Vec<String> {
        let Some(&idx) = self.node_index.get(node_id) else {
            debug!(node = node_id, "move of unknown node ignored");
            return Vec::new();
        };
        self.graph.nodes[idx].position = position;
        self.refresh(node_id)
    }

    /// Resize a node. Returns the ids of nodes whose handles changed.
    pub fn resize_node(&mut self, node_id: &str, size: NodeSize) -> Vec<String> {
        let Some(&idx) = self.node_index.get(node_id) else {
            debug!(node = node_id, "resize of unknown node ignored");
            return Vec::new();
        };
        self.graph.nodes[idx].size = size;
        self.refresh(node_id)
    }

    /// The node itself plus every node sharing an edge with it.
    fn affected(&self, node_id: &str) -> BTreeSet<String> {
        let mut affected = BTreeSet::new();
        affected.insert(node_id.to_string());
        for &idx in self.edges_by_node.get(node_id).into_iter().flatten() {
            let edge = &self.graph.edges[idx];
            affected.insert(edge.source.clone());
            affected.insert(edge.target.clone());
        }
        affected
    }

    fn refresh(&mut self, node_id: &str) -> Vec<String> {
        let affected = self.affected(node_id);
        let changed = self.recompute(&affected);
        self.notify(&changed);
        changed
    }

    /// Recompute handles for `node_ids`; returns those that changed.
    fn recompute(&mut self, node_ids: &BTreeSet<String>) -> Vec<String> {
        let positions = self.graph.node_positions();
        let mut changed = Vec::new();

        for node_id in node_ids {
            let Some(&idx) = self.node_index.get(node_id) else {
                continue;
            };
            let node = &self.graph.nodes[idx];
            let incident = self
                .edges_by_node
                .get(node_id)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .map(|&e| &self.graph.edges[e]);
            let handles = resolve_table_handles(node, &positions, incident);

            if self.handles.get(node_id) != Some(&handles) {
                self.handles.insert(node_id.clone(), handles);
                changed.push(node_id.clone());
            }
        }

        changed
    }

    fn notify(&mut self, changed: &[String]) {
        for sub in &mut self.subscriptions {
            if !changed.contains(&sub.node_id) {
                continue;
            }
            if let Some(handles) = self.handles.get(&sub.node_id) {
                (sub.callback)(&sub.node_id, handles);
            }
        }
    }
}
