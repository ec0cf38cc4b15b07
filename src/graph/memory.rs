//! In-memory [`GraphDriver`] reference implementation.
//!
//! Stands in for "the graph database driver" that spec scope places
//! outside this crate (no Cypher-capable store is implemented here); it
//! satisfies the same trait a real driver would and is what the test
//! suite runs the discovery/resolution/materialise pipelines against.

use {
    super::{Edge, EdgeKind, GraphDriver, NewEdge, Node, NodeId, NodeKind},
    crate::EvalError,
    std::sync::atomic::{AtomicU64, Ordering},
    tokio::sync::RwLock,
};

#[derive(Default)]
struct Inner {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// A trivial in-memory graph. Nodes and edges are appended by test setup
/// code via [`MemoryGraph::add_node`]/[`MemoryGraph::add_edge`]; lookups
/// are linear scans, which is fine at the scale the test suite runs at.
pub struct MemoryGraph {
    inner: RwLock<Inner>,
    next_id: AtomicU64,
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh node id and insert a node of `kind`, returning the
    /// id for use when wiring up edges.
    pub async fn add_node(&self, kind: NodeKind) -> NodeId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.write().await.nodes.push(Node::new(id, kind));
        id
    }

    /// Set a property on a previously-added node.
    pub async fn set_property(&self, id: NodeId, key: &str, value: crate::graph::PropertyValue) {
        let mut inner = self.inner.write().await;
        if let Some(node) = inner.nodes.iter_mut().find(|n| n.id == id) {
            node.properties.insert(key.to_string(), value);
        }
    }

    pub async fn add_edge(&self, start: NodeId, end: NodeId, kind: EdgeKind) {
        self.inner.write().await.edges.push(Edge::new(start, end, kind));
    }
}

fn edge_key(edge: &Edge) -> (NodeId, NodeId, EdgeKind, Option<String>) {
    let name = edge.properties.get("name").and_then(|v| v.as_str()).map(str::to_string);
    (edge.start, edge.end, edge.kind, name)
}

#[async_trait::async_trait]
impl GraphDriver for MemoryGraph {
    async fn node(&self, id: NodeId) -> Result<Option<Node>, EvalError> {
        Ok(self.inner.read().await.nodes.iter().find(|n| n.id == id).cloned())
    }

    async fn nodes_by_kind(&self, kind: NodeKind) -> Result<Vec<Node>, EvalError> {
        Ok(self.inner.read().await.nodes.iter().filter(|n| n.kind == kind).cloned().collect())
    }

    async fn node_by_property(&self, kind: NodeKind, key: &str, value: &str) -> Result<Option<Node>, EvalError> {
        Ok(self
            .inner
            .read()
            .await
            .nodes
            .iter()
            .find(|n| n.kind == kind && n.property_str(key) == Some(value))
            .cloned())
    }

    async fn outbound(&self, id: NodeId, kinds: &[EdgeKind]) -> Result<Vec<Edge>, EvalError> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .iter()
            .filter(|e| e.start == id && (kinds.is_empty() || kinds.contains(&e.kind)))
            .cloned()
            .collect())
    }

    async fn inbound(&self, id: NodeId, kinds: &[EdgeKind]) -> Result<Vec<Edge>, EvalError> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .iter()
            .filter(|e| e.end == id && (kinds.is_empty() || kinds.contains(&e.kind)))
            .cloned()
            .collect())
    }

    async fn write_edges(&self, edges: Vec<NewEdge>) -> Result<(), EvalError> {
        let mut inner = self.inner.write().await;
        for new_edge in edges {
            let candidate = Edge {
                start: new_edge.start,
                end: new_edge.end,
                kind: new_edge.kind,
                properties: new_edge.properties,
            };
            let key = edge_key(&candidate);
            if !inner.edges.iter().any(|e| edge_key(e) == key) {
                inner.edges.push(candidate);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::graph::PropertyValue,
        pretty_assertions::assert_eq,
    };

    #[test_log::test(tokio::test)]
    async fn test_add_and_fetch() {
        let graph = MemoryGraph::new();
        let role = graph.add_node(NodeKind::AwsRole).await;
        graph.set_property(role, "arn", PropertyValue::from("arn:aws:iam::111:role/R")).await;

        let node = graph.node(role).await.unwrap().unwrap();
        assert_eq!(node.kind, NodeKind::AwsRole);
        assert_eq!(node.property_str("arn"), Some("arn:aws:iam::111:role/R"));

        let user = graph.add_node(NodeKind::AwsUser).await;
        graph.add_edge(user, role, EdgeKind::Action).await;
        let out = graph.outbound(user, &[EdgeKind::Action]).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].end, role);
    }

    #[test_log::test(tokio::test)]
    async fn test_write_edges_idempotent() {
        let graph = MemoryGraph::new();
        let a = graph.add_node(NodeKind::AwsUser).await;
        let b = graph.add_node(NodeKind::AwsRole).await;

        let edge = NewEdge::new(a, b, EdgeKind::IdentityTransform).with_property("name", "sts:assumerole");
        graph.write_edges(vec![edge.clone()]).await.unwrap();
        graph.write_edges(vec![edge]).await.unwrap();

        let out = graph.outbound(a, &[EdgeKind::IdentityTransform]).await.unwrap();
        assert_eq!(out.len(), 1);
    }
}
