//! Scene object registry: logical entity → on-screen primitives.
//!
//! The registry is the single source of truth for "does X exist" and for
//! finding what to restyle. Deferred work (fades, reversions, edge draws)
//! holds IDs and resolves them here when it runs, so an entity removed by
//! a clear in the meantime is simply not found.

use std::collections::HashMap;
use tc_core::id::{EdgeKey, VertexId};
use tc_core::scene::ShapeId;

/// The primitive pair backing one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexShapes {
    pub circle: ShapeId,
    pub label: ShapeId,
}

#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    vertices: HashMap<VertexId, VertexShapes>,
    edges: HashMap<EdgeKey, ShapeId>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<VertexShapes> {
        self.vertices.get(&id).copied()
    }

    /// Register the shapes of a vertex. Returns the previous entry, if any.
    pub fn register_vertex(&mut self, id: VertexId, shapes: VertexShapes) -> Option<VertexShapes> {
        self.vertices.insert(id, shapes)
    }

    pub fn contains_edge(&self, key: EdgeKey) -> bool {
        self.edges.contains_key(&key)
    }

    /// The line primitive backing an edge.
    pub fn edge(&self, key: EdgeKey) -> Option<ShapeId> {
        self.edges.get(&key).copied()
    }

    pub fn register_edge(&mut self, key: EdgeKey, line: ShapeId) -> Option<ShapeId> {
        self.edges.insert(key, line)
    }

    pub fn unregister_all(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }
}
