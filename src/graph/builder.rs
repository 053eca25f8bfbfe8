//! Graph construction module

use crate::graph::CompressedGraph;

/// Builder for incrementally constructing an undirected CompressedGraph.
///
/// Vertex ids are used as-is: the graph spans `0..=max observed id`, and ids
/// that never appear in an edge become isolated vertices.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Adjacency lists for each node, unsorted until `build`
    adjacency_lists: Vec<Vec<u32>>,

    /// Edges accepted so far (self-loops excluded, duplicates included)
    accepted: u64,
}

impl GraphBuilder {
    /// Create a new graph builder with room for `capacity` vertices
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            adjacency_lists: Vec::with_capacity(capacity),
            accepted: 0,
        }
    }

    fn ensure_node(&mut self, id: u32) {
        let needed = id as usize + 1;
        if self.adjacency_lists.len() < needed {
            self.adjacency_lists.resize_with(needed, Vec::new);
        }
    }

    /// Add an undirected edge. Returns `false` for a self-loop, which is dropped.
    pub fn add_edge(&mut self, src: u32, dst: u32) -> bool {
        if src == dst {
            return false;
        }
        self.ensure_node(src.max(dst));
        self.adjacency_lists[src as usize].push(dst);
        self.adjacency_lists[dst as usize].push(src);
        self.accepted += 1;
        true
    }

    /// Current number of vertices
    pub fn node_count(&self) -> usize {
        self.adjacency_lists.len()
    }

    pub fn accepted_edges(&self) -> u64 {
        self.accepted
    }

    /// Sort and deduplicate every list, then compress
    pub fn build(self) -> CompressedGraph {
        CompressedGraph::from_lists(self.adjacency_lists)
    }
}
