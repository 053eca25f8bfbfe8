//! Memory-efficient adjacency representation

use crate::error::{Error, Result};
use serde::Serialize;
use std::mem;

/// Compressed sparse row adjacency of an undirected graph.
///
/// Every undirected edge `{u, v}` is stored twice, once in each endpoint's
/// neighbor list. Lists are sorted ascending and duplicate-free. The same
/// layout also carries the row side of a bipartite incidence for the
/// densest-subgraph miner, where symmetry does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedGraph {
    /// Number of vertices; ids are `0..node_count`
    node_count: usize,

    /// offsets[i] to offsets[i+1] defines the neighbor range of vertex i
    offsets: Vec<usize>,

    /// Concatenated neighbor lists
    edges: Vec<u32>,
}

/// Summary numbers for logs and the JSON report
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub isolated_nodes: usize,
    pub max_degree: usize,
    pub avg_degree: f64,
}

impl CompressedGraph {
    /// A graph with `node_count` isolated vertices
    pub fn empty(node_count: usize) -> Self {
        Self {
            node_count,
            offsets: vec![0; node_count + 1],
            edges: Vec::new(),
        }
    }

    /// Build from per-vertex neighbor lists that are already sorted and deduplicated
    pub fn from_sorted_lists(lists: Vec<Vec<u32>>) -> Self {
        let node_count = lists.len();
        let edge_count: usize = lists.iter().map(|list| list.len()).sum();

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut edges = Vec::with_capacity(edge_count);
        offsets.push(0);
        for list in lists {
            edges.extend_from_slice(&list);
            offsets.push(edges.len());
        }

        Self {
            node_count,
            offsets,
            edges,
        }
    }

    /// Build from arbitrary neighbor lists, sorting and deduplicating each
    pub fn from_lists(mut lists: Vec<Vec<u32>>) -> Self {
        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
        }
        Self::from_sorted_lists(lists)
    }

    /// Build an undirected graph from an edge slice; self-loops are dropped
    pub fn from_edges(node_count: usize, edges: &[(u32, u32)]) -> Self {
        let mut lists = vec![Vec::new(); node_count];
        for &(u, v) in edges {
            if u == v {
                continue;
            }
            lists[u as usize].push(v);
            lists[v as usize].push(u);
        }
        Self::from_lists(lists)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of stored adjacency entries (twice the undirected edge count)
    pub fn adjacency_len(&self) -> usize {
        self.edges.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Sorted neighbors of a vertex
    pub fn neighbors(&self, node: usize) -> &[u32] {
        &self.edges[self.offsets[node]..self.offsets[node + 1]]
    }

    /// Position of `node`'s first neighbor in the concatenated edge array
    pub fn offset(&self, node: usize) -> usize {
        self.offsets[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.offsets[node + 1] - self.offsets[node]
    }

    pub fn max_degree(&self) -> usize {
        (0..self.node_count)
            .map(|node| self.degree(node))
            .max()
            .unwrap_or(0)
    }

    /// Check if there's an edge from src to dst
    pub fn has_edge(&self, src: usize, dst: u32) -> bool {
        self.neighbors(src).binary_search(&dst).is_ok()
    }

    /// Swap rows and columns; `col_count` is the size of the column side
    pub fn transpose(&self, col_count: usize) -> Result<Self> {
        let mut lists = vec![Vec::new(); col_count];
        for src in 0..self.node_count {
            for &dst in self.neighbors(src) {
                let list = lists.get_mut(dst as usize).ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "column {} out of range for {} columns",
                        dst, col_count
                    ))
                })?;
                list.push(src as u32);
            }
        }
        // Rows are visited in ascending order, so every list is already sorted.
        Ok(Self::from_sorted_lists(lists))
    }

    /// Verify symmetry, sortedness and the absence of self-loops and duplicates
    pub fn validate(&self) -> Result<()> {
        for src in 0..self.node_count {
            let neighbors = self.neighbors(src);
            for (i, &dst) in neighbors.iter().enumerate() {
                if dst as usize >= self.node_count {
                    return Err(Error::InvalidGraph(format!(
                        "vertex {} has neighbor {} outside 0..{}",
                        src, dst, self.node_count
                    )));
                }
                if dst as usize == src {
                    return Err(Error::InvalidGraph(format!("self-loop on vertex {}", src)));
                }
                if i > 0 && neighbors[i - 1] >= dst {
                    return Err(Error::InvalidGraph(format!(
                        "neighbors of vertex {} are not strictly ascending",
                        src
                    )));
                }
                if !self.has_edge(dst as usize, src as u32) {
                    return Err(Error::InvalidGraph(format!(
                        "edge {} -> {} has no reverse entry",
                        src, dst
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> GraphStats {
        let isolated_nodes = (0..self.node_count)
            .filter(|&node| self.degree(node) == 0)
            .count();
        let avg_degree = if self.node_count == 0 {
            0.0
        } else {
            self.edges.len() as f64 / self.node_count as f64
        };
        GraphStats {
            node_count: self.node_count,
            edge_count: self.edge_count(),
            isolated_nodes,
            max_degree: self.max_degree(),
            avg_degree,
        }
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<usize>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();
        base + offsets + edges
    }
}
