//! Truss decomposition by edge peeling

use crate::error::{Error, Result};
use crate::graph::{CompressedGraph, EdgeCodec};
use crate::progress::Progress;
use std::collections::HashMap;

/// Dense numbering of the undirected edges of a graph.
///
/// Edge ids follow CSR order of the `(u, v)` pairs with `u < v`, so `edges`
/// is sorted lexicographically. `slot_edge` maps every directed adjacency
/// slot (both halves of each edge) to its undirected id, which turns a
/// common-neighbor scan into O(1) edge lookups.
#[derive(Debug, Clone)]
pub struct EdgeIndex {
    edges: Vec<(u32, u32)>,
    slot_edge: Vec<usize>,
}

impl EdgeIndex {
    pub fn build(graph: &CompressedGraph) -> Result<Self> {
        let mut edges = Vec::with_capacity(graph.edge_count());
        let mut slot_edge = vec![0usize; graph.adjacency_len()];

        for u in 0..graph.node_count() {
            let base = graph.offset(u);
            for (i, &v) in graph.neighbors(u).iter().enumerate() {
                let v_idx = v as usize;
                if u < v_idx {
                    slot_edge[base + i] = edges.len();
                    edges.push((u as u32, v));
                } else {
                    // The reverse slot was numbered while visiting v.
                    let pos = graph
                        .neighbors(v_idx)
                        .binary_search(&(u as u32))
                        .map_err(|_| {
                            Error::InvalidGraph(format!("edge {} -> {} has no reverse entry", u, v))
                        })?;
                    slot_edge[base + i] = slot_edge[graph.offset(v_idx) + pos];
                }
            }
        }

        Ok(Self { edges, slot_edge })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Endpoints `(min, max)` of each edge id
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Id of the undirected edge `{u, v}`
    pub fn edge_id(&self, u: u32, v: u32) -> Option<usize> {
        self.edges.binary_search(&(u.min(v), u.max(v))).ok()
    }

    fn slot(&self, slot: usize) -> usize {
        self.slot_edge[slot]
    }
}

/// Calls `on_common(w, edge {s, w}, edge {r, w})` for every common neighbor
/// `w` of `s` and `r`, using a sorted merge of the two neighbor lists.
fn for_each_triangle<F>(graph: &CompressedGraph, index: &EdgeIndex, s: usize, r: usize, mut on_common: F)
where
    F: FnMut(usize, usize),
{
    let s_neighbors = graph.neighbors(s);
    let r_neighbors = graph.neighbors(r);
    let s_base = graph.offset(s);
    let r_base = graph.offset(r);

    let (mut k, mut l) = (0, 0);
    while k < s_neighbors.len() && l < r_neighbors.len() {
        match s_neighbors[k].cmp(&r_neighbors[l]) {
            std::cmp::Ordering::Equal => {
                on_common(index.slot(s_base + k), index.slot(r_base + l));
                k += 1;
                l += 1;
            }
            std::cmp::Ordering::Greater => l += 1,
            std::cmp::Ordering::Less => k += 1,
        }
    }
}

/// Number of triangles through each edge of the index
pub fn edge_support(graph: &CompressedGraph, index: &EdgeIndex) -> Vec<u32> {
    index
        .edges()
        .iter()
        .map(|&(s, r)| {
            let mut count = 0u32;
            for_each_triangle(graph, index, s as usize, r as usize, |_, _| count += 1);
            count
        })
        .collect()
}

/// Per-edge and per-vertex trussness of a graph
#[derive(Debug, Clone)]
pub struct TrussDecomposition {
    index: EdgeIndex,
    edge_trussness: Vec<u32>,
    vertex_trussness: Vec<u32>,
}

impl TrussDecomposition {
    /// Max trussness over each vertex's incident edges; 0 when isolated
    pub fn vertex_trussness(&self) -> &[u32] {
        &self.vertex_trussness
    }

    /// Edge endpoints, aligned with `edge_trussness`
    pub fn edges(&self) -> &[(u32, u32)] {
        self.index.edges()
    }

    pub fn edge_trussness(&self) -> &[u32] {
        &self.edge_trussness
    }

    /// Trussness of the edge `{u, v}`, if it exists
    pub fn trussness_of(&self, u: u32, v: u32) -> Option<u32> {
        self.index.edge_id(u, v).map(|id| self.edge_trussness[id])
    }

    /// Edge trussness keyed by the canonical `(min, max)` edge key
    pub fn edge_trussness_by_key(&self) -> HashMap<u64, u32> {
        let codec = EdgeCodec::for_node_count(self.vertex_trussness.len());
        self.edges()
            .iter()
            .zip(&self.edge_trussness)
            .map(|(&(u, v), &t)| (codec.encode_unchecked(u, v), t))
            .collect()
    }

    pub fn max_trussness(&self) -> u32 {
        self.edge_trussness.iter().copied().max().unwrap_or(0)
    }
}

/// Compute the trussness of every edge and vertex.
///
/// For `t = 2, 3, ...` every live edge whose support is at most `t - 2` is
/// peeled with trussness `t`. Peeling `{s, r}` destroys each triangle
/// `s-r-w` whose other two edges are still live, lowering both of their
/// supports; an edge whose support reaches exactly `t - 2` joins the next
/// wave at the same `t`.
pub fn truss_decomposition(graph: &CompressedGraph, progress: &dyn Progress) -> Result<TrussDecomposition> {
    let n = graph.node_count();
    let index = EdgeIndex::build(graph)?;
    let m = index.len();
    log::info!("Computing truss decomposition of {} edges", m);

    let mut support = edge_support(graph, &index);
    let mut trussness = vec![0u32; m];
    let mut alive = vec![true; m];
    let mut remaining = m;

    let max_support = support.iter().copied().max().unwrap_or(0) as usize;
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); max_support + 1];
    for (e, &s) in support.iter().enumerate() {
        buckets[s as usize].push(e);
    }

    let mut t: u32 = 2;
    while remaining > 0 {
        progress.report("truss", (m - remaining) as u64, m as u64);
        let floor = t - 2;

        let mut wave: Vec<usize> = buckets
            .get_mut(floor as usize)
            .map(std::mem::take)
            .unwrap_or_default()
            .into_iter()
            .filter(|&e| alive[e] && support[e] == floor)
            .collect();

        while !wave.is_empty() {
            let mut next = Vec::new();
            for &e in &wave {
                let (s, r) = index.edges()[e];
                for_each_triangle(graph, &index, s as usize, r as usize, |e_s, e_r| {
                    if !(alive[e_s] && alive[e_r]) {
                        return;
                    }
                    for f in [e_r, e_s] {
                        support[f] -= 1;
                        if support[f] == floor {
                            next.push(f);
                        } else if support[f] > floor {
                            buckets[support[f] as usize].push(f);
                        }
                    }
                });
                alive[e] = false;
                trussness[e] = t;
                remaining -= 1;
            }
            wave = next;
        }

        t += 1;
    }
    progress.report("truss", m as u64, m as u64);

    let mut vertex_trussness = vec![0u32; n];
    for (&(u, v), &t) in index.edges().iter().zip(&trussness) {
        vertex_trussness[u as usize] = vertex_trussness[u as usize].max(t);
        vertex_trussness[v as usize] = vertex_trussness[v as usize].max(t);
    }

    log::info!(
        "Truss decomposition computed, max trussness {}",
        trussness.iter().copied().max().unwrap_or(0)
    );

    Ok(TrussDecomposition {
        index,
        edge_trussness: trussness,
        vertex_trussness,
    })
}
