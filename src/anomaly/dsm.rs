//! Densest-subgraph mining by greedy weighted peeling

use crate::anomaly::heap::IndexedMinHeap;
use crate::error::{Error, Result};
use crate::graph::CompressedGraph;
use serde::Serialize;

/// Densest block found by the peel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenseBlock {
    /// Row members, most recently peeled first
    pub rows: Vec<u32>,

    /// Column members, most recently peeled first
    pub cols: Vec<u32>,

    /// (node weight + incident edges) / node count of the block
    pub density: f64,
}

impl DenseBlock {
    /// Distinct vertex ids across both sides, ascending
    pub fn vertices(&self) -> Vec<u32> {
        let mut all: Vec<u32> = self.rows.iter().chain(&self.cols).copied().collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    pub fn node_count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Row,
    Col,
}

fn initial_weights(count: usize, weights: Option<&[f64]>, side: &str) -> Result<Vec<f64>> {
    match weights {
        None => Ok(vec![0.0; count]),
        Some(w) if w.len() != count => Err(Error::InvalidArgument(format!(
            "{} weights have {} entries for {} nodes",
            side,
            w.len(),
            count
        ))),
        Some(w) => {
            if let Some(bad) = w.iter().position(|x| !x.is_finite()) {
                return Err(Error::InvalidArgument(format!(
                    "{} weight of node {} is not finite",
                    side, bad
                )));
            }
            Ok(w.to_vec())
        }
    }
}

/// Greedy 2-approximation of the densest block of a bipartite incidence.
///
/// `graph` lists the columns of every row and `transpose` the rows of every
/// column. Each node starts at its external weight plus its incident edge
/// count. The node with the smallest current weight is removed repeatedly
/// (rows win ties), lowering every live neighbor on the other side by one.
/// The block is the node set with the highest
/// `(remaining weight) / (remaining node count)` seen along the way, the
/// full node set included.
pub fn find_densest(
    graph: &CompressedGraph,
    transpose: &CompressedGraph,
    row_weights: Option<&[f64]>,
    col_weights: Option<&[f64]>,
) -> Result<DenseBlock> {
    let num_rows = graph.node_count();
    let num_cols = transpose.node_count();
    if graph.adjacency_len() != transpose.adjacency_len() {
        return Err(Error::InvalidArgument(format!(
            "graph has {} incidences but its transpose has {}",
            graph.adjacency_len(),
            transpose.adjacency_len()
        )));
    }

    let mut row_degree = initial_weights(num_rows, row_weights, "row")?;
    let mut col_degree = initial_weights(num_cols, col_weights, "column")?;
    let mut remaining_weight: f64 = row_degree.iter().sum::<f64>() + col_degree.iter().sum::<f64>();

    for src in 0..num_rows {
        for &dst in graph.neighbors(src) {
            let col = col_degree.get_mut(dst as usize).ok_or_else(|| {
                Error::InvalidArgument(format!("row {} points at missing column {}", src, dst))
            })?;
            *col += 1.0;
            row_degree[src] += 1.0;
        }
    }
    for col in 0..num_cols {
        if let Some(&row) = transpose.neighbors(col).iter().find(|&&r| r as usize >= num_rows) {
            return Err(Error::InvalidArgument(format!(
                "column {} points at missing row {}",
                col, row
            )));
        }
    }
    remaining_weight += graph.adjacency_len() as f64;

    let mut row_heap = IndexedMinHeap::new(num_rows);
    for (i, &w) in row_degree.iter().enumerate() {
        row_heap.insert(i as u32, w);
    }
    let mut col_heap = IndexedMinHeap::new(num_cols);
    for (j, &w) in col_degree.iter().enumerate() {
        col_heap.insert(j as u32, w);
    }

    let total = num_rows + num_cols;
    let mut order: Vec<(Side, u32)> = Vec::with_capacity(total);
    let mut row_removed = vec![false; num_rows];
    let mut col_removed = vec![false; num_cols];

    let mut remaining = total;
    let mut best_count = total;
    let mut best_density = if total > 0 {
        remaining_weight / total as f64
    } else {
        0.0
    };

    while remaining > 0 {
        let side = match (row_heap.peek(), col_heap.peek()) {
            (Some((_, r)), Some((_, c))) if r <= c => Side::Row,
            (Some(_), None) => Side::Row,
            _ => Side::Col,
        };
        let popped = match side {
            Side::Row => row_heap.poll(),
            Side::Col => col_heap.poll(),
        };
        let Some((node, weight)) = popped else {
            break;
        };

        remaining_weight -= weight;
        remaining -= 1;
        order.push((side, node));

        if remaining > 0 {
            let density = remaining_weight / remaining as f64;
            if density > best_density {
                best_density = density;
                best_count = remaining;
            }
        }

        match side {
            Side::Row => {
                row_removed[node as usize] = true;
                for &dst in graph.neighbors(node as usize) {
                    if !col_removed[dst as usize] {
                        if let Some(p) = col_heap.priority(dst) {
                            col_heap.refresh_priority(dst, p - 1.0);
                        }
                    }
                }
            }
            Side::Col => {
                col_removed[node as usize] = true;
                for &dst in transpose.neighbors(node as usize) {
                    if !row_removed[dst as usize] {
                        if let Some(p) = row_heap.priority(dst) {
                            row_heap.refresh_priority(dst, p - 1.0);
                        }
                    }
                }
            }
        }
    }

    let mut rows = Vec::new();
    let mut cols = Vec::new();
    for &(side, node) in order.iter().rev().take(best_count) {
        match side {
            Side::Row => rows.push(node),
            Side::Col => cols.push(node),
        }
    }

    log::info!(
        "Densest block has {} rows and {} columns, density {:.4}",
        rows.len(),
        cols.len(),
        best_density
    );

    Ok(DenseBlock {
        rows,
        cols,
        density: best_density,
    })
}

/// Densest block of an undirected graph, used as its own transpose
pub fn find_densest_undirected(graph: &CompressedGraph, weights: Option<&[f64]>) -> Result<DenseBlock> {
    find_densest(graph, graph, weights, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_keeps_every_node_on_both_sides() {
        let graph = CompressedGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]);
        let block = find_densest_undirected(&graph, None).unwrap();

        let mut rows = block.rows.clone();
        let mut cols = block.cols.clone();
        rows.sort_unstable();
        cols.sort_unstable();
        assert_eq!(rows, vec![0, 1, 2]);
        assert_eq!(cols, vec![0, 1, 2]);

        let incidences = graph.adjacency_len() as f64;
        let expected = incidences / block.node_count() as f64;
        assert!((block.density - expected).abs() < 1e-12);
    }

    #[test]
    fn dense_clique_beats_sparse_tail() {
        // 4-clique {0,1,2,3} with a long path 3-4-5-6-7
        let graph = CompressedGraph::from_edges(
            8,
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7)],
        );
        let block = find_densest_undirected(&graph, None).unwrap();
        assert_eq!(block.vertices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn node_weights_pull_suspicious_nodes_in() {
        let graph = CompressedGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let weights = vec![0.0, 0.0, 0.0, 50.0];
        let block = find_densest_undirected(&graph, Some(&weights)).unwrap();
        assert!(block.rows.contains(&3));
        assert!(block.cols.contains(&3));
    }

    #[test]
    fn bipartite_rows_and_columns_differ() {
        // rows 0..3, cols 0..2; rows 0 and 1 hit both columns
        let rows = CompressedGraph::from_sorted_lists(vec![vec![0, 1], vec![0, 1], vec![1]]);
        let cols = rows.transpose(2).unwrap();
        let block = find_densest(&rows, &cols, None, None).unwrap();

        let mut picked_rows = block.rows.clone();
        picked_rows.sort_unstable();
        assert!(picked_rows.starts_with(&[0, 1]));
        assert_eq!(block.cols.len(), 2);
    }

    #[test]
    fn weight_length_mismatch_is_rejected() {
        let graph = CompressedGraph::from_edges(3, &[(0, 1)]);
        let err = find_densest_undirected(&graph, Some(&[1.0])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = find_densest_undirected(&graph, Some(&[1.0, f64::INFINITY, 0.0])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn empty_graph_gives_empty_block() {
        let graph = CompressedGraph::empty(0);
        let block = find_densest_undirected(&graph, None).unwrap();
        assert_eq!(block.node_count(), 0);
    }
}
