//! Induced k-core subgraph extraction

use crate::error::{Error, Result};
use crate::graph::CompressedGraph;

/// Induced subgraph together with the mapping back to the source graph
#[derive(Debug, Clone)]
pub struct KCoreSubgraph {
    /// Subgraph over dense indices `0..index_to_original.len()`
    pub graph: CompressedGraph,

    /// index_to_original[new_index] = vertex id in the source graph
    pub index_to_original: Vec<u32>,

    /// Threshold used for the selection
    pub k: u32,
}

/// Extract the subgraph induced by every vertex with `coreness >= k`.
///
/// New indices follow ascending original id. Only edges with both endpoints
/// selected are kept, so the result stays sorted and symmetric.
pub fn extract_k_core(graph: &CompressedGraph, coreness: &[u32], k: u32) -> Result<KCoreSubgraph> {
    let node_count = graph.node_count();
    if coreness.len() != node_count {
        return Err(Error::InvalidArgument(format!(
            "coreness has {} entries but the graph has {} vertices",
            coreness.len(),
            node_count
        )));
    }

    // Create mapping from original to filtered indices
    let mut orig_to_filtered = vec![u32::MAX; node_count];
    let mut index_to_original = Vec::new();
    for (node, &core) in coreness.iter().enumerate() {
        if core >= k {
            orig_to_filtered[node] = index_to_original.len() as u32;
            index_to_original.push(node as u32);
        }
    }

    let mut lists = Vec::with_capacity(index_to_original.len());
    for &node in &index_to_original {
        let list: Vec<u32> = graph
            .neighbors(node as usize)
            .iter()
            .filter_map(|&target| {
                let mapped = orig_to_filtered[target as usize];
                (mapped != u32::MAX).then_some(mapped)
            })
            .collect();
        lists.push(list);
    }

    log::debug!(
        "{}-core keeps {} of {} vertices",
        k,
        index_to_original.len(),
        node_count
    );

    Ok(KCoreSubgraph {
        // Renumbering is monotone, so filtered lists keep their order.
        graph: CompressedGraph::from_sorted_lists(lists),
        index_to_original,
        k,
    })
}

/// Extract the k-core for the largest coreness present (the degeneracy core)
pub fn degeneracy_core(graph: &CompressedGraph, coreness: &[u32]) -> Result<KCoreSubgraph> {
    let max_k = coreness.iter().copied().max().unwrap_or(0);
    extract_k_core(graph, coreness, max_k)
}
