//! Core decomposition by vertex peeling

use crate::graph::CompressedGraph;
use crate::progress::Progress;

/// Compute the coreness of every vertex.
///
/// For `k = 1, 2, ...` every live vertex whose remaining degree drops below
/// `k` is peeled with coreness `k - 1`; peeling a vertex lowers the degree
/// of its live neighbors, which may pull them into the next wave at the
/// same `k`. Vertices are queued in per-degree buckets that are refreshed
/// whenever a degree changes, so each threshold only looks at vertices
/// whose degree is exactly `k - 1`. Total work is O(n + m).
pub fn core_decomposition(graph: &CompressedGraph, progress: &dyn Progress) -> Vec<u32> {
    let n = graph.node_count();
    log::info!("Computing core decomposition of {} vertices", n);

    let mut upper: Vec<u32> = (0..n).map(|v| graph.degree(v) as u32).collect();
    let mut coreness = vec![0u32; n];
    let mut alive = vec![true; n];
    let mut remaining = n;

    // buckets[d] holds vertices whose upper bound was d when they were queued;
    // stale entries are filtered when the bucket is drained.
    let mut buckets: Vec<Vec<u32>> = vec![Vec::new(); graph.max_degree() + 1];
    for (v, &d) in upper.iter().enumerate() {
        buckets[d as usize].push(v as u32);
    }

    let mut k: u32 = 1;
    while remaining > 0 {
        progress.report("core", (n - remaining) as u64, n as u64);

        // Every live vertex has upper >= k - 1 here, so the initial wave is
        // exactly the live vertices sitting at k - 1.
        let mut wave: Vec<u32> = buckets
            .get_mut((k - 1) as usize)
            .map(std::mem::take)
            .unwrap_or_default()
            .into_iter()
            .filter(|&v| alive[v as usize] && upper[v as usize] == k - 1)
            .collect();

        while !wave.is_empty() {
            let mut next = Vec::new();
            for &v in &wave {
                let v = v as usize;
                for &j in graph.neighbors(v) {
                    let j = j as usize;
                    if !alive[j] {
                        continue;
                    }
                    upper[j] -= 1;
                    if upper[j] == k - 1 {
                        next.push(j as u32);
                    } else if upper[j] >= k {
                        buckets[upper[j] as usize].push(j as u32);
                    }
                }
                alive[v] = false;
                coreness[v] = k - 1;
                remaining -= 1;
            }
            wave = next;
        }

        k += 1;
    }

    progress.report("core", n as u64, n as u64);
    log::info!(
        "Core decomposition computed, degeneracy {}",
        coreness.iter().copied().max().unwrap_or(0)
    );
    coreness
}
