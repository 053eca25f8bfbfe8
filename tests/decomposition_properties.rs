use graph_core_analyzer::anomaly::find_densest_undirected;
use graph_core_analyzer::decomposition::{core_decomposition, truss_decomposition};
use graph_core_analyzer::graph::extract_k_core;
use graph_core_analyzer::{CompressedGraph, NoProgress};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_graph() -> impl Strategy<Value = CompressedGraph> {
    (1usize..24).prop_flat_map(|n| {
        prop::collection::vec((0..n as u32, 0..n as u32), 0..n * 4)
            .prop_map(move |edges| CompressedGraph::from_edges(n, &edges))
    })
}

/// Vertices surviving repeated removal of vertices with degree < k
fn naive_k_core(graph: &CompressedGraph, k: usize) -> BTreeSet<u32> {
    let mut alive: BTreeSet<u32> = (0..graph.node_count() as u32).collect();
    loop {
        let doomed: Vec<u32> = alive
            .iter()
            .copied()
            .filter(|&v| {
                graph
                    .neighbors(v as usize)
                    .iter()
                    .filter(|&&u| alive.contains(&u))
                    .count()
                    < k
            })
            .collect();
        if doomed.is_empty() {
            return alive;
        }
        for v in doomed {
            alive.remove(&v);
        }
    }
}

fn all_edges(graph: &CompressedGraph) -> BTreeSet<(u32, u32)> {
    (0..graph.node_count())
        .flat_map(|u| {
            graph
                .neighbors(u)
                .iter()
                .filter(move |&&v| (u as u32) < v)
                .map(move |&v| (u as u32, v))
        })
        .collect()
}

fn triangles_within(edges: &BTreeSet<(u32, u32)>, u: u32, v: u32, n: u32) -> usize {
    let has = |a: u32, b: u32| edges.contains(&(a.min(b), a.max(b)));
    (0..n).filter(|&w| w != u && w != v && has(u, w) && has(v, w)).count()
}

/// Edges surviving repeated removal of edges in fewer than t - 2 triangles
fn naive_k_truss(graph: &CompressedGraph, t: usize) -> BTreeSet<(u32, u32)> {
    let n = graph.node_count() as u32;
    let mut alive = all_edges(graph);
    loop {
        let doomed: Vec<(u32, u32)> = alive
            .iter()
            .copied()
            .filter(|&(u, v)| triangles_within(&alive, u, v, n) + 2 < t)
            .collect();
        if doomed.is_empty() {
            return alive;
        }
        for e in doomed {
            alive.remove(&e);
        }
    }
}

proptest! {
    #[test]
    fn coreness_matches_maximal_k_cores(graph in arb_graph()) {
        let coreness = core_decomposition(&graph, &NoProgress);
        for k in 0..=graph.max_degree() + 1 {
            let expected = naive_k_core(&graph, k);
            let actual: BTreeSet<u32> = (0..graph.node_count() as u32)
                .filter(|&v| coreness[v as usize] as usize >= k)
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn k_core_subgraph_has_min_degree_k(graph in arb_graph(), k in 0u32..5) {
        let coreness = core_decomposition(&graph, &NoProgress);
        let core = extract_k_core(&graph, &coreness, k).unwrap();
        core.graph.validate().unwrap();
        for v in 0..core.graph.node_count() {
            prop_assert!(core.graph.degree(v) >= k as usize);
        }
        for (new, &orig) in core.index_to_original.iter().enumerate() {
            prop_assert!(coreness[orig as usize] >= k);
            let mapped: Vec<u32> = core.graph.neighbors(new).iter()
                .map(|&x| core.index_to_original[x as usize]).collect();
            let kept: Vec<u32> = graph.neighbors(orig as usize).iter().copied()
                .filter(|&x| coreness[x as usize] >= k).collect();
            prop_assert_eq!(mapped, kept);
        }
    }

    #[test]
    fn trussness_matches_maximal_k_trusses(graph in arb_graph()) {
        let truss = truss_decomposition(&graph, &NoProgress).unwrap();
        let max_t = truss.max_trussness() as usize;
        for t in 2..=max_t + 1 {
            let expected = naive_k_truss(&graph, t);
            let actual: BTreeSet<(u32, u32)> = truss.edges().iter().copied()
                .zip(truss.edge_trussness().iter().copied())
                .filter(|&(_, tr)| tr as usize >= t)
                .map(|(e, _)| e)
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn truss_edges_have_enough_triangles(graph in arb_graph()) {
        let truss = truss_decomposition(&graph, &NoProgress).unwrap();
        let n = graph.node_count() as u32;
        for (&(u, v), &t) in truss.edges().iter().zip(truss.edge_trussness()) {
            let within: BTreeSet<(u32, u32)> = truss.edges().iter().copied()
                .zip(truss.edge_trussness().iter().copied())
                .filter(|&(_, other)| other >= t)
                .map(|(e, _)| e)
                .collect();
            prop_assert!(triangles_within(&within, u, v, n) + 2 >= t as usize);
        }
    }

    #[test]
    fn decompositions_are_idempotent(graph in arb_graph()) {
        prop_assert_eq!(
            core_decomposition(&graph, &NoProgress),
            core_decomposition(&graph, &NoProgress)
        );
        let first = truss_decomposition(&graph, &NoProgress).unwrap();
        let second = truss_decomposition(&graph, &NoProgress).unwrap();
        prop_assert_eq!(first.vertex_trussness(), second.vertex_trussness());
        prop_assert_eq!(first.edge_trussness(), second.edge_trussness());
    }

    #[test]
    fn dense_block_density_matches_its_members(graph in arb_graph()) {
        let block = find_densest_undirected(&graph, None).unwrap();
        if block.node_count() == 0 {
            prop_assert_eq!(graph.node_count(), 0);
        } else {
            let rows: BTreeSet<u32> = block.rows.iter().copied().collect();
            let cols: BTreeSet<u32> = block.cols.iter().copied().collect();
            let incidences: usize = rows.iter()
                .map(|&r| graph.neighbors(r as usize).iter().filter(|&&c| cols.contains(&c)).count())
                .sum();
            let expected = incidences as f64 / block.node_count() as f64;
            prop_assert!((block.density - expected).abs() < 1e-9);

            // never worse than the whole graph
            let whole = graph.adjacency_len() as f64 / (2 * graph.node_count()) as f64;
            prop_assert!(block.density + 1e-9 >= whole);
        }
    }
}

#[test]
fn scenario_clique_and_isolated_vertex() {
    let graph = CompressedGraph::from_edges(5, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    assert_eq!(core_decomposition(&graph, &NoProgress), vec![3, 3, 3, 3, 0]);
    let truss = truss_decomposition(&graph, &NoProgress).unwrap();
    assert_eq!(&truss.vertex_trussness()[..4], &[4, 4, 4, 4]);
}

#[test]
fn scenario_star() {
    let edges: Vec<(u32, u32)> = (1..=9).map(|leaf| (0, leaf)).collect();
    let graph = CompressedGraph::from_edges(10, &edges);
    assert_eq!(core_decomposition(&graph, &NoProgress), vec![1; 10]);
}
