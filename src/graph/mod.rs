//! Graph representation and subgraph extraction

pub mod builder;
pub mod compressed;
pub mod edge_key;
pub mod subgraph;

pub use builder::GraphBuilder;
pub use compressed::{CompressedGraph, GraphStats};
pub use edge_key::EdgeCodec;
pub use subgraph::{degeneracy_core, extract_k_core, KCoreSubgraph};
