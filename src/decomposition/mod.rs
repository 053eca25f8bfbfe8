//! Peeling decompositions: k-core and k-truss

pub mod coreness;
pub mod trussness;

pub use coreness::core_decomposition;
pub use trussness::{edge_support, truss_decomposition, EdgeIndex, TrussDecomposition};
