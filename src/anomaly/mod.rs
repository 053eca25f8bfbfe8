//! Dense-block mining for anomaly detection

pub mod dsm;
pub mod heap;

pub use dsm::{find_densest, find_densest_undirected, DenseBlock};
pub use heap::IndexedMinHeap;
