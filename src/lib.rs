//! Core library functions for the graph core analyzer
//!
//! Loads large undirected edge lists, computes k-core and k-truss
//! decompositions by peeling, extracts induced k-core subgraphs and mines
//! dense blocks for anomaly detection.

pub mod anomaly;
pub mod config;
pub mod data;
pub mod decomposition;
pub mod error;
pub mod graph;
pub mod progress;
pub mod storage;

pub use config::{Config, Delimiter};
pub use error::{Error, Result};
pub use graph::CompressedGraph;
pub use progress::{LogProgress, NoProgress, Progress};
