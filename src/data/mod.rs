//! Input ingestion: edge lists (in-memory and out-of-core) and node weights

pub mod edge_list;
pub mod partition;
pub mod weights;

pub use edge_list::{load, load_in_memory, load_out_of_core, scan, LoadStats};
pub use weights::load_weights;
