//! Per-vertex suspiciousness weights for the densest-subgraph miner

use crate::config::Delimiter;
use crate::data::edge_list::COMMENT_PREFIXES;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Check the multiplier applied to every weight; it must be finite and non-negative
pub fn validate_scale(scale: f64) -> Result<()> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(Error::Config(format!(
            "weight must be a finite number >= 0, got {}",
            scale
        )));
    }
    Ok(())
}

/// Read `<vertex><delim><score>` lines into a vector of length `node_count`.
///
/// Each score is multiplied by `scale`. Vertices without a line get 0 and
/// comment lines are skipped. Empty lines are malformed, and vertices
/// outside the graph are rejected.
pub fn load_weights(path: &Path, delimiter: Delimiter, node_count: usize, scale: f64) -> Result<Vec<f64>> {
    validate_scale(scale)?;
    let file = File::open(path).map_err(Error::io_at(path))?;
    let reader = BufReader::new(file);
    let delim = delimiter.as_char();

    let mut weights = vec![0.0; node_count];
    for (i, line) in reader.lines().enumerate() {
        let line_no = i as u64 + 1;
        let line = line.map_err(Error::io_at(path))?;
        let line = line.trim_end_matches('\r');
        if COMMENT_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }

        let mut tokens = line.split(delim);
        let vertex_token = tokens.next().unwrap_or_default();
        let score_token = tokens
            .next()
            .ok_or_else(|| Error::parse(line_no, "missing score"))?;
        let vertex: usize = vertex_token
            .parse()
            .map_err(|_| Error::parse(line_no, format!("invalid vertex id '{}'", vertex_token)))?;
        let score: f64 = score_token
            .parse()
            .map_err(|_| Error::parse(line_no, format!("invalid score '{}'", score_token)))?;
        if !score.is_finite() {
            return Err(Error::parse(line_no, format!("score '{}' is not finite", score_token)));
        }

        let slot = weights.get_mut(vertex).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "weight for vertex {} but the graph has {} vertices",
                vertex, node_count
            ))
        })?;
        *slot = score * scale;
    }

    log::info!("Loaded weights from {}", path.display());
    Ok(weights)
}
