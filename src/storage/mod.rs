//! Results persistence module
//!
//! Every writer renders into a temporary file next to the destination and
//! renames it into place only after the whole output was written, so a
//! failed run never leaves a partial file behind.

use crate::config::Delimiter;
use crate::error::{Error, Result};
use crate::graph::CompressedGraph;
use serde_json::{to_string_pretty, Value};
use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn write_atomically<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(Error::io_at(path))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        render(&mut writer).map_err(Error::io_at(path))?;
        writer.flush().map_err(Error::io_at(path))?;
    }
    tmp.persist(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Write `<vertex><delim><score>` for every vertex in ascending order
pub fn save_scores(path: &Path, scores: &[u32], delimiter: Delimiter) -> Result<()> {
    log::info!("Exporting {} scores to {}", scores.len(), path.display());
    let delim = delimiter.as_char();
    write_atomically(path, |out| {
        for (vertex, score) in scores.iter().enumerate() {
            writeln!(out, "{}{}{}", vertex, delim, score)?;
        }
        Ok(())
    })
}

/// Write a `vertex_index` header followed by one vertex per line
pub fn save_vertex_list(path: &Path, vertices: &[u32]) -> Result<()> {
    log::info!("Exporting {} vertices to {}", vertices.len(), path.display());
    write_atomically(path, |out| {
        writeln!(out, "vertex_index")?;
        for vertex in vertices {
            writeln!(out, "{}", vertex)?;
        }
        Ok(())
    })
}

/// Write every adjacency entry as `<src><delim><dst>`
pub fn save_edge_list(path: &Path, graph: &CompressedGraph, delimiter: Delimiter) -> Result<()> {
    log::info!(
        "Exporting graph with {} nodes and {} edges to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    let delim = delimiter.as_char();
    write_atomically(path, |out| {
        for src in 0..graph.node_count() {
            for dst in graph.neighbors(src) {
                writeln!(out, "{}{}{}", src, delim, dst)?;
            }
        }
        Ok(())
    })
}

/// Write `<new_index><delim><original_index>` for an extracted subgraph
pub fn save_index_map(path: &Path, index_to_original: &[u32], delimiter: Delimiter) -> Result<()> {
    let delim = delimiter.as_char();
    write_atomically(path, |out| {
        for (index, original) in index_to_original.iter().enumerate() {
            writeln!(out, "{}{}{}", index, delim, original)?;
        }
        Ok(())
    })
}

/// Save a pretty-printed JSON run summary
pub fn save_summary(path: &Path, summary: &Value) -> Result<()> {
    log::info!("Saving summary to {}", path.display());
    let text = to_string_pretty(summary)
        .map_err(|e| Error::io_at(path)(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    write_atomically(path, |out| out.write_all(text.as_bytes()))
}

/// Number of vertices per score value, ascending by score
pub fn score_distribution(scores: &[u32]) -> BTreeMap<u32, usize> {
    let mut distribution = BTreeMap::new();
    for &score in scores {
        *distribution.entry(score).or_insert(0) += 1;
    }
    distribution
}
