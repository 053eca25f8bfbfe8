//! Out-of-core loading through disk partitions
//!
//! Every directed half `(a, b)` of an input edge is encoded as
//! `a * base + b` and appended to partition `a % P`. A partition therefore
//! holds the complete neighbor list of each vertex it owns, and can be
//! sorted, deduplicated and grouped on its own. Peak memory is bounded by
//! the largest partition rather than by the whole graph.

use crate::config::Config;
use crate::data::edge_list::{for_each_edge, LoadStats};
use crate::error::{Error, Result};
use crate::graph::{CompressedGraph, EdgeCodec};
use crate::progress::Progress;
use itertools::Itertools;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RECORD_BYTES: usize = 8;

/// Number of partitions for `edges` input edges: `ceil(edges / threshold) + 1`
pub fn partition_count(edges: u64, threshold: u64) -> usize {
    (edges.div_ceil(threshold.max(1)) + 1) as usize
}

/// A written partition; the file is removed when this is dropped
#[derive(Debug)]
struct PartitionFile {
    path: PathBuf,
    records: u64,
}

impl Drop for PartitionFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove partition {}: {}", self.path.display(), e);
            }
        }
    }
}

fn create_partition_dir(config: &Config) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("graph-partitions-");
    let dir = config.temp_dir.clone().unwrap_or_else(std::env::temp_dir);
    builder.tempdir_in(&dir).map_err(Error::io_at(&dir))
}

/// Partition pass: split both halves of every edge across `count` files
fn write_partitions(
    input: &Path,
    config: &Config,
    codec: &EdgeCodec,
    count: usize,
    dir: &Path,
) -> Result<Vec<PartitionFile>> {
    let mut files = Vec::with_capacity(count);
    let mut writers = Vec::with_capacity(count);
    for i in 0..count {
        let path = dir.join(format!("part_{}", i));
        let file = File::create(&path).map_err(Error::io_at(&path))?;
        writers.push(BufWriter::new(file));
        files.push(PartitionFile { path, records: 0 });
    }

    let modulus = count as u32;
    for_each_edge(input, config.delimiter.as_char(), |src, trg| {
        for (a, b) in [(src, trg), (trg, src)] {
            let slot = (a % modulus) as usize;
            let key = codec.encode(a, b)?;
            writers[slot]
                .write_all(&key.to_be_bytes())
                .map_err(Error::io_at(&files[slot].path))?;
            files[slot].records += 1;
        }
        Ok(())
    })?;

    for (writer, file) in writers.iter_mut().zip(&files) {
        writer.flush().map_err(Error::io_at(&file.path))?;
    }

    Ok(files)
}

/// Merge pass for one partition: returns `(vertex, sorted neighbors)` pairs
fn merge_partition(file: PartitionFile, codec: &EdgeCodec) -> Result<Vec<(u32, Vec<u32>)>> {
    if file.records == 0 {
        return Ok(Vec::new());
    }

    let mut keys = Vec::with_capacity(file.records as usize);
    {
        let handle = File::open(&file.path).map_err(Error::io_at(&file.path))?;
        let mut reader = BufReader::new(handle);
        let mut record = [0u8; RECORD_BYTES];
        for _ in 0..file.records {
            reader
                .read_exact(&mut record)
                .map_err(Error::io_at(&file.path))?;
            keys.push(u64::from_be_bytes(record));
        }
    }
    // Remove the file as soon as its records are in memory.
    drop(file);

    keys.sort_unstable();
    keys.dedup();

    let grouped = keys
        .into_iter()
        .map(|key| codec.decode(key))
        .group_by(|&(src, _)| src);

    let mut lists = Vec::new();
    for (src, group) in &grouped {
        lists.push((src, group.map(|(_, dst)| dst).collect()));
    }
    Ok(lists)
}

/// Load a graph through partitions, using the statistics of a finished scan pass
pub(crate) fn load_partitioned(
    input: &Path,
    config: &Config,
    scan: &LoadStats,
    progress: &dyn Progress,
) -> Result<CompressedGraph> {
    let max_id = match scan.max_id {
        Some(id) => id,
        None => return Ok(CompressedGraph::empty(0)),
    };
    let node_count = max_id as usize + 1;
    let count = partition_count(scan.edges, config.partition_threshold);
    let codec = EdgeCodec::for_max_id(max_id);

    log::info!("Splitting {} edges into {} partitions", scan.edges, count);
    log::debug!("Partition records use edge key base {}", codec.base());
    let dir = create_partition_dir(config)?;
    let files = write_partitions(input, config, &codec, count, dir.path())?;
    progress.report("partition", count as u64, count as u64);

    let mut lists: Vec<Vec<u32>> = vec![Vec::new(); node_count];
    let mut place = |merged: Vec<(u32, Vec<u32>)>| -> Result<()> {
        for (src, neighbors) in merged {
            let slot = lists.get_mut(src as usize).ok_or_else(|| {
                Error::InvalidGraph(format!("partition vertex {} exceeds max id {}", src, max_id))
            })?;
            *slot = neighbors;
        }
        Ok(())
    };

    if config.parallel_merge {
        log::info!("Merging partitions in parallel");
        let merged = files
            .into_par_iter()
            .map(|file| merge_partition(file, &codec))
            .collect::<Result<Vec<_>>>()?;
        for part in merged {
            place(part)?;
        }
        progress.report("merge", count as u64, count as u64);
    } else {
        for (i, file) in files.into_iter().enumerate() {
            place(merge_partition(file, &codec)?)?;
            progress.report("merge", i as u64 + 1, count as u64);
            log::debug!("Partition {}/{} merged", i + 1, count);
        }
    }

    let graph = CompressedGraph::from_sorted_lists(lists);
    log::info!(
        "Loaded graph with {} nodes and {} edges ({} bytes)",
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage()
    );
    Ok(graph)
}
