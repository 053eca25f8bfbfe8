//! Text edge-list ingestion

use crate::config::Config;
use crate::data::partition;
use crate::error::{Error, Result};
use crate::graph::{CompressedGraph, GraphBuilder};
use crate::progress::Progress;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub(crate) const COMMENT_PREFIXES: [&str; 3] = ["#", "%", "//"];

/// Counters collected while reading an edge list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Physical lines read
    pub lines: u64,
    pub comments: u64,
    pub self_loops: u64,
    /// Non-self-loop edge records, duplicates included
    pub edges: u64,
    /// Largest vertex id seen in an accepted edge
    pub max_id: Option<u32>,
}

impl LoadStats {
    /// Vertex count implied by the largest accepted id
    pub fn node_count(&self) -> usize {
        self.max_id.map_or(0, |id| id as usize + 1)
    }
}

/// Classification of a single input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Record {
    Edge(u32, u32),
    Comment,
}

fn parse_id(token: &str, line_no: u64) -> Result<u32> {
    token
        .parse::<u32>()
        .map_err(|_| Error::parse(line_no, format!("invalid vertex id '{}'", token)))
}

/// Parse one line; `line_no` is 1-based and only used for error messages
pub(crate) fn parse_line(line: &str, delimiter: char, line_no: u64) -> Result<Record> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    if COMMENT_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
        return Ok(Record::Comment);
    }

    let mut tokens = line.split(delimiter);
    let src = tokens.next().unwrap_or_default();
    let trg = tokens
        .next()
        .ok_or_else(|| Error::parse(line_no, "missing second token"))?;

    Ok(Record::Edge(parse_id(src, line_no)?, parse_id(trg, line_no)?))
}

/// Stream every non-self-loop edge of the file into `on_edge`.
///
/// Comments are skipped, self-loops are counted and dropped, and the first
/// malformed line (an empty one included) aborts the whole read.
pub(crate) fn for_each_edge<F>(path: &Path, delimiter: char, mut on_edge: F) -> Result<LoadStats>
where
    F: FnMut(u32, u32) -> Result<()>,
{
    let file = File::open(path).map_err(Error::io_at(path))?;
    let mut reader = BufReader::new(file);
    let mut stats = LoadStats::default();
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line).map_err(Error::io_at(path))?;
        if read == 0 {
            break;
        }
        stats.lines += 1;

        match parse_line(&line, delimiter, stats.lines)? {
            Record::Comment => {
                stats.comments += 1;
                log::debug!("Ignoring comment line {}: {}", stats.lines, line.trim_end());
            }
            Record::Edge(src, trg) if src == trg => stats.self_loops += 1,
            Record::Edge(src, trg) => {
                stats.edges += 1;
                let larger = src.max(trg);
                stats.max_id = Some(stats.max_id.map_or(larger, |id| id.max(larger)));
                on_edge(src, trg)?;
            }
        }
    }

    Ok(stats)
}

/// Scan pass: count edges and find the largest id without retaining edges
pub fn scan(path: &Path, config: &Config) -> Result<LoadStats> {
    for_each_edge(path, config.delimiter.as_char(), |_, _| Ok(()))
}

/// Load the whole graph through per-vertex neighbor lists
pub fn load_in_memory(path: &Path, config: &Config, progress: &dyn Progress) -> Result<CompressedGraph> {
    build_in_memory(path, config, 0, progress)
}

/// In-memory load with room reserved for `capacity` vertices
fn build_in_memory(
    path: &Path,
    config: &Config,
    capacity: usize,
    progress: &dyn Progress,
) -> Result<CompressedGraph> {
    log::info!("Loading graph in memory: {}", path.display());

    let mut builder = GraphBuilder::with_capacity(capacity);
    let stats = for_each_edge(path, config.delimiter.as_char(), |src, trg| {
        builder.add_edge(src, trg);
        Ok(())
    })?;
    progress.report("load", stats.edges, stats.edges);
    log_stats(&stats);
    log::debug!(
        "Builder holds {} vertices and {} accepted edges before dedup",
        builder.node_count(),
        builder.accepted_edges()
    );

    let graph = builder.build();
    log::info!(
        "Loaded graph with {} nodes and {} edges ({} bytes)",
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage()
    );
    Ok(graph)
}

/// Load through disk partitions regardless of the input size
pub fn load_out_of_core(path: &Path, config: &Config, progress: &dyn Progress) -> Result<CompressedGraph> {
    config.validate()?;
    let stats = scan(path, config)?;
    progress.report("scan", stats.edges, 0);
    log_stats(&stats);
    partition::load_partitioned(path, config, &stats, progress)
}

/// Load a graph, switching to the out-of-core path for large inputs
pub fn load(path: &Path, config: &Config, progress: &dyn Progress) -> Result<CompressedGraph> {
    config.validate()?;

    log::info!("Scanning graph: {}", path.display());
    let stats = scan(path, config)?;
    progress.report("scan", stats.edges, 0);

    if stats.edges < config.partition_threshold {
        return build_in_memory(path, config, stats.node_count(), progress);
    }

    log_stats(&stats);
    partition::load_partitioned(path, config, &stats, progress)
}

fn log_stats(stats: &LoadStats) {
    log::info!(
        "Read {} lines: {} edges, {} self-loops dropped, {} comments",
        stats.lines,
        stats.edges,
        stats.self_loops,
        stats.comments
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Delimiter;
    use crate::progress::NoProgress;
    use std::io::Write;

    fn write_input(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_line_classifies_records() {
        assert_eq!(parse_line("1\t2", '\t', 1).unwrap(), Record::Edge(1, 2));
        assert_eq!(parse_line("1\t2\t0.5\r\n", '\t', 1).unwrap(), Record::Edge(1, 2));
        assert_eq!(parse_line("# header", '\t', 1).unwrap(), Record::Comment);
        assert_eq!(parse_line("% matrix market", '\t', 1).unwrap(), Record::Comment);
        assert_eq!(parse_line("// note", '\t', 1).unwrap(), Record::Comment);
    }

    #[test]
    fn parse_line_rejects_malformed_lines() {
        let err = parse_line("12", '\t', 4).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 4, .. }));

        assert!(matches!(parse_line("a\tb", '\t', 1), Err(Error::Parse { .. })));
        assert!(matches!(parse_line("-1\t2", '\t', 1), Err(Error::Parse { .. })));
        // wrong delimiter leaves a single token
        assert!(matches!(parse_line("1,2", '\t', 1), Err(Error::Parse { .. })));
    }

    #[test]
    fn empty_and_whitespace_lines_are_malformed() {
        for line in ["\n", "", " ", "\t", "\r\n"] {
            assert!(
                matches!(parse_line(line, '\t', 3), Err(Error::Parse { line: 3, .. })),
                "{:?} should not parse",
                line
            );
        }
    }

    #[test]
    fn blank_line_aborts_both_load_paths() {
        let input = write_input("0\t1\n\t\n1\t2\n");
        let in_memory = load(input.path(), &Config::default(), &NoProgress);
        assert!(matches!(in_memory, Err(Error::Parse { line: 2, .. })));

        let config = Config::default().with_partition_threshold(1);
        let partitioned = load_out_of_core(input.path(), &config, &NoProgress);
        assert!(matches!(partitioned, Err(Error::Parse { line: 2, .. })));
    }

    #[test]
    fn in_memory_load_builds_symmetric_graph() {
        let input = write_input("# comment\n0\t1\n1\t2\n2\t0\n1\t0\n3\t3\n5\t2\n");
        let graph = load_in_memory(input.path(), &Config::default(), &NoProgress).unwrap();

        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(2), &[0, 1, 5]);
        assert!(graph.neighbors(3).is_empty());
        assert!(graph.neighbors(4).is_empty());
        graph.validate().unwrap();
    }

    #[test]
    fn scan_counts_records() {
        let input = write_input("0,1\n% skip\n1,1\n4,2\n");
        let config = Config::new(Delimiter::Comma);
        let stats = scan(input.path(), &config).unwrap();
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.comments, 1);
        assert_eq!(stats.self_loops, 1);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.max_id, Some(4));
        assert_eq!(stats.node_count(), 5);
    }

    #[test]
    fn parse_error_aborts_load() {
        let input = write_input("0\t1\n1\n");
        let err = load(input.path(), &Config::default(), &NoProgress).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("/definitely/not/here.tsv"), &Config::default(), &NoProgress)
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn scanned_capacity_gives_same_graph() {
        let input = write_input("9\t2\n2\t4\n");
        let config = Config::default();
        let reserved = load(input.path(), &config, &NoProgress).unwrap();
        let plain = load_in_memory(input.path(), &config, &NoProgress).unwrap();
        assert_eq!(reserved, plain);
        assert_eq!(reserved.node_count(), 10);
    }

    #[test]
    fn empty_input_gives_empty_graph() {
        let input = write_input("# nothing here\n");
        let graph = load(input.path(), &Config::default(), &NoProgress).unwrap();
        assert_eq!(graph.node_count(), 0);
    }
}
