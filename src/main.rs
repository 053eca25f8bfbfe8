use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use graph_core_analyzer::anomaly::find_densest_undirected;
use graph_core_analyzer::config::DEFAULT_PARTITION_THRESHOLD;
use graph_core_analyzer::data::{self, weights};
use graph_core_analyzer::decomposition::{core_decomposition, truss_decomposition};
use graph_core_analyzer::graph::{degeneracy_core, extract_k_core};
use graph_core_analyzer::storage;
use graph_core_analyzer::{Config, Delimiter, LogProgress};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[clap(
    name = "graph-core-analyzer",
    about = "k-core, k-truss and dense-block analysis of large undirected graphs"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0", global = true)]
    threads: usize,

    /// Edge count at which loading switches to disk partitions
    #[clap(long, default_value_t = DEFAULT_PARTITION_THRESHOLD, global = true)]
    partition_threshold: u64,

    /// Merge disk partitions in parallel
    #[clap(long, global = true)]
    parallel_merge: bool,

    /// Directory for temporary partition files
    #[clap(long, global = true)]
    temp_dir: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[clap(long, global = true)]
    summary: Option<PathBuf>,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Path to the input edge list
    input: PathBuf,

    /// Path of the output file
    output: PathBuf,

    /// Input delimiter: tab, space or comma
    #[clap(default_value = "tab")]
    delimiter: String,
}

impl IoArgs {
    /// Resolve the delimiter name; an unknown name prints usage and exits with status 2
    fn delimiter(&self) -> Delimiter {
        match self.delimiter.parse::<Delimiter>() {
            Ok(delimiter) => delimiter,
            Err(e) => {
                eprintln!("error: {}\n\n{}", e, Cli::command().render_usage());
                std::process::exit(2);
            }
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Coreness of every vertex
    Core(IoArgs),

    /// Trussness of every vertex
    Truss(IoArgs),

    /// Export the induced k-core subgraph as an edge list
    Kcore {
        #[clap(flatten)]
        io: IoArgs,

        /// Coreness threshold (defaults to the degeneracy)
        #[clap(long)]
        k: Option<u32>,

        /// Also write `new_index<delim>original_index` to this path
        #[clap(long)]
        index_output: Option<PathBuf>,
    },

    /// Vertices of the densest block found by greedy peeling
    Dsm {
        #[clap(flatten)]
        io: IoArgs,

        /// Per-vertex suspiciousness scores (`vertex<delim>score` lines)
        #[clap(long)]
        weights: Option<PathBuf>,

        /// Multiplier applied to every score (must be >= 0, default 1)
        #[clap(long, allow_negative_numbers = true)]
        weight: Option<f64>,
    },
}

impl Command {
    fn io(&self) -> &IoArgs {
        match self {
            Command::Core(io) | Command::Truss(io) => io,
            Command::Kcore { io, .. } | Command::Dsm { io, .. } => io,
        }
    }
}

impl Cli {
    fn config(&self, delimiter: Delimiter) -> Config {
        let mut config = Config::new(delimiter)
            .with_partition_threshold(self.partition_threshold)
            .with_parallel_merge(self.parallel_merge);
        if let Some(dir) = &self.temp_dir {
            config = config.with_temp_dir(dir);
        }
        config
    }
}

fn run_core(cli: &Cli, io: &IoArgs, delimiter: Delimiter) -> Result<Value> {
    let config = cli.config(delimiter);
    let graph = data::load(&io.input, &config, &LogProgress)?;
    let coreness = core_decomposition(&graph, &LogProgress);
    storage::save_scores(&io.output, &coreness, config.output_delimiter)?;

    Ok(json!({
        "command": "core",
        "graph": graph.stats(),
        "degeneracy": coreness.iter().copied().max().unwrap_or(0),
        "distribution": storage::score_distribution(&coreness),
    }))
}

fn run_truss(cli: &Cli, io: &IoArgs, delimiter: Delimiter) -> Result<Value> {
    let config = cli.config(delimiter);
    let graph = data::load(&io.input, &config, &LogProgress)?;
    let truss = truss_decomposition(&graph, &LogProgress)?;
    storage::save_scores(&io.output, truss.vertex_trussness(), config.output_delimiter)?;

    Ok(json!({
        "command": "truss",
        "graph": graph.stats(),
        "max_trussness": truss.max_trussness(),
        "distribution": storage::score_distribution(truss.vertex_trussness()),
    }))
}

fn run_kcore(
    cli: &Cli,
    io: &IoArgs,
    delimiter: Delimiter,
    k: Option<u32>,
    index_output: Option<&PathBuf>,
) -> Result<Value> {
    let config = cli.config(delimiter);
    let graph = data::load(&io.input, &config, &LogProgress)?;
    let coreness = core_decomposition(&graph, &LogProgress);
    let core = match k {
        Some(k) => extract_k_core(&graph, &coreness, k)?,
        None => degeneracy_core(&graph, &coreness)?,
    };

    storage::save_edge_list(&io.output, &core.graph, config.output_delimiter)?;
    if let Some(path) = index_output {
        storage::save_index_map(path, &core.index_to_original, config.output_delimiter)?;
    }

    Ok(json!({
        "command": "kcore",
        "graph": graph.stats(),
        "k": core.k,
        "core": core.graph.stats(),
    }))
}

fn run_dsm(
    cli: &Cli,
    io: &IoArgs,
    delimiter: Delimiter,
    weights_path: Option<&PathBuf>,
    weight: Option<f64>,
) -> Result<Value> {
    if let Some(scale) = weight {
        weights::validate_scale(scale)?;
        if weights_path.is_none() {
            log::warn!("--weight {} has no effect without --weights", scale);
        }
    }
    let config = cli.config(delimiter);
    let graph = data::load(&io.input, &config, &LogProgress)?;

    let node_weights = match weights_path {
        Some(path) => Some(weights::load_weights(
            path,
            delimiter,
            graph.node_count(),
            weight.unwrap_or(1.0),
        )?),
        None => None,
    };
    let block = find_densest_undirected(&graph, node_weights.as_deref())?;
    let vertices = block.vertices();
    storage::save_vertex_list(&io.output, &vertices)?;

    Ok(json!({
        "command": "dsm",
        "graph": graph.stats(),
        "rows": block.rows.len(),
        "cols": block.cols.len(),
        "vertices": vertices.len(),
        "density": block.density,
    }))
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();
    let delimiter = args.command.io().delimiter();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let started = Instant::now();
    let mut summary = match &args.command {
        Command::Core(io) => run_core(&args, io, delimiter)?,
        Command::Truss(io) => run_truss(&args, io, delimiter)?,
        Command::Kcore { io, k, index_output } => {
            run_kcore(&args, io, delimiter, *k, index_output.as_ref())?
        }
        Command::Dsm { io, weights, weight } => {
            run_dsm(&args, io, delimiter, weights.as_ref(), *weight)?
        }
    };

    let elapsed = started.elapsed();
    log::info!("Analysis complete in {:.2?}", elapsed);

    if let Some(path) = &args.summary {
        summary["elapsed_ms"] = json!(elapsed.as_millis() as u64);
        storage::save_summary(path, &summary)?;
    }

    Ok(())
}
