use clap::{Parser, Subcommand};
use netree_common::db::core::Design;
use netree_common::db::parser::iccad;
use netree_common::util::config::Config;
use netree_common::util::profiler::ScopedTimer;
use netree_common::util::{generator, logger};
use netree_router::NetOutcome;
use netree_router::report::{self, NetReport, Summary};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Design file, overriding `input.design_file` from the config.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild every net's tree and report the outcome.
    Build {
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
        /// Write the rebuilt routes as a design-file `NumRoutes` section.
        #[arg(long, value_name = "FILE")]
        routes: Option<PathBuf>,
    },
    /// Like `build`, but exit with status 1 if any net fails.
    Check,
    /// Write a random design file.
    Generate {
        #[arg(long)]
        cells: Option<usize>,
        #[arg(long)]
        nets: Option<usize>,
        #[arg(long)]
        rows: Option<u32>,
        #[arg(long)]
        cols: Option<u32>,
        #[arg(long)]
        pins: Option<usize>,
        #[arg(long)]
        redundancy: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "inputs/random.txt")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();
    let mut config = load_config(&args.config)?;

    if let Some(input) = &args.input {
        config.input.design_file = input.to_string_lossy().into_owned();
    }

    let command = args.command.unwrap_or(Commands::Build {
        json: None,
        routes: None,
    });

    match command {
        Commands::Generate {
            cells,
            nets,
            rows,
            cols,
            pins,
            redundancy,
            seed,
            output,
        } => {
            let mut params = config.generate.clone();
            params.cells = cells.unwrap_or(params.cells);
            params.nets = nets.unwrap_or(params.nets);
            params.rows = rows.unwrap_or(params.rows);
            params.cols = cols.unwrap_or(params.cols);
            params.pins_per_net = pins.unwrap_or(params.pins_per_net);
            params.redundancy = redundancy.unwrap_or(params.redundancy);
            params.seed = seed.unwrap_or(params.seed);

            if params.pins_per_net > params.cells {
                log::warn!(
                    "Requested {} pins per net but only {} cells. Nets will use {} pins.",
                    params.pins_per_net,
                    params.cells,
                    params.cells
                );
            }

            prepare_output_dir(&output)?;
            generator::generate_random_design(&output, &params)?;
            log::info!("Generated: {}", output);
        }
        Commands::Build { json, routes } => {
            let json = json.or_else(|| config.output.tree_json.as_ref().map(PathBuf::from));
            let routes = routes.or_else(|| config.output.routes_file.as_ref().map(PathBuf::from));
            let (design, outcomes) = run_topology(&config)?;
            let summary = report::log_summary(&design, &outcomes);

            if let Some(path) = json {
                let json_report = JsonReport {
                    design: &config.input.design_file,
                    summary: &summary,
                    nets: report::net_reports(&design, &outcomes),
                };
                write_json(&json_report, &path)?;
            }
            if let Some(path) = routes {
                write_routes(&design, &outcomes, &path)?;
            }
            if !summary.all_built() {
                log::warn!("{} nets could not be reconstructed", summary.failed);
            }
        }
        Commands::Check => {
            let (design, outcomes) = run_topology(&config)?;
            let summary = report::log_summary(&design, &outcomes);
            if !summary.all_built() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            path
        );
        return Ok(Config::default());
    }

    log::info!("Loading configuration from {:?}", path);
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
    parse_config(&config_str)
}

fn parse_config(text: &str) -> anyhow::Result<Config> {
    toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
}

fn run_topology(config: &Config) -> anyhow::Result<(Design, Vec<NetOutcome>)> {
    let path = Path::new(&config.input.design_file);
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Input design file missing: {}",
            config.input.design_file
        ));
    }

    let design = {
        let _timer = ScopedTimer::new("Parsing");
        iccad::parse_file(path)?
    };

    let outcomes = {
        let _timer = ScopedTimer::new("Topology reconstruction");
        netree_router::run(&design, &config.topology)
    };
    Ok((design, outcomes))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    design: &'a str,
    summary: &'a Summary,
    nets: Vec<NetReport<'a>>,
}

fn write_json(report: &JsonReport, path: &Path) -> anyhow::Result<()> {
    prepare_output_dir(&path.to_string_lossy())?;
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", path.display(), e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    log::info!("Wrote tree report to {}", path.display());
    Ok(())
}

fn write_routes(design: &Design, outcomes: &[NetOutcome], path: &Path) -> anyhow::Result<()> {
    prepare_output_dir(&path.to_string_lossy())?;
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", path.display(), e))?;
    let count = report::write_routes(design, outcomes, BufWriter::new(file))?;
    log::info!("Wrote {} route segments to {}", count, path.display());
    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
