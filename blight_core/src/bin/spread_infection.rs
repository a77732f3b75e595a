use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use blight_core::{
    default_data_dir, load_engine_config_from_env, load_input_tables, parse_world_width,
    run_spread, write_result, OutputFormat, SpreadParams,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Resolve one step of blight infection pressure", long_about = None)]
struct Cli {
    /// Width of the toroidal world, in trees.
    world_width: String,
    /// Directory holding the input tables. Defaults to the executable's directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Output encoding written to stdout.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Ring worker pool size, overriding the engine config.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let world_width = parse_world_width(&cli.world_width)?;
    let params = SpreadParams::new(world_width)?;
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let tables = load_input_tables(&data_dir)
        .with_context(|| format!("loading input tables from {}", data_dir.display()))?;

    let (config, config_path) = load_engine_config_from_env();
    let config = config.with_worker_threads(cli.threads);
    info!(
        target: "blight::cli",
        data_dir = %data_dir.display(),
        config = ?config_path,
        format = %cli.format,
        "spread_infection.ready"
    );

    let outcome = run_spread(&tables, &params, &config)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_result(&mut handle, &outcome.result, cli.format)?;
    Ok(())
}
