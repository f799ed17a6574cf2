use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "layermix", version, about)]
struct Cli {
    /// Log per-category scan details.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every layer combination into the output directory.
    Run(RunArgs),
    /// Print per-category variant counts and the total number of combinations.
    Count(CountArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Run configuration (TOML).
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override `outputDir`.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Override `workers` (worker pool size).
    #[arg(long)]
    threads: Option<usize>,

    /// Stop after the first failed combination.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    /// Write the run report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CountArgs {
    /// Run configuration (TOML).
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Count(args) => cmd_count(args),
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &std::path::Path) -> anyhow::Result<layermix::RunConfig> {
    layermix::RunConfig::from_path(path)
        .with_context(|| format!("load config '{}'", path.display()))
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.config)?;
    if let Some(dir) = args.output_dir {
        cfg.output_dir = dir;
    }
    if args.threads.is_some() {
        cfg.workers = args.threads;
    }
    cfg.fail_fast |= args.fail_fast;
    cfg.validate()?;

    let settings = cfg.render_settings()?;
    let catalog = layermix::LayerCatalog::from_config(&cfg)?;
    let sink = layermix::DirSink::create(&cfg.output_dir)?;
    let report = layermix::generate_all(
        &catalog,
        &settings,
        &sink,
        &layermix::RunOptions::from_config(&cfg),
    )?;

    if let Some(path) = &args.report {
        let f = File::create(path)
            .with_context(|| format!("create report '{}'", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(f), &report)
            .with_context(|| format!("write report '{}'", path.display()))?;
    }

    eprintln!(
        "wrote {} of {} images to {} in {:?}",
        report.completed,
        report.total,
        cfg.output_dir.display(),
        report.elapsed
    );

    if !report.failures.is_empty() {
        for failure in &report.failures {
            eprintln!("failed #{} ({}): {}", failure.ordinal, failure.identifier, failure.error);
        }
        anyhow::bail!(
            "{} of {} combinations failed",
            report.failures.len(),
            report.total
        );
    }
    Ok(())
}

fn cmd_count(args: CountArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let catalog = layermix::LayerCatalog::from_config(&cfg)?;
    for category in catalog.categories() {
        println!("{}: {}", category.name(), category.len());
    }
    println!("total: {}", catalog.combination_count()?);
    Ok(())
}
