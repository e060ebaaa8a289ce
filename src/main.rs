use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};

use serverless_constant_inputs::{apply_constant_inputs, Format, ServerlessDescriptor};

/// Inject constant schedule inputs into a serverless deployment descriptor
#[derive(Parser)]
#[command(name = "serverless-constant-inputs")]
#[command(
    about = "Synthesize schedule-input resources into a deployment descriptor",
    long_about = None
)]
struct Cli {
    /// Deployment descriptor to transform (YAML or JSON)
    #[arg(default_value = "serverless.yml")]
    path: PathBuf,

    /// Write the transformed descriptor here instead of rewriting in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the transformed descriptor to stdout without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so --dry-run output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut descriptor = ServerlessDescriptor::from_path(&cli.path)
        .with_context(|| format!("failed to load descriptor from {}", cli.path.display()))?;

    apply_constant_inputs(&mut descriptor);

    if cli.dry_run {
        let format = Format::for_path(&cli.path)?;
        print!("{}", descriptor.render(format)?);
        return Ok(());
    }

    let target = cli.output.as_ref().unwrap_or(&cli.path);
    descriptor
        .to_path(target)
        .with_context(|| format!("failed to write descriptor to {}", target.display()))?;
    debug!("wrote transformed descriptor to {}", target.display());
    Ok(())
}
