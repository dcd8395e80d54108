mod commands;
mod formatting;
mod reporter;

use std::path::PathBuf;

use adapterpub_core::PublishMode;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "adapterpub")]
#[command(about = "Builds adapters changed by the latest commit and publishes them")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory whose immediate children are adapters
    #[arg(long, default_value = "adapters", global = true)]
    adapters_dir: PathBuf,

    /// Optional layout and toolchain settings
    #[arg(long, default_value = "adapterpub.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(short, long, action, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and publish changed (or the given) adapters
    Publish(PublishArgs),
    /// Print the adapter directories touched by the commit range
    Detect {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, action)]
        json: bool,
    },
    /// Check the metadata of changed (or the given) adapters without publishing
    Validate {
        dirs: Vec<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, action)]
        json: bool,
    },
}

/// Where the list of changed adapters comes from.
#[derive(Args, Default, Clone)]
pub struct SourceArgs {
    /// Base revision of the diff
    #[arg(long)]
    base: Option<String>,
    /// Head revision of the diff
    #[arg(long)]
    head: Option<String>,
    /// Read changed file paths from stdin instead of git
    #[arg(long, action)]
    stdin: bool,
}

#[derive(Args, Default)]
pub struct PublishArgs {
    /// Adapter directories to publish; skips change detection
    dirs: Vec<PathBuf>,
    #[arg(long, value_enum, default_value = "versioned")]
    mode: ModeArg,
    #[command(flatten)]
    source: SourceArgs,
    /// Run every check but do not build, upload or sync
    #[arg(long, action)]
    dry_run: bool,
    /// Write objects to this directory instead of the object store
    #[arg(long)]
    store_dir: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Default)]
enum ModeArg {
    #[default]
    Versioned,
    Latest,
}

impl From<ModeArg> for PublishMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Versioned => PublishMode::Versioned,
            ModeArg::Latest => PublishMode::Latest,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => {
            commands::cmd_publish(&cli.adapters_dir, &cli.config, PublishArgs::default()).await?
        }
        Some(Commands::Publish(args)) => {
            commands::cmd_publish(&cli.adapters_dir, &cli.config, args).await?
        }
        Some(Commands::Detect { source, json }) => {
            commands::cmd_detect(&cli.adapters_dir, &source, json)?
        }
        Some(Commands::Validate { dirs, source, json }) => {
            commands::cmd_validate(&cli.adapters_dir, &cli.config, dirs, &source, json)?
        }
    }

    Ok(())
}
