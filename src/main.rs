use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skillshelf::cli::{self, OutputFormat};
use skillshelf::config::Config;
use skillshelf::Severity;

#[derive(Parser)]
#[command(name = "skillshelf", version)]
#[command(about = "Load, validate and query a library of skill documents", long_about = None)]
struct Cli {
    /// Path to config file (defaults to ./skillshelf.toml or ~/.config/skillshelf/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    /// Log discovery and loading details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every skill in the library
    List {
        /// Library root (defaults to catalog.root from config)
        root: Option<PathBuf>,
    },
    /// Show one skill, including its body
    Show {
        /// Exact skill name
        name: String,

        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Find skills: `tag:<tag>`, `#<tag>`, `name:<name>`, `text:<words>` or a bare name
    Find {
        query: String,

        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// List every tag with the number of skills carrying it
    Tags { root: Option<PathBuf> },
    /// Check every skill against the validation rules
    Validate {
        root: Option<PathBuf>,

        /// Lowest severity that fails the run
        #[arg(long, value_enum, default_value = "error")]
        fail_on: Severity,

        /// Fail on warnings as well as errors (same as --fail-on warning)
        #[arg(long, conflicts_with = "fail_on")]
        strict: bool,
    },
    /// Show which config is in effect and check it
    Config,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("skillshelf=debug")
        } else {
            EnvFilter::new("skillshelf=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = cli.format;
    let config_path = cli.config.as_deref();
    let load_config = || Config::load_with_path(config_path);

    match cli.command {
        Commands::List { root } => cli::list::run(root.as_deref(), &load_config()?, format),
        Commands::Show { name, root } => {
            cli::show::run(&name, root.as_deref(), &load_config()?, format)
        }
        Commands::Find { query, root } => {
            cli::find::run(&query, root.as_deref(), &load_config()?, format)
        }
        Commands::Tags { root } => cli::tags::run(root.as_deref(), &load_config()?, format),
        Commands::Validate {
            root,
            fail_on,
            strict,
        } => {
            let fail_on = if strict { Severity::Warning } else { fail_on };
            cli::validate::run(root.as_deref(), &load_config()?, fail_on, format)
        }
        Commands::Config => cli::config_check::run(config_path),
    }
}
