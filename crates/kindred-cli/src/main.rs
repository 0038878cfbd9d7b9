//! Kindred CLI - Command line interface for the family graph engine

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, config as config_cmd, query, relate, tree, validate};
use config::Config;
use kindred_core::{parse_snapshot, Member};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "kindred")]
#[command(author, version, about = "Family tree and kinship queries over member snapshots")]
pub struct Cli {
    /// Members snapshot (JSON array, or object with a `members` array)
    #[arg(short, long, env = "KINDRED_MEMBERS_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Output format: table, json
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the family tree
    Tree(tree::TreeArgs),
    /// List ancestors of a member (breadth-first)
    Ancestors(query::QueryArgs),
    /// List descendants of a member (depth-first)
    Descendants(query::QueryArgs),
    /// Classify how the second member is related to the first
    Relate(relate::PairArgs),
    /// Find the nearest common ancestor of two members
    CommonAncestor(relate::PairArgs),
    /// Report problems in the snapshot
    Validate(validate::ValidateArgs),
    /// Manage CLI configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Loaded snapshot plus the resolved output settings
pub struct AppContext {
    pub members: Vec<Member>,
    pub source: PathBuf,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(cli: &Cli, config: &Config) -> anyhow::Result<Self> {
        let source = cli
            .file
            .clone()
            .or_else(|| config.members_file.clone())
            .context("No members file given; pass --file or run `kindred config set members_file <path>`")?;
        tracing::debug!("Loading members from: {:?}", source);

        let content = std::fs::read_to_string(&source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        let members = parse_snapshot(&content)
            .with_context(|| format!("Failed to parse {}", source.display()))?;
        tracing::info!("Loaded {} members from {}", members.len(), source.display());

        let format = cli
            .format
            .as_deref()
            .or(config.format.as_deref())
            .map(OutputFormat::from)
            .unwrap_or(OutputFormat::Table);

        Ok(Self {
            members,
            source,
            format,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting kindred CLI");

    let load = || -> anyhow::Result<AppContext> {
        let config = Config::load()?;
        AppContext::new(&cli, &config)
    };

    match &cli.command {
        Commands::Tree(args) => tree::run(args, &load()?)?,
        Commands::Ancestors(args) => query::run_ancestors(args, &load()?)?,
        Commands::Descendants(args) => query::run_descendants(args, &load()?)?,
        Commands::Relate(args) => relate::run_relate(args, &load()?)?,
        Commands::CommonAncestor(args) => relate::run_common_ancestor(args, &load()?)?,
        Commands::Validate(args) => validate::run(args, &load()?)?,
        Commands::Config(args) => config_cmd::run(args)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
