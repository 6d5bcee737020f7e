//! Simtree CLI - Browse a repository's commits by semantic similarity
//!
//! Reads recent history from git (or a JSON commit file), fingerprints every
//! commit and arranges them in a similarity tree that can be printed,
//! summarized and searched for precedents.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Parse and validate threshold value (must be between 0.0 and 1.0)
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!(
            "threshold must be between 0.0 and 1.0, got {}",
            value
        ));
    }
    Ok(value)
}

mod commands;
mod config;
mod git;
mod output;
mod source;

use commands::*;
use config::SimtreeConfig;
use output::OutputFormat;
use source::CommitSource;

/// Browse commits by what they do, not when they happened.
#[derive(Parser)]
#[command(name = "simtree")]
#[command(author, version)]
#[command(about = "Browse commits by semantic similarity")]
#[command(
    long_about = "simtree fingerprints each commit from its message, touched paths and code delta,\nthen arranges the history in a similarity tree so related work can be found\nregardless of when it happened."
)]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  simtree tree                    Print the similarity tree of the last 50 commits
  simtree precedents 3            Commits that resemble commit #3
  simtree compare 3 17            How alike two commits are
  simtree --input commits.json    Read commits from a JSON file instead of git")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Git repository to read (overrides config, defaults to current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Number of most recent commits to read
    #[arg(short = 'n', long, global = true)]
    max_commits: Option<usize>,

    /// Read commits from a JSON file instead of git
    #[arg(long, global = true, conflicts_with = "repo")]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the similarity tree
    #[command(visible_alias = "t")]
    Tree {
        /// Hide children whose similarity to their parent is below this
        #[arg(long, value_parser = parse_threshold)]
        min_similarity: Option<f64>,
    },

    /// Summary statistics for the tree
    Stats,

    /// Historical commits similar to the given one
    #[command(visible_alias = "p")]
    Precedents {
        /// Commit id
        id: i64,

        /// Maximum number of precedents
        #[arg(short, long)]
        max: Option<usize>,

        /// Rank every other commit by similarity instead of applying the precedent threshold
        #[arg(long)]
        ranked: bool,
    },

    /// Similarity between two commits
    Compare {
        /// First commit id
        a: i64,
        /// Second commit id
        b: i64,
    },

    /// Show the semantic fingerprint of a commit
    #[command(visible_alias = "fp")]
    Fingerprint {
        /// Commit id
        id: i64,
    },

    /// Most similar commit pairs
    Pairs {
        /// Number of pairs to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Group commits by intent, or filter by intent and module
    Patterns {
        /// Only commits with this intent (fix, feat, refactor, docs, test, chore)
        #[arg(long)]
        intent: Option<String>,

        /// Only commits whose primary module is this (src, test, docs, config)
        #[arg(long)]
        module: Option<String>,
    },

    /// Commits within a similarity radius of a center commit
    Cluster {
        /// Center commit id
        id: i64,

        /// Minimum similarity to the center
        #[arg(long, default_value = "0.5", value_parser = parse_threshold)]
        min: f64,
    },

    /// Commits in time order with their position in the tree
    Timeline,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,

        /// Show installation instructions instead of the script
        #[arg(long)]
        instructions: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// `--input` wins; otherwise git, with flags taking precedence over config.
fn resolve_source(cli: &Cli, config: &SimtreeConfig) -> CommitSource {
    if let Some(path) = &cli.input {
        return CommitSource::File(path.clone());
    }

    let repo = cli
        .repo
        .clone()
        .or_else(|| config.repo().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    CommitSource::Git {
        repo,
        max_commits: cli.max_commits.unwrap_or(config.git.max_commits),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = SimtreeConfig::load(std::path::Path::new("."));

    // CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let source = resolve_source(&cli, &config);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Tree { min_similarity } => tree::run(
            &source,
            min_similarity.unwrap_or(config.tree.min_similarity),
            format,
        ),
        Commands::Stats => stats::run(&source, format),
        Commands::Precedents { id, max, ranked } => precedents::run(
            &source,
            id,
            max.unwrap_or(config.precedents.max_results),
            ranked,
            format,
        ),
        Commands::Compare { a, b } => compare::run(&source, a, b, format),
        Commands::Fingerprint { id } => fingerprint::run(&source, id, format),
        Commands::Pairs { top } => pairs::run(&source, top, format),
        Commands::Patterns { intent, module } => {
            patterns::run(&source, intent.as_deref(), module.as_deref(), format)
        }
        Commands::Cluster { id, min } => cluster::run(&source, id, min, format),
        Commands::Timeline => timeline::run(&source, format),
        Commands::Completions {
            shell,
            instructions,
        } => {
            let mut cmd = Cli::command();
            completions::run(shell, instructions, &mut cmd, format)
        }
    }
}
