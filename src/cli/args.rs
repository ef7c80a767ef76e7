//! Command line argument parsing for the simword CLI using clap.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::SimwordError;
use crate::keyboard::{KeyboardDistance, LayoutKind};
use crate::retrieval::RetrieverConfig;
use crate::scoring::ScorerConfig;

/// Simword - find keyboard-close single-typo neighbours of words
#[derive(Parser, Debug, Clone)]
#[command(name = "simword")]
#[command(about = "Find keyboard-close single-typo neighbours of words in a vocabulary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SimwordArgs {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SimwordArgs {
    /// Get the effective verbosity level (0=quiet, 1=normal, 2=verbose, 3+=debug)
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a fresh index from a word list, replacing any existing data
    Build(BuildArgs),

    /// Find typo neighbours of a comma-separated list of words
    Query(QueryArgs),

    /// Find typo neighbours of every word in the index
    #[command(name = "query-all")]
    QueryAll(QueryAllArgs),

    /// Show index statistics
    Stats(StatsArgs),
}

/// Arguments for building an index
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Word list, UTF-8, one word per line
    #[arg(value_name = "WORD_FILE")]
    pub word_file: PathBuf,

    /// Path to the index directory
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,

    /// Don't take the advisory build lock
    #[arg(long)]
    pub no_lock: bool,
}

/// Arguments for querying explicit words
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Comma-separated query words, e.g. "haus,maus"
    #[arg(value_name = "WORDS")]
    pub words: String,

    /// Path to the index directory
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,

    #[command(flatten)]
    pub options: QueryOptions,
}

/// Arguments for querying every indexed word
#[derive(Args, Debug, Clone)]
pub struct QueryAllArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,

    #[command(flatten)]
    pub options: QueryOptions,
}

/// Arguments for index statistics
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,
}

/// Retrieval and scoring options shared by the query commands
#[derive(Args, Debug, Clone)]
pub struct QueryOptions {
    /// Maximum weighted edit cost of a retrieved candidate
    #[arg(long, default_value = "2")]
    pub max_edits: u32,

    /// Maximum number of candidates retrieved per query
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Keyboard layout used for distances
    #[arg(long, value_enum, default_value_t = LayoutArg::Qwertz)]
    pub layout: LayoutArg,

    /// Sort each query's results by ascending distance
    #[arg(long)]
    pub sort: bool,

    /// Also accept candidates that differ only by an appended or dropped last character
    #[arg(long)]
    pub lenient: bool,

    /// Process queries in parallel (output order is unchanged)
    #[arg(long)]
    pub parallel: bool,
}

impl QueryOptions {
    pub fn retriever_config(&self) -> RetrieverConfig {
        RetrieverConfig::default()
            .with_max_edits(self.max_edits)
            .with_limit(self.limit)
    }

    pub fn scorer_config(&self) -> ScorerConfig {
        ScorerConfig::default()
            .with_strict_divergence(!self.lenient)
            .with_sort_by_distance(self.sort)
    }

    pub fn keyboard(&self) -> Arc<dyn KeyboardDistance> {
        Arc::new(LayoutKind::from(self.layout).layout())
    }
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// `<distance>; <query>; <candidate>` lines
    Text,
    /// One JSON object per line
    Json,
}

/// Keyboard layout options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    /// German QWERTZ
    Qwertz,
    /// US QWERTY
    Qwerty,
}

impl From<LayoutArg> for LayoutKind {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Qwertz => LayoutKind::Qwertz,
            LayoutArg::Qwerty => LayoutKind::Qwerty,
        }
    }
}

/// Full help text, printed on a malformed invocation.
pub fn usage() -> String {
    SimwordArgs::command().render_help().to_string()
}

/// Turn a clap parse failure into a usage error.
pub fn usage_error(err: &clap::Error) -> SimwordError {
    let rendered = err.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");
    SimwordError::usage(message)
}
