//! Command implementations for the simword CLI.

use std::io::{self, BufWriter};
use std::path::Path;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, SimwordError};
use crate::finder::{QuerySource, SimilarWordFinder};
use crate::storage::{FileStorage, Storage, StorageConfig};
use crate::vocabulary::{INDEX_FILE, IndexWriter, VocabularyIndex, load_word_list, parse_query_list};

/// Execute a CLI command.
pub fn execute_command(args: SimwordArgs) -> Result<()> {
    match &args.command {
        Command::Build(build_args) => build_index(build_args, &args),
        Command::Query(query_args) => query_words(query_args, &args),
        Command::QueryAll(query_args) => query_all(query_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

/// Replace the index at `index_path` with one built from the word file.
fn build_index(args: &BuildArgs, cli_args: &SimwordArgs) -> Result<()> {
    info!("Loading words from: {}", args.word_file.display());
    let words = load_word_list(&args.word_file)?;

    let config = StorageConfig {
        use_locking: !args.no_lock,
        ..StorageConfig::default()
    };
    let records = IndexWriter::new(config).build(&words, &args.index_path)?;

    output_result(
        &BuildResult {
            index_path: args.index_path.to_string_lossy().to_string(),
            records,
        },
        cli_args,
    )
}

fn query_words(args: &QueryArgs, cli_args: &SimwordArgs) -> Result<()> {
    let words = parse_query_list(&args.words);
    if words.is_empty() {
        return Err(SimwordError::usage("No query words given"));
    }
    run_queries(&args.index_path, QuerySource::Words(words), &args.options, cli_args)
}

fn query_all(args: &QueryAllArgs, cli_args: &SimwordArgs) -> Result<()> {
    run_queries(&args.index_path, QuerySource::AllWords, &args.options, cli_args)
}

/// Open the index and stream every surviving typo to stdout.
fn run_queries(
    index_path: &Path,
    source: QuerySource,
    options: &QueryOptions,
    cli_args: &SimwordArgs,
) -> Result<()> {
    let index = VocabularyIndex::open(index_path)?;
    let finder = SimilarWordFinder::from_config(
        options.retriever_config(),
        options.scorer_config(),
        options.keyboard(),
    )
    .with_parallel(options.parallel);
    debug!(
        "Querying {} with layout {}",
        index_path.display(),
        finder.scorer().keyboard().name()
    );

    let stdout = io::stdout();
    let mut writer = TypoWriter::new(BufWriter::new(stdout.lock()), cli_args.output_format);
    let summary = finder.find_all(&index, source, |typo| writer.write(&typo))?;
    writer.finish()?;

    info!(
        "{} queries, {} typo candidates",
        summary.queries, summary.results
    );
    Ok(())
}

/// Show index statistics.
fn show_stats(args: &StatsArgs, cli_args: &SimwordArgs) -> Result<()> {
    let index = VocabularyIndex::open(&args.index_path)?;
    let storage = FileStorage::open(&args.index_path, StorageConfig::default())?;

    let stats = IndexStats {
        index_path: args.index_path.to_string_lossy().to_string(),
        records: index.size(),
        index_size_bytes: storage.file_size(INDEX_FILE)?,
    };
    output_result(&stats, cli_args)
}
