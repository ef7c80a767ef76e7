//! Simword CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use env_logger::{Builder, Target};
use log::LevelFilter;

use simword::cli::args::*;
use simword::cli::commands::*;

fn main() {
    let args = match SimwordArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Malformed invocation: help on stdout, nothing else is touched.
            print!("{}", usage());
            eprintln!("Error: {}", usage_error(&e));
            process::exit(1);
        }
    };

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    Builder::new()
        .filter_level(log_level)
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
