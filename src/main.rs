//! dmnsearch CLI - Command-line interface
//!
//! Commands:
//!   columns    - List the searchable columns of a table
//!   search     - Filter rules by a search term
//!   replace    - Replace text in matching cells
//!   unmatched  - List tables without a matching rule
//!   schema     - Print JSON schemas of the input types
//!   config     - Show or check `.dmnsearch.yaml`

mod cli;

use dmn_search::VERSION;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "columns" => cli::cmd_columns(&args[2..]),
        "search" => cli::cmd_search(&args[2..]),
        "replace" => cli::cmd_replace(&args[2..]),
        "unmatched" => cli::cmd_unmatched(&args[2..]),
        "schema" => cli::cmd_schema(&args[2..]),
        "config" => cli::cmd_config(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("dmnsearch {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_usage() {
    println!(
        r#"
dmnsearch - Search and replace in DMN decision tables

USAGE:
    dmnsearch <COMMAND> [OPTIONS]

COMMANDS:
    columns <table.yaml>                     List searchable columns
    search <table.yaml> [term]               List rules matching term
    replace <table.yaml> --what <p> --with <t>
                                             Replace text in matching cells
    unmatched <table.yaml>... <term>         List tables where nothing matches
    schema [name]                            Print JSON schema for an input type
    config <show|check>                      Show or check .dmnsearch.yaml

OPTIONS:
    --column, -c <id>          Restrict the search term to one column
    --negate                   List rules that do NOT match (search)
    --term <t>                 Only replace in rules matching this term (replace)
    --replace-column <id>      Restrict the replacement to one column (replace)
    --literal                  Treat --what as plain text, not a regex (replace)
    --output, -o <file>        Output file (default: stdout)
    --json                     JSON output format (columns, search, unmatched)
    --                         Treat every following argument as positional

ENVIRONMENT:
    RUST_LOG                   Log filter, e.g. RUST_LOG=dmn_search=debug

EXAMPLES:
    dmnsearch search pricing.yaml gold --column out_tier
    dmnsearch search pricing.yaml gold --negate
    dmnsearch replace pricing.yaml --what "gold" --with "platinum" -o pricing.yaml
    dmnsearch unmatched tables/*.yaml "legacy"
"#
    );
}
