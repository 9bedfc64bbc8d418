mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{OptionOverrides, EXIT_FAILURE, EXIT_INPUT_ERROR};
use datcat_schema::Collation;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "datcat",
    version,
    about = "Reconcile catalog items from multiple sources into one deduplicated set"
)]
struct Cli {
    /// Reconcile options file (TOML). Defaults to ./datcat.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Merge item files and print the reconciled catalog grouped by unit.
    Merge {
        /// JSON files, each holding an array of items.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Key units by system and source ids.
        #[arg(long, default_value_t = false)]
        renaming: bool,
        /// Ordering of unit keys: ordinal, natural, natural-reverse.
        #[arg(long)]
        collation: Option<Collation>,
    },
    /// Print the content fingerprint of the reconciled catalog.
    Fingerprint {
        /// JSON files, each holding an array of items.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Key units by system and source ids.
        #[arg(long, default_value_t = false)]
        renaming: bool,
    },
    /// Sort names in natural order.
    SortNames {
        /// Put larger numbers first.
        #[arg(long, default_value_t = false)]
        reverse: bool,
        names: Vec<String>,
    },
    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DATCAT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Merge {
            files,
            renaming,
            collation,
        } => commands::merge::run(
            &files,
            config,
            OptionOverrides {
                renaming,
                collation,
            },
            json_output,
        ),
        Commands::Fingerprint { files, renaming } => commands::fingerprint::run(
            &files,
            config,
            OptionOverrides {
                renaming,
                collation: None,
            },
            json_output,
        ),
        Commands::SortNames { reverse, names } => {
            commands::sort_names::run(names, reverse, json_output)
        }
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("input error:") || msg.starts_with("options error:") {
                EXIT_INPUT_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
