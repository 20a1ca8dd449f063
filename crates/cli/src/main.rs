// enrollcheck CLI - reconcile account applications against the account export

mod exit_codes;
mod recon;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;
use recon::SourceArgs;

#[derive(Parser)]
#[command(name = "enrollcheck")]
#[command(about = "Reconcile account applications against the account export")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match every applicant and print the report
    #[command(after_help = "\
Examples:
  enrollcheck check --accounts export.csv --form application.xlsx
  enrollcheck check --accounts export.csv --unregistered pending.csv --form application.xlsx
  enrollcheck check --accounts export.csv --form application.xlsx --json
  enrollcheck check --accounts export.csv --form application.xlsx --output result.json")]
    Check {
        #[command(flatten)]
        sources: SourceArgs,

        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also write the JSON result to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Match, then write the target rows of the Upload sheet with their IDs
    #[command(after_help = "\
Examples:
  enrollcheck export --accounts export.csv --unregistered pending.csv --form application.xlsx
  enrollcheck export --accounts export.csv --form application.xlsx --out upload.csv")]
    Export {
        #[command(flatten)]
        sources: SourceArgs,

        /// Destination CSV (UTF-8 with BOM)
        #[arg(long, default_value = "filtered_upload_data.csv")]
        out: PathBuf,
    },

    /// Validate a config file without running
    Validate {
        /// Path to the TOML config
        config: PathBuf,
    },

    /// Print the built-in column layout as TOML
    DefaultConfig,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  enrollcheck-recon ",
            env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug"
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  enrollcheck-recon ",
            env!("CARGO_PKG_VERSION"),
            "\nbuild:   release"
        )
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { sources, json, output } => recon::cmd_check(sources, json, output),
        Commands::Export { sources, out } => recon::cmd_export(sources, out),
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::DefaultConfig => recon::cmd_default_config(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
