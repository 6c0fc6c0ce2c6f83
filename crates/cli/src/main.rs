mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Rulebook decision rule toolkit.
#[derive(Parser)]
#[command(name = "rulebook", version, about = "Rulebook decision rule toolkit")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression against a context and print the trace
    Eval {
        /// Path to the expression JSON file
        expr: PathBuf,
        /// Path to the context JSON file (defaults to an empty object)
        #[arg(long)]
        context: Option<PathBuf>,
    },

    /// Check an expression for structural problems without evaluating it
    Check {
        /// Path to the expression JSON file
        expr: PathBuf,
    },

    /// Load a rule catalog file and run its regression cases
    Regress {
        /// Path to a JSON array of rule versions
        catalog: PathBuf,
        /// Only run this rule
        #[arg(long)]
        rule: Option<String>,
        /// Run this version instead of the published one
        #[arg(long, requires = "rule")]
        version: Option<u32>,
        /// Prefer the latest version over the published one
        #[arg(long)]
        latest: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    };
    logging::init(&config.log_level);

    match cli.command {
        Commands::Eval { expr, context } => {
            commands::eval::cmd_eval(&expr, context.as_deref(), cli.output, cli.quiet);
        }
        Commands::Check { expr } => {
            commands::check::cmd_check(&expr, cli.output, cli.quiet);
        }
        Commands::Regress {
            catalog,
            rule,
            version,
            latest,
        } => {
            commands::regress::cmd_regress(
                &catalog,
                commands::regress::Selection {
                    rule: rule.as_deref(),
                    version,
                    prefer_latest: latest || config.prefer_latest,
                },
                cli.output,
                cli.quiet,
            );
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
