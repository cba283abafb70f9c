mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use typebridge_core::{ConversionError, ConverterConfig, DecimalOverflowPolicy, TypeConverter};

use commands::{convert, inspect, Report};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Command-line spelling of [`DecimalOverflowPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OverflowArg {
    Adjust,
    Reject,
}

impl From<OverflowArg> for DecimalOverflowPolicy {
    fn from(arg: OverflowArg) -> Self {
        match arg {
            OverflowArg::Adjust => DecimalOverflowPolicy::Adjust,
            OverflowArg::Reject => DecimalOverflowPolicy::Reject,
        }
    }
}

/// Column type conversion between engine, interchange, and warehouse type systems.
#[derive(Parser)]
#[command(
    name = "typebridge",
    version,
    about = "Column type conversion between engine, interchange, and warehouse type systems"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress error messages; the exit code still reports failure
    #[arg(long, global = true)]
    quiet: bool,

    /// Log conversion decisions at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to a converter config TOML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the config file's decimal overflow policy
    #[arg(long, global = true, value_enum)]
    decimal_overflow: Option<OverflowArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an engine type (e.g. "DECIMAL(18,3)", "INTEGER[]") to a warehouse type
    ToTarget {
        /// Engine type descriptor
        source: String,
    },

    /// Convert a warehouse type string (e.g. "NUMBER(10,0)") back to an engine type
    ToSource {
        /// Warehouse type string
        target: String,
    },

    /// Convert an engine type to its interchange type name
    ToInterchange {
        /// Engine type descriptor
        source: String,
    },

    /// Convert an interchange type name (e.g. "decimal128(10,2)") to a warehouse type
    InterchangeToTarget {
        /// Interchange type name
        name: String,
    },

    /// Convert an interchange type name back to an engine type
    InterchangeToSource {
        /// Interchange type name
        name: String,
    },

    /// Show how a decimal is fitted under the 38-digit ceiling
    AdjustDecimal {
        precision: u8,
        scale: u8,
    },

    /// Describe both conversion paths for an engine type
    Info {
        /// Engine type descriptor
        source: String,
    },

    /// Check whether values of one engine type can be stored in another
    Check {
        from: String,
        to: String,
    },

    /// Check whether a numeric engine type fits in another without overflow
    ValidateRange {
        from: String,
        to: String,
    },

    /// Describe how a nested engine type is flattened in the warehouse
    Flatten {
        /// Nested engine type descriptor
        source: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let converter = match load_converter(cli.config.as_deref(), cli.decimal_overflow) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::ToTarget { source } => convert::cmd_to_target(&converter, &source),
        Commands::ToSource { target } => convert::cmd_to_source(&converter, &target),
        Commands::ToInterchange { source } => convert::cmd_to_interchange(&converter, &source),
        Commands::InterchangeToTarget { name } => {
            convert::cmd_interchange_to_target(&converter, &name)
        }
        Commands::InterchangeToSource { name } => {
            convert::cmd_interchange_to_source(&converter, &name)
        }
        Commands::AdjustDecimal { precision, scale } => {
            Ok(inspect::cmd_adjust_decimal(precision, scale))
        }
        Commands::Info { source } => inspect::cmd_info(&converter, &source),
        Commands::Check { from, to } => inspect::cmd_check(&converter, &from, &to),
        Commands::ValidateRange { from, to } => {
            inspect::cmd_validate_range(&converter, &from, &to)
        }
        Commands::Flatten { source } => inspect::cmd_flatten(&source),
    };

    match result {
        Ok(report) => print_report(&report, cli.output),
        Err(e) => {
            report_conversion_error(&e, cli.output, cli.quiet);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Build the converter from `--config`, then apply `--decimal-overflow`.
fn load_converter(
    config_path: Option<&Path>,
    overflow: Option<OverflowArg>,
) -> Result<TypeConverter, String> {
    let mut config = match config_path {
        Some(path) => config::read_config(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(arg) = overflow {
        config.decimal_overflow = arg.into();
    }
    let converter = TypeConverter::new(config);
    log::debug!("converter config: {:?}", converter.config());
    Ok(converter)
}

fn print_report(report: &Report, output: OutputFormat) {
    match output {
        OutputFormat::Text => println!("{}", report.text),
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&report.json)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}

fn report_conversion_error(e: &ConversionError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", e);
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
