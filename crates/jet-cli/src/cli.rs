//! CLI argument definitions for the journal entry transpiler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "jet-transpiler",
    version,
    about = "Journal Entry Transpiler - Standardize ERP accounting exports",
    long_about = "Map heterogeneous accounting export columns onto canonical journal\n\
                  entry fields, clean the amounts, validate debit/credit balance,\n\
                  and emit standardized header/detail CSV files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert one accounting export to standardized header/detail files.
    Convert(ConvertArgs),

    /// List the canonical fields and their synonym coverage.
    Fields,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Path to the export file (CSV, comma- or semicolon-delimited).
    #[arg(value_name = "EXPORT_FILE")]
    pub input: PathBuf,

    /// Output directory for generated files (default: alongside the input).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// ERP system hint (e.g. SAP, Oracle, Navision, Generic_ES).
    ///
    /// When omitted, the ERP is auto-detected from column-name
    /// fingerprints.
    #[arg(long = "erp", value_name = "SYSTEM")]
    pub erp: Option<String>,

    /// JSON synonym catalog overlaid on the built-in one.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Detect and validate without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Disable the balance-driven tie-break for contested entry ids.
    #[arg(long = "no-balance-check")]
    pub no_balance_check: bool,

    /// Prefix for the generated header/detail file names.
    #[arg(long = "output-prefix", default_value = "transformed")]
    pub output_prefix: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
