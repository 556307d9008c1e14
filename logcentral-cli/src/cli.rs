//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no I/O happens here. Values that need domain parsing
//! (merge format, thresholds) are validated by the command handlers so that
//! errors carry the same messages as the library crates.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "logcentral.toml";

/// logcentral -- log batch coalescer and index lifecycle policy generator.
///
/// Use `logcentral <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logcentral", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logcentral.toml configuration file.
    ///
    /// When omitted, `logcentral.toml` in the working directory is used if it
    /// exists, otherwise built-in defaults plus environment overrides.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration path to report and load for `config` subcommands.
    pub fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge a directory of small log files into size-bounded outputs.
    Merge(MergeArgs),

    /// Generate an index state management policy document.
    Policy(PolicyArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- merge ----

/// Merge every file in the input directory into the output directory.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Directory holding the input files (read only).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory receiving the merged files (created if missing).
    #[arg(short = 'O', long = "output-dir")]
    pub output_dir: PathBuf,

    /// Input format (table, text, gzip).
    #[arg(short, long)]
    pub format: String,

    /// Upper bound per output in bytes (default: per-format config value).
    #[arg(long)]
    pub max_size: Option<u64>,
}

// ---- policy ----

/// Build a lifecycle policy from the `[ism]` config section and flags.
///
/// Flags override the corresponding config values. Thresholds accept
/// integer days (`30`) or a number with a unit (`12h`, `200gb`).
#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// Age or size before moving hot indices to warm.
    #[arg(long)]
    pub warm_age: Option<String>,

    /// Age or size before moving warm indices to cold.
    #[arg(long)]
    pub cold_age: Option<String>,

    /// Age or size before deleting indices.
    #[arg(long)]
    pub retain_age: Option<String>,

    /// Index age that triggers a rollover.
    #[arg(long)]
    pub rollover_age: Option<String>,

    /// Primary shard size that triggers a rollover.
    #[arg(long)]
    pub rollover_size: Option<String>,

    /// Index pattern the policy template applies to.
    #[arg(long)]
    pub index_pattern: Option<String>,

    /// Template priority.
    #[arg(long)]
    pub priority: Option<u32>,

    /// Timestamp field used by cold migration.
    #[arg(long)]
    pub timestamp_field: Option<String>,
}

// ---- config ----

/// Manage logcentral configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, coalescer, ism).
        #[arg(long)]
        section: Option<String>,
    },
}
