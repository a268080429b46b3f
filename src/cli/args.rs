//! CLI argument definitions.
//!
//! All Clap derive structs for WaterSafe command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::catalog::Category;
use crate::observability::LogFormat;
use crate::prefs::UserType;

// ============================================================================
// Root CLI
// ============================================================================

/// Water-safety guidance toolkit: condition wizard, user preferences, and a
/// CORS-injecting API proxy.
#[derive(Parser, Debug)]
#[command(name = "watersafe", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "WATERSAFE_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "WATERSAFE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Color output control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the forwarding proxy.
    Serve(ServeArgs),

    /// Validate configuration and catalog without serving.
    Check(CheckArgs),

    /// List health-condition categories or one category's conditions.
    Conditions(ConditionsArgs),

    /// Walk the three-step guidance wizard interactively.
    Guide(GuideArgs),

    /// Show, set, or reset the stored user-type preference.
    Prefs(PrefsCommand),
}

// ============================================================================
// Serve
// ============================================================================

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "WATERSAFE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind the ingress listener on `[host:]port` (overrides config).
    #[arg(long, env = "WATERSAFE_BIND")]
    pub bind: Option<String>,

    /// Upstream origin to forward to (overrides config).
    #[arg(long, env = "WATERSAFE_UPSTREAM")]
    pub upstream: Option<String>,

    /// Ingress path prefix stripped before forwarding (overrides config).
    #[arg(long, env = "WATERSAFE_INGRESS_PREFIX")]
    pub ingress_prefix: Option<String>,
}

// ============================================================================
// Check
// ============================================================================

/// Arguments for `check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "WATERSAFE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to an external catalog YAML file (default: the compiled-in
    /// dataset, or the config's `catalog.path`).
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

// ============================================================================
// Conditions
// ============================================================================

/// Arguments for `conditions`.
#[derive(Args, Debug)]
pub struct ConditionsArgs {
    /// Category to list. Omit to list categories.
    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Path to an external catalog YAML file.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Guide
// ============================================================================

/// Arguments for `guide`.
#[derive(Args, Debug)]
pub struct GuideArgs {
    /// Path to an external catalog YAML file.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Path to the preference JSON file.
    #[arg(long, env = "WATERSAFE_PREFS")]
    pub prefs: Option<PathBuf>,
}

// ============================================================================
// Prefs
// ============================================================================

/// Preference management commands.
#[derive(Args, Debug)]
pub struct PrefsCommand {
    /// Preference subcommand.
    #[command(subcommand)]
    pub subcommand: PrefsSubcommand,

    /// Path to the preference JSON file.
    #[arg(long, global = true, env = "WATERSAFE_PREFS")]
    pub path: Option<PathBuf>,
}

/// Preference subcommands.
#[derive(Subcommand, Debug)]
pub enum PrefsSubcommand {
    /// Show the stored preference.
    Show,

    /// Store a user type.
    Set {
        /// The user type to store.
        #[arg(value_enum)]
        user_type: UserType,
    },

    /// Clear the stored preference.
    Reset,
}
