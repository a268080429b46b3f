//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod check;
pub mod conditions;
pub mod guide;
pub mod prefs;
pub mod serve;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::error::WaterSafeError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), WaterSafeError> {
    match cli.command {
        Commands::Serve(args) => serve::run(&args, cancel).await,
        Commands::Check(args) => check::run(&args),
        Commands::Conditions(args) => conditions::run(&args),
        Commands::Guide(args) => guide::run(&args),
        Commands::Prefs(cmd) => prefs::run(&cmd),
    }
}
