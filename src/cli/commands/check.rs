//! `check` — validate configuration and catalog without serving.

use crate::catalog::Catalog;
use crate::cli::args::CheckArgs;
use crate::config::{self, Overrides};
use crate::error::{CatalogError, WaterSafeError};

/// Validates the configuration file (or defaults) and the catalog, printing
/// every issue found.
///
/// # Errors
///
/// Returns a config or catalog error when validation fails, so the process
/// exits with the matching code.
pub fn run(args: &CheckArgs) -> Result<(), WaterSafeError> {
    let config = config::load(args.config.as_deref(), &Overrides::default()).inspect_err(
        |e| {
            if let crate::error::ConfigError::ValidationError { errors, .. } = e {
                for issue in errors {
                    eprintln!("{issue}");
                }
            }
        },
    )?;

    for issue in config::validate(&config) {
        // Errors were already fatal above; what's left is warnings.
        eprintln!("{issue}");
    }

    let catalog_path = args.catalog.as_deref().or(config.catalog.path.as_deref());
    let catalog = match catalog_path {
        Some(path) => Catalog::from_path(path),
        None => Catalog::embedded(),
    }
    .inspect_err(|e| {
        if let CatalogError::Invalid { errors, .. } = e {
            for issue in errors {
                eprintln!("{issue}");
            }
        }
    })?;

    println!(
        "configuration OK; catalog OK ({} conditions in {} categories)",
        catalog.len(),
        crate::catalog::Category::ALL.len()
    );
    Ok(())
}
