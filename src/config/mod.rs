//! Configuration: schema, loading, and validation.

pub mod loader;
pub mod schema;

pub use loader::{Overrides, load, validate};
pub use schema::{AppConfig, CatalogSettings, PrefsSettings, ProxySettings};
