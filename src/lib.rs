//! WaterSafe — water-safety guidance toolkit.
//!
//! This library provides the health-condition catalog, the three-step
//! guidance wizard, the persisted user-type preference, and the
//! CORS-injecting forwarding proxy behind the `watersafe` CLI.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod prefs;
pub mod proxy;
pub mod wizard;
