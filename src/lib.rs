//! Aero section modelling for propeller/rotor performance solvers.
//!
//! The numeric pipeline (polar ingestion, model fitting, report export)
//! lives in the member crates re-exported here. Keeping the logic in
//! library crates lets multiple front-ends (CLI, GUI, web) share it.

pub use rotor_aeromodel as aeromodel;
pub use rotor_config as config;
pub use rotor_core as core;
pub use rotor_export as export;
pub use rotor_importer as importer;

/// Returns the version of the library for smoke tests while scaffolding.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
