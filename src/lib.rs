//! HTTP layer for calfeed.
//!
//! Everything with design content lives in `calfeed-core`; this crate wires
//! it to axum routes and process concerns (config, logging, instance lock).

pub mod config;
pub mod routes;
pub mod singleton;
pub mod state;
