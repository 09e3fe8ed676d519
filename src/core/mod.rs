// ModSleuth - core/mod.rs
//
// Core business logic layer: segmentation, classification, aggregation,
// rule validation, and load-order resolution.
// Dependencies: standard library plus pure data crates (regex, serde, toml).
// Must NOT depend on: platform, app.

pub mod aggregate;
pub mod classify;
pub mod discovery;
pub mod export;
pub mod load_order;
pub mod model;
pub mod rules;
pub mod segment;
