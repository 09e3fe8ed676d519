// ModSleuth - app/mod.rs
//
// Application layer: orchestration of analysis and sort runs, rules
// loading, and session persistence.
// Dependencies: core and platform layers.

pub mod analyze;
pub mod rules_mgr;
pub mod session;
pub mod sort;
