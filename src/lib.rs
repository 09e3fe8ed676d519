// ModSleuth - lib.rs
//
// Library entry point, exposing every module for integration testing and
// programmatic use. The CLI front end lives in `main.rs`.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
