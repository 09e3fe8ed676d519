// ModSleuth - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, file I/O.
// Dependencies: standard library, directories, memmap2.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
