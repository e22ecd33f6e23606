// UAProbe - platform/mod.rs
//
// Operating-system abstraction layer: config directories, config.toml,
// file reads.
// Dependencies: util, directories crate.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
