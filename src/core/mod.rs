// UAProbe - core/mod.rs
//
// Core logic layer.
// Dependencies: util, regex, serde, csv.
// Must NOT depend on: app, platform, or touch the filesystem directly.

pub mod detect;
pub mod export;
pub mod model;
pub mod repeater;
pub mod table;
