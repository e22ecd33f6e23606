// UAProbe - app/mod.rs
//
// Application layer: table loading, batch probing, report layout.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod batch;
pub mod report;
pub mod table_mgr;
