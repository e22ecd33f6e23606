// UAProbe - lib.rs
//
// Library entry point: platform detection, the list repeater, and the
// table/report plumbing used by the `uaprobe` binary.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
