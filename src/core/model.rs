// UAProbe - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Platform tables (compiled, runtime form)
// =============================================================================

/// One compiled row of a platform table.
///
/// A rule is a (predicate, result) pair: when `pattern` matches, the result
/// is `platform` with either `force_version` or the number in the first
/// capture group, plus every flag in `extra`.
#[derive(Debug, Clone)]
pub struct PlatformRule {
    /// Platform name reported on a match (e.g. "android", "ios").
    pub platform: String,

    /// Compiled pattern tested against the user-agent string.
    pub pattern: Regex,

    /// Version reported regardless of what the pattern captured.
    pub force_version: Option<f64>,

    /// Additional named flags applied on a match (e.g. `silk = 1`).
    pub extra: BTreeMap<String, i64>,

    /// Free-form note carried over from the table definition.
    pub note: String,
}

/// An ordered, validated platform table ready for detection.
///
/// Rule order is significant: the first matching rule wins.
#[derive(Debug, Clone)]
pub struct PlatformTable {
    /// Unique identifier (e.g. "enyo-default").
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Description of what the table targets.
    pub description: String,

    /// Rules in evaluation order.
    pub rules: Vec<PlatformRule>,

    /// Whether this table is embedded in the binary.
    pub is_builtin: bool,
}

impl PlatformTable {
    /// Rules in evaluation order.
    pub fn rules(&self) -> &[PlatformRule] {
        &self.rules
    }
}

// =============================================================================
// Detection results
// =============================================================================

/// The outcome of a successful table match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Platform name of the winning rule.
    pub platform: String,

    /// Major version (or `major.minor` where the rule captures it).
    /// `None` when the captured text was not a number.
    pub version: Option<f64>,

    /// Extra flags contributed by the winning rule.
    pub extra: BTreeMap<String, i64>,

    /// Zero-based position of the winning rule in its table.
    pub rule_index: usize,
}

/// Host capabilities that cannot be read from the user-agent string.
///
/// In a browser these come from the window object; here the caller supplies
/// them (CLI flags, or whatever the embedding application knows).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostHints {
    /// Native single-finger touch events are available.
    #[serde(default)]
    pub touch_events: bool,

    /// Native two-finger gesture events are available.
    #[serde(default)]
    pub gesture_events: bool,

    /// Reported maximum simultaneous touch points (pointer-event hosts).
    #[serde(default)]
    pub max_touch_points: u32,
}

/// The detected platform: computed once, immutable, passed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Platform {
    /// Winning rule's result, if any rule matched.
    pub detection: Option<Detection>,

    /// The platform has native single-finger events.
    pub touch: bool,

    /// The platform has native double-finger events.
    pub gesture: bool,
}

/// One classified input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    /// 1-based position of the string in the combined input: command-line
    /// strings first, then file or stdin lines numbered after them.
    pub line: usize,

    /// The user-agent string as matched (after length capping).
    pub user_agent: String,

    /// Detection outcome.
    pub platform: Platform,

    /// Copy of `Platform::single_arg_console()`, so serialised output carries
    /// the same flags as the text report.
    pub single_arg_console: bool,
}
