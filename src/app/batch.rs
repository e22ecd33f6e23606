// UAProbe - app/batch.rs
//
// Classifies many user-agent strings at once. Compiled tables are immutable
// and `Sync`, so strings are matched in parallel on the rayon pool; results
// come back in input order.

use crate::core::model::{HostHints, Platform, PlatformTable, ProbeResult};
use crate::util::constants;
use rayon::prelude::*;

/// Classify one string. Over-long input is cut at `MAX_USER_AGENT_LENGTH`
/// (on a char boundary) before matching.
pub fn probe_one(table: &PlatformTable, line: usize, user_agent: &str, hints: HostHints) -> ProbeResult {
    let user_agent = truncate_on_char_boundary(user_agent, constants::MAX_USER_AGENT_LENGTH);
    let platform = Platform::detect(table, user_agent, hints);
    ProbeResult {
        line,
        user_agent: user_agent.to_string(),
        single_arg_console: platform.single_arg_console(),
        platform,
    }
}

/// Number command-line strings and file lines into one input list.
///
/// Arguments take lines `1..=args.len()`; file or stdin line numbers are
/// shifted past them, so every result row keeps a distinct line.
pub fn combine_inputs(args: &[String], file_lines: Vec<(usize, String)>) -> Vec<(usize, String)> {
    let offset = args.len();
    args.iter()
        .enumerate()
        .map(|(i, ua)| (i + 1, ua.clone()))
        .chain(file_lines.into_iter().map(|(line, ua)| (line + offset, ua)))
        .collect()
}

/// Classify a batch of `(line_number, user_agent)` pairs.
///
/// Input beyond `MAX_BATCH_SIZE` entries is dropped with a warning.
pub fn probe_batch(
    table: &PlatformTable,
    inputs: &[(usize, String)],
    hints: HostHints,
) -> Vec<ProbeResult> {
    let inputs = if inputs.len() > constants::MAX_BATCH_SIZE {
        tracing::warn!(
            count = inputs.len(),
            max = constants::MAX_BATCH_SIZE,
            "Batch too large; extra input ignored"
        );
        &inputs[..constants::MAX_BATCH_SIZE]
    } else {
        inputs
    };

    let results: Vec<ProbeResult> = inputs
        .par_iter()
        .map(|(line, ua)| probe_one(table, *line, ua, hints))
        .collect();

    let matched = results
        .iter()
        .filter(|r| r.platform.detection.is_some())
        .count();
    tracing::info!(
        table_id = %table.id,
        total = results.len(),
        matched,
        "Batch probe complete"
    );

    results
}

fn truncate_on_char_boundary(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
