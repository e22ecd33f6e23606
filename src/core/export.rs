// UAProbe - core/export.rs
//
// CSV and JSON export of probe results.
// Core layer: writes to any Write trait object.

use crate::core::model::ProbeResult;
use crate::util::error::ExportError;
use std::io::Write;

/// Format a version the way it reads in a table: `32` rather than `32.0`,
/// `10.1` as is.
pub fn format_version(version: Option<f64>) -> String {
    match version {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Extra flags as `key=value` pairs separated by `;`.
fn format_extra(result: &ProbeResult) -> String {
    result
        .platform
        .detection
        .as_ref()
        .map(|d| {
            d.extra
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(";")
        })
        .unwrap_or_default()
}

/// Export results to CSV.
///
/// Writes: line, platform, version, extra, touch, gesture, single_arg_console,
/// user_agent
pub fn export_csv<W: Write>(
    results: &[ProbeResult],
    writer: W,
    target: &str,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| ExportError::Csv {
        target: target.to_string(),
        source: e,
    };

    csv_writer
        .write_record([
            "line",
            "platform",
            "version",
            "extra",
            "touch",
            "gesture",
            "single_arg_console",
            "user_agent",
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for result in results {
        let line = result.line.to_string();
        let version = format_version(result.platform.version());
        let extra = format_extra(result);
        let record: [&str; 8] = [
            &line,
            result.platform.name().unwrap_or(""),
            &version,
            &extra,
            if result.platform.touch { "true" } else { "false" },
            if result.platform.gesture { "true" } else { "false" },
            if result.single_arg_console { "true" } else { "false" },
            &result.user_agent,
        ];
        csv_writer.write_record(record).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        target: target.to_string(),
        source: e,
    })?;

    Ok(count)
}

/// Export results to JSON (array of objects).
pub fn export_json<W: Write>(
    results: &[ProbeResult],
    writer: W,
    target: &str,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, results).map_err(|e| ExportError::Json {
        target: target.to_string(),
        source: e,
    })?;
    Ok(results.len())
}
