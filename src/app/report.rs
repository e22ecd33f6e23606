// UAProbe - app/report.rs
//
// Text reports laid out with the repeater: one item per probe result (or
// per table rule), one Label child per column, filled in by a setup
// strategy.

use crate::core::export::format_version;
use crate::core::model::{PlatformTable, ProbeResult};
use crate::core::repeater::{Chain, ComponentDescriptor, OwnerProxy, Repeater, SetupItem};
use crate::util::constants;
use crate::util::error::RepeaterError;

/// Column names of the probe report, also used as child names.
const REPORT_COLUMNS: [&str; 5] = ["line", "platform", "version", "flags", "user_agent"];

/// Placeholder shown for a string no rule matched.
const NO_MATCH: &str = "-";

fn label_template(columns: &[&str]) -> Vec<ComponentDescriptor> {
    columns
        .iter()
        .map(|name| ComponentDescriptor::new("Label").named(*name))
        .collect()
}

/// Plain cell values for one result, in `REPORT_COLUMNS` order.
fn result_cells(result: &ProbeResult) -> [String; 5] {
    let platform = &result.platform;
    let mut flags = Vec::new();
    if let Some(d) = &platform.detection {
        flags.extend(d.extra.iter().map(|(k, v)| format!("{k}={v}")));
    }
    if platform.touch {
        flags.push("touch".to_string());
    }
    if platform.gesture {
        flags.push("gesture".to_string());
    }
    if platform.single_arg_console() {
        flags.push("single-arg-console".to_string());
    }

    [
        result.line.to_string(),
        platform.name().unwrap_or(NO_MATCH).to_string(),
        format_version(platform.version()),
        flags.join(","),
        result.user_agent.clone(),
    ]
}

/// Fills every column of a row from the matching probe result.
struct FillCells<'a> {
    results: &'a [ProbeResult],
}

impl SetupItem for FillCells<'_> {
    fn setup_item(&mut self, index: usize, item: &mut OwnerProxy) {
        let Some(result) = self.results.get(index) else {
            return;
        };
        for (column, value) in REPORT_COLUMNS.iter().zip(result_cells(result)) {
            if let Some(cell) = item.child_mut(column) {
                cell.set(constants::TEXT_PROPERTY, value);
            }
        }
    }
}

/// Pads every column but the last to a shared width so rows line up.
struct AlignColumns {
    widths: Vec<usize>,
}

impl SetupItem for AlignColumns {
    fn setup_item(&mut self, _index: usize, item: &mut OwnerProxy) {
        let last = REPORT_COLUMNS.len() - 1;
        for (i, column) in REPORT_COLUMNS.iter().enumerate().take(last) {
            let width = self.widths[i];
            if let Some(cell) = item.child_mut(column) {
                let padded = format!("{:<width$}", cell.text());
                cell.set(constants::TEXT_PROPERTY, padded);
            }
        }
    }
}

/// Render probe results as aligned text rows, preceded by a header row.
pub fn render_results(results: &[ProbeResult], separator: &str) -> Result<Vec<String>, RepeaterError> {
    let mut widths: Vec<usize> = REPORT_COLUMNS.iter().map(|c| c.chars().count()).collect();
    for result in results {
        for (i, cell) in result_cells(result).iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header = REPORT_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i + 1 == REPORT_COLUMNS.len() {
                c.to_string()
            } else {
                format!("{:<width$}", c, width = widths[i])
            }
        })
        .collect::<Vec<_>>()
        .join(separator);

    let setup = Chain(FillCells { results }, AlignColumns { widths });
    let mut repeater = Repeater::new(label_template(&REPORT_COLUMNS), setup).with_separator(separator);
    repeater.build(results.len())?;

    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(header.trim_end().to_string());
    lines.extend(repeater.render().into_iter().map(|l| l.trim_end().to_string()));
    Ok(lines)
}

/// Render the rules of a table, one row per rule in evaluation order.
pub fn render_rules(table: &PlatformTable, separator: &str) -> Result<Vec<String>, RepeaterError> {
    let columns = ["position", "platform", "version", "pattern"];
    let setup = |index: usize, item: &mut OwnerProxy| {
        let Some(rule) = table.rules.get(index) else {
            return;
        };
        let version = match rule.force_version {
            Some(v) => format!("={}", format_version(Some(v))),
            None => "(captured)".to_string(),
        };
        let values = [
            index.to_string(),
            rule.platform.clone(),
            version,
            rule.pattern.as_str().to_string(),
        ];
        for (column, value) in columns.iter().zip(values) {
            if let Some(cell) = item.child_mut(column) {
                cell.set(constants::TEXT_PROPERTY, value);
            }
        }
    };

    let mut repeater = Repeater::new(label_template(&columns), setup).with_separator(separator);
    repeater.build(table.rules.len())?;

    let mut lines = vec![format!("{} ({})", table.name, table.id)];
    lines.extend(repeater.render());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::batch::probe_batch;
    use crate::core::model::HostHints;
    use crate::core::table;

    fn builtin() -> PlatformTable {
        table::load_builtin_tables().remove(0)
    }

    #[test]
    fn test_render_results_rows_and_alignment() {
        let inputs = vec![
            (
                1,
                "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10_6_3; en-us; Silk/1.1.0-80) \
                 AppleWebKit/533.16 (KHTML, like Gecko) Version/5.0 Safari/533.16"
                    .to_string(),
            ),
            (12, "curl/8.4.0".to_string()),
        ];
        let results = probe_batch(&builtin(), &inputs, HostHints::default());
        let lines = render_results(&results, " | ").unwrap();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("line | platform | version | flags"));
        assert!(lines[1].starts_with("1    | android  | 2       | silk=1,single-arg-console | "));
        assert!(lines[2].starts_with("12   | -        |"));
        assert!(lines[2].ends_with("curl/8.4.0"));
    }

    #[test]
    fn test_render_results_empty() {
        let lines = render_results(&[], "  ").unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_render_rules_lists_table_in_order() {
        let table = builtin();
        let lines = render_rules(&table, " ").unwrap();
        assert_eq!(lines.len(), table.rules.len() + 1);
        assert!(lines[1].starts_with("0 androidChrome (captured) "));
        assert!(lines[3].starts_with("2 android =2 Silk/1."));
    }
}
