// UAProbe - tests/e2e_detection.rs
//
// End-to-end tests for table loading, detection, batch probing, export and
// the repeater-driven report.
//
// These tests use the real embedded table, real fixture files on disk and
// real user-table directories; no mocks.

use serde::Deserialize;
use std::path::PathBuf;
use uaprobe::app::{batch, report, table_mgr};
use uaprobe::core::export;
use uaprobe::core::model::{HostHints, Platform, PlatformTable};
use uaprobe::core::repeater::{ComponentDescriptor, OwnerProxy, Repeater};
use uaprobe::platform::fs;
use uaprobe::util::constants;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn default_table() -> PlatformTable {
    let (tables, errors) = table_mgr::load_all_tables(None);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    table_mgr::select_table(&tables, constants::DEFAULT_TABLE_ID)
        .expect("default table")
        .clone()
}

#[derive(Debug, Deserialize)]
struct CaseFile {
    case: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    label: String,
    ua: String,
    platform: Option<String>,
    version: Option<f64>,
    silk: Option<i64>,
}

fn load_cases() -> Vec<Case> {
    let content = std::fs::read_to_string(fixture("user_agents.toml")).unwrap();
    let file: CaseFile = toml::from_str(&content).unwrap();
    file.case
}

// =============================================================================
// Detection E2E
// =============================================================================

/// Every fixture string resolves to the expected platform and version.
#[test]
fn e2e_fixture_table_detects_expected_platforms() {
    let table = default_table();
    let cases = load_cases();
    assert!(cases.len() >= 20, "fixture table looks truncated");

    for case in &cases {
        let platform = Platform::detect(&table, &case.ua, HostHints::default());
        assert_eq!(
            platform.name(),
            case.platform.as_deref(),
            "platform mismatch for '{}'",
            case.label
        );
        assert_eq!(
            platform.version(),
            case.version,
            "version mismatch for '{}'",
            case.label
        );
        assert_eq!(
            platform.extra("silk"),
            case.silk,
            "silk flag mismatch for '{}'",
            case.label
        );
    }
}

/// Windows Phone strings also carry an MSIE token; the earlier rule wins.
#[test]
fn e2e_windows_phone_beats_ie() {
    let table = default_table();
    let ua = "Mozilla/5.0 (compatible; MSIE 10.0; Windows Phone 8.0; Trident/6.0; IEMobile/10.0)";
    let ie_rule = table
        .rules()
        .iter()
        .position(|r| r.platform == "ie")
        .unwrap();
    assert!(table.rules()[ie_rule].pattern.is_match(ua));

    let d = table.detect(ua).unwrap();
    assert_eq!(d.platform, "windowsPhone");
    assert!(d.rule_index < ie_rule);
}

/// Open webOS reports a Chrome token too; the forced webOS rule comes first.
#[test]
fn e2e_open_webos_beats_desktop_chrome() {
    let table = default_table();
    let ua = "Mozilla/5.0 (X11; Linux) AppleWebKit/537.36 (KHTML, like Gecko) \
              Chrome/28.0.1500.95 Safari/537.36 WebAppManager";
    let d = table.detect(ua).unwrap();
    assert_eq!(d.platform, "webos");
    assert_eq!(d.version, Some(4.0));
}

/// A full PlayBook string carries "Version/.. Safari", and desktop Safari is
/// earlier in the table than the PlayBook rule, so Safari wins.
#[test]
fn e2e_playbook_with_safari_token_is_claimed_by_safari() {
    let table = default_table();
    let ua = "Mozilla/5.0 (PlayBook; U; RIM Tablet OS 2.1.0; en-US) AppleWebKit/536.2+ \
              (KHTML, like Gecko) Version/7.2.1.0 Safari/536.2+";
    let d = table.detect(ua).unwrap();
    assert_eq!(d.platform, "safari");
    assert_eq!(d.version, Some(7.0));
}

/// Reordering the same rules in a user table changes the winner.
#[test]
fn e2e_user_table_order_decides_winner() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("reordered.toml"),
        r#"
[table]
id = "reordered"
name = "Chrome before Android"

[[rule]]
platform = "chrome"
pattern = 'Chrome/(\d+)'

[[rule]]
platform = "androidChrome"
pattern = 'Android .* Chrome/(\d+)'
"#,
    )
    .unwrap();

    let (tables, errors) = table_mgr::load_all_tables(Some(dir.path()));
    assert!(errors.is_empty(), "{errors:?}");
    let table = table_mgr::select_table(&tables, "reordered").unwrap();

    let ua = "Mozilla/5.0 (Linux; Android 4.4.2; Nexus 5) Chrome/32.0.1700.99 Mobile";
    assert_eq!(table.detect(ua).unwrap().platform, "chrome");
}

// =============================================================================
// Batch, export and report E2E
// =============================================================================

#[test]
fn e2e_input_file_batch_to_csv() {
    let table = default_table();
    let inputs = fs::read_input_file(&fixture("agents.txt"), constants::INPUT_COMMENT_PREFIX).unwrap();
    assert_eq!(inputs.len(), 3);
    assert_eq!(inputs[0].0, 3, "line numbers should count skipped lines");

    let results = batch::probe_batch(&table, &inputs, HostHints::default());
    let mut buf = Vec::new();
    let count = export::export_csv(&results, &mut buf, "memory").unwrap();
    assert_eq!(count, 3);

    let csv = String::from_utf8(buf).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert!(rows[1].starts_with("3,ie,10,,false,false,false,"));
    assert!(rows[2].starts_with("4,ios,7,,false,false,true,"));
    assert!(rows[3].starts_with("6,,,,false,false,false,curl"));
}

/// Command-line strings and file lines share one numbering, so every CSV row
/// names a distinct input line.
#[test]
fn e2e_args_and_file_lines_numbered_uniquely() {
    let table = default_table();
    let args = vec![
        "Mozilla/5.0 (Windows NT 6.1; rv:26.0) Gecko/20100101 Firefox/26.0".to_string(),
        "curl/8.4.0".to_string(),
    ];
    let file_lines =
        fs::read_input_file(&fixture("agents.txt"), constants::INPUT_COMMENT_PREFIX).unwrap();
    let inputs = batch::combine_inputs(&args, file_lines);

    let results = batch::probe_batch(&table, &inputs, HostHints::default());
    let lines: Vec<usize> = results.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![1, 2, 5, 6, 8]);

    let mut unique = lines.clone();
    unique.dedup();
    assert_eq!(unique.len(), lines.len(), "duplicate line numbers: {lines:?}");

    let mut buf = Vec::new();
    export::export_csv(&results, &mut buf, "memory").unwrap();
    let csv = String::from_utf8(buf).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert!(rows[1].starts_with("1,firefox,26,"));
    assert!(rows[3].starts_with("5,ie,10,"));
}

#[test]
fn e2e_report_has_one_row_per_input() {
    let table = default_table();
    let inputs = fs::read_input_file(&fixture("agents.txt"), constants::INPUT_COMMENT_PREFIX).unwrap();
    let results = batch::probe_batch(&table, &inputs, HostHints::default());

    let lines = report::render_results(&results, "  ").unwrap();
    assert_eq!(lines.len(), inputs.len() + 1);
    assert!(lines[2].contains("single-arg-console"), "iOS row: {}", lines[2]);
    assert!(!lines[1].contains("single-arg-console"), "IE row: {}", lines[1]);
}

// =============================================================================
// Repeater E2E
// =============================================================================

/// Build 5, build 5 again, then 0: setup runs 5 + 5 + 0 times with indices
/// 0..4 each time, and render_row touches exactly one existing item.
#[test]
fn e2e_repeater_rebuild_and_render_row() {
    let mut calls: Vec<usize> = Vec::new();
    let template = vec![ComponentDescriptor::new("Label")];

    {
        let setup = |index: usize, item: &mut OwnerProxy| {
            calls.push(index);
            if let Some(label) = item.child_mut("label") {
                let seen = label.get("seen").map_or(0, |s| s.parse::<u32>().unwrap_or(0));
                label.set("seen", (seen + 1).to_string());
            }
        };
        let mut repeater = Repeater::new(template, setup);

        repeater.set_count(5).unwrap();
        repeater.set_count(5).unwrap();
        assert_eq!(repeater.len(), 5);

        repeater.render_row(3).unwrap();
        assert_eq!(repeater.len(), 5);
        let seen = |i: usize| {
            repeater
                .item_at(i)
                .and_then(|item| item.child("label"))
                .and_then(|label| label.get("seen"))
                .map(str::to_string)
        };
        assert_eq!(seen(3).as_deref(), Some("2"));
        assert_eq!(seen(2).as_deref(), Some("1"));

        repeater.set_count(0).unwrap();
        assert!(repeater.is_empty());
    }

    assert_eq!(calls, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4, 3]);
}
