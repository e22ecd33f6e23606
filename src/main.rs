// UAProbe - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Platform table loading (built-in + user-defined)
// 4. Probing the input strings and printing the report

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use uaprobe::app::{batch, report, table_mgr};
use uaprobe::core::export;
use uaprobe::core::model::HostHints;
use uaprobe::platform::config::{self, OutputFormat, PlatformPaths};
use uaprobe::platform::fs;
use uaprobe::util::constants;
use uaprobe::util::error::{ExportError, UaProbeError};

/// UAProbe - classify user-agent strings against an ordered platform table.
///
/// Strings are taken from the command line, from --input, or from stdin when
/// neither is given. The first rule in the table that matches decides the
/// platform and version.
#[derive(Parser, Debug)]
#[command(name = "uaprobe", version, about)]
struct Cli {
    /// User-agent strings to classify.
    user_agents: Vec<String>,

    /// File with one user-agent per line ("-" for stdin). Blank lines and
    /// lines starting with '#' are ignored.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// ID of the platform table to match against.
    #[arg(short = 't', long = "table")]
    table: Option<String>,

    /// Additional directory containing user-defined platform tables.
    #[arg(short = 'p', long = "table-dir")]
    table_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short = 'o', long = "output", value_enum)]
    output: Option<OutputFormat>,

    /// The host has native touch events.
    #[arg(long)]
    touch: bool,

    /// The host has native gesture events.
    #[arg(long)]
    gesture: bool,

    /// Maximum touch points reported by the host (implies touch and gesture when > 0).
    #[arg(long = "max-touch-points", default_value_t = 0)]
    max_touch_points: u32,

    /// Print the rules of the selected table and exit.
    #[arg(long = "list-rules")]
    list_rules: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let paths = PlatformPaths::resolve();
    let (app_config, config_warnings) = config::load_config(&paths.config_dir);

    uaprobe::util::logging::init(cli.debug, app_config.log_level.as_deref());

    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    tracing::debug!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "UAProbe starting"
    );

    if let Err(e) = run(&cli, &paths, &app_config) {
        tracing::error!(error = %e, "Probe failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, paths: &PlatformPaths, app_config: &config::AppConfig) -> uaprobe::util::error::Result<()> {
    // Table directory: CLI override > config > platform default
    let table_dir = cli
        .table_dir
        .as_deref()
        .or(app_config.user_table_dir.as_deref())
        .unwrap_or(&paths.user_tables_dir);

    let (tables, table_errors) = table_mgr::load_all_tables(Some(table_dir));
    for err in &table_errors {
        tracing::warn!(error = %err, "Table loading warning");
    }

    let table_id = cli.table.as_deref().unwrap_or(&app_config.table_id);
    let table = table_mgr::select_table(&tables, table_id)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let write_err = |e: io::Error| ExportError::Io {
        target: "<stdout>".to_string(),
        source: e,
    };

    if cli.list_rules {
        for line in report::render_rules(table, &app_config.separator)? {
            writeln!(out, "{line}").map_err(write_err)?;
        }
        return Ok(());
    }

    let inputs = collect_inputs(cli)?;
    let hints = HostHints {
        touch_events: cli.touch,
        gesture_events: cli.gesture,
        max_touch_points: cli.max_touch_points,
    };
    let results = batch::probe_batch(table, &inputs, hints);

    match cli.output.unwrap_or(app_config.output_format) {
        OutputFormat::Text => {
            for line in report::render_results(&results, &app_config.separator)? {
                writeln!(out, "{line}").map_err(write_err)?;
            }
        }
        OutputFormat::Json => {
            export::export_json(&results, &mut out, "<stdout>")?;
            writeln!(out).map_err(write_err)?;
        }
        OutputFormat::Csv => {
            export::export_csv(&results, &mut out, "<stdout>")?;
        }
    }

    out.flush().map_err(write_err)?;
    Ok(())
}

/// Gather `(line_number, user_agent)` pairs from the CLI arguments, the
/// input file, or stdin. File and stdin lines are numbered after the
/// arguments.
fn collect_inputs(cli: &Cli) -> uaprobe::util::error::Result<Vec<(usize, String)>> {
    let read_err = |path: PathBuf| {
        move |e: io::Error| UaProbeError::Io {
            path,
            operation: "read input",
            source: e,
        }
    };

    let file_lines = match &cli.input {
        Some(path) if path.as_os_str() == "-" => {
            fs::read_input_lines(io::stdin().lock(), constants::INPUT_COMMENT_PREFIX)
                .map_err(read_err(PathBuf::from("<stdin>")))?
        }
        Some(path) => fs::read_input_file(path, constants::INPUT_COMMENT_PREFIX)
            .map_err(read_err(path.clone()))?,
        None if cli.user_agents.is_empty() => {
            fs::read_input_lines(io::stdin().lock(), constants::INPUT_COMMENT_PREFIX)
                .map_err(read_err(PathBuf::from("<stdin>")))?
        }
        None => Vec::new(),
    };

    let inputs = batch::combine_inputs(&cli.user_agents, file_lines);
    tracing::debug!(count = inputs.len(), "Collected input strings");
    Ok(inputs)
}
