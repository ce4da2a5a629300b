//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves the data file and loads the case table
//! - runs the selection pipeline
//! - hands results to the text report, ASCII plot, JSON output or TUI

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::cli::{Command, GlobalArgs, SeriesArgs, TuiArgs};
use crate::domain::{CaseTable, DEFAULT_DATA_FILE, SeriesConfig, TableSchema};
use crate::error::{AppError, EXIT_INPUT, EXIT_RUNTIME};
use crate::logging::{LogConfig, init_logging};

pub mod pipeline;

/// Environment variable consulted when `--file` is not given.
pub const DATA_PATH_ENV: &str = "CASES_CSV";

/// Entry point for the `cases` binary.
pub fn run() -> Result<(), AppError> {
    // We want `cases` and `cases -f data.csv` to behave like `cases tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let is_tui = matches!(cli.command, Command::Tui(_));
    let log_config = LogConfig::from_verbosity(cli.global.verbose)
        .with_log_file(cli.global.log_file.clone())
        .with_stderr(!is_tui);
    init_logging(&log_config)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open log file: {e}")))?;

    match cli.command {
        Command::Entities => handle_entities(&cli.global),
        Command::Series(args) => handle_series(&cli.global, &args),
        Command::Summary => handle_summary(&cli.global),
        Command::Tui(args) => handle_tui(&cli.global, &args),
    }
}

fn handle_entities(global: &GlobalArgs) -> Result<(), AppError> {
    let table = load(&resolve_data_path(global.file.clone()), &TableSchema::default())?;
    for entity in crate::series::list_entities(&table) {
        println!("{entity}");
    }
    Ok(())
}

fn handle_series(global: &GlobalArgs, args: &SeriesArgs) -> Result<(), AppError> {
    let config = series_config_from_args(global, args);
    let table = load(&config.csv_path, &config.schema)?;
    let entity = config.entity.clone().unwrap_or_default();

    let mut rng = sampler_rng(config.seed);
    let output = pipeline::run_selection(&table, &entity, config.sample_size, &mut rng);

    if args.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to serialize selection: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", crate::report::format_selection_summary(&table, &output));

    if config.preview_rows > 0 {
        let rows = crate::series::filter_entity(&table, &entity);
        println!("First rows for {entity}:");
        println!("{}", crate::report::format_preview(&rows, config.preview_rows));
    }

    println!("{}", crate::report::format_sample_table(&output.sample));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(&output.sample, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    Ok(())
}

fn handle_summary(global: &GlobalArgs) -> Result<(), AppError> {
    let table = load(&resolve_data_path(global.file.clone()), &TableSchema::default())?;
    let rows = pipeline::summarize_entities(&table);
    println!("{}", crate::report::format_entity_summary(&rows));
    Ok(())
}

fn handle_tui(global: &GlobalArgs, args: &TuiArgs) -> Result<(), AppError> {
    let config = tui_config_from_args(global, args);
    let table = load(&config.csv_path, &config.schema)?;
    crate::tui::run(table, config)
}

fn load(path: &std::path::Path, schema: &TableSchema) -> Result<CaseTable, AppError> {
    let table = crate::io::load_table(path, schema)?;
    info!(entities = crate::series::list_entities(&table).len(), "table ready");
    Ok(table)
}

pub fn series_config_from_args(global: &GlobalArgs, args: &SeriesArgs) -> SeriesConfig {
    SeriesConfig {
        csv_path: resolve_data_path(global.file.clone()),
        schema: TableSchema::default(),
        entity: Some(args.entity.clone()),
        sample_size: args.sample_size,
        seed: args.seed,
        preview_rows: args.preview,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    }
}

pub fn tui_config_from_args(global: &GlobalArgs, args: &TuiArgs) -> SeriesConfig {
    SeriesConfig {
        csv_path: resolve_data_path(global.file.clone()),
        entity: args.entity.clone(),
        sample_size: args.sample_size,
        seed: args.seed,
        ..SeriesConfig::default()
    }
}

/// Resolve the CSV location: explicit flag, then `.env`/environment, then the
/// conventional file name in the working directory.
pub fn resolve_data_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    dotenvy::dotenv().ok();
    std::env::var(DATA_PATH_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

/// Build the sampler's RNG: seeded when asked, otherwise from OS entropy.
pub fn sampler_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Rewrite argv so `cases` defaults to `cases tui`.
///
/// Rules:
/// - `cases`                      -> `cases tui`
/// - `cases -f data.csv ...`      -> `cases tui -f data.csv ...`
/// - `cases --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "entities" | "series" | "summary" | "tui");
    if is_subcommand {
        return argv;
    }

    // Global flags may come before an explicit subcommand (`cases -v summary`).
    let names_subcommand = argv[1..]
        .iter()
        .any(|a| matches!(a.as_str(), "entities" | "series" | "summary" | "tui"));

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') && !names_subcommand {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
