//! Command-line parsing for the case-rate curve viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::DEFAULT_SAMPLE_SIZE;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cases", version, about = "Daily COVID-19 case curves from biweekly counts")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Biweekly case CSV (defaults to `$CASES_CSV`, then `biweekly-confirmed-covid-19-cases.csv`).
    #[arg(short = 'f', long, global = true, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the selectable entities in first-seen order.
    Entities,
    /// Derive and print the daily case series for one entity.
    Series(SeriesArgs),
    /// Print a per-entity overview of the whole table.
    Summary,
    /// Launch the interactive TUI.
    ///
    /// This uses the same selection pipeline as `cases series`, but renders the
    /// entity picker and chart in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Options for `cases series`.
#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Entity to select (exact, case-sensitive).
    #[arg(short = 'e', long)]
    pub entity: String,

    /// Number of points to sample for display.
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Random seed for sampling (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the selection as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Number of filtered source rows to preview.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Skip the ASCII plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `cases tui`.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Entity selected at startup (first entity when omitted or unknown).
    #[arg(short = 'e', long)]
    pub entity: Option<String>,

    /// Number of points to sample for display.
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Random seed for sampling (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_series_with_defaults() {
        let cli = Cli::parse_from(["cases", "series", "-e", "Brazil"]);
        let Command::Series(args) = cli.command else {
            panic!("expected series command");
        };
        assert_eq!(args.entity, "Brazil");
        assert_eq!(args.sample_size, DEFAULT_SAMPLE_SIZE);
        assert!(!args.no_plot);
        assert!(args.seed.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cases", "summary", "-f", "data.csv", "-vv"]);
        assert!(matches!(cli.command, Command::Summary));
        assert_eq!(cli.global.file, Some(PathBuf::from("data.csv")));
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn entity_names_with_spaces() {
        let cli = Cli::parse_from(["cases", "tui", "--entity", "South Africa", "--seed", "7"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui command");
        };
        assert_eq!(args.entity.as_deref(), Some("South Africa"));
        assert_eq!(args.seed, Some(7));
    }
}
