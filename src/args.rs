use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "F1 Ratings",
    long_about = "Computes driver and team ratings for every Formula 1 race since 1950"
)]
pub struct Args {
    /// JSON export of the Formula 1 dataset with `drivers`, `teams`, `races`,
    /// `results`, `qualifying`, `sprints` and `statuses` tables
    #[arg(short, long, env = "F1R_DATASET", help = "Path to the dataset")]
    pub dataset: PathBuf,

    /// Rating configuration overrides. Fields left out keep their defaults.
    #[arg(short, long, env = "F1R_CONFIG", help = "Path to a JSON rating config")]
    pub config: Option<PathBuf>,

    #[arg(short, long, env = "F1R_OUTPUT", default_value = "ratings", help = "Directory for the rating files")]
    pub output: PathBuf,

    /// The season still in progress. Defaults to the current year.
    #[arg(long, help = "Year of the season in progress")]
    pub current_season: Option<i32>,

    /// Races after this date are ignored. Defaults to today.
    #[arg(long, help = "Processing date (YYYY-MM-DD)")]
    pub today: Option<NaiveDate>,

    /// Prints the rating progression of these drivers, e.g. "Max Verstappen"
    #[arg(long = "driver", help = "Driver to print the rating progression for")]
    pub drivers: Vec<String>,

    #[arg(long = "team", help = "Team to print the rating progression for")]
    pub teams: Vec<String>,

    #[arg(long, default_value = "1950-01-01", help = "Start of the printed progressions (YYYY-MM-DD)")]
    pub since: NaiveDate,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}
