use std::process::exit;

use chrono::{Datelike, Utc};
use clap::Parser;
use f1_ratings::{
    args::Args,
    dataset::load_dataset,
    error::AppError,
    model::{compute_ratings, rating_tracker::RatingTracker, RatingConfig},
    report::{last_change_line, progression_report, save_ratings, todays_grid}
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    dotenv::dotenv().ok(); // Load environment variables from .env file
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());

    let mut config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading rating config");
            RatingConfig::from_file(path)?
        }
        None => RatingConfig::default()
    };
    if config.current_season.is_none() {
        config.current_season = Some(args.current_season.unwrap_or(today.year()));
    }
    config.validate()?;

    let dataset = load_dataset(&args.dataset, today)?;
    let last_race = dataset.last_race().cloned();

    info!(seasons = dataset.seasons.len(), "Computing ratings");
    let (drivers, teams) = compute_ratings(
        &dataset.seasons,
        dataset.drivers,
        dataset.teams,
        dataset.qualifying,
        dataset.sprints,
        dataset.statuses,
        &config
    );
    info!("Ratings computed successfully");

    let drivers = RatingTracker::new(drivers);
    let teams = RatingTracker::new(teams);
    save_ratings(&args.output, &drivers, &teams)?;

    if let Some(race) = &last_race {
        print!("{}", todays_grid(&drivers, &teams, race));
    }

    for name in &args.drivers {
        match drivers.find_by_name(name) {
            Some(driver) => {
                print!("{}", progression_report(driver, args.since, today));
                println!("{}", last_change_line(driver));
            }
            None => warn!(name = %name, "No driver with this name")
        }
    }
    for name in &args.teams {
        match teams.find_by_name(name) {
            Some(team) => {
                print!("{}", progression_report(team, args.since, today));
                println!("{}", last_change_line(team));
            }
            None => warn!(name = %name, "No team with this name")
        }
    }

    Ok(())
}
