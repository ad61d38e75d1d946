use std::{
    fs,
    path::{Path, PathBuf}
};

use tracing::info;

use crate::{
    model::{
        rating_tracker::RatingTracker,
        structures::entity::{Driver, Team}
    },
    report::{
        leaderboard::{driver_lines, team_lines},
        ReportError
    }
};

pub const DRIVER_RATINGS_CURRENT: &str = "driver_ratings_current.txt";
pub const DRIVER_RATINGS_PEAK: &str = "driver_ratings_peak.txt";
pub const TEAM_RATINGS_CURRENT: &str = "team_ratings_current.txt";
pub const TEAM_RATINGS_PEAK: &str = "team_ratings_peak.txt";

/// Writes the current and peak leaderboards of drivers and teams into `dir`,
/// creating it if needed. Returns the paths written.
pub fn save_ratings(
    dir: &Path,
    drivers: &RatingTracker<Driver>,
    teams: &RatingTracker<Team>
) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source
    })?;

    let files = [
        (DRIVER_RATINGS_CURRENT, driver_lines(drivers, &drivers.current_leaderboard(), false)),
        (DRIVER_RATINGS_PEAK, driver_lines(drivers, &drivers.peak_leaderboard(), true)),
        (TEAM_RATINGS_CURRENT, team_lines(&teams.current_leaderboard(), false)),
        (TEAM_RATINGS_PEAK, team_lines(&teams.peak_leaderboard(), true))
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, lines) in files {
        let path = dir.join(name);
        write_lines(&path, &lines)?;
        info!(path = %path.display(), rows = lines.len(), "Saved ratings");
        written.push(path);
    }

    Ok(written)
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), ReportError> {
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }

    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source
    })
}
