use chrono::NaiveDate;

use crate::model::{
    rating_tracker::{LeaderboardEntry, RatingTracker},
    structures::{
        entity::{Driver, Rated, Team},
        event::Race
    }
};

fn date_or_na(date: Option<NaiveDate>) -> String {
    date.map_or("N/A".to_string(), |d| d.to_string())
}

/// `   1. Juan                 Fangio               |  1398`, with the date
/// the rating was reached appended when `with_date` is set.
pub fn driver_lines(drivers: &RatingTracker<Driver>, board: &[LeaderboardEntry], with_date: bool) -> Vec<String> {
    board
        .iter()
        .filter_map(|entry| {
            let driver = drivers.get(entry.id)?;
            let mut line = format!(
                "{:>4}. {:<20} {:<20} | {:>5}",
                entry.rank,
                driver.forename,
                driver.surname,
                entry.rating.round()
            );
            if with_date {
                line.push(' ');
                line.push_str(&date_or_na(entry.date));
            }
            Some(line)
        })
        .collect()
}

/// `   1. Ferrari              |  1512`, optionally followed by the date.
pub fn team_lines(board: &[LeaderboardEntry], with_date: bool) -> Vec<String> {
    board
        .iter()
        .map(|entry| {
            let line = format!("{:>4}. {:<20} | {:>5}", entry.rank, entry.name, entry.rating.round());
            if with_date {
                format!("{} {}", line, date_or_na(entry.date))
            } else {
                line
            }
        })
        .collect()
}

/// Drivers and teams of `race`, ranked by their current rating.
pub fn todays_grid(drivers: &RatingTracker<Driver>, teams: &RatingTracker<Team>, race: &Race) -> String {
    let driver_ids = race.results.iter().map(|r| r.driver_id).collect::<Vec<_>>();
    let team_ids = race.team_ids();

    let mut out = String::from("Today's grid:\n");
    for entry in drivers.current_leaderboard_where(|d| driver_ids.contains(&d.id)) {
        if let Some(driver) = drivers.get(entry.id) {
            out.push_str(&format!("{:>2}. {}\n", entry.rank, driver));
        }
    }

    out.push_str("Today's teams:\n");
    for entry in teams.current_leaderboard_where(|t| team_ids.contains(&t.id)) {
        if let Some(team) = teams.get(entry.id) {
            out.push_str(&format!("{:>2}. {}\n", entry.rank, team));
        }
    }

    out
}

/// Race-by-race ratings of one driver or team between `start` and `end`.
pub fn progression_report(entity: &impl Rated, start: NaiveDate, end: NaiveDate) -> String {
    let mut out = format!("Rating progression for {}:\n", entity.display_name());
    for (date, rating) in entity.history().progression(start, end) {
        out.push_str(&format!("Rating: {}, Date: {}\n", rating.round(), date));
    }

    out
}

pub fn last_change_line(entity: &impl Rated) -> String {
    match entity.history().last_change() {
        Some((change, date)) => format!("Last change for {}: {:+.2} on {}", entity.display_name(), change, date_or_na(date)),
        None => format!("Last change for {}: N/A", entity.display_name())
    }
}
