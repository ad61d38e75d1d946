use std::{fs, path::Path};

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    dataset::{
        dataset_structs::{parse_race_time, RawDataset, RawResult},
        DatasetError
    },
    model::{
        constants::FIRST_SEASON,
        structures::{
            entity::{Driver, Team},
            event::{GridPosition, Outcome, Qualifying, QualifyingOutcome, Race, Season, Sprint},
            status::StatusTable
        }
    }
};

/// Everything the rating computation needs, validated and grouped.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub drivers: Vec<Driver>,
    pub teams: Vec<Team>,
    /// One per year from the first championship season through the processing
    /// year, empty years included
    pub seasons: Vec<Season>,
    pub qualifying: Vec<Qualifying>,
    pub sprints: Vec<Sprint>,
    pub statuses: StatusTable
}

impl Dataset {
    /// The most recent race with results.
    pub fn last_race(&self) -> Option<&Race> {
        self.seasons.iter().rev().find_map(|s| s.races.last())
    }

    pub fn race_count(&self) -> usize {
        self.seasons.iter().map(|s| s.races.len()).sum()
    }
}

pub fn load_dataset(path: &Path, today: NaiveDate) -> Result<Dataset, DatasetError> {
    info!(path = %path.display(), "Loading dataset");
    let raw = fs::read_to_string(path)?;
    parse_dataset(&raw, today)
}

/// Builds a [`Dataset`] from a JSON document. Races after `today` are dropped.
pub fn parse_dataset(json: &str, today: NaiveDate) -> Result<Dataset, DatasetError> {
    let raw: RawDataset = serde_json::from_str(json)?;

    if raw.drivers.is_empty() {
        return Err(DatasetError::Empty("drivers"));
    }
    if raw.teams.is_empty() {
        return Err(DatasetError::Empty("teams"));
    }

    let drivers = raw.drivers.iter().map(|d| Driver::new(d.driver_id, &d.forename, &d.surname)).collect_vec();
    let teams = raw.teams.iter().map(|t| Team::new(t.team_id, &t.name)).collect_vec();
    let statuses: StatusTable = raw.statuses.iter().map(|s| (s.status_id, s.status.clone())).collect();

    let races = build_races(&raw, today);
    if races.is_empty() {
        return Err(DatasetError::Empty("races"));
    }

    let qualifying = build_qualifying(&raw, &races);
    let sprints = build_sprints(&raw, &races);
    let seasons = compile_seasons(races, FIRST_SEASON, today.year());

    let dataset = Dataset {
        drivers,
        teams,
        seasons,
        qualifying,
        sprints,
        statuses
    };
    info!(
        drivers = dataset.drivers.len(),
        teams = dataset.teams.len(),
        races = dataset.race_count(),
        qualifying = dataset.qualifying.len(),
        sprints = dataset.sprints.len(),
        "Dataset loaded"
    );

    Ok(dataset)
}

/// Races up to `today` with their results attached, keyed by race id.
fn build_races(raw: &RawDataset, today: NaiveDate) -> IndexMap<u32, Race> {
    let mut races: IndexMap<u32, Race> = IndexMap::with_capacity(raw.races.len());
    for r in &raw.races {
        let Ok(date) = NaiveDate::parse_from_str(&r.date, "%Y-%m-%d") else {
            warn!(race_id = r.race_id, date = %r.date, "Skipping race with an invalid date");
            continue;
        };
        if date > today {
            debug!(race_id = r.race_id, %date, "Skipping future race");
            continue;
        }

        races.insert(
            r.race_id,
            Race {
                id: r.race_id,
                name: r.name.clone(),
                date,
                circuit_id: r.circuit_id,
                results: Vec::new(),
                starting_positions: Vec::new(),
                total_time: None
            }
        );
    }

    for row in &raw.results {
        let Some(race) = races.get_mut(&row.race_id) else {
            debug!(race_id = row.race_id, driver_id = row.driver_id, "Dropping result of an unknown or future race");
            continue;
        };

        if let Some(time) = row.time.as_deref().and_then(parse_race_time) {
            race.total_time = Some(time);
        }
        race.results.push(outcome(row));
        if let Some(grid) = row.grid {
            race.starting_positions.push(GridPosition {
                driver_id: row.driver_id,
                position: grid
            });
        }
    }

    races.sort_by(|_, a, _, b| a.date.cmp(&b.date));
    races
}

fn outcome(row: &RawResult) -> Outcome {
    Outcome {
        driver_id: row.driver_id,
        team_id: row.team_id,
        position: row.position,
        status_id: row.status_id
    }
}

fn known_race(races: &IndexMap<u32, Race>, race_id: u32, table: &str) -> bool {
    if races.contains_key(&race_id) {
        return true;
    }

    warn!(race_id, table, "Dropping session of an unknown or future race");
    false
}

fn build_qualifying(raw: &RawDataset, races: &IndexMap<u32, Race>) -> Vec<Qualifying> {
    let mut sessions: IndexMap<u32, Qualifying> = IndexMap::new();
    for row in &raw.qualifying {
        let session = sessions.entry(row.race_id).or_insert_with(|| Qualifying {
            race_id: row.race_id,
            results: Vec::new()
        });
        session.results.push(QualifyingOutcome {
            driver_id: row.driver_id,
            team_id: row.team_id,
            position: row.position
        });
    }

    sessions
        .into_values()
        .filter(|q| known_race(races, q.race_id, "qualifying"))
        .collect()
}

fn build_sprints(raw: &RawDataset, races: &IndexMap<u32, Race>) -> Vec<Sprint> {
    let mut sessions: IndexMap<u32, Sprint> = IndexMap::new();
    for row in &raw.sprints {
        let session = sessions.entry(row.race_id).or_insert_with(|| Sprint {
            race_id: row.race_id,
            results: Vec::new(),
            starting_positions: Vec::new(),
            total_time: None
        });

        session.results.push(outcome(row));
        if let Some(grid) = row.grid {
            session.starting_positions.push(GridPosition {
                driver_id: row.driver_id,
                position: grid
            });
        }
        if let Some(time) = row.time.as_deref().and_then(parse_race_time) {
            session.total_time = Some(time);
        }
    }

    sessions
        .into_values()
        .filter(|s| known_race(races, s.race_id, "sprints"))
        .collect()
}

/// Splits date-sorted races into one season per year in
/// `first_year..=last_year`. Years without races get an empty season.
pub fn compile_seasons(races: IndexMap<u32, Race>, first_year: i32, last_year: i32) -> Vec<Season> {
    let mut by_year = races.into_values().into_group_map_by(|r| r.date.year());

    (first_year..=last_year)
        .map(|year| {
            let mut races = by_year.remove(&year).unwrap_or_default();
            races.sort_by_key(|r| r.date);
            Season::new(year, races)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(1952, 12, 31).unwrap()
    }

    const SAMPLE: &str = r#"{
        "drivers": [
            {"driverId": 1, "forename": "Nino", "surname": "Farina"},
            {"driverId": 2, "forename": "Juan", "surname": "Fangio"}
        ],
        "teams": [{"constructorId": 51, "name": "Alfa Romeo"}],
        "races": [
            {"raceId": 2, "name": "Monaco Grand Prix", "date": "1950-05-21", "circuitId": 6},
            {"raceId": 1, "name": "British Grand Prix", "date": "1950-05-13", "circuitId": 9},
            {"raceId": 3, "name": "Swiss Grand Prix", "date": "1951-05-27", "circuitId": 66},
            {"raceId": 9, "name": "Future Grand Prix", "date": "2099-05-27", "circuitId": 1}
        ],
        "results": [
            {"raceId": 1, "driverId": 1, "constructorId": 51, "position": "1", "grid": 1, "statusId": 1, "time": "2:13:23.6"},
            {"raceId": 1, "driverId": 2, "constructorId": 51, "position": "\\N", "grid": 3, "statusId": 51, "time": "\\N"},
            {"raceId": 2, "driverId": 2, "constructorId": 51, "position": 1, "grid": 1, "statusId": 1},
            {"raceId": 3, "driverId": 2, "constructorId": 51, "position": 1, "grid": 1, "statusId": 1},
            {"raceId": 9, "driverId": 2, "constructorId": 51, "position": 1, "grid": 1, "statusId": 1}
        ],
        "qualifying": [
            {"raceId": 1, "driverId": 1, "constructorId": 51, "position": 1},
            {"raceId": 1, "driverId": 2, "constructorId": 51, "position": 2},
            {"raceId": 404, "driverId": 2, "constructorId": 51, "position": 2}
        ],
        "statuses": [{"statusId": 1, "status": "Finished"}, {"statusId": 51, "status": "Overheating"}]
    }"#;

    #[test]
    fn test_parse_dataset() {
        let dataset = parse_dataset(SAMPLE, today()).unwrap();

        assert_eq!(dataset.drivers.len(), 2);
        assert_eq!(dataset.teams[0].name, "Alfa Romeo");
        assert_eq!(dataset.statuses.label(51), Some("Overheating"));

        // 1950 through 1952, future race dropped
        assert_eq!(dataset.seasons.iter().map(|s| s.year).collect_vec(), vec![1950, 1951, 1952]);
        assert_eq!(dataset.race_count(), 3);
        assert!(dataset.seasons[2].races.is_empty());

        let british = &dataset.seasons[0].races[0];
        assert_eq!(british.id, 1);
        assert_eq!(british.results[1].position, None);
        assert_eq!(british.grid_position(2), Some(3));
        assert_eq!(british.total_time, Some(2.0 * 3600.0 + 13.0 * 60.0 + 23.6));

        assert_eq!(dataset.qualifying.len(), 1);
        assert_eq!(dataset.qualifying[0].results.len(), 2);
        assert!(dataset.sprints.is_empty());
        assert_eq!(dataset.last_race().unwrap().id, 3);
    }

    #[test]
    fn test_empty_categories_are_fatal() {
        assert!(matches!(parse_dataset("{}", today()), Err(DatasetError::Empty("drivers"))));

        let no_races = r#"{
            "drivers": [{"driverId": 1, "forename": "Nino", "surname": "Farina"}],
            "teams": [{"constructorId": 51, "name": "Alfa Romeo"}]
        }"#;
        assert!(matches!(parse_dataset(no_races, today()), Err(DatasetError::Empty("races"))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_dataset("{ not json", today()), Err(DatasetError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_dataset(Path::new("/definitely/not/here.json"), today());
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }
}
