use crate::model::structures::{
    entity::{Driver, Team},
    event::{GridPosition, Outcome, Qualifying, QualifyingOutcome, Race, Season, Sprint}
};
use chrono::{Duration, NaiveDate};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn generate_driver(id: u32) -> Driver {
    Driver::new(id, "Driver", &id.to_string())
}

pub fn generate_team(id: u32) -> Team {
    Team::new(id, &format!("Team {}", id))
}

pub fn generate_outcome(driver_id: u32, team_id: u32, position: Option<u32>) -> Outcome {
    Outcome {
        driver_id,
        team_id,
        position,
        status_id: None
    }
}

/// A race on `date` (`YYYY-MM-DD`). Drivers line up on the grid in the order
/// the outcomes are given.
pub fn generate_race(id: u32, date: &str, outcomes: &[Outcome]) -> Race {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or_else(|_| panic!("Invalid race date {}", date));
    let starting_positions = outcomes
        .iter()
        .enumerate()
        .map(|(i, o)| GridPosition {
            driver_id: o.driver_id,
            position: i as u32 + 1
        })
        .collect();

    Race {
        id,
        name: format!("Race {}", id),
        date,
        circuit_id: 1,
        results: outcomes.to_vec(),
        starting_positions,
        total_time: None
    }
}

/// Team `t` (1-based) runs drivers `2t - 1` and `2t`.
pub fn team_driver_ids(team_id: u32) -> [u32; 2] {
    [team_id * 2 - 1, team_id * 2]
}

/// A season of `n_races` weekly races between `n_teams` two-car teams.
///
/// Finishing orders rotate from race to race, so every driver wins at some point.
pub fn generate_season(year: i32, n_races: usize, n_teams: u32) -> Season {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let driver_ids: Vec<(u32, u32)> = (1..=n_teams)
        .flat_map(|t| team_driver_ids(t).map(|d| (d, t)))
        .collect();
    let field = driver_ids.len();

    let races = (0..n_races)
        .map(|i| {
            let outcomes: Vec<Outcome> = driver_ids
                .iter()
                .enumerate()
                .map(|(j, (driver_id, team_id))| generate_outcome(*driver_id, *team_id, Some(((j + i) % field) as u32 + 1)))
                .collect();
            let date = start + Duration::days(7 * i as i64);

            generate_race(year as u32 * 100 + i as u32, &date.format("%Y-%m-%d").to_string(), &outcomes)
        })
        .collect();

    Season::new(year, races)
}

/// A complete synthetic championship history.
pub struct SyntheticHistory {
    pub seasons: Vec<Season>,
    pub drivers: Vec<Driver>,
    pub teams: Vec<Team>,
    pub qualifying: Vec<Qualifying>,
    pub sprints: Vec<Sprint>
}

/// Random but reproducible seasons: shuffled finishing orders, occasional
/// retirements, a qualifying session for every race and a sprint for every
/// fourth race. The same seed always gives the same history.
pub fn generate_random_history(
    first_year: i32,
    n_seasons: usize,
    races_per_season: usize,
    n_teams: u32,
    seed: u64
) -> SyntheticHistory {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let teams: Vec<Team> = (1..=n_teams).map(generate_team).collect();
    let drivers: Vec<Driver> = (1..=n_teams * 2).map(generate_driver).collect();
    let mut seasons = Vec::with_capacity(n_seasons);
    let mut qualifying = Vec::new();
    let mut sprints = Vec::new();

    for s in 0..n_seasons {
        let year = first_year + s as i32;
        // Some teams sit a season out
        let entrants: Vec<u32> = (1..=n_teams).filter(|_| rng.random_bool(0.9)).collect();
        let entrants = if entrants.is_empty() { vec![1] } else { entrants };
        let start = NaiveDate::from_ymd_opt(year, 3, 1).unwrap();

        let mut races = Vec::with_capacity(races_per_season);
        for r in 0..races_per_season {
            let race_id = year as u32 * 100 + r as u32;
            let mut field: Vec<(u32, u32)> = entrants
                .iter()
                .flat_map(|t| team_driver_ids(*t).map(|d| (d, *t)))
                .collect();

            field.shuffle(&mut rng);
            let grid = field.clone();
            field.shuffle(&mut rng);

            let results: Vec<Outcome> = field
                .iter()
                .enumerate()
                .map(|(i, (driver_id, team_id))| {
                    if rng.random_bool(0.1) {
                        // Retirement, sometimes the driver's own fault
                        let status = if rng.random_bool(0.3) { 20 } else { 5 };
                        Outcome {
                            driver_id: *driver_id,
                            team_id: *team_id,
                            position: None,
                            status_id: Some(status)
                        }
                    } else {
                        Outcome {
                            driver_id: *driver_id,
                            team_id: *team_id,
                            position: Some(i as u32 + 1),
                            status_id: Some(1)
                        }
                    }
                })
                .collect();
            let starting_positions: Vec<GridPosition> = grid
                .iter()
                .enumerate()
                .map(|(i, (driver_id, _))| GridPosition {
                    driver_id: *driver_id,
                    position: i as u32 + 1
                })
                .collect();

            qualifying.push(Qualifying {
                race_id,
                results: grid
                    .iter()
                    .enumerate()
                    .map(|(i, (driver_id, team_id))| QualifyingOutcome {
                        driver_id: *driver_id,
                        team_id: *team_id,
                        position: Some(i as u32 + 1)
                    })
                    .collect()
            });

            if r % 4 == 3 {
                let mut sprint_order = field.clone();
                sprint_order.shuffle(&mut rng);
                sprints.push(Sprint {
                    race_id,
                    results: sprint_order
                        .iter()
                        .enumerate()
                        .map(|(i, (driver_id, team_id))| generate_outcome(*driver_id, *team_id, Some(i as u32 + 1)))
                        .collect(),
                    starting_positions: starting_positions.clone(),
                    total_time: None
                });
            }

            races.push(Race {
                id: race_id,
                name: format!("Race {}", race_id),
                date: start + Duration::days(14 * r as i64),
                circuit_id: r as u32 + 1,
                results,
                starting_positions,
                total_time: None
            });
        }

        seasons.push(Season::new(year, races));
    }

    SyntheticHistory {
        seasons,
        drivers,
        teams,
        qualifying,
        sprints
    }
}
