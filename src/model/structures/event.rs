use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A classified (or unclassified) result of one driver in a race or sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub driver_id: u32,
    pub team_id: u32,
    /// `None` when the source position is not a number (retired, disqualified, ...)
    pub position: Option<u32>,
    pub status_id: Option<u32>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub driver_id: u32,
    /// 0 is a pit-lane start
    pub position: u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub id: u32,
    pub name: String,
    pub date: NaiveDate,
    pub circuit_id: u32,
    pub results: Vec<Outcome>,
    pub starting_positions: Vec<GridPosition>,
    pub total_time: Option<f64>
}

impl Race {
    pub fn field_size(&self) -> usize {
        self.results.len()
    }

    pub fn grid_position(&self, driver_id: u32) -> Option<u32> {
        grid_position(&self.starting_positions, driver_id)
    }

    pub fn team_ids(&self) -> IndexSet<u32> {
        self.results.iter().map(|r| r.team_id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingOutcome {
    pub driver_id: u32,
    pub team_id: u32,
    pub position: Option<u32>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifying {
    pub race_id: u32,
    pub results: Vec<QualifyingOutcome>
}

impl Qualifying {
    pub fn result_for(&self, driver_id: u32) -> Option<&QualifyingOutcome> {
        self.results.iter().find(|r| r.driver_id == driver_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub race_id: u32,
    pub results: Vec<Outcome>,
    pub starting_positions: Vec<GridPosition>,
    pub total_time: Option<f64>
}

impl Sprint {
    pub fn result_for(&self, driver_id: u32) -> Option<&Outcome> {
        self.results.iter().find(|r| r.driver_id == driver_id)
    }

    pub fn grid_position(&self, driver_id: u32) -> Option<u32> {
        grid_position(&self.starting_positions, driver_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub year: i32,
    /// Sorted by date
    pub races: Vec<Race>
}

impl Season {
    pub fn new(year: i32, races: Vec<Race>) -> Season {
        Season { year, races }
    }

    /// Teams appearing in any result of the season, in first-appearance order.
    pub fn team_ids(&self) -> IndexSet<u32> {
        self.races
            .iter()
            .flat_map(|race| race.results.iter().map(|r| r.team_id))
            .collect()
    }
}

fn grid_position(grid: &[GridPosition], driver_id: u32) -> Option<u32> {
    grid.iter().find(|g| g.driver_id == driver_id).map(|g| g.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{generate_outcome, generate_race};
    use itertools::Itertools;

    #[test]
    fn test_season_team_ids_first_appearance_order() {
        let r1 = generate_race(1, "1950-05-13", &[generate_outcome(1, 20, Some(1)), generate_outcome(2, 10, Some(2))]);
        let r2 = generate_race(2, "1950-05-21", &[generate_outcome(3, 30, Some(1)), generate_outcome(1, 20, Some(2))]);
        let season = Season::new(1950, vec![r1, r2]);

        assert_eq!(season.team_ids().into_iter().collect_vec(), vec![20, 10, 30]);
    }

    #[test]
    fn test_grid_lookup() {
        let race = generate_race(1, "1950-05-13", &[generate_outcome(1, 20, Some(1))]);
        assert_eq!(race.grid_position(1), Some(1));
        assert_eq!(race.grid_position(99), None);
        assert_eq!(race.field_size(), 1);
    }
}
