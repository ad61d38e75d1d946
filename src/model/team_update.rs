use indexmap::IndexMap;
use itertools::Itertools;

use crate::model::{
    config::RatingConfig,
    curves::expected_score,
    decay::rating_decay,
    rating_tracker::RatingTracker,
    season_weight::SeasonWeight,
    structures::{
        entity::{Driver, Team},
        event::{Qualifying, Race, Sprint},
        session_kind::SessionKind
    }
};

/// `(driver_id, position)` pairs of one team in each part of a race weekend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamPositions {
    pub team_id: u32,
    pub race: Vec<(u32, u32)>,
    pub qualifying: Vec<(u32, u32)>,
    pub sprint: Vec<(u32, u32)>
}

impl TeamPositions {
    /// Groups the weekend's results by team, in order of first appearance in
    /// the race results. Non-numeric positions count as last place.
    ///
    /// Qualifying and sprint results are only looked up for drivers who took
    /// part in the race.
    pub fn collect(race: &Race, qualifying: Option<&Qualifying>, sprint: Option<&Sprint>) -> Vec<TeamPositions> {
        let last = race.field_size() as u32;
        let mut teams: IndexMap<u32, TeamPositions> = IndexMap::new();

        for outcome in &race.results {
            let entry = teams.entry(outcome.team_id).or_insert_with(|| TeamPositions {
                team_id: outcome.team_id,
                ..Default::default()
            });

            entry.race.push((outcome.driver_id, outcome.position.unwrap_or(last)));

            if let Some(q) = qualifying.and_then(|q| q.result_for(outcome.driver_id)) {
                entry.qualifying.push((outcome.driver_id, q.position.unwrap_or(last)));
            }
            if let Some(s) = sprint.and_then(|s| s.result_for(outcome.driver_id)) {
                entry.sprint.push((outcome.driver_id, s.position.unwrap_or(last)));
            }
        }

        teams.into_values().collect()
    }

    pub fn session(&self, kind: SessionKind) -> &[(u32, u32)] {
        match kind {
            SessionKind::Race => &self.race,
            SessionKind::Qualifying => &self.qualifying,
            SessionKind::Sprint => &self.sprint
        }
    }
}

/// Average position of a team's drivers, each scaled by how far the driver's
/// rating is from baseline. Lower is better. Empty sessions are worth 0.
pub fn weighted_position(positions: &[(u32, u32)], drivers: &RatingTracker<Driver>, config: &RatingConfig) -> f64 {
    if positions.is_empty() {
        return 0.0;
    }

    let base = config.base_driver_rating;
    let total: f64 = positions
        .iter()
        .map(|(driver_id, position)| {
            let scale = match drivers.current_rating(*driver_id) {
                Some(rating) => (base + (rating - base) * config.driver_deviation_multiplier) / base,
                None => 1.0
            };
            *position as f64 * scale
        })
        .sum();

    total / positions.len() as f64
}

/// Weighted field position of a team over the whole weekend.
pub fn team_score(
    positions: &TeamPositions,
    drivers: &RatingTracker<Driver>,
    weight: SeasonWeight,
    config: &RatingConfig
) -> f64 {
    let session = |kind| weighted_position(positions.session(kind), drivers, config);

    session(SessionKind::Race) * config.team_race_weight * weight.num_races_weight
        + session(SessionKind::Qualifying) * config.team_qualifying_weight * weight.num_races_weight
        + session(SessionKind::Sprint) * config.team_sprint_weight
}

/// # How this works
/// Teams are compared by their weighted position against the median team of
/// the race:
///
/// `raw = (median - own + teams) / (worst - best)`
///
/// The raw value is then multiplied by the expected score of the team against
/// the average rating of every team scored in this race. A race where all
/// teams scored the same is worth 0.
pub fn relative_change(scores: &[(u32, f64)], team_id: u32, teams: &RatingTracker<Team>, config: &RatingConfig) -> f64 {
    let Some((_, own)) = scores.iter().find(|(id, _)| *id == team_id) else {
        return 0.0;
    };

    let sorted = scores.iter().map(|(_, s)| *s).sorted_by(f64::total_cmp).collect_vec();
    let (Some(best), Some(worst)) = (sorted.first(), sorted.last()) else {
        return 0.0;
    };
    if best == worst {
        return 0.0;
    }

    let median = sorted[sorted.len() / 2];
    let raw = (median - own + scores.len() as f64) / (worst - best);

    let Some(team_rating) = teams.current_rating(team_id) else {
        return 0.0;
    };
    let ratings = scores.iter().filter_map(|(id, _)| teams.current_rating(*id)).collect_vec();
    if ratings.is_empty() {
        return 0.0;
    }
    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;

    raw * expected_score(team_rating, average, config.expected_score_scale)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamUpdate {
    pub team_id: u32,
    pub score: f64,
    pub change: f64,
    pub decay: f64,
    pub before: f64,
    pub after: f64
}

/// Rates every registered team of a race.
///
/// Driver ratings are read as they are when this is called, so it must run
/// after the race's driver updates have been applied. All team changes are
/// computed before any is applied.
pub fn compute_team_updates(
    race: &Race,
    qualifying: Option<&Qualifying>,
    sprint: Option<&Sprint>,
    drivers: &RatingTracker<Driver>,
    teams: &RatingTracker<Team>,
    weight: SeasonWeight,
    config: &RatingConfig
) -> Vec<TeamUpdate> {
    let scores = TeamPositions::collect(race, qualifying, sprint)
        .iter()
        .filter(|p| teams.contains(p.team_id))
        .map(|p| (p.team_id, team_score(p, drivers, weight, config)))
        .collect_vec();

    scores
        .iter()
        .map(|(team_id, score)| {
            let before = teams.current_rating(*team_id).unwrap_or(config.base_team_rating);
            let change = relative_change(&scores, *team_id, teams, config);
            let decay = rating_decay(
                before,
                config.base_team_rating,
                config.team_decay_races,
                weight.num_races_weight
            );

            TeamUpdate {
                team_id: *team_id,
                score: *score,
                change,
                decay,
                before,
                after: before + change * config.team_swing_multiplier * weight.influence_scaled - decay
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::structures::{
            entity::RatingEntry,
            event::{Outcome, QualifyingOutcome}
        },
        utils::test_utils::{generate_driver, generate_outcome, generate_race, generate_team}
    };
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1980, 1, 13).unwrap()
    }

    fn seeded_drivers(ids: &[u32]) -> RatingTracker<Driver> {
        let mut drivers = RatingTracker::new(ids.iter().map(|id| generate_driver(*id)).collect());
        drivers.seed(1200.0);
        drivers
    }

    fn seeded_teams(ids: &[u32]) -> RatingTracker<Team> {
        let mut teams = RatingTracker::new(ids.iter().map(|id| generate_team(*id)).collect());
        teams.seed(1200.0);
        teams
    }

    fn sprint_of(race: &Race, results: Vec<Outcome>) -> Sprint {
        Sprint {
            race_id: race.id,
            results,
            starting_positions: vec![],
            total_time: None
        }
    }

    #[test]
    fn test_collect_groups_by_team() {
        let race = generate_race(
            1,
            "1980-01-13",
            &[
                generate_outcome(1, 20, Some(1)),
                generate_outcome(2, 10, None),
                generate_outcome(3, 20, Some(2)),
            ]
        );
        let qualifying = Qualifying {
            race_id: 1,
            results: vec![
                QualifyingOutcome {
                    driver_id: 3,
                    team_id: 20,
                    position: None
                },
                // Did not start the race
                QualifyingOutcome {
                    driver_id: 9,
                    team_id: 10,
                    position: Some(1)
                },
            ]
        };

        let positions = TeamPositions::collect(&race, Some(&qualifying), None);
        assert_eq!(positions.len(), 2);

        assert_eq!(positions[0].team_id, 20);
        assert_eq!(positions[0].race, vec![(1, 1), (3, 2)]);
        assert_eq!(positions[0].qualifying, vec![(3, 3)]);

        assert_eq!(positions[1].team_id, 10);
        assert_eq!(positions[1].race, vec![(2, 3)]);
        assert!(positions[1].qualifying.is_empty());
        assert!(positions[1].sprint.is_empty());
    }

    #[test]
    fn test_weighted_position_scales_by_rating() {
        let config = RatingConfig::default();
        let mut drivers = seeded_drivers(&[1, 2]);
        drivers.append(2, RatingEntry::race(1320.0, date()));

        assert_abs_diff_eq!(weighted_position(&[(1, 4)], &drivers, &config), 4.0);
        assert_abs_diff_eq!(weighted_position(&[(2, 4)], &drivers, &config), 4.4, epsilon = 1e-12);
        assert_abs_diff_eq!(weighted_position(&[(1, 4), (2, 4)], &drivers, &config), 4.2, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_position_edge_cases() {
        let config = RatingConfig::default();
        let drivers = seeded_drivers(&[1]);

        assert_eq!(weighted_position(&[], &drivers, &config), 0.0);
        // Unregistered driver is not scaled
        assert_abs_diff_eq!(weighted_position(&[(42, 7)], &drivers, &config), 7.0);
    }

    #[test]
    fn test_team_score_accumulates_sprint() {
        let config = RatingConfig::default();
        let drivers = seeded_drivers(&[1, 2]);
        let race = generate_race(1, "1980-01-13", &[generate_outcome(1, 10, Some(2)), generate_outcome(2, 10, Some(4))]);
        let sprint = sprint_of(&race, vec![generate_outcome(1, 10, Some(2)), generate_outcome(2, 10, Some(4))]);

        let positions = TeamPositions::collect(&race, None, Some(&sprint));
        assert_abs_diff_eq!(weighted_position(&positions[0].sprint, &drivers, &config), 3.0);

        let score = team_score(&positions[0], &drivers, SeasonWeight::neutral(), &config);
        assert_abs_diff_eq!(score, 3.0 * 0.6 + 3.0 * 0.1, epsilon = 1e-12);

        let short = SeasonWeight {
            num_races_weight: 2.0,
            influence_scaled: 1.5
        };
        let score = team_score(&positions[0], &drivers, short, &config);
        assert_abs_diff_eq!(score, 3.0 * 0.6 * 2.0 + 3.0 * 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_relative_change_equal_ratings() {
        let config = RatingConfig::default();
        let teams = seeded_teams(&[1, 2, 3]);
        let scores = vec![(1, 1.0), (2, 2.0), (3, 4.0)];

        // median 2, three teams, spread 3, expected score 0.5
        assert_abs_diff_eq!(relative_change(&scores, 1, &teams, &config), 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(relative_change(&scores, 2, &teams, &config), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(relative_change(&scores, 3, &teams, &config), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_relative_change_degenerate() {
        let config = RatingConfig::default();
        let teams = seeded_teams(&[1, 2]);

        assert_eq!(relative_change(&[(1, 3.0), (2, 3.0)], 1, &teams, &config), 0.0);
        assert_eq!(relative_change(&[(1, 3.0)], 1, &teams, &config), 0.0);
        assert_eq!(relative_change(&[], 1, &teams, &config), 0.0);
        assert_eq!(relative_change(&[(1, 1.0), (2, 3.0)], 7, &teams, &config), 0.0);
    }

    #[test]
    fn test_relative_change_weighted_by_team_rating() {
        let config = RatingConfig::default();
        let mut teams = seeded_teams(&[1, 2, 3]);
        teams.append(1, RatingEntry::race(1400.0, date()));
        let scores = vec![(1, 1.0), (2, 1.0), (3, 4.0)];

        let strong = relative_change(&scores, 1, &teams, &config);
        let weak = relative_change(&scores, 2, &teams, &config);
        assert!(strong > weak);
        assert!(weak > 0.0);
    }

    #[test]
    fn test_compute_team_updates() {
        let config = RatingConfig::default();
        let drivers = seeded_drivers(&[1, 2, 3, 4]);
        let mut teams = seeded_teams(&[10, 20]);
        teams.append(20, RatingEntry::race(1250.0, date()));

        let race = generate_race(
            1,
            "1980-01-13",
            &[
                generate_outcome(1, 10, Some(1)),
                generate_outcome(2, 10, Some(2)),
                generate_outcome(3, 20, Some(3)),
                generate_outcome(4, 20, Some(4)),
                // Unregistered team is not scored
                generate_outcome(5, 99, Some(5)),
            ]
        );

        let updates = compute_team_updates(&race, None, None, &drivers, &teams, SeasonWeight::neutral(), &config);
        assert_eq!(updates.iter().map(|u| u.team_id).collect_vec(), vec![10, 20]);

        let front = &updates[0];
        let back = &updates[1];
        assert_abs_diff_eq!(front.score, 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(back.score, 2.1, epsilon = 1e-12);
        assert_eq!(front.decay, 0.0);
        assert_abs_diff_eq!(back.decay, 10.0);
        assert!(front.change > back.change);
        assert_abs_diff_eq!(front.after, 1200.0 + front.change * 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back.after, 1250.0 + back.change * 300.0 - 10.0, epsilon = 1e-9);
    }
}
