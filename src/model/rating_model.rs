use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, info, trace};

use crate::{
    model::{
        config::RatingConfig,
        driver_update::{DriverUpdate, EventContext},
        rating_tracker::RatingTracker,
        season_transition::apply_season_transition,
        season_weight::{most_races_in_season, SeasonWeight},
        structures::{
            entity::{Driver, RatingEntry, Team},
            event::{Qualifying, Race, Season, Sprint},
            status::StatusTable
        },
        team_update::compute_team_updates
    },
    utils::progress_utils::progress_bar
};

pub struct RatingModel {
    config: RatingConfig,
    drivers: RatingTracker<Driver>,
    teams: RatingTracker<Team>,
    qualifying: HashMap<u32, Qualifying>,
    sprints: HashMap<u32, Sprint>,
    statuses: StatusTable
}

impl RatingModel {
    /// Builds the lookup tables and seeds every driver and team without a
    /// history at the baseline.
    ///
    /// Qualifying and sprint sessions are keyed by race. If a race has more
    /// than one of either, the first one is used.
    pub fn new(
        config: RatingConfig,
        drivers: Vec<Driver>,
        teams: Vec<Team>,
        qualifying: Vec<Qualifying>,
        sprints: Vec<Sprint>,
        statuses: StatusTable
    ) -> RatingModel {
        let mut drivers = RatingTracker::new(drivers);
        let mut teams = RatingTracker::new(teams);
        drivers.seed(config.base_driver_rating);
        teams.seed(config.base_team_rating);

        let mut qualifying_by_race = HashMap::with_capacity(qualifying.len());
        for q in qualifying {
            qualifying_by_race.entry(q.race_id).or_insert(q);
        }
        let mut sprints_by_race = HashMap::with_capacity(sprints.len());
        for s in sprints {
            sprints_by_race.entry(s.race_id).or_insert(s);
        }

        RatingModel {
            config,
            drivers,
            teams,
            qualifying: qualifying_by_race,
            sprints: sprints_by_race,
            statuses
        }
    }

    /// Rates every race of every season, oldest first.
    ///
    /// Seasons are processed by ascending year and races by ascending date.
    /// Entries sharing a year or date keep the order they were given in.
    pub fn process(&mut self, seasons: &[Season]) {
        let most_races = most_races_in_season(seasons);
        let ordered = seasons.iter().sorted_by_key(|s| s.year).collect_vec();

        let bar = progress_bar(ordered.len() as u64, "Processing seasons".to_string());
        for season in &ordered {
            let previous = ordered.iter().find(|s| s.year == season.year - 1).copied();
            self.process_season(season, previous, most_races);

            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
    }

    fn process_season(&mut self, season: &Season, previous: Option<&Season>, most_races: usize) {
        apply_season_transition(season, previous, &mut self.teams, &self.config);

        let weight = SeasonWeight::for_season(season, most_races, &self.config);
        info!(
            season = season.year,
            races = season.races.len(),
            num_races_weight = weight.num_races_weight,
            influence_scaled = weight.influence_scaled,
            "Computing ratings for season"
        );

        for race in season.races.iter().sorted_by_key(|r| r.date) {
            self.process_race(race, weight);
        }
    }

    /// Rates one race in two phases.
    ///
    /// 1. Every driver is rated against the ratings as they stood before the
    ///    race, then all new driver ratings are appended.
    /// 2. Teams are rated from the drivers' new ratings, then all new team
    ///    ratings are appended.
    fn process_race(&mut self, race: &Race, weight: SeasonWeight) {
        debug!(race_id = race.id, race = %race.name, date = %race.date, drivers = race.field_size(), "Computing ratings for race");

        let qualifying = self.qualifying.get(&race.id);
        let sprint = self.sprints.get(&race.id);

        let driver_updates = {
            let ctx = EventContext {
                race,
                qualifying,
                sprint,
                weight,
                drivers: &self.drivers,
                teams: &self.teams,
                statuses: &self.statuses,
                config: &self.config
            };

            race.results
                .iter()
                .filter_map(|outcome| {
                    let update = DriverUpdate::compute(outcome, &ctx);
                    if update.is_none() {
                        debug!(race_id = race.id, driver_id = outcome.driver_id, "Skipping unregistered driver");
                    }
                    update
                })
                .collect_vec()
        };

        for update in driver_updates {
            trace!(
                driver_id = update.driver_id,
                before = update.before,
                after = update.after,
                penalty = update.penalty,
                decay = update.decay,
                "Driver rating updated"
            );
            self.drivers.append(update.driver_id, RatingEntry::race(update.after, race.date));
        }

        for outcome in &race.results {
            self.drivers.record_participation(outcome.driver_id, race.date);
            self.teams.record_participation(outcome.team_id, race.date);
        }

        let team_updates = compute_team_updates(race, qualifying, sprint, &self.drivers, &self.teams, weight, &self.config);
        for update in team_updates {
            trace!(
                team_id = update.team_id,
                score = update.score,
                before = update.before,
                after = update.after,
                "Team rating updated"
            );
            self.teams.append(update.team_id, RatingEntry::race(update.after, race.date));
        }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn drivers(&self) -> &RatingTracker<Driver> {
        &self.drivers
    }

    pub fn teams(&self) -> &RatingTracker<Team> {
        &self.teams
    }

    pub fn into_parts(self) -> (Vec<Driver>, Vec<Team>) {
        (self.drivers.into_entities(), self.teams.into_entities())
    }
}

/// Runs the whole rating computation and hands back the drivers and teams
/// with their histories filled in, in the order they were given.
pub fn compute_ratings(
    seasons: &[Season],
    drivers: Vec<Driver>,
    teams: Vec<Team>,
    qualifying: Vec<Qualifying>,
    sprints: Vec<Sprint>,
    statuses: StatusTable,
    config: &RatingConfig
) -> (Vec<Driver>, Vec<Team>) {
    let mut model = RatingModel::new(config.clone(), drivers, teams, qualifying, sprints, statuses);
    model.process(seasons);
    model.into_parts()
}
