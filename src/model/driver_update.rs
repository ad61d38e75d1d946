use crate::model::{
    config::RatingConfig,
    curves::{expected_score, gap_reward, optional_position_reward},
    decay::rating_decay,
    rating_tracker::RatingTracker,
    season_weight::SeasonWeight,
    structures::{
        entity::{Driver, Rated, Team},
        event::{Outcome, Qualifying, Race, Sprint},
        status::StatusTable
    }
};

/// Everything a driver update reads for one race.
///
/// The trackers are borrowed immutably, so every driver of the race is rated
/// against the ratings as they stood before the race.
pub struct EventContext<'a> {
    pub race: &'a Race,
    pub qualifying: Option<&'a Qualifying>,
    pub sprint: Option<&'a Sprint>,
    pub weight: SeasonWeight,
    pub drivers: &'a RatingTracker<Driver>,
    pub teams: &'a RatingTracker<Team>,
    pub statuses: &'a StatusTable,
    pub config: &'a RatingConfig
}

impl EventContext<'_> {
    pub fn field_size(&self) -> f64 {
        self.race.field_size() as f64
    }
}

/// Scales position bonuses by the strength of the driver's car.
///
/// A driver in a team above baseline earns less for a good result and loses
/// less for a bad one, and the other way around below baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamPerformance {
    pub growth: f64,
    pub dumper: f64
}

impl TeamPerformance {
    pub fn new(team_rating: f64, config: &RatingConfig) -> TeamPerformance {
        let deviation = (team_rating - config.base_team_rating) / config.base_team_rating;
        // Inverted or NaN bounds must not panic mid-run
        let clamp = |m: f64| m.max(config.team_multiplier_min).min(config.team_multiplier_max);

        TeamPerformance {
            growth: clamp((-config.team_growth_weight * deviation).exp()),
            dumper: clamp((config.team_dumper_weight * deviation).exp())
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        if value < 0.0 {
            value * self.dumper
        } else {
            value * self.growth
        }
    }
}

/// Extra weight on positive components for drivers with few rating entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RookieRamp {
    pub multiplier: f64
}

impl RookieRamp {
    /// `prior_entries` counts the seed entry, so a debutant has 1.
    pub fn new(prior_entries: usize, scaled_window: f64, config: &RatingConfig) -> RookieRamp {
        let prior = prior_entries as f64;
        let window = config.rookie_window as f64;

        let multiplier = if prior < scaled_window && prior < window {
            1.0 + config.rookie_modifier / (window - prior)
        } else {
            1.0
        };

        RookieRamp { multiplier }
    }

    /// Negative values are never boosted.
    pub fn boost(&self, value: f64) -> f64 {
        if value < 0.0 {
            value
        } else {
            value * self.multiplier
        }
    }
}

/// Signed components of one driver's rating change, before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriverComponents {
    pub teammates: f64,
    pub race: f64,
    pub qualifying: f64,
    pub sprint: f64,
    pub race_gain: f64,
    pub sprint_gain: f64
}

impl DriverComponents {
    fn weighted_sum(&self, rookie: &RookieRamp, config: &RatingConfig) -> f64 {
        [
            (self.teammates, config.teammate_weight),
            (self.race, config.race_bonus_weight),
            (self.qualifying, config.qualifying_bonus_weight),
            (self.sprint, config.sprint_bonus_weight),
            (self.race_gain, config.race_gain_weight),
            (self.sprint_gain, config.sprint_gain_weight)
        ]
        .iter()
        .map(|(value, weight)| rookie.boost(value * weight))
        .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverUpdate {
    pub driver_id: u32,
    pub components: DriverComponents,
    pub rookie_multiplier: f64,
    pub penalty: f64,
    pub decay: f64,
    pub before: f64,
    pub after: f64
}

impl DriverUpdate {
    /// Rates one race outcome. `None` if the driver is not registered.
    ///
    /// 1. Teammate comparison weighted by expected score
    /// 2. Race, qualifying and sprint position bonuses, scaled by the car
    /// 3. Places gained from the grid in the race and sprint
    /// 4. Rookie boost on positive components
    /// 5. Fault penalty and decay toward baseline
    pub fn compute(outcome: &Outcome, ctx: &EventContext) -> Option<DriverUpdate> {
        let config = ctx.config;
        let driver = ctx.drivers.get(outcome.driver_id)?;
        let before = driver.current_rating().unwrap_or(config.base_driver_rating);
        let prior_entries = driver.ratings().len();

        let field = ctx.field_size();
        let amplitude = config.curve_amplitude;
        let nrw = ctx.weight.num_races_weight;

        let team_rating = ctx.teams.current_rating(outcome.team_id).unwrap_or(config.base_team_rating);
        let performance = TeamPerformance::new(team_rating, config);

        let qualifying_position = ctx
            .qualifying
            .and_then(|q| q.result_for(outcome.driver_id))
            .and_then(|r| r.position);
        let sprint_outcome = ctx.sprint.and_then(|s| s.result_for(outcome.driver_id));
        let sprint_gain = match (ctx.sprint, sprint_outcome) {
            (Some(sprint), Some(result)) => movement_reward(sprint.grid_position(outcome.driver_id), result.position, field, amplitude),
            _ => 0.0
        };

        let components = DriverComponents {
            teammates: teammate_score(outcome, ctx),
            race: performance.apply(optional_position_reward(outcome.position, field, amplitude) * nrw),
            qualifying: performance.apply(optional_position_reward(qualifying_position, field, amplitude) * nrw),
            sprint: performance.apply(optional_position_reward(sprint_outcome.and_then(|r| r.position), field, amplitude)),
            race_gain: movement_reward(ctx.race.grid_position(outcome.driver_id), outcome.position, field, amplitude) * nrw,
            sprint_gain
        };

        let scaled_window = ctx.weight.rookie_window(config);
        let rookie = RookieRamp::new(prior_entries, scaled_window, config);

        let penalty = if ctx.statuses.is_fault(outcome.status_id) && prior_entries as f64 >= scaled_window {
            before * config.penalty_factor
        } else {
            0.0
        };
        let decay = rating_decay(before, config.base_driver_rating, config.driver_decay_races, nrw);

        let change = components.weighted_sum(&rookie, config) * config.swing_multiplier * ctx.weight.influence_scaled - penalty;

        Some(DriverUpdate {
            driver_id: outcome.driver_id,
            components,
            rookie_multiplier: rookie.multiplier,
            penalty,
            decay,
            before,
            after: before + change - decay
        })
    }

    pub fn change(&self) -> f64 {
        self.after - self.before
    }
}

/// Places gained (positive) or lost (negative) between grid and finish.
///
/// Grid movement goes through the same [`gap_reward`] transform as teammate gaps.
fn movement_reward(grid: Option<u32>, finish: Option<u32>, field: f64, amplitude: f64) -> f64 {
    match (grid, finish) {
        (Some(grid), Some(finish)) => gap_reward(grid as f64 - finish as f64, field - 1.0, amplitude),
        _ => 0.0
    }
}

/// Average gap to each teammate in the race, weighted by how likely the driver
/// was to beat that teammate.
///
/// A non-numeric finish counts as last place when the driver caused it and is
/// ignored otherwise. Teammates without a rating are skipped.
pub fn teammate_score(outcome: &Outcome, ctx: &EventContext) -> f64 {
    let field = ctx.field_size();
    let own_position = match outcome.position {
        Some(p) => p as f64,
        None if ctx.statuses.is_fault(outcome.status_id) => field,
        None => return 0.0
    };

    let Some(own_rating) = ctx.drivers.current_rating(outcome.driver_id) else {
        return 0.0;
    };

    let scores: Vec<f64> = ctx
        .race
        .results
        .iter()
        .filter(|r| r.team_id == outcome.team_id && r.driver_id != outcome.driver_id)
        .filter_map(|teammate| {
            let teammate_rating = ctx.drivers.current_rating(teammate.driver_id)?;
            let teammate_position = teammate.position.map_or(field, |p| p as f64);
            let gap = gap_reward(teammate_position - own_position, field - 1.0, ctx.config.curve_amplitude);

            Some(gap * 2.0 * expected_score(own_rating, teammate_rating, ctx.config.expected_score_scale))
        })
        .collect();

    if scores.is_empty() {
        return 0.0;
    }

    scores.iter().sum::<f64>() / scores.len() as f64
}
