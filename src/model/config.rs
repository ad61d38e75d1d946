use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::constants;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read rating config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse rating config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid rating config: {}", .0.join("; "))]
    Invalid(Vec<String>)
}

/// Every tunable of the rating computation.
///
/// The configuration is supplied once when the model is built and is never
/// modified afterwards, so several configurations can be run side by side.
/// Missing fields in a config file fall back to [`RatingConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatingConfig {
    /// Seed rating of every driver, and the value driver decay pulls toward
    pub base_driver_rating: f64,
    /// Seed rating of every team, and the value team decay pulls toward
    pub base_team_rating: f64,
    /// Bound of the position reward curve
    pub curve_amplitude: f64,
    /// Share of the current rating lost on a driver-fault outcome
    pub penalty_factor: f64,

    pub teammate_weight: f64,
    pub race_bonus_weight: f64,
    pub qualifying_bonus_weight: f64,
    pub sprint_bonus_weight: f64,
    /// Weight of grid-to-finish movement in the race
    pub race_gain_weight: f64,
    /// Weight of grid-to-finish movement in the sprint
    pub sprint_gain_weight: f64,

    /// Number of rating entries a driver needs before leaving the rookie ramp
    pub rookie_window: u32,
    pub rookie_modifier: f64,

    pub team_race_weight: f64,
    pub team_qualifying_weight: f64,
    pub team_sprint_weight: f64,
    /// Steepness of the multiplier shrinking positive bonuses of strong teams
    pub team_growth_weight: f64,
    /// Steepness of the multiplier shrinking negative bonuses of strong teams
    pub team_dumper_weight: f64,
    pub team_multiplier_min: f64,
    pub team_multiplier_max: f64,
    /// How strongly a driver's deviation from baseline scales their position
    /// in the team aggregate
    pub driver_deviation_multiplier: f64,

    pub swing_multiplier: f64,
    pub team_swing_multiplier: f64,

    pub reset_team_ratings_each_season: bool,
    pub rerate_team_ratings_each_season: bool,
    pub reset_team_reentry_ratings: bool,

    pub team_decay_races: f64,
    pub driver_decay_races: f64,

    /// The season still in progress, if any. Its race count is assumed to be
    /// `current_season_length` instead of the number of races run so far.
    pub current_season: Option<i32>,
    pub current_season_length: u32,
    pub influence_a: f64,
    pub influence_b: f64,
    pub expected_score_scale: f64
}

impl Default for RatingConfig {
    fn default() -> Self {
        RatingConfig {
            base_driver_rating: constants::BASE_DRIVER_RATING,
            base_team_rating: constants::BASE_TEAM_RATING,
            curve_amplitude: constants::CURVE_AMPLITUDE,
            penalty_factor: constants::PENALTY_FACTOR,
            teammate_weight: constants::TEAMMATE_WEIGHT,
            race_bonus_weight: constants::RACE_BONUS_WEIGHT,
            qualifying_bonus_weight: constants::QUALIFYING_BONUS_WEIGHT,
            sprint_bonus_weight: constants::SPRINT_BONUS_WEIGHT,
            race_gain_weight: constants::RACE_GAIN_WEIGHT,
            sprint_gain_weight: constants::SPRINT_GAIN_WEIGHT,
            rookie_window: constants::ROOKIE_WINDOW,
            rookie_modifier: constants::ROOKIE_MODIFIER,
            team_race_weight: constants::TEAM_RACE_WEIGHT,
            team_qualifying_weight: constants::TEAM_QUALIFYING_WEIGHT,
            team_sprint_weight: constants::TEAM_SPRINT_WEIGHT,
            team_growth_weight: constants::TEAM_GROWTH_WEIGHT,
            team_dumper_weight: constants::TEAM_DUMPER_WEIGHT,
            team_multiplier_min: constants::TEAM_MULTIPLIER_MIN,
            team_multiplier_max: constants::TEAM_MULTIPLIER_MAX,
            driver_deviation_multiplier: constants::DRIVER_DEVIATION_MULTIPLIER,
            swing_multiplier: constants::SWING_MULTIPLIER,
            team_swing_multiplier: constants::TEAM_SWING_MULTIPLIER,
            reset_team_ratings_each_season: false,
            rerate_team_ratings_each_season: false,
            reset_team_reentry_ratings: true,
            team_decay_races: constants::TEAM_DECAY_RACES,
            driver_decay_races: constants::DRIVER_DECAY_RACES,
            current_season: None,
            current_season_length: constants::CURRENT_SEASON_LENGTH,
            influence_a: constants::INFLUENCE_A,
            influence_b: constants::INFLUENCE_B,
            expected_score_scale: constants::EXPECTED_SCORE_SCALE
        }
    }
}

impl RatingConfig {
    /// Reads a JSON config file and validates it.
    pub fn from_file(path: &Path) -> Result<RatingConfig, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: RatingConfig = serde_json::from_str(&raw)?;
        config.validate()?;

        Ok(config)
    }

    /// Checks every field and reports all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.base_driver_rating <= 0.0 {
            errors.push("base_driver_rating: must be positive".to_string());
        }
        if self.base_team_rating <= 0.0 {
            errors.push("base_team_rating: must be positive".to_string());
        }
        if self.curve_amplitude < 0.0 {
            errors.push("curve_amplitude: must be non-negative".to_string());
        }
        if self.rookie_window == 0 {
            errors.push("rookie_window: must be at least 1".to_string());
        }
        if self.team_multiplier_min <= 0.0 {
            errors.push("team_multiplier_min: must be positive".to_string());
        }
        if self.team_multiplier_min > self.team_multiplier_max {
            errors.push(format!(
                "team_multiplier_min: {} exceeds team_multiplier_max {}",
                self.team_multiplier_min, self.team_multiplier_max
            ));
        }
        if self.team_decay_races <= 0.0 {
            errors.push("team_decay_races: must be positive".to_string());
        }
        if self.driver_decay_races <= 0.0 {
            errors.push("driver_decay_races: must be positive".to_string());
        }
        if self.current_season_length == 0 {
            errors.push("current_season_length: must be at least 1".to_string());
        }
        if self.influence_a <= -1.0 {
            errors.push("influence_a: must be greater than -1".to_string());
        }
        if self.expected_score_scale <= 0.0 {
            errors.push("expected_score_scale: must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
