// Baselines
pub const BASE_DRIVER_RATING: f64 = 1200.0;
pub const BASE_TEAM_RATING: f64 = 1200.0;
pub const EXPECTED_SCORE_SCALE: f64 = 400.0;
pub const CURVE_AMPLITUDE: f64 = 5.0;
// Driver components
pub const PENALTY_FACTOR: f64 = 0.1;
pub const TEAMMATE_WEIGHT: f64 = 0.5;
pub const RACE_BONUS_WEIGHT: f64 = 0.4;
pub const QUALIFYING_BONUS_WEIGHT: f64 = 0.3;
pub const SPRINT_BONUS_WEIGHT: f64 = 0.05;
pub const RACE_GAIN_WEIGHT: f64 = 0.15;
pub const SPRINT_GAIN_WEIGHT: f64 = 0.025;
pub const ROOKIE_WINDOW: u32 = 7;
pub const ROOKIE_MODIFIER: f64 = 1.5;
// Team aggregation
pub const TEAM_RACE_WEIGHT: f64 = 0.6;
pub const TEAM_QUALIFYING_WEIGHT: f64 = 0.3;
pub const TEAM_SPRINT_WEIGHT: f64 = 0.1;
pub const TEAM_GROWTH_WEIGHT: f64 = 3.0;
pub const TEAM_DUMPER_WEIGHT: f64 = 2.0;
pub const TEAM_MULTIPLIER_MIN: f64 = 0.5;
pub const TEAM_MULTIPLIER_MAX: f64 = 1.5;
pub const DRIVER_DEVIATION_MULTIPLIER: f64 = 1.0;
// Speed of change
pub const SWING_MULTIPLIER: f64 = 10.0;
pub const TEAM_SWING_MULTIPLIER: f64 = 300.0;
// Decay, in races for a full pull back to baseline (~25 races a season)
pub const TEAM_DECAY_RACES: f64 = 5.0;
pub const DRIVER_DECAY_RACES: f64 = 100.0;
// Season weighting
pub const CURRENT_SEASON_LENGTH: u32 = 24;
pub const INFLUENCE_A: f64 = 2.9;
pub const INFLUENCE_B: f64 = 0.6;
pub const FIRST_SEASON: i32 = 1950;
