use tracing::warn;

use crate::model::{config::RatingConfig, curves::influence, structures::event::Season};

/// How much one race of a season counts compared to a race of the longest
/// season on record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonWeight {
    /// `most races in any season / races in this season`
    pub num_races_weight: f64,
    /// `num_races_weight` compressed by [`influence`]
    pub influence_scaled: f64
}

impl SeasonWeight {
    pub fn neutral() -> SeasonWeight {
        SeasonWeight {
            num_races_weight: 1.0,
            influence_scaled: 1.0
        }
    }

    pub fn for_season(season: &Season, most_races: usize, config: &RatingConfig) -> SeasonWeight {
        let races = effective_race_count(season, config);
        if races == 0 || most_races == 0 {
            return SeasonWeight::neutral();
        }

        let num_races_weight = most_races as f64 / races as f64;
        match influence(num_races_weight, config.influence_a, config.influence_b) {
            Some(influence_scaled) => SeasonWeight {
                num_races_weight,
                influence_scaled
            },
            None => {
                warn!(
                    season = season.year,
                    num_races_weight, "Season weight outside of the influence curve, using the unscaled weight"
                );
                SeasonWeight {
                    num_races_weight,
                    influence_scaled: 1.0
                }
            }
        }
    }

    /// Rookie window shortened for seasons that count more, never below 2.
    pub fn rookie_window(&self, config: &RatingConfig) -> f64 {
        let window = config.rookie_window as f64;
        if self.influence_scaled <= 0.0 {
            return window.max(2.0);
        }

        (window / self.influence_scaled).max(2.0)
    }
}

pub fn most_races_in_season(seasons: &[Season]) -> usize {
    seasons.iter().map(|s| s.races.len()).max().unwrap_or(0)
}

/// The season still in progress counts as a full season so its first races
/// are not over-weighted.
pub fn effective_race_count(season: &Season, config: &RatingConfig) -> usize {
    if config.current_season == Some(season.year) {
        config.current_season_length as usize
    } else {
        season.races.len()
    }
}
