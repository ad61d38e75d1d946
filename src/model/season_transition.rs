use itertools::Itertools;
use tracing::debug;

use crate::model::{
    config::RatingConfig,
    rating_tracker::RatingTracker,
    structures::{
        entity::{RatingEntry, Team},
        event::Season,
        rating_source::RatingSource
    }
};

/// Puts every team back on the baseline. Returns the number of teams reset.
pub fn reset_teams(teams: &mut RatingTracker<Team>, config: &RatingConfig) -> usize {
    let ids = teams.ids().collect_vec();
    for id in &ids {
        teams.append(*id, RatingEntry::synthetic(config.base_team_rating, RatingSource::Reset));
    }

    ids.len()
}

/// Recentres the teams of the upcoming season on the baseline, keeping the
/// gaps between them: `rating - median + baseline`.
///
/// The median is the upper median of the teams' current ratings. Teams outside
/// of the season are untouched.
pub fn rerate_teams(season: &Season, teams: &mut RatingTracker<Team>, config: &RatingConfig) -> usize {
    let team_ids = season.team_ids();
    let current = teams.ratings_snapshot(team_ids.iter().copied());
    if current.is_empty() {
        return 0;
    }

    let sorted = current.values().copied().sorted_by(f64::total_cmp).collect_vec();
    let median = sorted[sorted.len() / 2];

    for id in team_ids {
        if let Some(rating) = current.get(&id) {
            teams.append(
                id,
                RatingEntry::synthetic(rating - median + config.base_team_rating, RatingSource::Rerate)
            );
        }
    }

    current.len()
}

/// Puts teams back on the baseline when they return after sitting out the
/// previous season. Nothing happens without a previous season.
pub fn reset_reentry_teams(
    season: &Season,
    previous: Option<&Season>,
    teams: &mut RatingTracker<Team>,
    config: &RatingConfig
) -> usize {
    let Some(previous) = previous else {
        return 0;
    };

    let previous_ids = previous.team_ids();
    let mut count = 0;
    for id in season.team_ids() {
        if previous_ids.contains(&id) {
            continue;
        }
        if teams.append(id, RatingEntry::synthetic(config.base_team_rating, RatingSource::Reentry)) {
            count += 1;
        }
    }

    count
}

/// Applies the enabled season start rules in order: reset, re-rate, re-entry.
pub fn apply_season_transition(
    season: &Season,
    previous: Option<&Season>,
    teams: &mut RatingTracker<Team>,
    config: &RatingConfig
) {
    if config.reset_team_ratings_each_season {
        let n = reset_teams(teams, config);
        debug!(season = season.year, teams = n, "Reset team ratings");
    }
    if config.rerate_team_ratings_each_season {
        let n = rerate_teams(season, teams, config);
        debug!(season = season.year, teams = n, "Re-rated team ratings");
    }
    if config.reset_team_reentry_ratings {
        let n = reset_reentry_teams(season, previous, teams, config);
        if n > 0 {
            debug!(season = season.year, teams = n, "Reset ratings of returning teams");
        }
    }
}
