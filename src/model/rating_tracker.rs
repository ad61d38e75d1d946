use std::{cmp::Ordering, collections::HashMap};

use chrono::NaiveDate;
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::warn;

use crate::model::structures::entity::{Rated, RatingEntry};

/// A ranked row of a leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub id: u32,
    pub name: String,
    pub rating: f64,
    /// Date the rating was reached, `None` for synthetic entries
    pub date: Option<NaiveDate>,
    pub percentile: f64
}

/// Drivers or teams indexed by id.
///
/// Built once per run. Iteration follows the order the entities were supplied
/// in, so anything derived from it is deterministic.
pub struct RatingTracker<T: Rated> {
    entities: IndexMap<u32, T>
}

impl<T: Rated> RatingTracker<T> {
    pub fn new(entities: Vec<T>) -> RatingTracker<T> {
        let mut map = IndexMap::with_capacity(entities.len());
        for entity in entities {
            let id = entity.id();
            if map.contains_key(&id) {
                warn!(id, "Duplicate id, keeping the first entity");
                continue;
            }
            map.insert(id, entity);
        }

        RatingTracker { entities: map }
    }

    /// Gives every entity without a history its initial rating.
    pub fn seed(&mut self, rating: f64) {
        for entity in self.entities.values_mut() {
            if entity.ratings().is_empty() {
                entity.push_rating(RatingEntry::initial(rating));
            }
        }
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entities.contains_key(&id)
    }

    /// Returns the latest rating for the entity.
    pub fn current_rating(&self, id: u32) -> Option<f64> {
        self.get(id).and_then(|e| e.current_rating())
    }

    /// Appends a rating. Returns false if the id is unknown.
    pub fn append(&mut self, id: u32, entry: RatingEntry) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.push_rating(entry);
                true
            }
            None => false
        }
    }

    pub fn record_participation(&mut self, id: u32, date: NaiveDate) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.history_mut().record_participation(date);
        }
    }

    /// Current ratings of the given ids. Unknown or unrated ids are left out.
    pub fn ratings_snapshot(&self, ids: impl IntoIterator<Item = u32>) -> HashMap<u32, f64> {
        ids.into_iter()
            .filter_map(|id| self.current_rating(id).map(|r| (id, r)))
            .collect()
    }

    /// Case-insensitive lookup by display name.
    pub fn find_by_name(&self, name: &str) -> Option<&T> {
        let needle = name.to_lowercase();
        self.entities.values().find(|e| e.display_name().to_lowercase() == needle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entities.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn into_entities(self) -> Vec<T> {
        self.entities.into_values().collect()
    }

    /// All rated entities ranked by their current rating.
    pub fn current_leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.current_leaderboard_where(|_| true)
    }

    pub fn current_leaderboard_where(&self, include: impl Fn(&T) -> bool) -> Vec<LeaderboardEntry> {
        let rows = self
            .entities
            .values()
            .filter(|e| include(e))
            .filter_map(|e| e.ratings().last().map(|r| (e, *r)))
            .collect_vec();

        Self::rank(rows)
    }

    /// All rated entities ranked by the highest rating they ever held.
    pub fn peak_leaderboard(&self) -> Vec<LeaderboardEntry> {
        let rows = self
            .entities
            .values()
            .filter_map(|e| e.peak_rating().map(|r| (e, *r)))
            .collect_vec();

        Self::rank(rows)
    }

    fn rank(rows: Vec<(&T, RatingEntry)>) -> Vec<LeaderboardEntry> {
        let total = rows.len() as u32;

        rows.into_iter()
            .sorted_by(|(a, ra), (b, rb)| match rb.rating.total_cmp(&ra.rating) {
                Ordering::Equal => a.id().cmp(&b.id()),
                other => other
            })
            .enumerate()
            .map(|(i, (entity, entry))| {
                let rank = i as u32 + 1;
                LeaderboardEntry {
                    rank,
                    id: entity.id(),
                    name: entity.display_name(),
                    rating: entry.rating,
                    date: entry.date,
                    percentile: Self::percentile(rank, total).unwrap_or(0.0)
                }
            })
            .collect()
    }

    /// `P = (n/N) * 100`
    fn percentile(rank: u32, total: u32) -> Option<f64> {
        if rank < 1 || total == 0 {
            return None;
        }

        let n = total.saturating_sub(rank); // The number of entities below this one
        Some(n as f64 / total as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use crate::{
        model::{
            rating_tracker::RatingTracker,
            structures::entity::{Driver, Rated, RatingEntry, Team}
        },
        utils::test_utils::{generate_driver, generate_team}
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_seed_only_empty_histories() {
        let mut already_rated = generate_driver(2);
        already_rated.push_rating(RatingEntry::initial(1500.0));

        let mut tracker = RatingTracker::new(vec![generate_driver(1), already_rated]);
        tracker.seed(1200.0);

        assert_eq!(tracker.get(1).unwrap().ratings(), &[RatingEntry::initial(1200.0)]);
        assert_eq!(tracker.get(2).unwrap().ratings(), &[RatingEntry::initial(1500.0)]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut first = generate_team(7);
        first.name = "Ferrari".to_string();
        let mut second = generate_team(7);
        second.name = "Ferrari Duplicate".to_string();

        let tracker = RatingTracker::new(vec![first, second]);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.get(7).unwrap().name, "Ferrari");
    }

    #[test]
    fn test_append_unknown_id() {
        let mut tracker: RatingTracker<Team> = RatingTracker::new(vec![generate_team(1)]);
        assert!(!tracker.append(2, RatingEntry::initial(1200.0)));
        assert!(tracker.append(1, RatingEntry::initial(1200.0)));
        assert_eq!(tracker.current_rating(1), Some(1200.0));
        assert_eq!(tracker.current_rating(2), None);
    }

    #[test]
    fn test_snapshot_skips_unknown() {
        let mut tracker = RatingTracker::new(vec![generate_driver(1), generate_driver(2)]);
        tracker.seed(1200.0);
        tracker.append(2, RatingEntry::race(1250.0, date(1950, 5, 13)));

        let snapshot = tracker.ratings_snapshot([1, 2, 3]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[&1], 1200.0);
        assert_eq!(snapshot[&2], 1250.0);
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let tracker = RatingTracker::new(vec![Driver::new(830, "Max", "Verstappen"), Driver::new(1, "Lewis", "Hamilton")]);

        assert_eq!(tracker.find_by_name("max verstappen").unwrap().id, 830);
        assert!(tracker.find_by_name("Verstappen").is_none());
    }

    #[test]
    fn test_current_leaderboard() {
        let mut tracker = RatingTracker::new(vec![generate_driver(1), generate_driver(2), generate_driver(3)]);
        tracker.seed(1200.0);
        tracker.append(1, RatingEntry::race(1100.0, date(1950, 5, 13)));
        tracker.append(3, RatingEntry::race(1300.0, date(1950, 5, 13)));

        let board = tracker.current_leaderboard();
        assert_eq!(board.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(board.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(board[1].date, None);
        assert_abs_diff_eq!(board[0].percentile, 200.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(board[2].percentile, 0.0);
    }

    #[test]
    fn test_leaderboard_ties_broken_by_id() {
        let mut tracker = RatingTracker::new(vec![generate_team(9), generate_team(4)]);
        tracker.seed(1200.0);

        let board = tracker.current_leaderboard();
        assert_eq!(board[0].id, 4);
        assert_eq!(board[1].id, 9);
    }

    #[test]
    fn test_peak_leaderboard() {
        let mut tracker = RatingTracker::new(vec![generate_driver(1), generate_driver(2)]);
        tracker.seed(1200.0);
        tracker.append(1, RatingEntry::race(1500.0, date(1955, 1, 16)));
        tracker.append(1, RatingEntry::race(1000.0, date(1955, 5, 22)));
        tracker.append(2, RatingEntry::race(1400.0, date(1955, 1, 16)));

        let board = tracker.peak_leaderboard();
        assert_eq!(board[0].id, 1);
        assert_eq!(board[0].rating, 1500.0);
        assert_eq!(board[0].date, Some(date(1955, 1, 16)));
        assert_eq!(board[1].id, 2);
    }

    #[test]
    fn test_unrated_entities_left_off_leaderboards() {
        let tracker: RatingTracker<Driver> = RatingTracker::new(vec![generate_driver(1)]);
        assert!(tracker.current_leaderboard().is_empty());
        assert!(tracker.peak_leaderboard().is_empty());
    }

    #[test]
    fn test_percentile() {
        assert_eq!(RatingTracker::<Driver>::percentile(0, 10), None);
        assert_eq!(RatingTracker::<Driver>::percentile(1, 0), None);
        assert_eq!(RatingTracker::<Driver>::percentile(1, 1), Some(0.0));

        assert_abs_diff_eq!(RatingTracker::<Driver>::percentile(1, 2).unwrap(), 50.0, epsilon = 0.0001);
        assert_abs_diff_eq!(RatingTracker::<Driver>::percentile(1, 10).unwrap(), 90.0, epsilon = 0.0001);
        assert_abs_diff_eq!(RatingTracker::<Driver>::percentile(1, 1000).unwrap(), 99.9, epsilon = 0.0001);
    }
}
