use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rating_source::RatingSource;

/// One point of a rating history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub rating: f64,
    /// `None` for synthetic adjustments (seed and season transitions)
    pub date: Option<NaiveDate>,
    pub source: RatingSource
}

impl RatingEntry {
    pub fn initial(rating: f64) -> RatingEntry {
        RatingEntry {
            rating,
            date: None,
            source: RatingSource::Initial
        }
    }

    pub fn race(rating: f64, date: NaiveDate) -> RatingEntry {
        RatingEntry {
            rating,
            date: Some(date),
            source: RatingSource::Race
        }
    }

    pub fn synthetic(rating: f64, source: RatingSource) -> RatingEntry {
        debug_assert!(source.is_synthetic(), "race entries need a date");
        RatingEntry {
            rating,
            date: None,
            source
        }
    }
}

/// Append-only rating history shared by drivers and teams.
///
/// The last entry is always the current rating. Entries are never edited or
/// removed once pushed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingHistory {
    entries: Vec<RatingEntry>,
    first_race_date: Option<NaiveDate>,
    last_race_date: Option<NaiveDate>
}

impl RatingHistory {
    pub fn new() -> RatingHistory {
        RatingHistory::default()
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: RatingEntry) {
        self.entries.push(entry);
    }

    pub fn current(&self) -> Option<&RatingEntry> {
        self.entries.last()
    }

    pub fn current_rating(&self) -> Option<f64> {
        self.current().map(|e| e.rating)
    }

    /// Highest rating ever held. The earliest entry wins a tie.
    pub fn peak(&self) -> Option<&RatingEntry> {
        let mut peak: Option<&RatingEntry> = None;
        for entry in &self.entries {
            match peak {
                Some(p) if entry.rating <= p.rating => {}
                _ => peak = Some(entry)
            }
        }

        peak
    }

    /// Change between the last two entries, with the date of the last one.
    pub fn last_change(&self) -> Option<(f64, Option<NaiveDate>)> {
        match self.entries.as_slice() {
            [.., previous, last] => Some((last.rating - previous.rating, last.date)),
            _ => None
        }
    }

    /// Dated entries within `[start, end]`, in history order.
    pub fn progression(&self, start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, f64)> {
        self.entries
            .iter()
            .filter_map(|e| e.date.map(|d| (d, e.rating)))
            .filter(|(d, _)| *d >= start && *d <= end)
            .collect()
    }

    pub fn record_participation(&mut self, date: NaiveDate) {
        if self.first_race_date.map_or(true, |d| date < d) {
            self.first_race_date = Some(date);
        }
        if self.last_race_date.map_or(true, |d| date > d) {
            self.last_race_date = Some(date);
        }
    }

    pub fn first_race_date(&self) -> Option<NaiveDate> {
        self.first_race_date
    }

    pub fn last_race_date(&self) -> Option<NaiveDate> {
        self.last_race_date
    }
}

/// Anything carrying a rating history: drivers and teams.
pub trait Rated {
    fn id(&self) -> u32;
    fn display_name(&self) -> String;
    fn history(&self) -> &RatingHistory;
    fn history_mut(&mut self) -> &mut RatingHistory;

    fn ratings(&self) -> &[RatingEntry] {
        self.history().entries()
    }

    fn current_rating(&self) -> Option<f64> {
        self.history().current_rating()
    }

    fn peak_rating(&self) -> Option<&RatingEntry> {
        self.history().peak()
    }

    fn push_rating(&mut self, entry: RatingEntry) {
        self.history_mut().push(entry);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: u32,
    pub forename: String,
    pub surname: String,
    pub history: RatingHistory
}

impl Driver {
    pub fn new(id: u32, forename: &str, surname: &str) -> Driver {
        Driver {
            id,
            forename: forename.to_string(),
            surname: surname.to_string(),
            history: RatingHistory::new()
        }
    }
}

impl Rated for Driver {
    fn id(&self) -> u32 {
        self.id
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }

    fn history(&self) -> &RatingHistory {
        &self.history
    }

    fn history_mut(&mut self) -> &mut RatingHistory {
        &mut self.history
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub history: RatingHistory
}

impl Team {
    pub fn new(id: u32, name: &str) -> Team {
        Team {
            id,
            name: name.to_string(),
            history: RatingHistory::new()
        }
    }
}

impl Rated for Team {
    fn id(&self) -> u32 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn history(&self) -> &RatingHistory {
        &self.history
    }

    fn history_mut(&mut self) -> &mut RatingHistory {
        &mut self.history
    }
}

fn fmt_rated(rated: &impl Rated, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (rated.current_rating(), rated.peak_rating()) {
        (Some(current), Some(peak)) => {
            let peak_date = peak.date.map_or("N/A".to_string(), |d| d.to_string());
            write!(
                f,
                "{:<40} | {:>5} Peak: {:>5} {}",
                rated.display_name(),
                current.round(),
                peak.rating.round(),
                peak_date
            )
        }
        _ => write!(f, "{} (ID: {}) | Rating: N/A", rated.display_name(), rated.id())
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_rated(self, f)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_rated(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structures::rating_source::RatingSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(entries: &[RatingEntry]) -> RatingHistory {
        let mut history = RatingHistory::new();
        for e in entries {
            history.push(*e);
        }

        history
    }

    #[test]
    fn test_current_is_last_entry() {
        let h = history(&[
            RatingEntry::initial(1200.0),
            RatingEntry::race(1210.0, date(1950, 5, 13)),
            RatingEntry::synthetic(1200.0, RatingSource::Reentry),
        ]);

        assert_eq!(h.current_rating(), Some(1200.0));
        assert_eq!(h.current().unwrap().source, RatingSource::Reentry);
    }

    #[test]
    fn test_peak_first_wins_tie() {
        let h = history(&[
            RatingEntry::initial(1200.0),
            RatingEntry::race(1300.0, date(1951, 1, 1)),
            RatingEntry::race(1300.0, date(1952, 1, 1)),
            RatingEntry::race(1250.0, date(1953, 1, 1)),
        ]);

        let peak = h.peak().unwrap();
        assert_eq!(peak.rating, 1300.0);
        assert_eq!(peak.date, Some(date(1951, 1, 1)));
    }

    #[test]
    fn test_empty_history() {
        let h = RatingHistory::new();
        assert!(h.peak().is_none());
        assert!(h.current_rating().is_none());
        assert!(h.last_change().is_none());
    }

    #[test]
    fn test_last_change() {
        let h = history(&[RatingEntry::initial(1200.0), RatingEntry::race(1190.5, date(1960, 2, 7))]);
        assert_eq!(h.last_change(), Some((-9.5, Some(date(1960, 2, 7)))));

        let single = history(&[RatingEntry::initial(1200.0)]);
        assert_eq!(single.last_change(), None);
    }

    #[test]
    fn test_progression_skips_synthetic_and_filters_window() {
        let h = history(&[
            RatingEntry::initial(1200.0),
            RatingEntry::race(1201.0, date(1970, 3, 7)),
            RatingEntry::synthetic(1200.0, RatingSource::Reset),
            RatingEntry::race(1202.0, date(1971, 3, 6)),
            RatingEntry::race(1203.0, date(1972, 1, 23)),
        ]);

        let series = h.progression(date(1970, 1, 1), date(1971, 12, 31));
        assert_eq!(series, vec![(date(1970, 3, 7), 1201.0), (date(1971, 3, 6), 1202.0)]);
    }

    #[test]
    fn test_record_participation_tracks_bounds() {
        let mut h = RatingHistory::new();
        h.record_participation(date(1980, 6, 1));
        h.record_participation(date(1979, 1, 21));
        h.record_participation(date(1981, 3, 15));

        assert_eq!(h.first_race_date(), Some(date(1979, 1, 21)));
        assert_eq!(h.last_race_date(), Some(date(1981, 3, 15)));
    }

    #[test]
    fn test_display() {
        let mut driver = Driver::new(1, "Juan", "Fangio");
        assert_eq!(driver.to_string(), "Juan Fangio (ID: 1) | Rating: N/A");

        driver.push_rating(RatingEntry::initial(1200.0));
        driver.push_rating(RatingEntry::race(1234.4, date(1951, 5, 27)));
        assert!(driver.to_string().ends_with("|  1234 Peak:  1234 1951-05-27"));
    }
}
