use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Status codes for outcomes the driver is held responsible for.
///
/// Accidents and collisions are not listed as the dataset does not say who
/// caused them.
pub const DRIVER_FAULT_STATUSES: [u32; 4] = [
    20, // Spun off
    77, // 107% rule
    81, // Did not qualify
    97  // Did not prequalify
];

/// Status code labels, e.g. `1 => "Finished"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTable {
    labels: BTreeMap<u32, String>
}

impl StatusTable {
    pub fn new(labels: BTreeMap<u32, String>) -> StatusTable {
        StatusTable { labels }
    }

    pub fn label(&self, status_id: u32) -> Option<&str> {
        self.labels.get(&status_id).map(|s| s.as_str())
    }

    pub fn is_driver_fault(&self, status_id: u32) -> bool {
        DRIVER_FAULT_STATUSES.contains(&status_id)
    }

    /// Like [`StatusTable::is_driver_fault`] but for a possibly missing status.
    pub fn is_fault(&self, status_id: Option<u32>) -> bool {
        status_id.is_some_and(|id| self.is_driver_fault(id))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<(u32, String)> for StatusTable {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        StatusTable::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::StatusTable;

    #[test]
    fn test_fault_allow_list() {
        let table = StatusTable::default();

        assert!(table.is_driver_fault(20));
        assert!(table.is_driver_fault(77));
        assert!(table.is_driver_fault(81));
        assert!(table.is_driver_fault(97));

        // Finished, accident, collision, engine
        assert!(!table.is_driver_fault(1));
        assert!(!table.is_driver_fault(3));
        assert!(!table.is_driver_fault(4));
        assert!(!table.is_driver_fault(5));
    }

    #[test]
    fn test_missing_status_is_not_fault() {
        assert!(!StatusTable::default().is_fault(None));
        assert!(StatusTable::default().is_fault(Some(20)));
    }

    #[test]
    fn test_labels() {
        let table: StatusTable = vec![(1, "Finished".to_string()), (20, "Spun off".to_string())]
            .into_iter()
            .collect();

        assert_eq!(table.label(20), Some("Spun off"));
        assert_eq!(table.label(2), None);
        assert_eq!(table.len(), 2);
    }
}
