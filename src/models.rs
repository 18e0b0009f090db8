use serde::{Deserialize, Serialize};

/// A single actionable item. `number` is the unique key within a dataset.
/// A missing duration is `None`, never an empty string, so "unspecified"
/// stays distinguishable from "zero".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub number: i64,
    pub task: String,
    pub duration: Option<String>,
    pub intensity: String,
    pub equipment: Vec<String>,
    pub kinks: Vec<String>,
}

impl Task {
    pub fn new(number: i64) -> Self {
        Self {
            number,
            task: String::new(),
            duration: None,
            intensity: String::new(),
            equipment: Vec::new(),
            kinks: Vec::new(),
        }
    }
}

/// A named, independently sourced collection of tasks. Datasets own their
/// task lists exclusively; ids are assigned monotonically by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: i64,
    pub name: String,
    #[serde(rename = "googleSheetsLink")]
    pub google_sheets_link: Option<String>,
    pub tasks: Vec<Task>,
}

impl Dataset {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            google_sheets_link: None,
            tasks: Vec::new(),
        }
    }
}

/// The durable, shareable part of the filter state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterProfile {
    pub equipment: Vec<String>,
    pub excluded: Vec<String>,
}

/// The volatile part of the filter state. Round-tripped through the URL for
/// session continuity but not meant for long-term sharing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterEphemeral {
    pub duration: [f64; 2],
    pub search: Option<String>,
    pub intensities: Vec<String>,
}

impl Default for FilterEphemeral {
    fn default() -> Self {
        Self {
            duration: [0.0, 1.0],
            search: None,
            intensities: Vec::new(),
        }
    }
}

impl FilterEphemeral {
    /// Replaces the duration slider positions. An inverted pair means the
    /// caller wired the range handler wrong, so fail loudly instead of
    /// silently reordering.
    pub fn set_duration_range(&mut self, range: [f64; 2]) {
        assert!(
            range[0] <= range[1],
            "duration range lower bound {} exceeds upper bound {}",
            range[0],
            range[1]
        );
        self.duration = range;
    }
}

/// Classification of two task collections against each other. Derived,
/// recomputed from current snapshots whenever either side changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationResult {
    /// Present remotely, absent locally.
    pub unseen: Vec<Task>,
    /// Present locally, absent remotely.
    pub unpushed: Vec<Task>,
    /// Same key on both sides, different content (local version kept).
    pub conflicting: Vec<Task>,
}

/// Outcome of the most recent remote snapshot fetch for a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    Pending,
    Success,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_equality_is_deep() {
        let mut a = Task::new(1);
        a.equipment = vec!["gloves".to_string()];
        let mut b = Task::new(1);
        b.equipment = vec!["gloves".to_string()];
        assert_eq!(a, b);

        b.equipment.push("mop".to_string());
        assert_ne!(a, b);
    }

    #[test]
    fn ephemeral_defaults_to_full_slider_range() {
        let state = FilterEphemeral::default();
        assert_eq!(state.duration, [0.0, 1.0]);
        assert!(state.search.is_none());
    }

    #[test]
    #[should_panic(expected = "duration range lower bound")]
    fn inverted_duration_range_panics() {
        let mut state = FilterEphemeral::default();
        state.set_duration_range([0.8, 0.2]);
    }

    #[test]
    fn dataset_serde_uses_sheet_link_field_name() {
        let dataset = Dataset::new(1, "Dataset 1");
        let json = serde_json::to_string(&dataset).unwrap();
        assert!(json.contains("\"googleSheetsLink\":null"));
    }
}
