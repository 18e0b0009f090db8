//! The filter pipeline: independent predicates over tasks, AND-composed.
//!
//! Every predicate treats its empty configuration as "pass everything", so a
//! freshly constructed filter is the identity over any task list.

use strsim::damerau_levenshtein;

use crate::duration::{log_to_linear, parse_duration_secs, DurationRange};
use crate::models::{FilterEphemeral, FilterProfile, Task};

/// Worst acceptable fuzzy-search score. 0 is an exact match, 1 shares
/// nothing with the query.
const SEARCH_THRESHOLD: f64 = 0.3;

/// A fully resolved filter over one dataset. Duration bounds are fixed at
/// construction from the dataset's observed range, so applying the same
/// filter twice yields the same records.
pub struct TaskFilter<'a> {
    profile: &'a FilterProfile,
    ephemeral: &'a FilterEphemeral,
    /// Inclusive duration window in seconds, padded by one on each end so
    /// rounding at the slider extremes never drops boundary tasks.
    duration_window: (i64, i64),
}

impl<'a> TaskFilter<'a> {
    pub fn new(
        profile: &'a FilterProfile,
        ephemeral: &'a FilterEphemeral,
        range: DurationRange,
    ) -> Self {
        let lower = range.percent_to_duration(log_to_linear(ephemeral.duration[0]));
        let upper = range.percent_to_duration(log_to_linear(ephemeral.duration[1]));
        Self {
            profile,
            ephemeral,
            duration_window: (lower as i64 - 1, upper as i64 + 1),
        }
    }

    /// Builds the filter with the duration range observed across `tasks`.
    pub fn over(
        profile: &'a FilterProfile,
        ephemeral: &'a FilterEphemeral,
        tasks: &[Task],
    ) -> Self {
        let range = DurationRange::from_durations(
            tasks
                .iter()
                .filter_map(|t| t.duration.as_deref())
                .filter_map(parse_duration_secs),
        );
        Self::new(profile, ephemeral, range)
    }

    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_equipment(task)
            && self.matches_excluded(task)
            && self.matches_intensity(task)
            && self.matches_duration(task)
            && self.matches_search(task)
    }

    // Allow-list: a task passes when everything it needs is available.
    fn matches_equipment(&self, task: &Task) -> bool {
        let available = &self.profile.equipment;
        available.is_empty()
            || task.equipment.iter().all(|tag| available.contains(tag))
    }

    // Exclude-list: one excluded category disqualifies the whole task.
    fn matches_excluded(&self, task: &Task) -> bool {
        let excluded = &self.profile.excluded;
        excluded.is_empty() || !task.kinks.iter().any(|tag| excluded.contains(tag))
    }

    fn matches_intensity(&self, task: &Task) -> bool {
        let wanted = &self.ephemeral.intensities;
        wanted.is_empty() || wanted.contains(&task.intensity)
    }

    // Tasks with no parseable duration always pass the window.
    fn matches_duration(&self, task: &Task) -> bool {
        let Some(seconds) = task.duration.as_deref().and_then(parse_duration_secs)
        else {
            return true;
        };
        let (lower, upper) = self.duration_window;
        let seconds = seconds as i64;
        lower <= seconds && seconds <= upper
    }

    fn matches_search(&self, task: &Task) -> bool {
        let Some(query) = self.ephemeral.search.as_deref() else {
            return true;
        };
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let mut fields: Vec<String> = vec![task.number.to_string(), task.task.clone()];
        fields.extend(task.equipment.iter().cloned());
        fields.extend(task.kinks.iter().cloned());
        if let Some(duration) = &task.duration {
            fields.push(duration.clone());
        }
        fields.iter().any(|f| fuzzy_score(f, &query) <= SEARCH_THRESHOLD)
    }
}

/// Location-independent fuzzy match: best Damerau-Levenshtein distance of
/// the query against every query-sized char window of the haystack,
/// normalized by query length. Transpositions count as one edit, so a
/// swapped-letter typo still scores well.
fn fuzzy_score(haystack: &str, query: &str) -> f64 {
    let hay: Vec<char> = haystack.to_lowercase().chars().collect();
    let query_len = query.chars().count();
    if query_len == 0 {
        return 0.0;
    }
    if hay.len() <= query_len {
        let whole: String = hay.iter().collect();
        return damerau_levenshtein(&whole, query) as f64 / query_len as f64;
    }
    hay.windows(query_len)
        .map(|w| {
            let window: String = w.iter().collect();
            damerau_levenshtein(&window, query) as f64 / query_len as f64
        })
        .fold(f64::MAX, f64::min)
}
