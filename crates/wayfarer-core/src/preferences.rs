//! Preference tag classification.
//!
//! Incoming preference lists are flat: activity pace, season, and
//! free-form interests all arrive in one array. This module partitions
//! them against two fixed vocabularies so the prompt builder can address
//! each dimension separately.

/// Placeholder used when no recognized interests remain.
pub const NO_SPECIAL_PREFERENCE: &str = "no special preference";

/// Activity-pace vocabulary: tag and the activities-per-day range the
/// prompt promises the model will honor.
const ACTIVITY_LEVELS: [(&str, &str); 3] = [
    ("relaxed", "3–4 per day"),
    ("moderate", "5–6 per day"),
    ("packed", "7+ per day"),
];

/// Season vocabulary.
const SEASONS: [&str; 4] = ["spring", "summer", "autumn", "winter"];

/// The default activity level when no tag matches.
pub const DEFAULT_ACTIVITY_LEVEL: &str = "moderate";

/// Result of partitioning a preference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Matched activity-level tag (e.g. "relaxed").
    pub activity_level: String,
    /// Activities-per-day description for the matched level.
    pub activities_per_day: String,
    /// Matched season tag, or `None` when the list named no season.
    pub season: Option<String>,
    /// Remaining tags, order preserved.
    pub other: Vec<String>,
}

impl Preferences {
    /// Comma-joined other interests, or the fixed placeholder when empty.
    pub fn other_interests(&self) -> String {
        if self.other.is_empty() {
            NO_SPECIAL_PREFERENCE.to_string()
        } else {
            self.other.join(", ")
        }
    }
}

/// Partition a preference list in a single pass.
///
/// A tag matching the activity vocabulary overwrites the previously
/// selected level, and likewise for seasons -- last match wins. Every
/// other tag lands in `other` in input order.
pub fn classify<S: AsRef<str>>(tags: &[S]) -> Preferences {
    let mut activity_level = DEFAULT_ACTIVITY_LEVEL.to_string();
    let mut activities_per_day = per_day_for(DEFAULT_ACTIVITY_LEVEL)
        .expect("default activity level is in the vocabulary")
        .to_string();
    let mut season = None;
    let mut other = Vec::new();

    for tag in tags {
        let tag = tag.as_ref();
        if let Some(per_day) = per_day_for(tag) {
            activity_level = tag.to_string();
            activities_per_day = per_day.to_string();
        } else if SEASONS.contains(&tag) {
            season = Some(tag.to_string());
        } else {
            other.push(tag.to_string());
        }
    }

    Preferences {
        activity_level,
        activities_per_day,
        season,
        other,
    }
}

fn per_day_for(tag: &str) -> Option<&'static str> {
    ACTIVITY_LEVELS
        .iter()
        .find(|(level, _)| *level == tag)
        .map(|(_, per_day)| *per_day)
}
