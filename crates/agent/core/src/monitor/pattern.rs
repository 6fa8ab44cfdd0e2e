//! Repeating action-pattern detection.
//!
//! Patterns are structural keys: the ordered action vectors of a contiguous
//! run of records. Two runs alias only if every branch of every step matches.

use std::collections::BTreeMap;
use std::fmt;

use arrayvec::ArrayVec;
use tracing::debug;

use super::window::BoundedWindow;
use crate::action::{ActionChannels, ActionRecord, ActionVector};
use crate::config::MonitorConfig;

/// Ordered action vectors of one contiguous run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternKey(ArrayVec<ActionVector, { MonitorConfig::MAX_PATTERN_LENGTH }>);

impl PatternKey {
    /// Builds a key, keeping at most [`MonitorConfig::MAX_PATTERN_LENGTH`] steps.
    pub fn new(steps: impl IntoIterator<Item = ActionVector>) -> Self {
        Self(
            steps
                .into_iter()
                .take(MonitorConfig::MAX_PATTERN_LENGTH)
                .collect(),
        )
    }

    pub fn steps(&self) -> &[ActionVector] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Union of the branches used by any step.
    pub fn channels(&self) -> ActionChannels {
        self.0
            .iter()
            .fold(ActionChannels::empty(), |acc, step| acc | step.channels())
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            let [a, b, c, d, e] = step.0;
            write!(f, "{a},{b},{c},{d},{e}")?;
        }
        Ok(())
    }
}

/// Pattern → observed frequency, never larger than
/// [`MonitorConfig::MAX_TRACKED_PATTERNS`] entries.
///
/// Ordered by key so eviction ties resolve the same way on every run.
#[derive(Clone, Debug, Default)]
pub struct PatternFrequencies {
    counts: BTreeMap<PatternKey, u32>,
}

impl PatternFrequencies {
    pub const CAPACITY: usize = MonitorConfig::MAX_TRACKED_PATTERNS;

    /// Stores the frequency for `key`, evicting the least-frequent other
    /// entry first when a new key would overflow the map.
    pub fn record(&mut self, key: PatternKey, frequency: u32) -> Option<PatternKey> {
        let mut evicted = None;
        if !self.counts.contains_key(&key) && self.counts.len() >= Self::CAPACITY {
            let victim = self
                .counts
                .iter()
                .min_by_key(|(_, count)| **count)
                .map(|(k, _)| k.clone());
            if let Some(victim) = victim {
                self.counts.remove(&victim);
                evicted = Some(victim);
            }
        }
        self.counts.insert(key, frequency);
        evicted
    }

    pub fn get(&self, key: &PatternKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PatternKey, u32)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }
}

/// A repeat found while ingesting one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    pub key: PatternKey,
    pub occurrences: u32,
}

/// Action history plus the repeating-pattern state derived from it.
#[derive(Clone, Debug)]
pub struct PatternDetector {
    history: BoundedWindow<ActionRecord>,
    frequencies: PatternFrequencies,
    min_length: usize,
    max_length: usize,
    current: Option<PatternKey>,
}

impl PatternDetector {
    pub fn new(history_size: usize, min_length: usize, max_length: usize) -> Self {
        let max_length = max_length.min(MonitorConfig::MAX_PATTERN_LENGTH);
        Self {
            history: BoundedWindow::new(history_size),
            frequencies: PatternFrequencies::default(),
            min_length: min_length.max(1),
            max_length,
            current: None,
        }
    }

    /// Appends a record and re-evaluates every candidate length.
    ///
    /// Lengths are scanned shortest first, so when several lengths repeat the
    /// longest one becomes the current pattern. Returns that pattern, or
    /// `None` (clearing the repeating state) when nothing repeats.
    pub fn observe(&mut self, record: ActionRecord) -> Option<PatternMatch> {
        self.history.push(record);

        let actions: Vec<ActionVector> = self.history.iter().map(|r| r.action).collect();
        let mut found = None;

        for length in self.min_length..=self.max_length {
            if actions.len() < length * 2 {
                break;
            }
            let recent = &actions[actions.len() - length..];
            let occurrences = actions
                .windows(length)
                .filter(|window| *window == recent)
                .count() as u32;

            if occurrences >= 2 {
                let key = PatternKey::new(recent.iter().copied());
                if let Some(evicted) = self.frequencies.record(key.clone(), occurrences) {
                    debug!(
                        target: "cognition::monitor",
                        evicted = %evicted,
                        "pattern frequency map full, evicted least frequent"
                    );
                }
                found = Some(PatternMatch { key, occurrences });
            }
        }

        self.current = found.as_ref().map(|m| m.key.clone());
        found
    }

    pub fn is_repeating(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&PatternKey> {
        self.current.as_ref()
    }

    pub fn frequency(&self, key: &PatternKey) -> u32 {
        self.frequencies.get(key)
    }

    pub fn frequencies(&self) -> &PatternFrequencies {
        &self.frequencies
    }

    pub fn history(&self) -> &BoundedWindow<ActionRecord> {
        &self.history
    }

    /// Drops the frequency map and the current pattern; history is kept.
    pub fn break_loop(&mut self) {
        self.frequencies.clear();
        self.current = None;
    }
}
