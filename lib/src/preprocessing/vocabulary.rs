//! Top-N vocabulary reduction.
//!
//! Keeps the N most frequent values seen during fit. Everything else is
//! reduced to the catch-all token before it reaches a label encoder, so the
//! number of distinct codes is bounded by N + 1.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Catch-all token for values outside the top N.
pub const CATCH_ALL: &str = "other";
/// Token substituted for a record with no receivers.
pub const NO_RECEIVER: &str = "none";

/// Ordering among values with the same frequency when cutting the top N.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// The value that occurred first in the fit data wins.
    #[default]
    FirstSeen,
    /// The lexicographically smaller value wins.
    Lexicographic,
}

/// Rank `values` by frequency (descending) and keep the first `n` distinct ones.
pub fn rank_and_select<'a, I>(values: I, n: usize, tie_break: TieBreak) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    // value -> (count, index of first occurrence)
    let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1).then_with(|| match tie_break {
            TieBreak::FirstSeen => a.2.cmp(&b.2),
            TieBreak::Lexicographic => a.0.cmp(b.0),
        })
    });

    ranked
        .into_iter()
        .take(n)
        .map(|(value, _, _)| value.to_string())
        .collect()
}

/// The values retained at fit time, most frequent first.
#[derive(Clone, Debug, Default)]
pub struct TopValues {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl TopValues {
    /// Wrap an ordered list of retained values.
    pub fn new(ordered: Vec<String>) -> Self {
        let members = ordered.iter().cloned().collect();
        Self { ordered, members }
    }

    /// Retained values, most frequent first.
    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }

    /// Number of retained values.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether nothing was retained.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Whether `value` was retained.
    pub fn contains(&self, value: &str) -> bool {
        self.members.contains(value)
    }

    /// `value` itself if retained, otherwise the catch-all token.
    pub fn reduce<'a>(&'a self, value: &'a str) -> &'a str {
        if self.contains(value) {
            value
        } else {
            CATCH_ALL
        }
    }
}

impl PartialEq for TopValues {
    fn eq(&self, other: &Self) -> bool {
        self.ordered == other.ordered
    }
}
