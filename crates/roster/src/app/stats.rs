//! Read-only aggregate figures derived from the collaborator list.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::collaborator::Collaborator;

/// Month bucket format for registration counts.
const MONTH_FORMAT: &str = "%Y-%m";

/// Aggregate statistics over every stored collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Number of collaborators.
    pub total: usize,
    /// Distinct cities, `None` when no collaborator has a city.
    pub distinct_cities: Option<usize>,
    /// Distinct states, `None` when no collaborator has a state.
    pub distinct_states: Option<usize>,
    /// Distinct roles, `None` when no collaborator has a role.
    pub distinct_roles: Option<usize>,
    /// Collaborators per role, most frequent first.
    pub by_role: Vec<(String, usize)>,
    /// Collaborators per state, most frequent first.
    pub by_state: Vec<(String, usize)>,
    /// Registrations per `YYYY-MM` month, oldest first.
    pub by_month: Vec<(String, usize)>,
}

impl Statistics {
    /// Compute statistics over a set of collaborators.
    #[must_use]
    pub fn from_records(records: &[Collaborator]) -> Self {
        let mut by_month: BTreeMap<String, usize> = BTreeMap::new();
        for record in records {
            *by_month
                .entry(record.created_at.format(MONTH_FORMAT).to_string())
                .or_default() += 1;
        }

        Self {
            total: records.len(),
            distinct_cities: distinct(records.iter().filter_map(|r| r.city.as_deref())),
            distinct_states: distinct(records.iter().filter_map(|r| r.state_code.as_deref())),
            distinct_roles: distinct(records.iter().filter_map(|r| r.role.as_deref())),
            by_role: value_counts(records.iter().filter_map(|r| r.role.as_deref())),
            by_state: value_counts(records.iter().filter_map(|r| r.state_code.as_deref())),
            by_month: by_month.into_iter().collect(),
        }
    }
}

/// Count distinct values; `None` when there are no values at all.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Option<usize> {
    let set: HashSet<&str> = values.collect();
    if set.is_empty() {
        None
    } else {
        Some(set.len())
    }
}

/// Count occurrences of each value, most frequent first, ties by label.
pub(crate) fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    // Stable sort keeps the BTreeMap's alphabetical order within a count
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
