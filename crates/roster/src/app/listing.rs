//! Client-side filtering of the collaborator list.

use serde::Serialize;

use crate::collaborator::Collaborator;

use super::stats::value_counts;

/// Filters applied to a freshly listed set of collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring of the full name.
    pub name_contains: Option<String>,
    /// Exact role.
    pub role: Option<String>,
}

impl ListFilter {
    /// Build a filter, treating blank values as "no filter".
    #[must_use]
    pub fn new(name_contains: Option<String>, role: Option<String>) -> Self {
        let blank_to_none = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            name_contains: blank_to_none(name_contains),
            role: blank_to_none(role),
        }
    }

    /// Check whether a collaborator passes every active filter.
    #[must_use]
    pub fn matches(&self, collaborator: &Collaborator) -> bool {
        let name_ok = self.name_contains.as_ref().map_or(true, |needle| {
            collaborator
                .full_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let role_ok = self
            .role
            .as_ref()
            .map_or(true, |role| collaborator.role.as_ref() == Some(role));
        name_ok && role_ok
    }

    /// Keep the collaborators passing the filter, preserving order.
    #[must_use]
    pub fn apply(&self, collaborators: &[Collaborator]) -> Vec<Collaborator> {
        collaborators
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect()
    }
}

/// The list view: filtered rows plus figures about the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Number of stored collaborators before filtering.
    pub total: usize,
    /// Most frequent role across all collaborators.
    pub most_common_role: Option<String>,
    /// Distinct roles present, sorted, offered as role filter choices.
    pub role_options: Vec<String>,
    /// Collaborators passing the filter, newest first.
    pub rows: Vec<Collaborator>,
}

impl Listing {
    /// Build the list view from every stored collaborator.
    #[must_use]
    pub fn build(all: &[Collaborator], filter: &ListFilter) -> Self {
        let mut role_options: Vec<String> =
            all.iter().filter_map(|c| c.role.clone()).collect();
        role_options.sort();
        role_options.dedup();

        let most_common_role = value_counts(all.iter().filter_map(|c| c.role.as_deref()))
            .into_iter()
            .next()
            .map(|(role, _)| role);

        Self {
            total: all.len(),
            most_common_role,
            role_options,
            rows: filter.apply(all),
        }
    }

    /// Number of collaborators passing the filter.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.rows.len()
    }
}
