//! Case-insensitive name patterns used to locate seed colors in a store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tonal_core::Role;

type PatternTable = BTreeMap<Role, Vec<String>>;

/// Ordered role to substring table. Patterns are stored lowercase and match
/// anywhere inside a lowercased variable name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PatternTable", into = "PatternTable")]
pub struct SearchPatterns {
    table: PatternTable,
}

impl SearchPatterns {
    /// Table built from `entries`, lowercasing every pattern.
    #[must_use]
    pub fn new<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let mut patterns = Self::default();
        for (role, list) in entries {
            patterns = patterns.with_role(role, list);
        }
        patterns
    }

    /// Naming convention written by palette apply.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([
            (Role::BaseWhite, vec!["base/white"]),
            (Role::BaseBlack, vec!["base/black"]),
            (Role::Brand500, vec!["brand/500"]),
            (Role::Primary500, vec!["primary/500"]),
            (Role::Secondary500, vec!["secondary/500"]),
            (Role::Gray500, vec!["gray/500", "grey/500"]),
        ])
    }

    /// Replace the patterns for `role`. An empty list removes the role.
    #[must_use]
    pub fn with_role<P>(mut self, role: Role, patterns: P) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let lowered: Vec<String> = patterns
            .into_iter()
            .map(|pattern| pattern.as_ref().to_lowercase())
            .filter(|pattern| !pattern.is_empty())
            .collect();
        if lowered.is_empty() {
            self.table.remove(&role);
        } else {
            self.table.insert(role, lowered);
        }
        self
    }

    /// Patterns registered for `role`, in priority order.
    #[must_use]
    pub fn patterns_for(&self, role: Role) -> &[String] {
        self.table.get(&role).map_or(&[], Vec::as_slice)
    }

    /// Roles whose patterns occur in `name`, in role order.
    #[must_use]
    pub fn matching_roles(&self, name: &str) -> Vec<Role> {
        let lowered = name.to_lowercase();
        self.table
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|p| lowered.contains(p.as_str())))
            .map(|(role, _)| *role)
            .collect()
    }

    /// Iterate roles and their patterns in role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &[String])> + '_ {
        self.table
            .iter()
            .map(|(role, patterns)| (*role, patterns.as_slice()))
    }
}

impl From<PatternTable> for SearchPatterns {
    fn from(table: PatternTable) -> Self {
        Self::new(table)
    }
}

impl From<SearchPatterns> for PatternTable {
    fn from(patterns: SearchPatterns) -> Self {
        patterns.table
    }
}
