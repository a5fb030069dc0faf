//! Reconciles generated palettes with a named collection in a variable store.
//!
//! # Design
//! - Every read and write targets the collection's default (first) mode.
//! - Names are matched exactly on write and by lowercase substring on search;
//!   the first variable in store order wins.
//! - A new variable is created together with its value in one store call, so
//!   a cancelled or failed upsert never leaves an empty variable behind.
//! - Palette apply is entry-at-a-time: the first failure aborts and earlier
//!   entries stay applied.
//! - Seed import never fails; any lookup problem degrades to the fallback
//!   palette and is logged.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::Serialize;
use tonal_core::{Color, ColorScale, PartialSeedPalette, Role, SeedPalette};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ReconcileError, ReconcileResult};
use crate::model::{Variable, VariableType, VariableValue};
use crate::patterns::SearchPatterns;
use crate::store::VariableStore;

/// Whether an upsert created a variable or rewrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// A new variable was created.
    Created,
    /// An existing variable received the new value.
    Updated,
}

/// Counts produced by [`VariableReconciler::apply_scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ApplyReport {
    /// Variables created.
    pub created: usize,
    /// Variables updated in place.
    pub updated: usize,
}

impl ApplyReport {
    /// Total entries written.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created + self.updated
    }

    const fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }
}

/// A store variable matched to a seed role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingColorVariable {
    /// Variable name as stored.
    pub name: String,
    /// Default-mode value; serialises as uppercase hex.
    pub value: Color,
    /// Collection holding the variable.
    pub collection_name: String,
    /// Variable identifier.
    pub variable_id: Uuid,
}

/// Outcome of a pattern search; roles without a match are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingColors {
    collection_name: String,
    matches: BTreeMap<Role, ExistingColorVariable>,
    found: bool,
}

impl ExistingColors {
    fn new(collection_name: &str) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            matches: BTreeMap::new(),
            found: false,
        }
    }

    fn record(&mut self, role: Role, variable: ExistingColorVariable) {
        self.matches.entry(role).or_insert(variable);
        self.found = true;
    }

    /// Whether any role matched.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.found
    }

    /// Collection that was searched.
    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Match for `role`, if any.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<&ExistingColorVariable> {
        self.matches.get(&role)
    }

    /// Roles with a match, in role order.
    #[must_use]
    pub fn matched_roles(&self) -> Vec<Role> {
        self.matches.keys().copied().collect()
    }

    /// Matched colors as a partial seed palette.
    #[must_use]
    pub fn to_partial(&self) -> PartialSeedPalette {
        let mut partial = PartialSeedPalette::default();
        for (role, variable) in &self.matches {
            partial.set(*role, variable.value);
        }
        partial
    }
}

/// Why [`VariableReconciler::import_seed`] returned the fallback palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The store did not answer in time.
    Timeout,
    /// The collection held no matching variables.
    NoMatches,
    /// The configured collection does not exist.
    CollectionNotFound,
    /// The store failed; carries the error message.
    StoreFailure(String),
}

/// Where an imported seed palette came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SeedSource {
    /// At least one role was read from the store.
    Imported {
        /// Roles read from the store; the rest came from the fallback.
        matched: Vec<Role>,
    },
    /// Nothing usable was read; the fallback palette is returned unchanged.
    Fallback {
        /// Cause of the fallback.
        reason: FallbackReason,
    },
}

/// Seed palette recovered by [`VariableReconciler::import_seed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedImport {
    /// Complete seed palette.
    pub seed: SeedPalette,
    /// Provenance of the palette.
    pub source: SeedSource,
}

impl SeedImport {
    const fn fallback(seed: SeedPalette, reason: FallbackReason) -> Self {
        Self {
            seed,
            source: SeedSource::Fallback { reason },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Target {
    collection_id: Uuid,
    mode_id: Uuid,
}

/// Reads and writes palette variables in one named collection.
#[derive(Debug)]
pub struct VariableReconciler<S> {
    store: S,
    collection: String,
}

impl<S> VariableReconciler<S>
where
    S: VariableStore,
{
    /// Reconciler for the collection named `collection`.
    #[must_use]
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Collection this reconciler targets.
    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Create or update the color variable named exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::CollectionNotFound`] when the collection is
    /// missing, or [`ReconcileError::ReconciliationFailure`] when the store
    /// rejects the lookup, create, or write.
    #[instrument(skip_all, fields(collection = %self.collection, name = %name))]
    pub async fn upsert(&self, name: &str, color: Color) -> ReconcileResult<UpsertOutcome> {
        let target = self.target().await?;
        let existing = self
            .list_variables(target)
            .await?
            .into_iter()
            .find(|variable| variable.name == name)
            .map(|variable| variable.id);
        self.write(target, existing, name, color).await
    }

    /// Upsert every entry of `scale` in write order.
    ///
    /// # Errors
    ///
    /// Returns the first failure; entries written before it are kept.
    #[instrument(skip_all, fields(collection = %self.collection))]
    pub async fn apply_scale(&self, scale: &ColorScale) -> ReconcileResult<ApplyReport> {
        let target = self.target().await?;
        let mut by_name: HashMap<String, Uuid> = HashMap::new();
        for variable in self.list_variables(target).await? {
            by_name.entry(variable.name).or_insert(variable.id);
        }

        let mut report = ApplyReport::default();
        for (name, color) in scale.entries() {
            let existing = by_name.get(&name).copied();
            let outcome = self.write(target, existing, &name, color).await?;
            report.record(outcome);
        }
        info!(
            collection = %self.collection,
            created = report.created,
            updated = report.updated,
            "color scale applied"
        );
        Ok(report)
    }

    /// Locate seed colors by case-insensitive substring match.
    ///
    /// Only color variables holding a literal color in the default mode are
    /// considered.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::CollectionNotFound`] when the collection is
    /// missing, or [`ReconcileError::ReconciliationFailure`] when listing
    /// fails.
    #[instrument(skip_all, fields(collection = %self.collection))]
    pub async fn find_by_pattern(
        &self,
        patterns: &SearchPatterns,
    ) -> ReconcileResult<ExistingColors> {
        let target = self.target().await?;
        let mut existing = ExistingColors::new(&self.collection);
        for variable in self.list_variables(target).await? {
            if variable.resolved_type != VariableType::Color {
                continue;
            }
            let Some(color) = variable
                .value_in(target.mode_id)
                .and_then(VariableValue::as_color)
            else {
                continue;
            };
            for role in patterns.matching_roles(&variable.name) {
                existing.record(
                    role,
                    ExistingColorVariable {
                        name: variable.name.clone(),
                        value: color,
                        collection_name: self.collection.clone(),
                        variable_id: variable.id,
                    },
                );
            }
        }
        debug!(
            collection = %self.collection,
            matched = existing.matches.len(),
            "pattern search finished"
        );
        Ok(existing)
    }

    /// [`Self::find_by_pattern`] bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Timeout`] when the deadline elapses, or any
    /// error of the underlying search.
    pub async fn find_by_pattern_within(
        &self,
        patterns: &SearchPatterns,
        timeout: Duration,
    ) -> ReconcileResult<ExistingColors> {
        tokio::time::timeout(timeout, self.find_by_pattern(patterns))
            .await
            .map_err(|_| ReconcileError::Timeout {
                operation: "find_by_pattern",
                timeout,
            })?
    }

    /// Seed palette from the store, completed from `fallback`.
    ///
    /// Never fails: a timeout, missing collection, or store failure yields
    /// `fallback` unchanged with the reason recorded.
    #[instrument(skip_all, fields(collection = %self.collection))]
    pub async fn import_seed(
        &self,
        patterns: &SearchPatterns,
        fallback: &SeedPalette,
        timeout: Duration,
    ) -> SeedImport {
        match self.find_by_pattern_within(patterns, timeout).await {
            Ok(existing) if existing.found() => {
                let matched = existing.matched_roles();
                info!(
                    collection = %self.collection,
                    matched = matched.len(),
                    "seed colors imported from variable store"
                );
                SeedImport {
                    seed: existing.to_partial().fill_from(fallback),
                    source: SeedSource::Imported { matched },
                }
            }
            Ok(_) => {
                info!(collection = %self.collection, "no seed colors found; using defaults");
                SeedImport::fallback(*fallback, FallbackReason::NoMatches)
            }
            Err(ReconcileError::Timeout { timeout, .. }) => {
                warn!(
                    collection = %self.collection,
                    timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    "variable store lookup timed out; using defaults"
                );
                SeedImport::fallback(*fallback, FallbackReason::Timeout)
            }
            Err(ReconcileError::CollectionNotFound { name }) => {
                warn!(collection = %name, "variable collection not found; using defaults");
                SeedImport::fallback(*fallback, FallbackReason::CollectionNotFound)
            }
            Err(err) => {
                warn!(
                    collection = %self.collection,
                    error = %err,
                    "variable store lookup failed; using defaults"
                );
                SeedImport::fallback(*fallback, FallbackReason::StoreFailure(failure_message(&err)))
            }
        }
    }

    async fn target(&self) -> ReconcileResult<Target> {
        let collections =
            self.store
                .collections()
                .await
                .map_err(|source| ReconcileError::ReconciliationFailure {
                    operation: "collections",
                    name: None,
                    source,
                })?;
        let collection = collections
            .into_iter()
            .find(|collection| collection.name == self.collection)
            .ok_or_else(|| ReconcileError::CollectionNotFound {
                name: self.collection.clone(),
            })?;
        let mode_id = collection
            .default_mode()
            .map(|mode| mode.id)
            .ok_or_else(|| ReconcileError::MissingMode {
                name: self.collection.clone(),
            })?;
        Ok(Target {
            collection_id: collection.id,
            mode_id,
        })
    }

    async fn list_variables(&self, target: Target) -> ReconcileResult<Vec<Variable>> {
        self.store
            .variables(target.collection_id)
            .await
            .map_err(|source| ReconcileError::ReconciliationFailure {
                operation: "variables",
                name: None,
                source,
            })
    }

    async fn write(
        &self,
        target: Target,
        existing: Option<Uuid>,
        name: &str,
        color: Color,
    ) -> ReconcileResult<UpsertOutcome> {
        let value = VariableValue::from(color);
        let Some(variable_id) = existing else {
            self.store
                .create_variable_with_value(
                    target.collection_id,
                    name,
                    VariableType::Color,
                    target.mode_id,
                    value,
                )
                .await
                .map_err(|source| ReconcileError::ReconciliationFailure {
                    operation: "create_variable",
                    name: Some(name.to_string()),
                    source,
                })?;
            return Ok(UpsertOutcome::Created);
        };

        self.store
            .set_value(variable_id, target.mode_id, value)
            .await
            .map_err(|source| ReconcileError::ReconciliationFailure {
                operation: "set_value",
                name: Some(name.to_string()),
                source,
            })?;
        Ok(UpsertOutcome::Updated)
    }
}

fn failure_message(err: &ReconcileError) -> String {
    match err {
        ReconcileError::ReconciliationFailure { source, .. } => format!("{err}: {source}"),
        other => other.to_string(),
    }
}
