//! In-process store state shared by the memory and file backends.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{Variable, VariableCollection, VariableType, VariableValue};

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    pub(crate) collections: Vec<VariableCollection>,
    pub(crate) variables: Vec<Variable>,
}

impl StoreState {
    pub(crate) fn create_collection(&mut self, name: &str) -> StoreResult<VariableCollection> {
        if self.collections.iter().any(|existing| existing.name == name) {
            return Err(StoreError::DuplicateCollection {
                name: name.to_string(),
            });
        }
        let collection = VariableCollection::new(name);
        self.collections.push(collection.clone());
        Ok(collection)
    }

    fn collection(&self, collection_id: Uuid) -> StoreResult<&VariableCollection> {
        self.collections
            .iter()
            .find(|collection| collection.id == collection_id)
            .ok_or(StoreError::UnknownCollection { collection_id })
    }

    pub(crate) fn variables_in(&self, collection_id: Uuid) -> StoreResult<Vec<Variable>> {
        self.collection(collection_id)?;
        Ok(self
            .variables
            .iter()
            .filter(|variable| variable.collection_id == collection_id)
            .cloned()
            .collect())
    }

    pub(crate) fn create_variable(
        &mut self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
    ) -> StoreResult<Variable> {
        let variable = self.new_variable(collection_id, name, kind)?;
        self.variables.push(variable.clone());
        Ok(variable)
    }

    /// Create `name` with `value` already written for `mode_id`; nothing is
    /// stored unless every check passes.
    pub(crate) fn create_variable_with_value(
        &mut self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<Variable> {
        let mut variable = self.new_variable(collection_id, name, kind)?;
        self.check_value(&variable, mode_id, &value)?;
        variable.values_by_mode.insert(mode_id, value);
        self.variables.push(variable.clone());
        Ok(variable)
    }

    pub(crate) fn set_value(
        &mut self,
        variable_id: Uuid,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<()> {
        let index = self
            .variables
            .iter()
            .position(|variable| variable.id == variable_id)
            .ok_or(StoreError::UnknownVariable { variable_id })?;
        self.check_value(&self.variables[index], mode_id, &value)?;
        self.variables[index].values_by_mode.insert(mode_id, value);
        Ok(())
    }

    fn new_variable(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
    ) -> StoreResult<Variable> {
        self.collection(collection_id)?;
        if self
            .variables
            .iter()
            .any(|variable| variable.collection_id == collection_id && variable.name == name)
        {
            return Err(StoreError::DuplicateName {
                collection_id,
                name: name.to_string(),
            });
        }
        Ok(Variable {
            id: Uuid::new_v4(),
            name: name.to_string(),
            collection_id,
            resolved_type: kind,
            values_by_mode: BTreeMap::new(),
        })
    }

    fn check_value(
        &self,
        variable: &Variable,
        mode_id: Uuid,
        value: &VariableValue,
    ) -> StoreResult<()> {
        let collection_id = variable.collection_id;
        let collection = self.collection(collection_id)?;
        if !collection.modes.iter().any(|mode| mode.id == mode_id) {
            return Err(StoreError::UnknownMode {
                collection_id,
                mode_id,
            });
        }
        if value
            .resolved_type()
            .is_some_and(|actual| actual != variable.resolved_type)
        {
            return Err(StoreError::TypeMismatch {
                variable_id: variable.id,
                expected: variable.resolved_type,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tonal_core::Color;

    use super::*;

    #[test]
    fn variable_names_are_unique_per_collection() {
        let mut state = StoreState::default();
        let first = state.create_collection("Colors").expect("collection");
        let second = state.create_collection("Tokens").expect("collection");

        state
            .create_variable(first.id, "brand/500", VariableType::Color)
            .expect("first variable");
        state
            .create_variable(second.id, "brand/500", VariableType::Color)
            .expect("same name in another collection");
        assert!(matches!(
            state.create_variable(first.id, "brand/500", VariableType::Color),
            Err(StoreError::DuplicateName { .. })
        ));
        assert!(matches!(
            state.create_collection("Colors"),
            Err(StoreError::DuplicateCollection { .. })
        ));
    }

    #[test]
    fn set_value_checks_mode_and_type() {
        let mut state = StoreState::default();
        let collection = state.create_collection("Colors").expect("collection");
        let mode = collection.modes[0].id;
        let spacing = state
            .create_variable(collection.id, "space/4", VariableType::Float)
            .expect("variable");

        assert!(matches!(
            state.set_value(spacing.id, mode, Color::WHITE.into()),
            Err(StoreError::TypeMismatch { .. })
        ));
        assert!(matches!(
            state.set_value(spacing.id, Uuid::new_v4(), VariableValue::Float(4.0)),
            Err(StoreError::UnknownMode { .. })
        ));
        assert!(matches!(
            state.set_value(Uuid::new_v4(), mode, VariableValue::Float(4.0)),
            Err(StoreError::UnknownVariable { .. })
        ));
        state
            .set_value(spacing.id, mode, VariableValue::Float(4.0))
            .expect("typed write");
        assert_eq!(
            state.variables_in(collection.id).expect("listing")[0].value_in(mode),
            Some(&VariableValue::Float(4.0))
        );
    }

    #[test]
    fn rejected_create_with_value_stores_nothing() {
        let mut state = StoreState::default();
        let collection = state.create_collection("Colors").expect("collection");
        let mode = collection.modes[0].id;

        assert!(matches!(
            state.create_variable_with_value(
                collection.id,
                "space/4",
                VariableType::Float,
                mode,
                Color::WHITE.into(),
            ),
            Err(StoreError::TypeMismatch { .. })
        ));
        assert!(matches!(
            state.create_variable_with_value(
                collection.id,
                "base/white",
                VariableType::Color,
                Uuid::new_v4(),
                Color::WHITE.into(),
            ),
            Err(StoreError::UnknownMode { .. })
        ));
        assert!(state.variables_in(collection.id).expect("listing").is_empty());

        let created = state
            .create_variable_with_value(
                collection.id,
                "base/white",
                VariableType::Color,
                mode,
                Color::WHITE.into(),
            )
            .expect("typed create");
        assert_eq!(
            created.value_in(mode).and_then(VariableValue::as_color),
            Some(Color::WHITE)
        );
        assert_eq!(state.variables_in(collection.id).expect("listing"), vec![created]);
    }
}
