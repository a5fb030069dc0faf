//! The narrow repository seam over an external variable graph.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{Variable, VariableCollection, VariableType, VariableValue};

/// Backend holding named, typed variables grouped in collections.
///
/// Calls may be slow or remote; callers bound them with a timeout. A single
/// `set_value` must either apply fully or not at all.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// List every collection.
    async fn collections(&self) -> StoreResult<Vec<VariableCollection>>;

    /// List variables owned by `collection_id`, in store order.
    async fn variables(&self, collection_id: Uuid) -> StoreResult<Vec<Variable>>;

    /// Create an empty variable of `kind` named `name`.
    async fn create_variable(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
    ) -> StoreResult<Variable>;

    /// Create `name` holding `value` in `mode_id` as one store mutation.
    ///
    /// Either the variable exists with its value afterwards or nothing was
    /// created, including when the call is cancelled part way.
    async fn create_variable_with_value(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<Variable>;

    /// Write `value` for `mode_id`, replacing any previous value.
    async fn set_value(
        &self,
        variable_id: Uuid,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<()>;

    /// Create a collection with one default mode; default implementation
    /// reports lack of support.
    async fn create_collection(&self, name: &str) -> StoreResult<VariableCollection> {
        let _ = name;
        Err(StoreError::Unsupported {
            operation: "create_collection",
        })
    }
}

#[async_trait]
impl<T> VariableStore for Arc<T>
where
    T: VariableStore + ?Sized,
{
    async fn collections(&self) -> StoreResult<Vec<VariableCollection>> {
        (**self).collections().await
    }

    async fn variables(&self, collection_id: Uuid) -> StoreResult<Vec<Variable>> {
        (**self).variables(collection_id).await
    }

    async fn create_variable(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
    ) -> StoreResult<Variable> {
        (**self).create_variable(collection_id, name, kind).await
    }

    async fn create_variable_with_value(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<Variable> {
        (**self)
            .create_variable_with_value(collection_id, name, kind, mode_id, value)
            .await
    }

    async fn set_value(
        &self,
        variable_id: Uuid,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<()> {
        (**self).set_value(variable_id, mode_id, value).await
    }

    async fn create_collection(&self, name: &str) -> StoreResult<VariableCollection> {
        (**self).create_collection(name).await
    }
}
