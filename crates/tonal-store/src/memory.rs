//! In-memory variable store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::model::{Variable, VariableCollection, VariableType, VariableValue};
use crate::state::StoreState;
use crate::store::VariableStore;

/// Variable store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Empty store with no collections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    async fn collections(&self) -> StoreResult<Vec<VariableCollection>> {
        Ok(self.state.read().await.collections.clone())
    }

    async fn variables(&self, collection_id: Uuid) -> StoreResult<Vec<Variable>> {
        self.state.read().await.variables_in(collection_id)
    }

    async fn create_variable(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
    ) -> StoreResult<Variable> {
        self.state
            .write()
            .await
            .create_variable(collection_id, name, kind)
    }

    async fn create_variable_with_value(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<Variable> {
        self.state
            .write()
            .await
            .create_variable_with_value(collection_id, name, kind, mode_id, value)
    }

    async fn set_value(
        &self,
        variable_id: Uuid,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<()> {
        self.state
            .write()
            .await
            .set_value(variable_id, mode_id, value)
    }

    async fn create_collection(&self, name: &str) -> StoreResult<VariableCollection> {
        self.state.write().await.create_collection(name)
    }
}
