use crate::core::store::ProfileStore;
use crate::domain::model::{ElectricalProfileLevelOrder, ElectricalProfilesList, SetId, SetSummary};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::sync::Arc;

/// 唯讀查詢：每次呼叫都直接讀取儲存，不做快取
pub struct QueryService<S: Storage> {
    store: Arc<ProfileStore<S>>,
}

impl<S: Storage> Clone for QueryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Storage> QueryService<S> {
    pub fn new(store: Arc<ProfileStore<S>>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Vec<SetSummary> {
        self.store.list_summaries().await
    }

    pub async fn retrieve_data(&self, id: SetId) -> Result<ElectricalProfilesList> {
        self.store.get_data(id).await
    }

    pub async fn retrieve_level_order(&self, id: SetId) -> Result<ElectricalProfileLevelOrder> {
        self.store.get_level_order(id).await
    }
}
