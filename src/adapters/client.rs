use crate::core::mapping::ProfileMapping;
use crate::domain::model::{ElectricalProfileLevelOrder, ElectricalProfilesList, SetId, SetSummary};
use crate::utils::error::{ProfileError, Result};
use crate::utils::validation::validate_url;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use url::Url;

type MappingCell = Arc<OnceCell<Arc<ProfileMapping>>>;

/// 從電力剖面 API 讀取剖面集，並快取建好的 [`ProfileMapping`]。
pub struct ProfileSetClient {
    base_url: Url,
    token: Option<String>,
    client: Client,
    cache: Mutex<HashMap<SetId, MappingCell>>,
}

impl ProfileSetClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        validate_url("client.base_url", base_url)?;

        // 確保以 '/' 結尾，join 才不會吃掉最後一段路徑
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| ProfileError::ConfigError {
            message: format!("Invalid base URL {}: {}", base_url, e),
        })?;

        Ok(Self {
            base_url,
            token,
            client: Client::new(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// `set_id` 為 `None` 時 (例如列表)，404 視為非預期回應
    async fn get_json<T: DeserializeOwned>(&self, path: &str, set_id: Option<SetId>) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ProfileError::ConfigError {
                message: format!("Invalid request path {}: {}", path, e),
            })?;

        tracing::debug!("Making API request to: {}", url);
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        match (response.status(), set_id) {
            (status, _) if status.is_success() => Ok(response.json().await?),
            (StatusCode::NOT_FOUND, Some(id)) => {
                Err(ProfileError::not_found("ElectricalProfilesSet", id))
            }
            (status, _) => Err(ProfileError::UnexpectedResponse {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }

    pub async fn list(&self) -> Result<Vec<SetSummary>> {
        self.get_json("electrical_profile_set/", None).await
    }

    pub async fn fetch_profiles(&self, id: SetId) -> Result<ElectricalProfilesList> {
        self.get_json(&format!("electrical_profile_set/{}/", id), Some(id))
            .await
    }

    pub async fn fetch_level_order(&self, id: SetId) -> Result<ElectricalProfileLevelOrder> {
        self.get_json(&format!("electrical_profile_set/{}/level_order/", id), Some(id))
            .await
    }

    fn cell(&self, id: SetId) -> Result<MappingCell> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| std::io::Error::other("profile mapping cache poisoned"))?;
        Ok(Arc::clone(cache.entry(id).or_default()))
    }

    /// 取得剖面集的對應表；同一 id 只會下載一次，失敗的下載不會被快取。
    /// 快取鎖只在查表時持有，下載期間其他 id 的呼叫不需等待。
    pub async fn profile_mapping(&self, id: SetId) -> Result<Arc<ProfileMapping>> {
        let cell = self.cell(id)?;
        if let Some(mapping) = cell.get() {
            tracing::info!("Electrical profile set {} is already cached", id);
            return Ok(Arc::clone(mapping));
        }

        let mapping = cell
            .get_or_try_init(|| async {
                tracing::info!("Electrical profile set {} is not cached, fetching it", id);
                let profiles = match self.fetch_profiles(id).await {
                    Ok(profiles) => profiles,
                    Err(e) => {
                        tracing::error!("❌ Failed to fetch electrical profile set {}: {}", id, e);
                        return Err(e);
                    }
                };

                let mapping = Arc::new(ProfileMapping::from_profiles(&profiles));
                tracing::info!(
                    "Electrical profile set {} parsed ({} power class(es))",
                    id,
                    mapping.len()
                );
                Ok(mapping)
            })
            .await?;
        Ok(Arc::clone(mapping))
    }

    pub fn is_cached(&self, id: SetId) -> bool {
        self.cache
            .lock()
            .map(|cache| cache.get(&id).is_some_and(|cell| cell.initialized()))
            .unwrap_or(false)
    }
}
