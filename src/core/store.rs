use crate::core::deletion::plan_deletion;
use crate::core::schema::validate;
use crate::domain::model::{
    DeletePolicy, DeletionPlan, ElectricalProfileLevelOrder, ElectricalProfilesList,
    ElectricalProfilesSet, Infra, InfraId, SetId, SetSummary, Timetable, TimetableId,
};
use crate::domain::ports::Storage;
use crate::utils::error::{ProfileError, Result};
use crate::utils::validation::validate_entity_name;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

const PROFILE_SET: &str = "ElectricalProfilesSet";
const INFRA: &str = "Infra";
const TIMETABLE: &str = "Timetable";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Sequences {
    profile_set: u64,
    infra: u64,
    timetable: u64,
}

/// 持久化快照；所有實體與流水號一起寫入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    sequences: Sequences,
    #[serde(default)]
    profile_sets: BTreeMap<SetId, ElectricalProfilesSet>,
    #[serde(default)]
    infras: BTreeMap<InfraId, Infra>,
    #[serde(default)]
    timetables: BTreeMap<TimetableId, Timetable>,
}

impl Snapshot {
    fn profile_set_mut(&mut self, id: SetId) -> Result<&mut ElectricalProfilesSet> {
        self.profile_sets
            .get_mut(&id)
            .ok_or_else(|| ProfileError::not_found(PROFILE_SET, id))
    }
}

/// 電力剖面集、基礎設施版本與時刻表的儲存。
///
/// 寫入時先在副本上套用變更並寫出快照，成功後才對讀者公開，
/// 因此讀者不會看到只寫了一半或未通過驗證的文件。
pub struct ProfileStore<S: Storage> {
    storage: S,
    snapshot_path: String,
    state: RwLock<Snapshot>,
}

impl<S: Storage> ProfileStore<S> {
    /// 載入既有快照；檔案不存在時從空白開始
    pub async fn open(storage: S, snapshot_path: impl Into<String>) -> Result<Self> {
        let snapshot_path = snapshot_path.into();

        let state = match storage.read_file(&snapshot_path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                tracing::info!(
                    "📂 Loaded snapshot {} ({} profile set(s), {} timetable(s))",
                    snapshot_path,
                    snapshot.profile_sets.len(),
                    snapshot.timetables.len()
                );
                snapshot
            }
            Err(ProfileError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No snapshot at {}, starting empty", snapshot_path);
                Snapshot::default()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            storage,
            snapshot_path,
            state: RwLock::new(state),
        })
    }

    async fn commit<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Snapshot) -> Result<T> + Send,
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let output = apply(&mut next)?;

        let bytes = serde_json::to_vec_pretty(&next)?;
        if let Err(e) = self.storage.write_file(&self.snapshot_path, &bytes).await {
            tracing::error!("❌ Failed to persist snapshot {}: {}", self.snapshot_path, e);
            return Err(e);
        }

        *state = next;
        Ok(output)
    }

    pub async fn create(
        &self,
        name: &str,
        data: &Value,
        level_order: Option<&Value>,
    ) -> Result<SetId> {
        validate_entity_name(PROFILE_SET, name)?;
        let data: ElectricalProfilesList = validate(data)?;
        let level_order: ElectricalProfileLevelOrder = match level_order {
            Some(value) => validate(value)?,
            None => ElectricalProfileLevelOrder::default(),
        };

        let name = name.to_string();
        let id = self
            .commit(move |snapshot| {
                snapshot.sequences.profile_set += 1;
                let id = snapshot.sequences.profile_set;
                snapshot.profile_sets.insert(
                    id,
                    ElectricalProfilesSet {
                        id,
                        name,
                        data,
                        level_order,
                    },
                );
                Ok(id)
            })
            .await?;

        tracing::info!("✅ Created electrical profile set {}", id);
        Ok(id)
    }

    pub async fn get(&self, id: SetId) -> Result<ElectricalProfilesSet> {
        self.state
            .read()
            .await
            .profile_sets
            .get(&id)
            .cloned()
            .ok_or_else(|| ProfileError::not_found(PROFILE_SET, id))
    }

    pub async fn get_data(&self, id: SetId) -> Result<ElectricalProfilesList> {
        self.state
            .read()
            .await
            .profile_sets
            .get(&id)
            .map(|set| set.data.clone())
            .ok_or_else(|| ProfileError::not_found(PROFILE_SET, id))
    }

    pub async fn get_level_order(&self, id: SetId) -> Result<ElectricalProfileLevelOrder> {
        self.state
            .read()
            .await
            .profile_sets
            .get(&id)
            .map(|set| set.level_order.clone())
            .ok_or_else(|| ProfileError::not_found(PROFILE_SET, id))
    }

    /// 依 id 排序，只含 id 與名稱
    pub async fn list_summaries(&self) -> Vec<SetSummary> {
        self.state
            .read()
            .await
            .profile_sets
            .values()
            .map(ElectricalProfilesSet::summary)
            .collect()
    }

    pub async fn update_data(&self, id: SetId, data: &Value) -> Result<()> {
        let data: ElectricalProfilesList = validate(data)?;
        self.commit(move |snapshot| {
            snapshot.profile_set_mut(id)?.data = data;
            Ok(())
        })
        .await?;

        tracing::info!("Replaced data of electrical profile set {}", id);
        Ok(())
    }

    pub async fn update_level_order(&self, id: SetId, level_order: &Value) -> Result<()> {
        let level_order: ElectricalProfileLevelOrder = validate(level_order)?;
        self.commit(move |snapshot| {
            snapshot.profile_set_mut(id)?.level_order = level_order;
            Ok(())
        })
        .await?;

        tracing::info!("Replaced level order of electrical profile set {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: SetId, policy: DeletePolicy) -> Result<DeletionPlan> {
        let plan = self
            .commit(move |snapshot| {
                if !snapshot.profile_sets.contains_key(&id) {
                    return Err(ProfileError::not_found(PROFILE_SET, id));
                }

                let plan = plan_deletion(id, snapshot.timetables.values(), policy)?;
                for timetable in &plan.timetables {
                    snapshot.timetables.remove(timetable);
                }
                snapshot.profile_sets.remove(&id);
                Ok(plan)
            })
            .await?;

        if plan.timetables.is_empty() {
            tracing::info!("🗑️ Deleted electrical profile set {}", id);
        } else {
            tracing::warn!(
                "🗑️ Deleted electrical profile set {} and cascaded to timetable(s) {:?}",
                id,
                plan.timetables
            );
        }
        Ok(plan)
    }

    pub async fn create_infra(&self, name: &str) -> Result<InfraId> {
        validate_entity_name(INFRA, name)?;

        let name = name.to_string();
        let id = self
            .commit(move |snapshot| {
                snapshot.sequences.infra += 1;
                let id = snapshot.sequences.infra;
                let now = Utc::now();
                snapshot.infras.insert(
                    id,
                    Infra {
                        id,
                        name,
                        created: now,
                        modified: now,
                    },
                );
                Ok(id)
            })
            .await?;

        tracing::info!("✅ Created infra {}", id);
        Ok(id)
    }

    pub async fn get_infra(&self, id: InfraId) -> Result<Infra> {
        self.state
            .read()
            .await
            .infras
            .get(&id)
            .cloned()
            .ok_or_else(|| ProfileError::not_found(INFRA, id))
    }

    pub async fn create_timetable(
        &self,
        name: &str,
        infra: InfraId,
        electrical_profile_set: Option<SetId>,
    ) -> Result<TimetableId> {
        validate_entity_name(TIMETABLE, name)?;

        let name = name.to_string();
        let id = self
            .commit(move |snapshot| {
                if !snapshot.infras.contains_key(&infra) {
                    return Err(ProfileError::not_found(INFRA, infra));
                }
                if let Some(set_id) = electrical_profile_set {
                    if !snapshot.profile_sets.contains_key(&set_id) {
                        return Err(ProfileError::not_found(PROFILE_SET, set_id));
                    }
                }

                snapshot.sequences.timetable += 1;
                let id = snapshot.sequences.timetable;
                snapshot.timetables.insert(
                    id,
                    Timetable {
                        id,
                        name,
                        infra,
                        electrical_profile_set,
                    },
                );
                Ok(id)
            })
            .await?;

        tracing::info!("✅ Created timetable {}", id);
        Ok(id)
    }

    pub async fn get_timetable(&self, id: TimetableId) -> Result<Timetable> {
        self.state
            .read()
            .await
            .timetables
            .get(&id)
            .cloned()
            .ok_or_else(|| ProfileError::not_found(TIMETABLE, id))
    }

    pub async fn list_timetables(&self) -> Vec<Timetable> {
        self.state.read().await.timetables.values().cloned().collect()
    }
}
