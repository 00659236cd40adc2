use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type SetId = u64;
pub type InfraId = u64;
pub type TimetableId = u64;

/// 軌道區段上的一段位置範圍 `[begin, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRange {
    pub track: String,
    pub begin: f64,
    pub end: f64,
}

impl TrackRange {
    pub fn new(track: impl Into<String>, begin: f64, end: f64) -> Self {
        Self {
            track: track.into(),
            begin,
            end,
        }
    }
}

/// One power-loss category for one power class, applied on a set of track ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricalProfile {
    pub value: String,
    pub power_class: String,
    pub track_ranges: Vec<TrackRange>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectricalProfilesList(pub Vec<ElectricalProfile>);

impl ElectricalProfilesList {
    pub fn profiles(&self) -> &[ElectricalProfile] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// power class -> 等級排序 (順序即排名)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectricalProfileLevelOrder(pub BTreeMap<String, Vec<String>>);

impl ElectricalProfileLevelOrder {
    pub fn levels(&self, power_class: &str) -> Option<&[String]> {
        self.0.get(power_class).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricalProfilesSet {
    pub id: SetId,
    pub name: String,
    pub data: ElectricalProfilesList,
    #[serde(default)]
    pub level_order: ElectricalProfileLevelOrder,
}

impl ElectricalProfilesSet {
    pub fn summary(&self) -> SetSummary {
        SetSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// `list` 只回傳識別與名稱，不帶文件內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSummary {
    pub id: SetId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infra {
    pub id: InfraId,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub id: TimetableId,
    pub name: String,
    pub infra: InfraId,
    #[serde(default)]
    pub electrical_profile_set: Option<SetId>,
}

/// 刪除電力剖面集時，如何處理仍引用它的時刻表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    #[default]
    Restrict,
    Cascade,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    pub set_id: SetId,
    pub timetables: Vec<TimetableId>,
}
