pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::client::ProfileSetClient;
pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use app::QueryService;
pub use config::TomlConfig;
pub use crate::core::{mapping::ProfileMapping, store::ProfileStore};
pub use domain::model::{
    DeletePolicy, ElectricalProfile, ElectricalProfileLevelOrder, ElectricalProfilesList,
    ElectricalProfilesSet, SetSummary, TrackRange,
};
pub use utils::error::{ProfileError, Result};
