pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli {
    use super::TomlConfig;
    use crate::utils::error::Result;
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "electrical-profiles")]
    #[command(about = "Electrical profile sets: import, inspect and serve over HTTP")]
    pub struct CliConfig {
        #[arg(long, help = "TOML configuration file")]
        pub config: Option<PathBuf>,

        #[arg(long, help = "Override storage.data_dir")]
        pub data_dir: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Serve the read-only HTTP API
        Serve {
            #[arg(long)]
            bind: Option<String>,
        },
        /// Import a new electrical profile set
        Import {
            #[arg(long)]
            name: String,
            #[arg(long)]
            data: PathBuf,
            #[arg(long)]
            level_order: Option<PathBuf>,
        },
        /// List profile sets (id and name)
        List,
        /// Delete a profile set
        Delete {
            id: u64,
            #[arg(long, help = "Also delete the timetables referencing the set")]
            cascade: bool,
        },
        /// Fetch a profile set from the configured API and print its mapping
        Mapping { id: u64 },
        /// Register an infrastructure version
        AddInfra {
            #[arg(long)]
            name: String,
        },
        /// Register a timetable
        AddTimetable {
            #[arg(long)]
            name: String,
            #[arg(long)]
            infra: u64,
            #[arg(long)]
            profile_set: Option<u64>,
        },
    }

    impl CliConfig {
        /// 讀取設定檔 (若有) 並套用命令列覆寫
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };

            if let Some(data_dir) = &self.data_dir {
                config.storage.data_dir = data_dir.clone();
            }
            if let Command::Serve { bind: Some(bind) } = &self.command {
                config.server.bind = bind.clone();
            }

            Ok(config)
        }
    }

}
