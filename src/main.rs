use anyhow::Context;
use clap::Parser;
use electrical_profiles::adapters::storage::read_json_document;
use electrical_profiles::domain::ports::ConfigProvider;
use electrical_profiles::utils::error::ErrorSeverity;
use electrical_profiles::utils::{logger, validation::Validate};
use electrical_profiles::{
    CliConfig, Command, DeletePolicy, LocalStorage, ProfileError, ProfileStore, QueryService,
    TomlConfig,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    // 初始化日誌
    logger::init_logger(
        cli.verbose,
        config.logging.level.as_deref(),
        config.logging.format,
    );
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(3);
    }

    if let Err(e) = run(cli.command, config).await {
        let exit_code = match e.downcast_ref::<ProfileError>() {
            Some(err) => {
                tracing::error!("❌ {} (Severity: {:?})", err, err.severity());
                eprintln!("❌ {}", err);
                match err.severity() {
                    ErrorSeverity::Low | ErrorSeverity::High => 1,
                    ErrorSeverity::Medium | ErrorSeverity::Critical => 3,
                }
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                3
            }
        };
        std::process::exit(exit_code);
    }
}

async fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    read_json_document(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

async fn open_store(config: &TomlConfig) -> anyhow::Result<ProfileStore<LocalStorage>> {
    let storage = LocalStorage::new(config.data_dir().to_string());
    Ok(ProfileStore::open(storage, config.snapshot_file()).await?)
}

async fn run(command: Command, config: TomlConfig) -> anyhow::Result<()> {
    match command {
        Command::Serve { .. } => {
            let addr: SocketAddr = config
                .bind_addr()
                .parse()
                .with_context(|| format!("invalid bind address {}", config.bind_addr()))?;
            let service = QueryService::new(Arc::new(open_store(&config).await?));
            electrical_profiles::adapters::http::serve(addr, service).await?;
        }
        Command::Import {
            name,
            data,
            level_order,
        } => {
            let data = read_json(&data).await?;
            let level_order = match level_order {
                Some(path) => Some(read_json(&path).await?),
                None => None,
            };
            let store = open_store(&config).await?;
            let id = store.create(&name, &data, level_order.as_ref()).await?;
            println!("{}", id);
        }
        Command::List => {
            for summary in open_store(&config).await?.list_summaries().await {
                println!("{}\t{}", summary.id, summary.name);
            }
        }
        Command::Delete { id, cascade } => {
            let policy = if cascade {
                DeletePolicy::Cascade
            } else {
                DeletePolicy::Restrict
            };
            let plan = open_store(&config).await?.delete(id, policy).await?;
            if !plan.timetables.is_empty() {
                println!("Deleted timetables: {:?}", plan.timetables);
            }
        }
        // 只讀遠端 API，不開啟本機快照
        Command::Mapping { id } => {
            let client = config.profile_set_client()?;
            let mapping = client.profile_mapping(id).await?;
            let mut power_classes: Vec<&str> = mapping.power_classes().collect();
            power_classes.sort_unstable();
            for power_class in power_classes {
                for (track, ranges) in mapping.tracks(power_class) {
                    for segment in ranges.segments() {
                        println!(
                            "{}\t{}\t{}\t{}\t{}",
                            power_class, track, segment.begin, segment.end, segment.value
                        );
                    }
                }
            }
        }
        Command::AddInfra { name } => {
            println!("{}", open_store(&config).await?.create_infra(&name).await?);
        }
        Command::AddTimetable {
            name,
            infra,
            profile_set,
        } => {
            let store = open_store(&config).await?;
            println!(
                "{}",
                store.create_timetable(&name, infra, profile_set).await?
            );
        }
    }

    Ok(())
}
