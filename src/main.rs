mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use catalog_harvester_lib::crawling::Pipeline;
use catalog_harvester_lib::infrastructure::config::{AppConfig, ConfigManager, RowSelection};
use catalog_harvester_lib::infrastructure::logging::{
    init_logging, init_logging_with_config, log_system_info,
};
use catalog_harvester_lib::infrastructure::publisher::{GraphPublisher, select_row};
use catalog_harvester_lib::infrastructure::{read_table, write_table};

use cli::{Cli, Commands};

fn config_manager(path: Option<PathBuf>) -> Result<ConfigManager> {
    match path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => ConfigManager::new(),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let config = config_manager(path)?.load_config()?;
    init_logging_with_config(config.logging.clone())?;
    log_system_info();
    Ok(config)
}

async fn harvest(
    config: AppConfig,
    output: Option<PathBuf>,
    skip_static: bool,
    skip_browser: bool,
) -> Result<()> {
    if skip_static && skip_browser {
        bail!("Both sources are skipped; nothing to harvest");
    }

    let pipeline = Pipeline::from_config(&config, skip_static, skip_browser)
        .context("Failed to set up catalog sources")?;
    let report = pipeline.run().await;

    let output = output.unwrap_or_else(|| config.pipeline.output_path.clone());
    write_table(&output, &report.table)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Static source: {}", report.static_source);
    info!("Browser source: {}", report.browser_source);
    info!("Total rows: {}", report.table.len());
    if !report.is_complete() {
        warn!("At least one source aborted; {} may be incomplete", output.display());
    }
    Ok(())
}

async fn post(
    mut config: AppConfig,
    input: Option<PathBuf>,
    row: Option<usize>,
    random: bool,
) -> Result<()> {
    if random {
        config.publishing.row_selection = RowSelection::Random;
    } else if let Some(index) = row {
        config.publishing.row_selection = RowSelection::Index(index);
    }

    let input = input.unwrap_or_else(|| config.publishing.input_path.clone());
    let table =
        read_table(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let record = select_row(&table, config.publishing.row_selection)?;
    info!("Posting {:?}", record.title());

    let publisher = GraphPublisher::new(config.publishing.clone())?;
    let posted = publisher.post_record(record).await?;
    info!("Post published successfully. ID: {}", posted.media_id);
    Ok(())
}

async fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let manager = config_manager(path)?;
    let target: &Path = manager.config_path();
    if target.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            target.display()
        );
    }

    manager.save_config(&AppConfig::default()).await?;
    info!("Default configuration written to {}", target.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Harvest {
            config,
            output,
            skip_static,
            skip_browser,
        } => {
            let config = load_config(config)?;
            harvest(config, output, skip_static, skip_browser).await
        }
        Commands::Post {
            config,
            input,
            row,
            random,
        } => {
            let config = load_config(config)?;
            post(config, input, row, random).await
        }
        Commands::InitConfig { path, force } => {
            init_logging()?;
            init_config(path, force).await
        }
    }
}
