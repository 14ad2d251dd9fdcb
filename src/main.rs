use anyhow::Context;
use clap::Parser;
use natal_signs::core::ConfigProvider;
use natal_signs::utils::error::ErrorSeverity;
use natal_signs::utils::{logger, validation::Validate};
use natal_signs::{AstrologyApiClient, ChartEngine, CliConfig, LocalStorage, SignResolver, TomlConfig};
use std::io::Read;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse().with_env_credentials();

    // 載入 TOML 配置（若有指定）
    let toml_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    // 初始化日誌
    let verbose = cli.verbose || toml_config.as_ref().is_some_and(|c| c.verbose());
    let json_logs = cli.log_json || toml_config.as_ref().is_some_and(|c| c.json_logs());
    if json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting natal-signs CLI");

    let raw = read_birth_data(&cli).context("failed to read birth data")?;

    match toml_config {
        Some(config) => run(&config, &raw).await,
        None => run(&cli, &raw).await,
    }
}

fn read_birth_data(cli: &CliConfig) -> anyhow::Result<serde_json::Value> {
    let text = if let Some(data) = &cli.data {
        data.clone()
    } else if let Some(path) = &cli.input {
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path))?
    } else {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    serde_json::from_str(&text).context("birth data is not valid JSON")
}

async fn run<C: ConfigProvider + Validate>(config: &C, raw: &serde_json::Value) -> anyhow::Result<()> {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let client = AstrologyApiClient::from_config(config)?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = ChartEngine::new(SignResolver::new(client), storage, config.output_path());

    match engine.run(raw).await {
        Ok(report) => {
            tracing::info!("✅ Chart resolved ({:?})", report.source);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Chart failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
