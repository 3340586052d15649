mod report;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use runner::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wifiplotter_core::SignalMode;
use wifiplotter_core::backends::utils::is_privileged;
use wifiplotter_core::config::{self, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "wifiplotter")]
#[command(about = "Scan for nearby wireless access points using iwlist")]
struct Cli {
    /// Wireless interface to scan on (overrides the config file)
    #[arg(short, long)]
    interface: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the access points as a JSON array
    #[arg(long)]
    json: bool,

    /// Drop the sign of signal levels, as older releases did
    #[arg(long)]
    legacy_signal: bool,

    /// Do not require root
    #[arg(long)]
    no_root_check: bool,

    /// Debug logging (ignores RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. 初始化日志（这是入口点的职责），日志写到 stderr，stdout 只留给结果
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // 2. 加载配置，命令行参数优先
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    // 3. 权限检查
    if config.scan.require_root && !is_privileged() {
        println!("Program must be run as root user");
        std::process::exit(1);
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // 4. 调用库的核心逻辑
    if let Err(e) = runner::run_scan(&config.scan, format).await {
        tracing::error!("❌ WifiPlotter failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::default_config().context("Embedded default config is invalid")?,
    };

    if let Some(iface) = &cli.interface {
        config.scan.interface_name = iface.clone();
    }
    if cli.legacy_signal {
        config.scan.signal_mode = SignalMode::LegacyMagnitude;
    }
    if cli.no_root_check {
        config.scan.require_root = false;
    }

    Ok(config)
}
