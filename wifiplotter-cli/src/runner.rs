use crate::report;
use wifiplotter_core::config::ScannerConfig;
use wifiplotter_core::factory::create_scan_source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// 执行一次扫描并把结果打印到 stdout
pub async fn run_scan(config: &ScannerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let source = create_scan_source(config)?;
    tracing::debug!("📡 Runner: scanning on {:?}", source.interface_name());

    let status = source.scan().await?;
    let access_points = source.results().await;

    let mut stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Text => report::write_text(&mut stdout, &status, &access_points)?,
        OutputFormat::Json => report::write_json(&mut stdout, &status, &access_points)?,
    }
    Ok(())
}
