use crate::Result;
use crate::traits::SignalMode;
use serde::Deserialize;
use std::path::Path;

/// 编译时嵌入的默认配置
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../configs/wifiplotter.toml");

/// 顶层应用配置
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub scan: ScannerConfig,
}

/// 扫描运行时配置
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    pub interface_name: String,
    /// Executable invoked as `<tool> <interface_name> scan`.
    pub tool: String,
    pub signal_mode: SignalMode,
    pub require_root: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interface_name: "wlan1".to_string(),
            tool: "iwlist".to_string(),
            signal_mode: SignalMode::default(),
            require_root: true,
        }
    }
}

/// 用于解析 TOML 的临时结构
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AppConfigFile {
    /// [scan] 表
    #[serde(default)]
    scan: ScanConfigToml,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ScanConfigToml {
    interface_name: Option<String>,
    tool: Option<String>,
    signal_mode: Option<SignalMode>,
    require_root: Option<bool>,
}

impl From<ScanConfigToml> for ScannerConfig {
    fn from(t: ScanConfigToml) -> Self {
        let defaults = ScannerConfig::default();
        ScannerConfig {
            interface_name: t.interface_name.unwrap_or(defaults.interface_name),
            tool: t.tool.unwrap_or(defaults.tool),
            signal_mode: t.signal_mode.unwrap_or(defaults.signal_mode),
            require_root: t.require_root.unwrap_or(defaults.require_root),
        }
    }
}

// ============= 配置加载函数 =============

/// 从 TOML 字符串加载应用配置，缺失的键使用默认值
pub fn load_config_from_toml_str(s: &str) -> Result<AppConfig> {
    let parsed: AppConfigFile = toml::from_str(s)?;
    Ok(AppConfig {
        scan: ScannerConfig::from(parsed.scan),
    })
}

/// 从磁盘上的 TOML 文件加载应用配置
pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    tracing::debug!("Loaded config from {}", path.as_ref().display());
    load_config_from_toml_str(&contents)
}

/// The configuration shipped in `configs/wifiplotter.toml`.
pub fn default_config() -> Result<AppConfig> {
    load_config_from_toml_str(DEFAULT_CONFIG_TOML)
}
