use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Represents a single access point (one `Cell` of an `iwlist` report).
/// 扫描报告中单个接入点的具体信息。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessPoint {
    /// MAC address, verbatim from the `Cell NN - Address:` line.
    pub address: String,
    pub ssid: String, // 隐藏网络为空字符串
    pub channel: u32,
    /// Frequency in GHz.
    pub frequency: f32,
    pub quality: Quality,
    pub encryption: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quality {
    /// 0 到 100
    pub percent: f32,
    /// dBm (or relative dB, depending on the driver)
    pub signal: i32,
}

/// How the number after `Signal level=` is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// Optional leading `-` followed by digits: `-67` stays `-67`.
    #[default]
    Signed,
    /// Digits only, the sign is dropped: `-67` becomes `67`.
    /// Kept for output compatibility with older WifiPlotter builds.
    LegacyMagnitude,
}

/// Outcome of the most recent scan.
///
/// `ToolFailed` still comes with whatever partial results the captured
/// output parsed to, so callers can tell "the tool broke" apart from
/// "the tool worked and saw nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanStatus {
    #[default]
    NotScanned,
    Completed,
    ToolFailed { reason: String },
}

impl ScanStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, ScanStatus::ToolFailed { .. })
    }
}

/// 扫描源接口：每个后端（iwlist、mock）都实现它。
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Runs one scan and replaces the cached results.
    ///
    /// Only a missing interface is an error. A failing external tool is
    /// logged and reported through the returned [`ScanStatus`].
    async fn scan(&self) -> crate::Result<ScanStatus>;

    /// Records from the most recent scan, in discovery order.
    async fn results(&self) -> Vec<AccessPoint>;

    /// Status of the most recent scan.
    async fn status(&self) -> ScanStatus;

    /// Name of the interface this source scans on, if any.
    fn interface_name(&self) -> Option<&str>;
}
