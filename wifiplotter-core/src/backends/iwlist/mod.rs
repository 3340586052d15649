// 后端：iwlist（调用 `iwlist <iface> scan` 并解析其文本输出）

use crate::backends::parsing::parse_iwlist_output;
use crate::backends::utils::{NetInterface, resolve_interface};
use crate::config::ScannerConfig;
use crate::traits::{AccessPoint, ScanSource, ScanStatus, SignalMode};
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct LastScan {
    access_points: Vec<AccessPoint>,
    status: ScanStatus,
}

/// Scan source backed by the `iwlist` wireless tool.
///
/// Built through [`IwlistScanner::new`], the scanner holds a resolved
/// interface. A `Default` scanner has none and refuses to scan.
#[derive(Debug, Default)]
pub struct IwlistScanner {
    iface: Option<NetInterface>,
    tool: String,
    signal_mode: SignalMode,
    // 上一次扫描结果，每次扫描整体覆盖
    last_scan: Mutex<LastScan>,
}

impl IwlistScanner {
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        let iface = resolve_interface(&config.interface_name)?;
        tracing::debug!(index = iface.index, "Resolved interface {}", iface.name);
        Ok(Self {
            iface: Some(iface),
            tool: config.tool.clone(),
            signal_mode: config.signal_mode,
            last_scan: Mutex::new(LastScan::default()),
        })
    }

    /// Scanner for `name` with the default tool and signal mode.
    pub fn with_interface(name: &str) -> Result<Self> {
        Self::new(&ScannerConfig {
            interface_name: name.to_string(),
            ..ScannerConfig::default()
        })
    }

    /// Runs the tool once. Whatever reached stdout is returned even when the
    /// tool fails, so a partial report can still be parsed.
    async fn run_tool(&self, iface: &NetInterface) -> (String, ScanStatus) {
        let output = match Command::new(&self.tool)
            .arg(&iface.name)
            .arg("scan")
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let err = Error::CommandFailed(format!("failed to launch `{}`: {}", self.tool, e));
                return (
                    String::new(),
                    ScanStatus::ToolFailed {
                        reason: err.to_string(),
                    },
                );
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            let err = Error::CommandFailed(format!(
                "`{} {} scan` exited with {}: {}",
                self.tool,
                iface.name,
                output.status,
                error_msg.trim()
            ));
            return (
                stdout,
                ScanStatus::ToolFailed {
                    reason: err.to_string(),
                },
            );
        }

        (stdout, ScanStatus::Completed)
    }
}

#[async_trait]
impl ScanSource for IwlistScanner {
    async fn scan(&self) -> Result<ScanStatus> {
        let iface = self.iface.as_ref().ok_or(Error::NoInterface)?;

        tracing::info!("📡 [Iwlist] Scanning on {} ...", iface.name);
        let (stdout, status) = self.run_tool(iface).await;
        if let ScanStatus::ToolFailed { reason } = &status {
            // 不中断：继续解析已经捕获到的输出
            tracing::warn!("📡 [Iwlist] {}", reason);
        }
        tracing::debug!("📡 [Iwlist] --- SCAN OUTPUT ---\n{}", stdout);

        let access_points = parse_iwlist_output(&stdout, self.signal_mode);
        tracing::info!("📡 [Iwlist] Found {} access points.", access_points.len());

        *self.last_scan.lock().await = LastScan {
            access_points,
            status: status.clone(),
        };
        Ok(status)
    }

    async fn results(&self) -> Vec<AccessPoint> {
        self.last_scan.lock().await.access_points.clone()
    }

    async fn status(&self) -> ScanStatus {
        self.last_scan.lock().await.status.clone()
    }

    fn interface_name(&self) -> Option<&str> {
        self.iface.as_ref().map(|i| i.name.as_str())
    }
}
