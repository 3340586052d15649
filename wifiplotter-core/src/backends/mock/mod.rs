use crate::Result;
use crate::backends::parsing::parse_iwlist_output;
use crate::traits::{AccessPoint, ScanSource, ScanStatus, SignalMode};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// A fixed `iwlist` report used by the mock backend.
pub const SAMPLE_REPORT: &str = "\
wlan1     Scan completed :
          Cell 01 - Address: 00:1A:2B:3C:4D:5E
                    Channel:1
                    Frequency:2.412 GHz (Channel 1)
                    Quality=66/70  Signal level=-44 dBm
                    Encryption key:on
                    ESSID:\"MyHomeWiFi\"
          Cell 02 - Address: 66:77:88:99:AA:BB
                    Channel:6
                    Frequency:2.437 GHz (Channel 6)
                    Quality=49/70  Signal level=-61 dBm
                    Encryption key:off
                    ESSID:\"CafeGuest\"
          Cell 03 - Address: F0:E1:D2:C3:B4:A5
                    Channel:44
                    Frequency:5.22 GHz (Channel 44)
                    Quality=28/70  Signal level=-82 dBm
                    Encryption key:on
                    ESSID:\"\"
";

/// A mock backend for testing purposes.
/// It runs a canned report through the real parser without any hardware.
#[derive(Debug)]
pub struct MockScanner {
    report: String,
    signal_mode: SignalMode,
    last_scan: Mutex<(Vec<AccessPoint>, ScanStatus)>,
}

impl MockScanner {
    pub fn new() -> Self {
        Self::with_report(SAMPLE_REPORT)
    }

    pub fn with_report(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            signal_mode: SignalMode::default(),
            last_scan: Mutex::new((Vec::new(), ScanStatus::NotScanned)),
        }
    }

    pub fn signal_mode(mut self, signal_mode: SignalMode) -> Self {
        self.signal_mode = signal_mode;
        self
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanSource for MockScanner {
    async fn scan(&self) -> Result<ScanStatus> {
        tracing::info!("🤖 [MockScanner] Scanning for access points...");
        let access_points = parse_iwlist_output(&self.report, self.signal_mode);
        tracing::info!("🤖 [MockScanner] Found {} access points.", access_points.len());
        *self.last_scan.lock().await = (access_points, ScanStatus::Completed);
        Ok(ScanStatus::Completed)
    }

    async fn results(&self) -> Vec<AccessPoint> {
        self.last_scan.lock().await.0.clone()
    }

    async fn status(&self) -> ScanStatus {
        self.last_scan.lock().await.1.clone()
    }

    fn interface_name(&self) -> Option<&str> {
        Some("mock0")
    }
}
