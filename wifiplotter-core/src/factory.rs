use crate::Result;
use crate::config::ScannerConfig;
use crate::traits::ScanSource;

/// Builds the scan source selected at compile time.
///
/// `backend_mock` swaps the real `iwlist` backend for a canned report, for
/// local development on machines without a wireless card.
pub fn create_scan_source(config: &ScannerConfig) -> Result<Box<dyn ScanSource>> {
    #[cfg(feature = "backend_mock")]
    {
        tracing::info!("🤖 Backend: Mock scanner selected (interface {} ignored)", config.interface_name);
        Ok(Box::new(
            crate::backends::mock::MockScanner::new().signal_mode(config.signal_mode),
        ))
    }
    #[cfg(not(feature = "backend_mock"))]
    {
        tracing::info!("📡 Backend: iwlist scanner selected");
        Ok(Box::new(crate::backends::iwlist::IwlistScanner::new(config)?))
    }
}
