//! Core library for WifiPlotter.
//! This crate defines the access point model and the `ScanSource` trait,
//! the `iwlist` report parser, and the backends that produce reports
//! (the real `iwlist` invocation, or a mock selected by feature flag).

pub mod traits;
pub mod backends;
pub mod config;
pub mod factory;

use thiserror::Error;

pub use traits::{AccessPoint, Quality, ScanSource, ScanStatus, SignalMode};

#[derive(Debug, Error)]
pub enum Error {
    /// 构造扫描器时无法解析网卡名称
    #[error("Network interface not found: {0}")]
    InterfaceNotFound(String),

    /// 扫描器没有绑定任何网卡（未经 `new` 构造）
    #[error("Scanner has no network interface")]
    NoInterface,

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;
