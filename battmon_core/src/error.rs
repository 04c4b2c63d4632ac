use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum BatteryError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("timeout waiting for adc")]
    Timeout,
    #[error("battery reader not initialized; call begin() first")]
    NotInitialized,
    #[error("calibration error: {0}")]
    Calibration(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
