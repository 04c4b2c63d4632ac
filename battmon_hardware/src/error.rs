use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("adc channel {0} not configured")]
    ChannelNotConfigured(u8),
    #[error("adc read timeout")]
    Timeout,
    #[error("replay trace is empty")]
    EmptyTrace,
    #[error("reference voltage {0} mV outside 1000..=1200")]
    InvalidReference(u32),
    #[error("parse {path:?}: {value:?} is not a raw code")]
    Parse { path: PathBuf, value: String },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
