//! Configuration types for the battery reader.
//!
//! These are the runtime configuration structs used by `BatteryReader`.
//! They are separate from the TOML-deserialized config in `battmon_config`.

use battmon_traits::{AdcWidth, Attenuation, Channel};

use crate::filter::{DEFAULT_EMA_ALPHA, FilterMode};

/// Default calibration reference voltage in millivolts.
pub const DEFAULT_REFERENCE_MV: u32 = 1100;
/// Default low-battery threshold in volts.
pub const DEFAULT_LOW_THRESHOLD_V: f32 = 5.5;

/// Static hardware and divider parameters, fixed at construction.
#[derive(Debug, Clone)]
pub struct ReaderCfg {
    pub channel: Channel,
    /// Battery voltage reported as 0 %.
    pub v_min: f32,
    /// Battery voltage reported as 100 %.
    pub v_max: f32,
    /// Divider resistor between battery and ADC pin.
    pub r1: u32,
    /// Divider resistor between ADC pin and ground. Must be > 0.
    pub r2: u32,
    /// Reference voltage handed to the calibrator.
    pub reference_mv: u32,
    pub attenuation: Attenuation,
    pub width: AdcWidth,
}

impl Default for ReaderCfg {
    fn default() -> Self {
        Self {
            channel: Channel(0),
            v_min: 3.0,
            v_max: 4.2,
            r1: 10_000,
            r2: 10_000,
            reference_mv: DEFAULT_REFERENCE_MV,
            attenuation: Attenuation::Db11,
            width: AdcWidth::Bits12,
        }
    }
}

/// Filter selection for each batch.
#[derive(Debug, Clone, Copy)]
pub struct FilterCfg {
    pub mode: FilterMode,
    /// EMA smoothing factor; clamped to [0.01, 1.0] when applied.
    pub ema_alpha: f32,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self {
            mode: FilterMode::Average,
            ema_alpha: DEFAULT_EMA_ALPHA,
        }
    }
}

/// Low-battery alarm.
#[derive(Debug, Clone, Copy)]
pub struct AlarmCfg {
    /// Inclusive: voltage <= threshold is "low".
    pub low_threshold_v: f32,
}

impl Default for AlarmCfg {
    fn default() -> Self {
        Self {
            low_threshold_v: DEFAULT_LOW_THRESHOLD_V,
        }
    }
}

/// Background monitor pacing.
#[derive(Debug, Clone, Copy)]
pub struct MonitorCfg {
    pub interval_ms: u64,
}

impl Default for MonitorCfg {
    fn default() -> Self {
        Self { interval_ms: 1_000 }
    }
}
