//! The battery reader: acquisition → filter → calibration → divider → metrics.

use std::sync::Arc;

use battmon_traits::{Adc, CalibrationRequest, Calibrator, Characteristics, Clock};
use tracing::{debug, trace};

use crate::acquire::SampleAcquirer;
use crate::config::ReaderCfg;
use crate::error::{BatteryError, Result};
use crate::filter::{Filter, FilterMode};
use crate::hw_error::map_hw_error;
use crate::status::BatteryStatus;
use crate::util::mv_to_volts;

/// Map a battery voltage onto 0..=100 % linearly between `v_min` and `v_max`.
///
/// At or below `v_min` → 0, at or above `v_max` → 100; in between the
/// fractional percent is truncated, not rounded.
#[inline]
pub fn percent_from_voltage(voltage: f32, v_min: f32, v_max: f32) -> u8 {
    if voltage <= v_min {
        return 0;
    }
    if voltage >= v_max {
        return 100;
    }
    let percent = (voltage - v_min) / (v_max - v_min) * 100.0;
    percent as u8
}

/// Inclusive low-battery comparison.
#[inline]
pub fn is_low(voltage: f32, threshold_v: f32) -> bool {
    voltage <= threshold_v
}

/// Battery voltage reader over an ADC channel behind a resistive divider.
///
/// Every read method performs a fresh blocking batch acquisition and needs
/// `&mut self`; call [`BatteryReader::begin`] once before reading.
pub struct BatteryReader<A: Adc, K: Calibrator> {
    pub(crate) adc: A,
    pub(crate) calibrator: K,
    pub(crate) chars: Option<K::Chars>,
    pub(crate) cfg: ReaderCfg,
    pub(crate) divider_ratio: f32,
    pub(crate) filter: Filter,
    pub(crate) low_threshold_v: f32,
    pub(crate) acquirer: SampleAcquirer,
    // Reused across reads to avoid a per-read allocation
    pub(crate) batch: Vec<u32>,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
}

impl<A: Adc, K: Calibrator> core::fmt::Debug for BatteryReader<A, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BatteryReader")
            .field("channel", &self.cfg.channel)
            .field("v_min", &self.cfg.v_min)
            .field("v_max", &self.cfg.v_max)
            .field("divider_ratio", &self.divider_ratio)
            .field("filter_mode", &self.filter.mode())
            .field("ema_alpha", &self.filter.ema().alpha())
            .field("low_threshold_v", &self.low_threshold_v)
            .field("initialized", &self.chars.is_some())
            .finish()
    }
}

impl<A: Adc, K: Calibrator> BatteryReader<A, K> {
    /// Configure the ADC channel and characterize calibration.
    ///
    /// Calling it again re-applies the ADC settings and replaces the
    /// characteristics; the EMA state is kept.
    pub fn begin(&mut self) -> Result<()> {
        let cfg = &self.cfg;
        self.adc
            .configure(cfg.channel, cfg.width, cfg.attenuation)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))?;

        let request = CalibrationRequest {
            attenuation: cfg.attenuation,
            width: cfg.width,
            reference_mv: cfg.reference_mv,
        };
        let chars = self.calibrator.characterize(request).map_err(|e| {
            let mapped = match map_hw_error(&*e) {
                BatteryError::Hardware(msg) | BatteryError::HardwareFault(msg) => {
                    BatteryError::Calibration(msg)
                }
                other => other,
            };
            eyre::Report::new(mapped)
        })?;
        self.chars = Some(chars);

        debug!(
            channel = %cfg.channel,
            bits = cfg.width.bits(),
            attenuation = ?cfg.attenuation,
            reference_mv = cfg.reference_mv,
            divider_ratio = self.divider_ratio,
            "battery reader initialized"
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.chars.is_some()
    }

    fn chars(&self) -> Result<&K::Chars> {
        self.chars
            .as_ref()
            .ok_or_else(|| eyre::Report::new(BatteryError::NotInitialized))
    }

    /// Acquire one batch and reduce it with the active filter.
    pub fn read_adc_raw_filtered(&mut self) -> Result<u32> {
        self.chars()?;
        self.acquirer.acquire_into(
            &mut self.adc,
            self.clock.as_ref(),
            self.cfg.channel,
            &mut self.batch,
        )?;
        let raw = self.filter.reduce(&mut self.batch);
        trace!(mode = %self.filter.mode(), raw, "filtered read");
        Ok(raw)
    }

    /// Filtered raw code converted to millivolts at the ADC pin.
    pub fn read_adc_mv(&mut self) -> Result<u32> {
        let raw = self.read_adc_raw_filtered()?;
        Ok(self.chars()?.raw_to_mv(raw))
    }

    /// Voltage at the ADC pin (post-divider), volts.
    pub fn divider_voltage(&mut self) -> Result<f32> {
        Ok(mv_to_volts(self.read_adc_mv()?))
    }

    /// Battery voltage reconstructed through the divider ratio, volts.
    pub fn battery_voltage(&mut self) -> Result<f32> {
        Ok(self.divider_voltage()? * self.divider_ratio)
    }

    /// State of charge in percent, see [`percent_from_voltage`].
    pub fn battery_percent(&mut self) -> Result<u8> {
        let v = self.battery_voltage()?;
        Ok(percent_from_voltage(v, self.cfg.v_min, self.cfg.v_max))
    }

    /// True when the battery voltage is at or below the low-battery threshold.
    pub fn is_low_battery(&mut self) -> Result<bool> {
        let v = self.battery_voltage()?;
        let low = is_low(v, self.low_threshold_v);
        if low {
            debug!(battery_v = v, threshold_v = self.low_threshold_v, "low battery");
        }
        Ok(low)
    }

    /// Filtered raw code, for diagnostics.
    pub fn adc_raw(&mut self) -> Result<u32> {
        self.read_adc_raw_filtered()
    }

    /// Every metric from a single acquisition.
    pub fn status(&mut self) -> Result<BatteryStatus> {
        let raw = self.read_adc_raw_filtered()?;
        let millivolts = self.chars()?.raw_to_mv(raw);
        let divider_v = mv_to_volts(millivolts);
        let battery_v = divider_v * self.divider_ratio;
        let low = is_low(battery_v, self.low_threshold_v);
        if low {
            debug!(battery_v, threshold_v = self.low_threshold_v, "low battery");
        }
        Ok(BatteryStatus {
            raw,
            millivolts,
            divider_v,
            battery_v,
            percent: percent_from_voltage(battery_v, self.cfg.v_min, self.cfg.v_max),
            low,
        })
    }

    pub fn set_low_battery_threshold(&mut self, volts: f32) {
        self.low_threshold_v = volts;
    }

    pub fn low_battery_threshold(&self) -> f32 {
        self.low_threshold_v
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter.set_mode(mode);
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter.mode()
    }

    /// Set the EMA smoothing factor, clamped to [0.01, 1.0].
    pub fn set_exponential_alpha(&mut self, alpha: f32) {
        self.filter.set_alpha(alpha);
    }

    pub fn ema_alpha(&self) -> f32 {
        self.filter.ema().alpha()
    }

    /// Current EMA running state in raw-code units.
    pub fn ema_state(&self) -> f32 {
        self.filter.ema().state()
    }

    pub fn divider_ratio(&self) -> f32 {
        self.divider_ratio
    }

    pub fn config(&self) -> &ReaderCfg {
        &self.cfg
    }
}
