//! Type-state builder for `BatteryReader`.
//!
//! `build()` only exists once both an ADC and a calibrator have been supplied;
//! everything else has a default.

use std::sync::Arc;

use battmon_traits::clock::{Clock, MonotonicClock};
use battmon_traits::{Adc, AdcWidth, Attenuation, Calibrator, Channel};

use crate::acquire::{SAMPLES_PER_READ, SampleAcquirer};
use crate::config::{AlarmCfg, FilterCfg, ReaderCfg};
use crate::error::{BuildError, Result};
use crate::filter::Filter;
use crate::reader::BatteryReader;
use crate::util::divider_ratio;

/// Placeholder for a collaborator that has not been provided yet.
pub struct Missing;

pub struct BatteryReaderBuilder<A, K> {
    adc: A,
    calibrator: K,
    reader: ReaderCfg,
    filter: FilterCfg,
    alarm: AlarmCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
}

impl Default for BatteryReaderBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            adc: Missing,
            calibrator: Missing,
            reader: ReaderCfg::default(),
            filter: FilterCfg::default(),
            alarm: AlarmCfg::default(),
            clock: None,
        }
    }
}

impl BatteryReaderBuilder<Missing, Missing> {
    /// Start building a reader.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: Adc, K: Calibrator> BatteryReader<A, K> {
    /// Construct directly from the static parameters, with default filter,
    /// alarm threshold and a real-time clock.
    pub fn new(adc: A, calibrator: K, reader: ReaderCfg) -> Result<Self> {
        BatteryReaderBuilder::new()
            .with_adc(adc)
            .with_calibrator(calibrator)
            .with_reader_cfg(reader)
            .build()
    }
}

/// Validate the static parameters the divider and percent math depend on.
fn validate(reader: &ReaderCfg) -> Result<()> {
    if !reader.v_min.is_finite() || !reader.v_max.is_finite() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "voltage range must be finite",
        )));
    }
    if reader.v_min >= reader.v_max {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "v_min must be < v_max",
        )));
    }
    if reader.r2 == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "r2 must be > 0",
        )));
    }
    if reader.reference_mv == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "reference_mv must be > 0",
        )));
    }
    Ok(())
}

impl<A, K> BatteryReaderBuilder<A, K> {
    pub fn with_adc<A2: Adc>(self, adc: A2) -> BatteryReaderBuilder<A2, K> {
        BatteryReaderBuilder {
            adc,
            calibrator: self.calibrator,
            reader: self.reader,
            filter: self.filter,
            alarm: self.alarm,
            clock: self.clock,
        }
    }

    pub fn with_calibrator<K2: Calibrator>(self, calibrator: K2) -> BatteryReaderBuilder<A, K2> {
        BatteryReaderBuilder {
            adc: self.adc,
            calibrator,
            reader: self.reader,
            filter: self.filter,
            alarm: self.alarm,
            clock: self.clock,
        }
    }

    pub fn with_reader_cfg(mut self, reader: ReaderCfg) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.reader.channel = channel;
        self
    }

    /// Battery voltages reported as 0 % and 100 %.
    pub fn with_range(mut self, v_min: f32, v_max: f32) -> Self {
        self.reader.v_min = v_min;
        self.reader.v_max = v_max;
        self
    }

    pub fn with_divider(mut self, r1: u32, r2: u32) -> Self {
        self.reader.r1 = r1;
        self.reader.r2 = r2;
        self
    }

    pub fn with_reference_mv(mut self, mv: u32) -> Self {
        self.reader.reference_mv = mv;
        self
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.reader.attenuation = attenuation;
        self
    }

    pub fn with_width(mut self, width: AdcWidth) -> Self {
        self.reader.width = width;
        self
    }

    pub fn with_filter(mut self, filter: FilterCfg) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_alarm(mut self, alarm: AlarmCfg) -> Self {
        self.alarm = alarm;
        self
    }

    /// Clock used for the inter-sample delay. Defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

impl<A: Adc, K: Calibrator> BatteryReaderBuilder<A, K> {
    pub fn build(self) -> Result<BatteryReader<A, K>> {
        validate(&self.reader)?;
        let clock: Arc<dyn Clock + Send + Sync> = match self.clock {
            Some(c) => Arc::from(c),
            None => Arc::new(MonotonicClock::new()),
        };
        Ok(BatteryReader {
            adc: self.adc,
            calibrator: self.calibrator,
            chars: None,
            divider_ratio: divider_ratio(self.reader.r1, self.reader.r2),
            cfg: self.reader,
            filter: Filter::new(self.filter.mode, self.filter.ema_alpha),
            low_threshold_v: self.alarm.low_threshold_v,
            acquirer: SampleAcquirer::default(),
            batch: Vec::with_capacity(SAMPLES_PER_READ),
            clock,
        })
    }
}
