//! Test and helper mocks for battmon_core

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use battmon_traits::{
    Adc, AdcWidth, Attenuation, BoxError, CalibrationRequest, Calibrator, Channel,
    Characteristics,
};

/// An ADC that accepts configuration but errors on every sample.
pub struct NoopAdc;

impl Adc for NoopAdc {
    fn configure(
        &mut self,
        _channel: Channel,
        _width: AdcWidth,
        _attenuation: Attenuation,
    ) -> Result<(), BoxError> {
        Ok(())
    }

    fn sample(&mut self, _channel: Channel) -> Result<u32, BoxError> {
        Err(Box::new(std::io::Error::other("noop adc")))
    }
}

/// An ADC that returns a fixed script of raw codes, wrapping at the end, and
/// counts samples through a shareable counter.
pub struct ScriptedAdc {
    script: Vec<u32>,
    idx: usize,
    samples: Arc<AtomicUsize>,
}

impl ScriptedAdc {
    pub fn new(script: Vec<u32>) -> Self {
        Self {
            script,
            idx: 0,
            samples: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every sample returns `raw`.
    pub fn constant(raw: u32) -> Self {
        Self::new(vec![raw])
    }

    /// Handle to the number of samples taken so far.
    pub fn sample_counter(&self) -> Arc<AtomicUsize> {
        self.samples.clone()
    }
}

impl Adc for ScriptedAdc {
    fn configure(
        &mut self,
        _channel: Channel,
        _width: AdcWidth,
        _attenuation: Attenuation,
    ) -> Result<(), BoxError> {
        Ok(())
    }

    fn sample(&mut self, _channel: Channel) -> Result<u32, BoxError> {
        if self.script.is_empty() {
            return Err("empty adc script".into());
        }
        let raw = self.script[self.idx];
        self.idx = (self.idx + 1) % self.script.len();
        self.samples.fetch_add(1, Ordering::Relaxed);
        Ok(raw)
    }
}

/// Characteristics where one raw count reads as one millivolt.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityChars;

impl Characteristics for IdentityChars {
    fn raw_to_mv(&self, raw: u32) -> u32 {
        raw
    }
}

/// Calibrator producing [`IdentityChars`]; makes pipeline arithmetic easy to follow in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCalibrator;

impl Calibrator for IdentityCalibrator {
    type Chars = IdentityChars;

    fn characterize(&mut self, _request: CalibrationRequest) -> Result<IdentityChars, BoxError> {
        Ok(IdentityChars)
    }
}
