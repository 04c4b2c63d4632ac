pub mod calibration;
pub mod error;
pub mod iio;
pub mod util;

pub use calibration::{LinearCharacteristics, VrefLinearCalibrator};
pub use iio::IioAdc;

use battmon_traits::{Adc, AdcWidth, Attenuation, BoxError, Channel};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::HwError;

/// Largest jitter amplitude a `SimulatedAdc` accepts: the 12-bit full scale.
pub const MAX_NOISE_COUNTS: u32 = 4_095;

/// Shared handle to a `SimulatedAdc`'s input; survives moving the ADC into a reader or thread.
#[derive(Debug, Clone)]
pub struct SimulatedInput {
    divider_mv: Arc<AtomicU32>,
}

impl SimulatedInput {
    /// Set the voltage present at the ADC pin (post-divider), in millivolts.
    pub fn set_divider_mv(&self, mv: u32) {
        self.divider_mv.store(mv, Ordering::Relaxed);
    }

    pub fn divider_mv(&self) -> u32 {
        self.divider_mv.load(Ordering::Relaxed)
    }
}

/// Simulated ADC: returns the code the vref-linear model would read for the
/// configured pin voltage, with optional deterministic triangle jitter of
/// `±noise_counts`.
pub struct SimulatedAdc {
    input: SimulatedInput,
    noise_counts: u32,
    phase: u32,
    reference_mv: u32,
    configured: Option<(Channel, LinearCharacteristics)>,
}

impl SimulatedAdc {
    pub fn new(divider_mv: u32) -> Self {
        SimulatedAdc {
            input: SimulatedInput {
                divider_mv: Arc::new(AtomicU32::new(divider_mv)),
            },
            noise_counts: 0,
            phase: 0,
            reference_mv: 1100,
            configured: None,
        }
    }

    /// Jitter amplitude in raw counts, clamped to [`MAX_NOISE_COUNTS`].
    pub fn with_noise(mut self, counts: u32) -> Self {
        self.noise_counts = counts.min(MAX_NOISE_COUNTS);
        self
    }

    /// Reference voltage the simulated part "really" has; defaults to 1100 mV.
    pub fn with_reference_mv(mut self, mv: u32) -> Self {
        self.reference_mv = mv;
        self
    }

    pub fn input(&self) -> SimulatedInput {
        self.input.clone()
    }

    /// Next jitter offset in -n..=n, walking a triangle wave.
    fn next_jitter(&mut self) -> i64 {
        let n = i64::from(self.noise_counts);
        if n == 0 {
            return 0;
        }
        let period = 4 * n;
        let p = i64::from(self.phase).rem_euclid(period);
        self.phase = ((i64::from(self.phase) + 1) % period) as u32;
        if p <= n {
            p
        } else if p <= 3 * n {
            2 * n - p
        } else {
            p - 4 * n
        }
    }
}

impl Adc for SimulatedAdc {
    fn configure(
        &mut self,
        channel: Channel,
        width: AdcWidth,
        attenuation: Attenuation,
    ) -> Result<(), BoxError> {
        let model = LinearCharacteristics::new(attenuation, width, self.reference_mv);
        self.configured = Some((channel, model));
        tracing::debug!(%channel, bits = width.bits(), ?attenuation, "simulated adc configured");
        Ok(())
    }

    fn sample(&mut self, channel: Channel) -> Result<u32, BoxError> {
        let model = match self.configured {
            Some((ch, model)) if ch == channel => model,
            _ => return Err(Box::new(HwError::ChannelNotConfigured(channel.0))),
        };
        let base = i64::from(model.mv_to_raw(self.input.divider_mv()));
        let raw = (base + self.next_jitter()).clamp(0, i64::from(model.width.max_code())) as u32;
        tracing::trace!(%channel, raw, "simulated adc sample");
        Ok(raw)
    }
}

/// Replays a recorded raw trace, wrapping around at the end.
pub struct ReplayAdc {
    trace: Vec<u32>,
    idx: usize,
    configured: Option<Channel>,
}

impl ReplayAdc {
    pub fn new(trace: Vec<u32>) -> error::Result<Self> {
        if trace.is_empty() {
            return Err(HwError::EmptyTrace);
        }
        Ok(ReplayAdc {
            trace,
            idx: 0,
            configured: None,
        })
    }

    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }
}

impl Adc for ReplayAdc {
    fn configure(
        &mut self,
        channel: Channel,
        _width: AdcWidth,
        _attenuation: Attenuation,
    ) -> Result<(), BoxError> {
        self.configured = Some(channel);
        Ok(())
    }

    fn sample(&mut self, channel: Channel) -> Result<u32, BoxError> {
        if self.configured != Some(channel) {
            return Err(Box::new(HwError::ChannelNotConfigured(channel.0)));
        }
        let raw = self.trace[self.idx];
        self.idx = (self.idx + 1) % self.trace.len();
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_adc_tracks_input() {
        let mut adc = SimulatedAdc::new(1792);
        adc.configure(Channel(6), AdcWidth::Bits12, Attenuation::Db11)
            .unwrap();
        assert_eq!(adc.sample(Channel(6)).unwrap(), 2048);

        adc.input().set_divider_mv(142);
        assert_eq!(adc.sample(Channel(6)).unwrap(), 0);
    }

    #[test]
    fn test_simulated_adc_jitter_is_bounded() {
        let mut adc = SimulatedAdc::new(1792).with_noise(3);
        adc.configure(Channel(0), AdcWidth::Bits12, Attenuation::Db11)
            .unwrap();
        let samples: Vec<u32> = (0..24).map(|_| adc.sample(Channel(0)).unwrap()).collect();
        assert!(samples.iter().all(|s| (2045..=2051).contains(s)));
        assert!(samples.contains(&2045) && samples.contains(&2051));
    }

    #[test]
    fn test_replay_wraps() {
        let mut adc = ReplayAdc::new(vec![1, 2, 3]).unwrap();
        adc.configure(Channel(1), AdcWidth::Bits12, Attenuation::Db11)
            .unwrap();
        let got: Vec<u32> = (0..5).map(|_| adc.sample(Channel(1)).unwrap()).collect();
        assert_eq!(got, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_huge_noise_is_clamped_and_stays_in_range() {
        let mut adc = SimulatedAdc::new(1792).with_noise(1 << 30);
        adc.configure(Channel(0), AdcWidth::Bits12, Attenuation::Db11)
            .unwrap();
        for _ in 0..64 {
            let raw = adc.sample(Channel(0)).unwrap();
            assert!(raw <= AdcWidth::Bits12.max_code());
        }
    }

    #[test]
    fn test_unconfigured_channel_errors() {
        let mut adc = SimulatedAdc::new(1000);
        assert!(adc.sample(Channel(0)).is_err());
    }
}
