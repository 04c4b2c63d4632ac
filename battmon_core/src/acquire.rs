//! Batch acquisition from the ADC.

use std::time::Duration;

use battmon_traits::{Adc, Channel, Clock};
use tracing::warn;

use crate::error::Result;
use crate::hw_error::map_hw_error;

/// Raw samples drawn for every filtered read, regardless of filter mode.
pub const SAMPLES_PER_READ: usize = 15;
/// Settling delay after each raw sample.
pub const INTER_SAMPLE_DELAY: Duration = Duration::from_micros(200);

/// Draws a fixed-size batch of raw codes, spaced by a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SampleAcquirer {
    count: usize,
    delay: Duration,
}

impl Default for SampleAcquirer {
    fn default() -> Self {
        Self {
            count: SAMPLES_PER_READ,
            delay: INTER_SAMPLE_DELAY,
        }
    }
}

impl SampleAcquirer {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fill `out` with `count` samples in acquisition order, sleeping `delay`
    /// on `clock` after each one. Blocks for roughly `count * delay`.
    ///
    /// A driver error aborts the batch; `out` then holds the samples taken so far.
    pub fn acquire_into<A: Adc + ?Sized>(
        &self,
        adc: &mut A,
        clock: &dyn Clock,
        channel: Channel,
        out: &mut Vec<u32>,
    ) -> Result<()> {
        out.clear();
        for i in 0..self.count {
            let raw = adc.sample(channel).map_err(|e| {
                let mapped = map_hw_error(&*e);
                warn!(%channel, sample = i, error = %mapped, "adc sample failed");
                eyre::Report::new(mapped)
            })?;
            out.push(raw);
            clock.sleep(self.delay);
        }
        Ok(())
    }
}
