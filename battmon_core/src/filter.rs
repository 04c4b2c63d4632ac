//! Batch reduction strategies: arithmetic mean, median, exponential moving average.
//!
//! Each filtered read reduces one freshly acquired batch to a single raw code.
//! The EMA state is the only thing that outlives a batch; it is owned by the
//! `Filter` next to the selected mode, so switching modes never resets it.

use std::str::FromStr;

use crate::error::BatteryError;

/// Lower bound for the EMA smoothing factor.
pub const MIN_EMA_ALPHA: f32 = 0.01;
/// Upper bound for the EMA smoothing factor (1.0 = no smoothing).
pub const MAX_EMA_ALPHA: f32 = 1.0;
pub const DEFAULT_EMA_ALPHA: f32 = 0.1;

/// Filter strategy applied to each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    #[default]
    Average,
    Median,
    Exponential,
}

impl FilterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::Average => "average",
            FilterMode::Median => "median",
            FilterMode::Exponential => "exponential",
        }
    }
}

impl core::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = BatteryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" | "avg" | "mean" => Ok(FilterMode::Average),
            "median" => Ok(FilterMode::Median),
            "exponential" | "ema" => Ok(FilterMode::Exponential),
            other => Err(BatteryError::Config(format!("unknown filter mode {other:?}"))),
        }
    }
}

/// Clamp an EMA smoothing factor into `[MIN_EMA_ALPHA, MAX_EMA_ALPHA]`.
/// NaN clamps to the minimum.
#[inline]
pub fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        return MIN_EMA_ALPHA;
    }
    alpha.clamp(MIN_EMA_ALPHA, MAX_EMA_ALPHA)
}

/// Arithmetic mean with integer (truncating) division. Empty batch → 0.
pub fn average(batch: &[u32]) -> u32 {
    if batch.is_empty() {
        return 0;
    }
    let sum: u64 = batch.iter().map(|&v| u64::from(v)).sum();
    (sum / batch.len() as u64) as u32
}

/// Element at index `len / 2` after an ascending sort (sorts `batch` in place).
/// Empty batch → 0.
pub fn median(batch: &mut [u32]) -> u32 {
    if batch.is_empty() {
        return 0;
    }
    batch.sort_unstable();
    batch[batch.len() / 2]
}

/// Exponential moving average over raw codes.
///
/// `state ← alpha·sample + (1 − alpha)·state`, starting from 0.0. The state is
/// never reset, so the output rises from zero over the first reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ema {
    alpha: f32,
    state: f32,
}

impl Default for Ema {
    fn default() -> Self {
        Self::new(DEFAULT_EMA_ALPHA)
    }
}

impl Ema {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: clamp_alpha(alpha),
            state: 0.0,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = clamp_alpha(alpha);
    }

    pub fn state(&self) -> f32 {
        self.state
    }

    #[inline]
    pub fn update(&mut self, sample: u32) -> f32 {
        self.state = self.alpha * sample as f32 + (1.0 - self.alpha) * self.state;
        self.state
    }

    /// Fold every sample of `batch` in order and return the state truncated to a raw code.
    pub fn reduce(&mut self, batch: &[u32]) -> u32 {
        for &sample in batch {
            self.update(sample);
        }
        self.state as u32
    }
}

/// Mode selector plus the persistent EMA.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filter {
    mode: FilterMode,
    ema: Ema,
}

impl Filter {
    pub fn new(mode: FilterMode, ema_alpha: f32) -> Self {
        Self {
            mode,
            ema: Ema::new(ema_alpha),
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    pub fn ema(&self) -> &Ema {
        &self.ema
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.ema.set_alpha(alpha);
    }

    /// Reduce one batch to a representative raw code. Median mode reorders `batch`.
    pub fn reduce(&mut self, batch: &mut [u32]) -> u32 {
        match self.mode {
            FilterMode::Average => average(batch),
            FilterMode::Median => median(batch),
            FilterMode::Exponential => self.ema.reduce(batch),
        }
    }
}
