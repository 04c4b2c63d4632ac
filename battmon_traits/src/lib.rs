pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Error type carried across the hardware trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// ADC input channel index (e.g. ADC1 channel 6 on an ESP32, `in_voltage6_raw` on Linux IIO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Channel(pub u8);

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

/// Input attenuation applied in front of the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Attenuation {
    Db0,
    Db2_5,
    Db6,
    #[default]
    Db11,
}

impl Attenuation {
    /// Index into per-attenuation calibration tables.
    pub fn index(self) -> usize {
        match self {
            Attenuation::Db0 => 0,
            Attenuation::Db2_5 => 1,
            Attenuation::Db6 => 2,
            Attenuation::Db11 => 3,
        }
    }
}

/// Converter resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdcWidth {
    Bits9,
    Bits10,
    Bits11,
    #[default]
    Bits12,
}

impl AdcWidth {
    pub fn bits(self) -> u8 {
        match self {
            AdcWidth::Bits9 => 9,
            AdcWidth::Bits10 => 10,
            AdcWidth::Bits11 => 11,
            AdcWidth::Bits12 => 12,
        }
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            9 => Some(AdcWidth::Bits9),
            10 => Some(AdcWidth::Bits10),
            11 => Some(AdcWidth::Bits11),
            12 => Some(AdcWidth::Bits12),
            _ => None,
        }
    }

    /// Largest raw code the converter can produce at this width.
    pub fn max_code(self) -> u32 {
        (1u32 << self.bits()) - 1
    }
}

/// Inputs to a one-time calibration characterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRequest {
    pub attenuation: Attenuation,
    pub width: AdcWidth,
    /// Reference voltage in millivolts (nominally 1100 on ESP32 parts).
    pub reference_mv: u32,
}

/// Raw analog-to-digital converter peripheral.
pub trait Adc {
    /// Apply resolution and attenuation for `channel`. Called once from `begin()`.
    fn configure(
        &mut self,
        channel: Channel,
        width: AdcWidth,
        attenuation: Attenuation,
    ) -> Result<(), BoxError>;

    /// Take one blocking raw sample from `channel`.
    fn sample(&mut self, channel: Channel) -> Result<u32, BoxError>;
}

impl<T: Adc + ?Sized> Adc for Box<T> {
    fn configure(
        &mut self,
        channel: Channel,
        width: AdcWidth,
        attenuation: Attenuation,
    ) -> Result<(), BoxError> {
        (**self).configure(channel, width, attenuation)
    }

    fn sample(&mut self, channel: Channel) -> Result<u32, BoxError> {
        (**self).sample(channel)
    }
}

/// Calibration characteristics produced once by a [`Calibrator`]; read-only afterwards.
pub trait Characteristics {
    fn raw_to_mv(&self, raw: u32) -> u32;
}

/// Platform calibration service (factory eFuse data, curve fitting, ...).
pub trait Calibrator {
    type Chars: Characteristics;

    fn characterize(&mut self, request: CalibrationRequest) -> Result<Self::Chars, BoxError>;
}
