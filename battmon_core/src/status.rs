//! Snapshot of every derived battery metric from one acquisition.

/// Result of one filtered read carried through calibration and divider math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryStatus {
    /// Filtered raw ADC code.
    pub raw: u32,
    /// Calibrated pin voltage in millivolts.
    pub millivolts: u32,
    /// Voltage at the ADC pin (post-divider), volts.
    pub divider_v: f32,
    /// Reconstructed battery voltage (pre-divider), volts.
    pub battery_v: f32,
    /// State of charge, 0..=100.
    pub percent: u8,
    /// Battery voltage at or below the low-battery threshold.
    pub low: bool,
}

impl core::fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:.3} V ({}%){} raw={} pin={} mV",
            self.battery_v,
            self.percent,
            if self.low { " LOW" } else { "" },
            self.raw,
            self.millivolts
        )
    }
}
