//! Unit helpers for the voltage and divider math.

/// Number of millivolts in one volt.
pub const MILLIVOLTS_PER_VOLT: f32 = 1_000.0;

/// Convert an integer millivolt reading to volts.
#[inline]
pub fn mv_to_volts(mv: u32) -> f32 {
    mv as f32 / MILLIVOLTS_PER_VOLT
}

/// Divider ratio `(r1 + r2) / r2` relating the pin voltage to the battery voltage.
#[inline]
pub fn divider_ratio(r1: u32, r2: u32) -> f32 {
    (u64::from(r1) + u64::from(r2)) as f32 / r2 as f32
}
