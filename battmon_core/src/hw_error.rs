//! Maps `Box<dyn Error>` from trait boundaries to typed `BatteryError`.
//!
//! The traits in `battmon_traits` use `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `battmon_hardware::HwError` downcasting.

use crate::error::BatteryError;

/// Map a trait-boundary error to a typed `BatteryError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> BatteryError {
    #[cfg(feature = "hardware-errors")]
    {
        use battmon_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Timeout => BatteryError::Timeout,
                HwError::InvalidReference(_) => BatteryError::Calibration(hw.to_string()),
                other => BatteryError::HardwareFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        BatteryError::Timeout
    } else {
        BatteryError::Hardware(s)
    }
}
