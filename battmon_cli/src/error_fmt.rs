//! Human-readable error descriptions, exit codes and structured JSON errors.

use battmon_core::error::{BatteryError, BuildError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(BuildError::InvalidConfig(msg)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid reader parameters ({msg}).\nLikely causes: Out-of-range [battery] or [divider] values in the TOML.\nHow to fix: Edit the config file, then rerun."
        );
    }

    if let Some(be) = err.downcast_ref::<BatteryError>() {
        return match be {
            BatteryError::NotInitialized => {
                "What happened: A reading was requested before the ADC was initialized.\nLikely causes: begin() was not called or failed earlier.\nHow to fix: Call begin() once before reading; check earlier log lines for its error.".to_string()
            }
            BatteryError::Timeout => {
                "What happened: The ADC did not answer in time.\nLikely causes: Driver not loaded, device busy, or wrong IIO device.\nHow to fix: Check [hardware] iio_device and that the kernel ADC driver is bound.".to_string()
            }
            BatteryError::Calibration(msg) => format!(
                "What happened: ADC calibration failed ({msg}).\nLikely causes: calibration.reference_mv outside 1000..=1200.\nHow to fix: Set [calibration] reference_mv to the measured reference, usually 1100."
            ),
            BatteryError::Config(msg) => format!(
                "What happened: Configuration is invalid ({msg}).\nLikely causes: Missing sections, a typo, or out-of-range values.\nHow to fix: Edit the TOML config (see etc/battmon.toml) and try again."
            ),
            BatteryError::Hardware(msg) | BatteryError::HardwareFault(msg) => format!(
                "What happened: Reading the ADC failed ({msg}).\nLikely causes: Wrong channel, missing sysfs entry, or insufficient permissions.\nHow to fix: Check [adc] channel and [hardware] iio_device; re-run with --log-level=debug."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: config 2, not initialized 3, timeout 4, hardware 5, anything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<BatteryError>() {
        Some(BatteryError::Config(_)) => 2,
        Some(BatteryError::NotInitialized) => 3,
        Some(BatteryError::Timeout) => 4,
        Some(
            BatteryError::Hardware(_) | BatteryError::HardwareFault(_) | BatteryError::Calibration(_),
        ) => 5,
        None => 1,
    }
}

/// Short stable name for the error kind, used as the JSON `reason`.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Config";
    }
    match err.downcast_ref::<BatteryError>() {
        Some(BatteryError::Config(_)) => "Config",
        Some(BatteryError::NotInitialized) => "NotInitialized",
        Some(BatteryError::Timeout) => "Timeout",
        Some(BatteryError::Calibration(_)) => "Calibration",
        Some(BatteryError::Hardware(_) | BatteryError::HardwareFault(_)) => "Hardware",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
