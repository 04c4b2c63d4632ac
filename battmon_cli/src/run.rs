//! Backend assembly and the `read` / `watch` / `self-check` commands.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use battmon_core::{BatteryError, BatteryReader, BatteryReaderBuilder, BatteryStatus, FilterMode, Monitor};
use battmon_hardware::VrefLinearCalibrator;
use battmon_traits::Adc;
use battmon_traits::clock::MonotonicClock;
use serde_json::json;

pub type Reader = BatteryReader<Box<dyn Adc + Send>, VrefLinearCalibrator>;

/// Extra time granted past the interval before a missing snapshot is reported.
const STALL_GRACE: Duration = Duration::from_secs(2);

/// Pick the ADC backend: a replay trace when given, otherwise the live one.
pub fn make_adc(cfg: &battmon_config::Config, trace: Option<&Path>) -> eyre::Result<Box<dyn Adc + Send>> {
    if let Some(path) = trace {
        let codes = battmon_config::load_trace_csv(path)
            .map_err(|e| eyre::Report::new(BatteryError::Config(e.to_string())))?;
        tracing::info!(path = %path.display(), samples = codes.len(), "replaying raw trace");
        let adc = battmon_hardware::ReplayAdc::new(codes).map_err(eyre::Report::new)?;
        return Ok(Box::new(adc));
    }

    #[cfg(feature = "hardware")]
    {
        let adc = match cfg.hardware.iio_device.as_deref() {
            Some(dir) => battmon_hardware::IioAdc::new(dir),
            None => battmon_hardware::IioAdc::default(),
        };
        tracing::info!(device = %adc.device_dir().display(), "using IIO adc");
        Ok(Box::new(adc))
    }
    #[cfg(not(feature = "hardware"))]
    {
        let sim = &cfg.simulation;
        tracing::info!(
            divider_mv = sim.divider_mv,
            noise_counts = sim.noise_counts,
            "using simulated adc"
        );
        let adc = battmon_hardware::SimulatedAdc::new(sim.divider_mv)
            .with_noise(sim.noise_counts)
            .with_reference_mv(cfg.calibration.reference_mv);
        Ok(Box::new(adc))
    }
}

/// Assemble a reader from the config; `begin()` is left to the caller.
pub fn build_reader(cfg: &battmon_config::Config, trace: Option<&Path>) -> eyre::Result<Reader> {
    let adc = make_adc(cfg, trace)?;
    BatteryReaderBuilder::new()
        .with_adc(adc)
        .with_calibrator(VrefLinearCalibrator::new())
        .with_reader_cfg(cfg.into())
        .with_filter((&cfg.filter).into())
        .with_alarm((&cfg.battery).into())
        .build()
}

pub fn status_json(s: &BatteryStatus) -> serde_json::Value {
    json!({
        "raw": s.raw,
        "millivolts": s.millivolts,
        "divider_v": s.divider_v,
        "battery_v": s.battery_v,
        "percent": s.percent,
        "low": s.low,
    })
}

fn print_status(s: &BatteryStatus, json: bool) {
    if json {
        println!("{}", status_json(s));
    } else {
        println!("{s}");
    }
}

pub fn run_read(mut reader: Reader, mode: Option<&str>, alpha: Option<f32>, json: bool) -> eyre::Result<()> {
    if let Some(m) = mode {
        let mode = FilterMode::from_str(m).map_err(eyre::Report::new)?;
        reader.set_filter_mode(mode);
    }
    if let Some(a) = alpha {
        reader.set_exponential_alpha(a);
    }
    reader.begin()?;
    let status = reader.status()?;
    tracing::info!(
        battery_v = status.battery_v,
        percent = status.percent,
        low = status.low,
        mode = %reader.filter_mode(),
        "battery read"
    );
    print_status(&status, json);
    Ok(())
}

pub fn run_watch(
    mut reader: Reader,
    interval: Duration,
    count: Option<u64>,
    json: bool,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<()> {
    reader.begin()?;
    tracing::info!(interval_ms = interval.as_millis() as u64, ?count, "watch start");
    let monitor = Monitor::spawn(reader, interval, MonotonicClock::new());

    let mut printed = 0u64;
    while !shutdown.load(Ordering::Relaxed) {
        if count.is_some_and(|n| printed >= n) {
            break;
        }
        match monitor.recv_timeout(interval + STALL_GRACE) {
            Some(status) => {
                print_status(&status, json);
                printed += 1;
            }
            None => {
                tracing::warn!(stalled_ms = monitor.stalled_for_now(), "no battery reading");
            }
        }
    }
    tracing::info!(readings = printed, "watch stop");
    Ok(())
}

pub fn run_self_check(mut reader: Reader, json: bool) -> eyre::Result<()> {
    reader.begin()?;
    let status = reader.status()?;
    if json {
        println!(
            "{}",
            json!({ "status": "ok", "battery_v": status.battery_v, "percent": status.percent })
        );
    } else {
        println!("ok: {:.3} V ({}%)", status.battery_v, status.percent);
    }
    Ok(())
}
