#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and raw-trace parsing for the battery monitor.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The trace CSV loader enforces its header and feeds the replay ADC.
use serde::Deserialize;

/// Raw-trace CSV schema.
///
/// Expected header:
/// raw
///
/// Example:
/// raw
/// 2712
/// 2709
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TraceRow {
    pub raw: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum Attenuation {
    #[serde(rename = "0db")]
    Db0,
    #[serde(rename = "2.5db")]
    Db2_5,
    #[serde(rename = "6db")]
    Db6,
    #[default]
    #[serde(rename = "11db")]
    Db11,
}

#[derive(Debug, Deserialize)]
pub struct AdcCfg {
    pub channel: u8,
    /// Converter resolution, 9..=12 bits.
    #[serde(default = "default_resolution_bits")]
    pub resolution_bits: u8,
    #[serde(default)]
    pub attenuation: Attenuation,
}

fn default_resolution_bits() -> u8 {
    12
}

#[derive(Debug, Deserialize)]
pub struct Divider {
    /// Battery side resistor (any unit; only the ratio matters)
    pub r1: u32,
    /// Ground side resistor
    pub r2: u32,
}

#[derive(Debug, Deserialize)]
pub struct BatteryCfg {
    pub v_min: f32,
    pub v_max: f32,
    #[serde(default = "default_low_threshold_v")]
    pub low_threshold_v: f32,
}

fn default_low_threshold_v() -> f32 {
    5.5
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CalibrationCfg {
    /// ADC reference voltage in millivolts
    pub reference_mv: u32,
}

impl Default for CalibrationCfg {
    fn default() -> Self {
        Self { reference_mv: 1100 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Average,
    Median,
    Exponential,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterCfg {
    pub mode: FilterMode,
    /// EMA smoothing factor, (0.0, 1.0]
    pub ema_alpha: f32,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self {
            mode: FilterMode::Average,
            ema_alpha: 0.1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorCfg {
    /// Delay between snapshots in `watch` mode
    pub interval_ms: u64,
}

impl Default for MonitorCfg {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Simulation {
    /// Pin voltage presented by the simulated ADC, millivolts
    pub divider_mv: u32,
    /// Triangle jitter amplitude in raw counts
    pub noise_counts: u32,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            divider_mv: 1850,
            noise_counts: 4,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Hardware {
    /// IIO device directory for the Linux ADC backend
    pub iio_device: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub adc: AdcCfg,
    pub divider: Divider,
    pub battery: BatteryCfg,
    #[serde(default)]
    pub calibration: CalibrationCfg,
    #[serde(default)]
    pub filter: FilterCfg,
    #[serde(default)]
    pub monitor: MonitorCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub simulation: Simulation,
    #[serde(default)]
    pub hardware: Hardware,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<u32>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != ["raw"] {
        eyre::bail!("trace CSV must have header 'raw', got: {}", actual.join(","));
    }

    let mut trace = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        match rec {
            Ok(row) => trace.push(row.raw),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    if trace.is_empty() {
        eyre::bail!("trace CSV {:?} has no rows", path);
    }
    Ok(trace)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // ADC
        if !(9..=12).contains(&self.adc.resolution_bits) {
            eyre::bail!("adc.resolution_bits must be in 9..=12");
        }

        // Divider
        if self.divider.r2 == 0 {
            eyre::bail!("divider.r2 must be > 0");
        }

        // Battery
        if !self.battery.v_min.is_finite() || !self.battery.v_max.is_finite() {
            eyre::bail!("battery.v_min and battery.v_max must be finite");
        }
        if self.battery.v_min >= self.battery.v_max {
            eyre::bail!("battery.v_min must be < battery.v_max");
        }
        if !self.battery.low_threshold_v.is_finite() {
            eyre::bail!("battery.low_threshold_v must be finite");
        }

        // Calibration
        if !(1000..=1200).contains(&self.calibration.reference_mv) {
            eyre::bail!("calibration.reference_mv must be in 1000..=1200");
        }

        // Filter
        let alpha = self.filter.ema_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            eyre::bail!("filter.ema_alpha must be in (0.0, 1.0]");
        }

        // Monitor
        if self.monitor.interval_ms == 0 {
            eyre::bail!("monitor.interval_ms must be >= 1");
        }
        if self.monitor.interval_ms > 24 * 60 * 60 * 1000 {
            eyre::bail!("monitor.interval_ms is unreasonably large (>24h)");
        }

        // Simulation
        if self.simulation.noise_counts > 4095 {
            eyre::bail!("simulation.noise_counts must be <= 4095");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref() {
            if !matches!(r, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly");
            }
        }

        Ok(())
    }
}
