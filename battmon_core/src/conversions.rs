//! `From` implementations bridging `battmon_config` types to `battmon_core` types.

use battmon_traits::{AdcWidth, Attenuation, Channel};

use crate::config::{AlarmCfg, FilterCfg, MonitorCfg, ReaderCfg};
use crate::filter::FilterMode;

// Both enums are foreign to this crate, so the orphan rule forbids a `From` impl.
fn attenuation_from(a: battmon_config::Attenuation) -> Attenuation {
    match a {
        battmon_config::Attenuation::Db0 => Attenuation::Db0,
        battmon_config::Attenuation::Db2_5 => Attenuation::Db2_5,
        battmon_config::Attenuation::Db6 => Attenuation::Db6,
        battmon_config::Attenuation::Db11 => Attenuation::Db11,
    }
}

impl From<battmon_config::FilterMode> for FilterMode {
    fn from(m: battmon_config::FilterMode) -> Self {
        match m {
            battmon_config::FilterMode::Average => Self::Average,
            battmon_config::FilterMode::Median => Self::Median,
            battmon_config::FilterMode::Exponential => Self::Exponential,
        }
    }
}

// ── ReaderCfg ────────────────────────────────────────────────────────────────

/// Collects the static parameters spread over `[adc]`, `[divider]`,
/// `[battery]` and `[calibration]`.
///
/// An out-of-range `resolution_bits` falls back to 12 bits; `Config::validate`
/// rejects it before this point in the CLI.
impl From<&battmon_config::Config> for ReaderCfg {
    fn from(c: &battmon_config::Config) -> Self {
        Self {
            channel: Channel(c.adc.channel),
            v_min: c.battery.v_min,
            v_max: c.battery.v_max,
            r1: c.divider.r1,
            r2: c.divider.r2,
            reference_mv: c.calibration.reference_mv,
            attenuation: attenuation_from(c.adc.attenuation),
            width: AdcWidth::from_bits(c.adc.resolution_bits).unwrap_or_default(),
        }
    }
}

// ── FilterCfg ────────────────────────────────────────────────────────────────

impl From<&battmon_config::FilterCfg> for FilterCfg {
    fn from(c: &battmon_config::FilterCfg) -> Self {
        Self {
            mode: c.mode.into(),
            ema_alpha: c.ema_alpha,
        }
    }
}

// ── AlarmCfg ─────────────────────────────────────────────────────────────────

impl From<&battmon_config::BatteryCfg> for AlarmCfg {
    fn from(c: &battmon_config::BatteryCfg) -> Self {
        Self {
            low_threshold_v: c.low_threshold_v,
        }
    }
}

// ── MonitorCfg ───────────────────────────────────────────────────────────────

impl From<&battmon_config::MonitorCfg> for MonitorCfg {
    fn from(c: &battmon_config::MonitorCfg) -> Self {
        Self {
            interval_ms: c.interval_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
[adc]
channel = 7
resolution_bits = 10
attenuation = "2.5db"

[divider]
r1 = 100000
r2 = 47000

[battery]
v_min = 6.0
v_max = 8.4
low_threshold_v = 6.4

[filter]
mode = "median"
ema_alpha = 0.3
"#;

    #[test]
    fn maps_every_section() {
        let cfg = battmon_config::load_toml(TOML).unwrap();

        let reader = ReaderCfg::from(&cfg);
        assert_eq!(reader.channel, Channel(7));
        assert_eq!(reader.width, AdcWidth::Bits10);
        assert_eq!(reader.attenuation, Attenuation::Db2_5);
        assert_eq!((reader.r1, reader.r2), (100_000, 47_000));
        assert_eq!(reader.reference_mv, 1100);

        let filter = FilterCfg::from(&cfg.filter);
        assert_eq!(filter.mode, FilterMode::Median);
        assert_eq!(filter.ema_alpha, 0.3);

        assert_eq!(AlarmCfg::from(&cfg.battery).low_threshold_v, 6.4);
        assert_eq!(MonitorCfg::from(&cfg.monitor).interval_ms, 1000);
    }
}
