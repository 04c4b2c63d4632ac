#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Battery voltage measurement (hardware-agnostic).
//!
//! All hardware interaction goes through `battmon_traits::Adc` and
//! `battmon_traits::Calibrator`.
//!
//! ## Pipeline
//!
//! - **Acquisition**: 15 samples per read, 200 µs apart (`acquire` module)
//! - **Filtering**: average, median or a persistent EMA (`filter` module)
//! - **Calibration**: raw code → pin millivolts via the calibrator's characteristics
//! - **Divider**: pin voltage × (R1 + R2) / R2 → battery voltage
//! - **Metrics**: linear percent and an inclusive low-battery flag (`reader` module)
//!
//! `Monitor` runs a reader on its own thread for periodic polling.

pub mod acquire;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod filter;
pub mod hw_error;
pub mod mocks;
pub mod monitor;
pub mod reader;
pub mod status;
pub mod util;

pub use acquire::{INTER_SAMPLE_DELAY, SAMPLES_PER_READ, SampleAcquirer};
pub use builder::{BatteryReaderBuilder, Missing};
pub use config::{AlarmCfg, FilterCfg, MonitorCfg, ReaderCfg};
pub use error::{BatteryError, BuildError, Report, Result};
pub use filter::{Ema, Filter, FilterMode};
pub use monitor::Monitor;
pub use reader::{BatteryReader, is_low, percent_from_voltage};
pub use status::BatteryStatus;
