//! Linux Industrial I/O ADC backend.
//!
//! Reads `in_voltage{N}_raw` attributes from an IIO device directory such as
//! `/sys/bus/iio/devices/iio:device0`. Resolution and attenuation are fixed
//! by the device tree on these parts, so `configure` only checks that the
//! channel attribute exists.

use std::path::{Path, PathBuf};

use battmon_traits::{Adc, AdcWidth, Attenuation, BoxError, Channel};
use tracing::{debug, warn};

use crate::error::{HwError, Result};
use crate::util::read_sysfs_u32;

pub const DEFAULT_DEVICE_DIR: &str = "/sys/bus/iio/devices/iio:device0";

pub struct IioAdc {
    device_dir: PathBuf,
    configured: Option<Channel>,
}

impl IioAdc {
    pub fn new(device_dir: impl Into<PathBuf>) -> Self {
        Self {
            device_dir: device_dir.into(),
            configured: None,
        }
    }

    pub fn device_dir(&self) -> &Path {
        &self.device_dir
    }

    fn raw_path(&self, channel: Channel) -> PathBuf {
        self.device_dir
            .join(format!("in_voltage{}_raw", channel.0))
    }

    fn read_raw(&self, channel: Channel) -> Result<u32> {
        if self.configured != Some(channel) {
            return Err(HwError::ChannelNotConfigured(channel.0));
        }
        read_sysfs_u32(&self.raw_path(channel))
    }
}

impl Default for IioAdc {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_DIR)
    }
}

impl Adc for IioAdc {
    fn configure(
        &mut self,
        channel: Channel,
        width: AdcWidth,
        attenuation: Attenuation,
    ) -> std::result::Result<(), BoxError> {
        let path = self.raw_path(channel);
        if !path.exists() {
            return Err(Box::new(HwError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))));
        }
        debug!(
            path = %path.display(),
            bits = width.bits(),
            ?attenuation,
            "iio channel ready; width/attenuation come from the device tree"
        );
        self.configured = Some(channel);
        Ok(())
    }

    fn sample(&mut self, channel: Channel) -> std::result::Result<u32, BoxError> {
        self.read_raw(channel).map_err(|e| {
            warn!(%channel, error = %e, "iio read failed");
            Box::new(e) as BoxError
        })
    }
}
