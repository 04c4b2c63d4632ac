//! Reference-voltage linear calibration (ESP32 ADC1 model).
//!
//! Without two-point eFuse data the ESP32 ADC is characterized from the
//! reference voltage alone:
//!
//!   coeff_a = reference_mv * ATTEN_SCALE[atten] / 4096
//!   mv      = (coeff_a * raw12 + 32768) / 65536 + ATTEN_OFFSET[atten]
//!
//! where `raw12` is the raw code left-aligned to 12 bits.

use battmon_traits::{AdcWidth, Attenuation, BoxError, CalibrationRequest, Calibrator, Characteristics};
use tracing::debug;

use crate::error::HwError;

const COEFF_A_SCALE: u64 = 65_536;
const COEFF_A_ROUND: u64 = COEFF_A_SCALE / 2;
const FULL_SCALE_12: u64 = 4_096;

const ATTEN_SCALE: [u64; 4] = [57_431, 76_236, 105_481, 196_602];
const ATTEN_OFFSET: [u32; 4] = [75, 78, 88, 142];

/// Accepted reference range; the linear tables are only valid near 1100 mV.
pub const REFERENCE_MV_RANGE: std::ops::RangeInclusive<u32> = 1000..=1200;

/// Linear raw→mV characteristics for one attenuation/width/reference triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCharacteristics {
    pub coeff_a: u32,
    pub coeff_b: u32,
    pub width: AdcWidth,
    pub attenuation: Attenuation,
    pub reference_mv: u32,
}

impl LinearCharacteristics {
    pub fn new(attenuation: Attenuation, width: AdcWidth, reference_mv: u32) -> Self {
        let idx = attenuation.index();
        let coeff_a = (u64::from(reference_mv) * ATTEN_SCALE[idx]) / FULL_SCALE_12;
        Self {
            coeff_a: coeff_a as u32,
            coeff_b: ATTEN_OFFSET[idx],
            width,
            attenuation,
            reference_mv,
        }
    }

    /// Inverse of `raw_to_mv`: the raw code (at `width`) whose reading is closest
    /// to `mv`. Saturates at 0 and at the width's full scale.
    pub fn mv_to_raw(&self, mv: u32) -> u32 {
        if self.coeff_a == 0 {
            return 0;
        }
        let above = u64::from(mv.saturating_sub(self.coeff_b));
        let raw12 = (above * COEFF_A_SCALE + u64::from(self.coeff_a) / 2) / u64::from(self.coeff_a);
        let raw12 = raw12.min(u64::from(AdcWidth::Bits12.max_code())) as u32;
        raw12 >> (12 - self.width.bits())
    }
}

impl Characteristics for LinearCharacteristics {
    fn raw_to_mv(&self, raw: u32) -> u32 {
        let raw12 = u64::from(raw.min(self.width.max_code())) << (12 - self.width.bits());
        let mv = (u64::from(self.coeff_a) * raw12 + COEFF_A_ROUND) / COEFF_A_SCALE;
        mv as u32 + self.coeff_b
    }
}

/// Calibrator that characterizes from the reference voltage only.
#[derive(Debug, Default, Clone, Copy)]
pub struct VrefLinearCalibrator;

impl VrefLinearCalibrator {
    pub fn new() -> Self {
        Self
    }
}

impl Calibrator for VrefLinearCalibrator {
    type Chars = LinearCharacteristics;

    fn characterize(&mut self, request: CalibrationRequest) -> Result<Self::Chars, BoxError> {
        if !REFERENCE_MV_RANGE.contains(&request.reference_mv) {
            return Err(Box::new(HwError::InvalidReference(request.reference_mv)));
        }
        let chars =
            LinearCharacteristics::new(request.attenuation, request.width, request.reference_mv);
        debug!(
            coeff_a = chars.coeff_a,
            coeff_b = chars.coeff_b,
            reference_mv = request.reference_mv,
            "characterized adc (vref linear)"
        );
        Ok(chars)
    }
}
