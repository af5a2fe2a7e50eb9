use serde::{Deserialize, Serialize};

/// Ambient measurements in canonical units (°C, %, m/s, kPa).
///
/// Produced by manual entry or a weather fetch; the engine only reads it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    pub dry_bulb_c: f64,
    pub relative_humidity_pct: f64,
    pub wind_speed_ms: f64,
    pub pressure_kpa: f64,
    pub globe_temp_c: f64,
}

impl Default for EnvironmentalReading {
    fn default() -> Self {
        Self {
            dry_bulb_c: 32.0,
            relative_humidity_pct: 60.0,
            wind_speed_ms: 1.0,
            pressure_kpa: 101.3,
            globe_temp_c: 35.0,
        }
    }
}

impl EnvironmentalReading {
    /// Humidity clamped into [0, 100]. Out-of-range input is corrected, not rejected.
    #[inline]
    pub fn rh_clamped(&self) -> f64 {
        if self.relative_humidity_pct.is_nan() {
            return 0.0;
        }
        self.relative_humidity_pct.clamp(0.0, 100.0)
    }

    /// Built from the values the estimator consumes, so a reading always
    /// matches itself (humidity clamped, NaN humidity read as 0).
    #[inline]
    pub fn signature(&self) -> EnvironmentSignature {
        EnvironmentSignature {
            dry_bulb_c: self.dry_bulb_c,
            relative_humidity_pct: self.rh_clamped(),
            globe_temp_c: self.globe_temp_c,
            wind_speed_ms: self.wind_speed_ms,
        }
    }
}

/// Every NaN collapses to one bit pattern and -0.0 to 0.0.
#[inline]
fn sig_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        (v + 0.0).to_bits()
    }
}

/// The subset of a reading whose change invalidates a frozen baseline.
///
/// Pressure is absent: it does not enter the WBGT estimate.
/// Equality is exact over the bit patterns, with NaN equal to NaN.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EnvironmentSignature {
    pub dry_bulb_c: f64,
    pub relative_humidity_pct: f64,
    pub globe_temp_c: f64,
    pub wind_speed_ms: f64,
}

impl EnvironmentSignature {
    fn bits(&self) -> [u64; 4] {
        [
            sig_bits(self.dry_bulb_c),
            sig_bits(self.relative_humidity_pct),
            sig_bits(self.globe_temp_c),
            sig_bits(self.wind_speed_ms),
        ]
    }
}

impl PartialEq for EnvironmentSignature {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for EnvironmentSignature {}
