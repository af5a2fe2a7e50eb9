use serde::{Deserialize, Serialize};

use crate::error::HeatError;

/// Per-category penalty ceilings in °C.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyCeilings {
    pub ppe_c: f64,
    pub enclosure_c: f64,
    pub radiant_c: f64,
    pub adhoc_c: f64,
}

impl Default for PenaltyCeilings {
    fn default() -> Self {
        Self {
            ppe_c: 3.0,
            enclosure_c: 3.0,
            radiant_c: 5.0,
            adhoc_c: 4.0,
        }
    }
}

/// Engine tunables. Defaults reproduce the field tool's constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatCfg {
    /// Wind speed floor (m/s) used by the globe correction.
    pub wind_floor_ms: f64,
    /// Coefficient `k` in `1 / (1 + k·√v)`.
    pub globe_damping: f64,

    pub w_wet_bulb: f64,
    pub w_globe: f64,
    pub w_dry_bulb: f64,

    /// Acclimatized cut-points A, B, C (°C).
    pub thr_a_c: f64,
    pub thr_b_c: f64,
    pub thr_c_c: f64,
    /// Downward shift applied to all thresholds for non-acclimatized workers.
    pub unacclimatized_shift_c: f64,

    pub ceilings: PenaltyCeilings,
    pub penalty_cap_c: f64,

    pub surrogate_offset_c: f64,
    pub surrogate_span_c: f64,
    pub surrogate_max: f64,

    /// Globe temperature estimate after a weather fetch: dry bulb + offset.
    pub globe_estimate_offset_c: f64,
    pub default_pressure_kpa: f64,
}

impl Default for HeatCfg {
    fn default() -> Self {
        Self {
            wind_floor_ms: 0.1,
            globe_damping: 0.4,
            w_wet_bulb: 0.7,
            w_globe: 0.2,
            w_dry_bulb: 0.1,
            thr_a_c: 29.0,
            thr_b_c: 32.0,
            thr_c_c: 35.0,
            unacclimatized_shift_c: 2.0,
            ceilings: PenaltyCeilings::default(),
            penalty_cap_c: 10.0,
            surrogate_offset_c: 25.0,
            surrogate_span_c: 10.0,
            surrogate_max: 50.0,
            globe_estimate_offset_c: 3.0,
            default_pressure_kpa: 101.3,
        }
    }
}

impl HeatCfg {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, HeatError> {
        let cfg: HeatCfg = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), HeatError> {
        let finite = [
            self.wind_floor_ms,
            self.globe_damping,
            self.thr_a_c,
            self.thr_b_c,
            self.thr_c_c,
            self.unacclimatized_shift_c,
            self.penalty_cap_c,
            self.surrogate_span_c,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(HeatError::Config("non-finite value".into()));
        }
        if !(self.thr_a_c < self.thr_b_c && self.thr_b_c < self.thr_c_c) {
            return Err(HeatError::Config(format!(
                "thresholds must ascend: A={} B={} C={}",
                self.thr_a_c, self.thr_b_c, self.thr_c_c
            )));
        }
        let c = &self.ceilings;
        if [c.ppe_c, c.enclosure_c, c.radiant_c, c.adhoc_c, self.penalty_cap_c]
            .iter()
            .any(|v| !(*v >= 0.0))
        {
            return Err(HeatError::Config("penalty ceilings and cap must be >= 0".into()));
        }
        if self.wind_floor_ms <= 0.0 {
            return Err(HeatError::Config("wind floor must be > 0".into()));
        }
        if self.surrogate_span_c <= 0.0 {
            return Err(HeatError::Config("surrogate span must be > 0".into()));
        }
        Ok(())
    }
}
