//! Heat-stress estimators: natural wet-bulb, wind-damped globe and outdoor WBGT.
//!
//! All three are total over finite inputs and never fail.

use serde::{Deserialize, Serialize};

use crate::cfg::HeatCfg;
use crate::reading::EnvironmentalReading;

/// Natural wet-bulb (°C) via the Stull (2011) empirical fit.
///
/// Accuracy degrades outside RH ∈ [5, 99] %; no extra guarding is applied there.
#[inline]
pub fn natural_wet_bulb_c(dry_bulb_c: f64, rh_pct: f64) -> f64 {
    let t = dry_bulb_c;
    let rh = rh_pct;
    t * (0.151977 * (rh + 8.313659).sqrt()).atan() + (t + rh).atan() - (rh - 1.676331).atan()
        + 0.00391838 * rh.powf(1.5) * (0.023101 * rh).atan()
        - 4.686035
}

/// Damping factor `1 / (1 + k·√max(v, floor))`, always in (0, 1].
#[inline]
pub fn globe_damping_factor(wind_speed_ms: f64, damping: f64, floor_ms: f64) -> f64 {
    let v = wind_speed_ms.max(floor_ms);
    1.0 / (1.0 + damping * v.sqrt())
}

/// Globe temperature pulled back towards dry bulb by wind.
#[inline]
pub fn wind_damped_globe_c(dry_bulb_c: f64, globe_temp_c: f64, wind_speed_ms: f64, cfg: &HeatCfg) -> f64 {
    let f = globe_damping_factor(wind_speed_ms, cfg.globe_damping, cfg.wind_floor_ms);
    dry_bulb_c + (globe_temp_c - dry_bulb_c) * f
}

/// Outdoor weighting `0.7·Tw + 0.2·Tg + 0.1·T`. No clamping.
#[inline]
pub fn wbgt_outdoor_c(wet_bulb_c: f64, globe_adj_c: f64, dry_bulb_c: f64, cfg: &HeatCfg) -> f64 {
    cfg.w_wet_bulb * wet_bulb_c + cfg.w_globe * globe_adj_c + cfg.w_dry_bulb * dry_bulb_c
}

/// Intermediate values of one baseline computation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WbgtEstimate {
    pub wet_bulb_c: f64,
    pub globe_adj_c: f64,
    pub raw_c: f64,
}

pub fn estimate_wbgt(reading: &EnvironmentalReading, cfg: &HeatCfg) -> WbgtEstimate {
    let t = reading.dry_bulb_c;
    let wet_bulb_c = natural_wet_bulb_c(t, reading.rh_clamped());
    let globe_adj_c = wind_damped_globe_c(t, reading.globe_temp_c, reading.wind_speed_ms, cfg);
    WbgtEstimate {
        wet_bulb_c,
        globe_adj_c,
        raw_c: wbgt_outdoor_c(wet_bulb_c, globe_adj_c, t, cfg),
    }
}
