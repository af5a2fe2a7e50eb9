//! Domain adapter layer: convert outside-world inputs into canonical engine values.
//!
//! This module is intentionally small and policy-light:
//! - No IO
//! - No async
//! - No heat-stress rules
//!
//! Weather and geocoding lookups are collaborators behind traits; an absent
//! result means "no update available" and never reaches the engine as an error.

use serde::{Deserialize, Serialize};

use heatstress_core::{EnvironmentalReading, HeatCfg};

#[inline]
pub fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

#[inline]
pub fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

#[inline]
pub fn ms_to_mph(v: f64) -> f64 {
    v * 2.23694
}

#[inline]
pub fn mph_to_ms(v: f64) -> f64 {
    v / 2.23694
}

#[inline]
pub fn kpa_to_inhg(k: f64) -> f64 {
    k * 0.2953
}

#[inline]
pub fn inhg_to_kpa(i: f64) -> f64 {
    i / 0.2953
}

/// Display unit system chosen by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    /// °C, m/s, kPa
    #[default]
    Metric,
    /// °F, mph, inHg
    Imperial,
}

/// A reading as typed by the user, in display units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayReading {
    pub dry_bulb: f64,
    pub relative_humidity_pct: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub globe_temp: f64,
}

/// Converts between display units and the engine's canonical units.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normalizer {
    pub units: UnitSystem,
}

impl Normalizer {
    pub fn new(units: UnitSystem) -> Self {
        Self { units }
    }

    pub fn to_canonical(&self, d: &DisplayReading) -> EnvironmentalReading {
        match self.units {
            UnitSystem::Metric => EnvironmentalReading {
                dry_bulb_c: d.dry_bulb,
                relative_humidity_pct: d.relative_humidity_pct,
                wind_speed_ms: d.wind_speed,
                pressure_kpa: d.pressure,
                globe_temp_c: d.globe_temp,
            },
            UnitSystem::Imperial => EnvironmentalReading {
                dry_bulb_c: f_to_c(d.dry_bulb),
                relative_humidity_pct: d.relative_humidity_pct,
                wind_speed_ms: mph_to_ms(d.wind_speed),
                pressure_kpa: inhg_to_kpa(d.pressure),
                globe_temp_c: f_to_c(d.globe_temp),
            },
        }
    }

    pub fn to_display(&self, r: &EnvironmentalReading) -> DisplayReading {
        match self.units {
            UnitSystem::Metric => DisplayReading {
                dry_bulb: r.dry_bulb_c,
                relative_humidity_pct: r.relative_humidity_pct,
                wind_speed: r.wind_speed_ms,
                pressure: r.pressure_kpa,
                globe_temp: r.globe_temp_c,
            },
            UnitSystem::Imperial => DisplayReading {
                dry_bulb: c_to_f(r.dry_bulb_c),
                relative_humidity_pct: r.relative_humidity_pct,
                wind_speed: ms_to_mph(r.wind_speed_ms),
                pressure: kpa_to_inhg(r.pressure_kpa),
                globe_temp: c_to_f(r.globe_temp_c),
            },
        }
    }

    /// Temperature *difference* in display units to °C (no 32 offset).
    pub fn delta_to_c(&self, delta: f64) -> f64 {
        match self.units {
            UnitSystem::Metric => delta,
            UnitSystem::Imperial => delta * 5.0 / 9.0,
        }
    }

    pub fn delta_from_c(&self, delta_c: f64) -> f64 {
        match self.units {
            UnitSystem::Metric => delta_c,
            UnitSystem::Imperial => delta_c * 9.0 / 5.0,
        }
    }

    /// "32.0 °C" / "89.6 °F".
    pub fn fmt_temp(&self, temp_c: f64) -> String {
        match self.units {
            UnitSystem::Metric => format!("{temp_c:.1} °C"),
            UnitSystem::Imperial => format!("{:.1} °F", c_to_f(temp_c)),
        }
    }
}

/// Current conditions returned by a weather provider, canonical units.
/// Any field may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature_c: Option<f64>,
    pub relative_humidity_pct: Option<f64>,
    pub wind_speed_ms: Option<f64>,
}

impl WeatherObservation {
    /// Merge into `current`: missing fields keep their value, pressure falls
    /// back to the default and globe temperature is estimated from dry bulb.
    pub fn merge_into(&self, current: &EnvironmentalReading, cfg: &HeatCfg) -> EnvironmentalReading {
        let dry_bulb_c = self.temperature_c.unwrap_or(current.dry_bulb_c);
        EnvironmentalReading {
            dry_bulb_c,
            relative_humidity_pct: self.relative_humidity_pct.unwrap_or(current.relative_humidity_pct),
            wind_speed_ms: self.wind_speed_ms.unwrap_or(current.wind_speed_ms),
            pressure_kpa: cfg.default_pressure_kpa,
            globe_temp_c: dry_bulb_c + cfg.globe_estimate_offset_c,
        }
    }
}

/// One candidate from a place-name lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub name: String,
    pub admin1: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodeMatch {
    /// "Name, Region, CC".
    pub fn label(&self) -> String {
        format!("{}, {}, {}", self.name, self.admin1, self.country_code)
    }
}

/// Selected site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

impl From<&GeocodeMatch> for Location {
    fn from(m: &GeocodeMatch) -> Self {
        Location {
            latitude: m.latitude,
            longitude: m.longitude,
            label: m.label(),
        }
    }
}

/// Trait: current weather at a coordinate. `None` means no update available.
pub trait WeatherSource {
    fn current(&self, latitude: f64, longitude: f64) -> Option<WeatherObservation>;
}

/// Trait: place-name search. An empty vector means no match.
pub trait Geocoder {
    fn search(&self, query: &str) -> Vec<GeocodeMatch>;
}
