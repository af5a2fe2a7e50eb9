use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cfg::{HeatCfg, PenaltyCeilings};

// ---------------------------------------------------------------------
// Exposure penalties: four independent categories, each clamped to its own
// ceiling, then capped globally on the clamped sum.
// ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PenaltyCategory {
    /// Clothing / PPE.
    Ppe,
    /// Vehicle / enclosure.
    Enclosure,
    /// Radiant / hot surfaces.
    Radiant,
    /// Ad-hoc / site-specific.
    Adhoc,
}

impl PenaltyCategory {
    pub const ALL: [PenaltyCategory; 4] = [Self::Ppe, Self::Enclosure, Self::Radiant, Self::Adhoc];

    pub fn ceiling(self, c: &PenaltyCeilings) -> f64 {
        match self {
            Self::Ppe => c.ppe_c,
            Self::Enclosure => c.enclosure_c,
            Self::Radiant => c.radiant_c,
            Self::Adhoc => c.adhoc_c,
        }
    }

    /// Preset names and their deltas (°C), in menu order.
    pub fn presets(self) -> &'static [(&'static str, f64)] {
        match self {
            Self::Ppe => &[("None", 0.0), ("Light", 1.0), ("Moderate", 2.0), ("Heavy", 3.0)],
            Self::Enclosure => &[
                ("None", 0.0),
                ("Open", 1.0),
                ("Enclosed", 2.0),
                ("Poorly ventilated", 3.0),
            ],
            Self::Radiant => &[
                ("None", 0.0),
                ("Hot surfaces", 2.0),
                ("Direct radiant", 4.0),
                ("Extreme radiant", 5.0),
            ],
            Self::Adhoc => &[("None", 0.0), ("Minor", 1.0), ("Moderate", 2.0), ("Severe", 4.0)],
        }
    }

    pub fn preset_delta(self, name: &str) -> Option<f64> {
        self.presets()
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, d)| *d)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ppe => "Clothing / PPE",
            Self::Enclosure => "Vehicle / Enclosure",
            Self::Radiant => "Radiant / Hot Surfaces",
            Self::Adhoc => "Ad-hoc / Site-specific",
        }
    }
}

/// Raw per-category deltas in °C, as staged by the user (unclamped).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PenaltySet {
    pub ppe_c: f64,
    pub enclosure_c: f64,
    pub radiant_c: f64,
    pub adhoc_c: f64,
}

impl PenaltySet {
    pub fn get(&self, cat: PenaltyCategory) -> f64 {
        match cat {
            PenaltyCategory::Ppe => self.ppe_c,
            PenaltyCategory::Enclosure => self.enclosure_c,
            PenaltyCategory::Radiant => self.radiant_c,
            PenaltyCategory::Adhoc => self.adhoc_c,
        }
    }

    pub fn set(&mut self, cat: PenaltyCategory, delta_c: f64) {
        match cat {
            PenaltyCategory::Ppe => self.ppe_c = delta_c,
            PenaltyCategory::Enclosure => self.enclosure_c = delta_c,
            PenaltyCategory::Radiant => self.radiant_c = delta_c,
            PenaltyCategory::Adhoc => self.adhoc_c = delta_c,
        }
    }

    /// Build a set from preset names; unknown names count as "None".
    pub fn from_presets(ppe: &str, enclosure: &str, radiant: &str, adhoc: &str) -> Self {
        let pick = |cat: PenaltyCategory, name: &str| cat.preset_delta(name).unwrap_or(0.0);
        Self {
            ppe_c: pick(PenaltyCategory::Ppe, ppe),
            enclosure_c: pick(PenaltyCategory::Enclosure, enclosure),
            radiant_c: pick(PenaltyCategory::Radiant, radiant),
            adhoc_c: pick(PenaltyCategory::Adhoc, adhoc),
        }
    }

    /// Each category clamped into [0, ceiling]. NaN counts as 0.
    pub fn clamped(&self, ceilings: &PenaltyCeilings) -> PenaltySet {
        let mut out = PenaltySet::default();
        for cat in PenaltyCategory::ALL {
            let raw = self.get(cat);
            let ceil = cat.ceiling(ceilings).max(0.0);
            let v = if raw.is_nan() { 0.0 } else { raw.max(0.0).min(ceil) };
            if v != raw {
                warn!(category = ?cat, raw, clamped = v, "penalty outside category bounds");
            }
            out.set(cat, v);
        }
        out
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.ppe_c + self.enclosure_c + self.radiant_c + self.adhoc_c
    }
}

/// A single category selection: a named preset or a free-form override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PenaltySelection {
    Preset(String),
    Override(f64),
}

impl PenaltySelection {
    pub fn delta_c(&self, cat: PenaltyCategory) -> f64 {
        match self {
            PenaltySelection::Preset(name) => cat.preset_delta(name).unwrap_or(0.0),
            PenaltySelection::Override(v) => *v,
        }
    }
}

/// Aggregated penalty ready to be committed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTotal {
    pub clamped: PenaltySet,
    pub total_c: f64,
    /// True when the global cap bound the clamped sum.
    pub capped: bool,
}

/// Clamp per category first, then cap the clamped sum.
pub fn aggregate_penalties(staged: &PenaltySet, cfg: &HeatCfg) -> PenaltyTotal {
    let clamped = staged.clamped(&cfg.ceilings);
    let sum = clamped.sum();
    let total_c = sum.min(cfg.penalty_cap_c);
    PenaltyTotal {
        clamped,
        total_c,
        capped: sum > cfg.penalty_cap_c,
    }
}
