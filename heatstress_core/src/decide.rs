//heatstress_core/decide.rs

use serde::Deserialize;
use serde::Serialize;
use crate::cfg::HeatCfg;

/// Risk band for an effective WBGT. Lower bounds are inclusive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskBand {
    Low,
    Caution,
    HighStrain,
    Withdrawal,
}

impl RiskBand {
    pub fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "Low environmental heat stress",
            RiskBand::Caution => "Heightened / Caution",
            RiskBand::HighStrain => "High strain warning",
            RiskBand::Withdrawal => "Withdrawal / Stop Work",
        }
    }

    /// Fixed supervisor guidance for the band.
    pub fn guidance(self) -> &'static str {
        match self {
            RiskBand::Low => {
                "Suitable for normal operations. Maintain hydration and routine supervision."
            }
            RiskBand::Caution => {
                "Increase supervision, enforce hydration, consider work-rest cycles."
            }
            RiskBand::HighStrain => {
                "Restrict exposure, enforce shortened work-rest cycles, actively cool workers, medical watch."
            }
            RiskBand::Withdrawal => {
                "Stop normal work. Only emergency tasks with strict controls and medical monitoring."
            }
        }
    }
}

/// Cut-points A < B < C in °C for the current acclimatization status.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub a_c: f64,
    pub b_c: f64,
    pub c_c: f64,
}

impl ThresholdSet {
    pub fn for_status(acclimatized: bool, cfg: &HeatCfg) -> Self {
        let shift = if acclimatized { 0.0 } else { cfg.unacclimatized_shift_c };
        ThresholdSet {
            a_c: cfg.thr_a_c - shift,
            b_c: cfg.thr_b_c - shift,
            c_c: cfg.thr_c_c - shift,
        }
    }

    /// Half-open membership: `[-inf,A) [A,B) [B,C) [C,inf)`.
    pub fn band(&self, effective_c: f64) -> RiskBand {
        if effective_c < self.a_c {
            RiskBand::Low
        } else if effective_c < self.b_c {
            RiskBand::Caution
        } else if effective_c < self.c_c {
            RiskBand::HighStrain
        } else {
            RiskBand::Withdrawal
        }
    }
}

pub const SURROGATE_LABEL: &str = "illustrative surrogate, not a validated heat-strain index";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SurrogateTier {
    LowStrain,
    MildAccumulation,
    MajorStrain,
}

impl SurrogateTier {
    pub fn from_value(v: f64) -> Self {
        if v < 15.0 {
            SurrogateTier::LowStrain
        } else if v < 30.0 {
            SurrogateTier::MildAccumulation
        } else {
            SurrogateTier::MajorStrain
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SurrogateTier::LowStrain => "low internal strain",
            SurrogateTier::MildAccumulation => "mild heat accumulation",
            SurrogateTier::MajorStrain => "major heat strain risk",
        }
    }
}

/// CHSI surrogate: a bounded linear rescaling of effective WBGT.
///
/// Not a physiological model. Always rendered with [`SURROGATE_LABEL`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChsiSurrogate {
    pub value: f64,
    pub tier: SurrogateTier,
}

impl ChsiSurrogate {
    pub fn label(&self) -> &'static str {
        SURROGATE_LABEL
    }
}

pub fn chsi_surrogate(effective_c: f64, cfg: &HeatCfg) -> ChsiSurrogate {
    let scaled = (effective_c - cfg.surrogate_offset_c) / cfg.surrogate_span_c * cfg.surrogate_max;
    let value = scaled.max(0.0).min(cfg.surrogate_max);
    ChsiSurrogate {
        value,
        tier: SurrogateTier::from_value(value),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub band: RiskBand,
    pub guidance: String,
    pub surrogate: ChsiSurrogate,
}

pub fn classify(effective_c: f64, thresholds: &ThresholdSet, cfg: &HeatCfg) -> Classification {
    let band = thresholds.band(effective_c);
    Classification {
        band,
        guidance: band.guidance().to_string(),
        surrogate: chsi_surrogate(effective_c, cfg),
    }
}
