//! Baseline freeze state machine.
//!
//! A computed WBGT baseline is locked in once per environment signature so that
//! recomputation between penalty edits never moves it. Any change of the
//! signature re-arms the freeze, and the re-arm completes within the same cycle.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cfg::HeatCfg;
use crate::error::HeatError;
use crate::estimate::{estimate_wbgt, WbgtEstimate};
use crate::penalty::PenaltyTotal;
use crate::reading::{EnvironmentSignature, EnvironmentalReading};

/// Observable phase of the baseline.
///
/// `NoBaseline` only exists before the first observation; within `observe`
/// it is entered and left in the same call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaselinePhase {
    NoBaseline,
    FrozenUnapplied,
    FrozenApplied,
}

/// What one evaluation cycle did to the baseline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreezeOutcome {
    pub estimate: WbgtEstimate,
    pub frozen_c: f64,
    /// True when the signature differed from the previous cycle (or this was the first).
    pub rearmed: bool,
}

/// Owned exclusively by one session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BaselineState {
    pub raw_c: Option<f64>,
    pub frozen_c: Option<f64>,
    pub signature: Option<EnvironmentSignature>,
    pub penalties_applied: bool,
    pub total_penalty_c: f64,
    pub effective_c: Option<f64>,
}

impl BaselineState {
    pub fn phase(&self) -> BaselinePhase {
        match (self.frozen_c, self.penalties_applied) {
            (None, _) => BaselinePhase::NoBaseline,
            (Some(_), false) => BaselinePhase::FrozenUnapplied,
            (Some(_), true) => BaselinePhase::FrozenApplied,
        }
    }

    /// Clear everything derived from the previous signature.
    #[inline]
    fn rearm(&mut self, sig: EnvironmentSignature) {
        self.frozen_c = None;
        self.penalties_applied = false;
        self.total_penalty_c = 0.0;
        self.effective_c = None;
        self.signature = Some(sig);
    }

    /// Run one cycle of the freeze against the live reading.
    ///
    /// The raw WBGT is recomputed every time; the frozen value is only adopted
    /// when none is held.
    pub fn observe(&mut self, reading: &EnvironmentalReading, cfg: &HeatCfg) -> FreezeOutcome {
        let sig = reading.signature();
        let rearmed = self.signature != Some(sig);
        if rearmed {
            debug!(?sig, "environment signature changed; re-arming baseline");
            self.rearm(sig);
        }

        let estimate = estimate_wbgt(reading, cfg);
        self.raw_c = Some(estimate.raw_c);

        let frozen_c = match self.frozen_c {
            Some(f) => f,
            None => {
                debug!(frozen_c = estimate.raw_c, "baseline frozen");
                self.frozen_c = Some(estimate.raw_c);
                estimate.raw_c
            }
        };

        if !self.penalties_applied {
            self.effective_c = Some(frozen_c);
        }

        FreezeOutcome { estimate, frozen_c, rearmed }
    }

    /// Commit a penalty total on top of the frozen baseline.
    ///
    /// The only writer of `penalties_applied`. Leaves state untouched on error.
    pub fn commit(&mut self, total: &PenaltyTotal) -> Result<f64, HeatError> {
        let frozen = self.frozen_c.ok_or(HeatError::NoBaseline)?;
        let effective = frozen + total.total_c;
        self.total_penalty_c = total.total_c;
        self.effective_c = Some(effective);
        self.penalties_applied = true;
        info!(
            baseline_c = frozen,
            penalty_c = total.total_c,
            effective_c = effective,
            "penalties applied"
        );
        Ok(effective)
    }
}
