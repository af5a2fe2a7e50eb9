//heatstress_core/pipeline.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditLogEntry, DecisionSnapshot};
use crate::cfg::HeatCfg;
use crate::decide::{classify, Classification, ThresholdSet};
use crate::error::HeatError;
use crate::freeze::{BaselinePhase, FreezeOutcome};
use crate::penalty::{aggregate_penalties, PenaltyTotal};
use crate::reading::EnvironmentalReading;
use crate::state::HeatState;

/// Result of one full evaluation cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub freeze: FreezeOutcome,
    pub phase: BaselinePhase,
    pub total_penalty_c: f64,
    pub effective_c: f64,
    pub thresholds: ThresholdSet,
    pub classification: Classification,
    /// True when this cycle appended an audit entry.
    pub logged: bool,
}

/// Run baseline → effective → classification → audit once, top to bottom.
pub fn evaluate_cycle(
    reading: &EnvironmentalReading,
    location_label: &str,
    cfg: &HeatCfg,
    state: &mut HeatState,
    now: DateTime<Utc>,
) -> Evaluation {
    let freeze = state.baseline.observe(reading, cfg);
    finish_cycle(reading, location_label, cfg, state, freeze, now)
}

/// Same as [`evaluate_cycle`] but commits the staged penalties after the
/// baseline step. On error nothing past the baseline step is touched.
pub fn apply_penalties(
    reading: &EnvironmentalReading,
    location_label: &str,
    cfg: &HeatCfg,
    state: &mut HeatState,
    now: DateTime<Utc>,
) -> Result<(PenaltyTotal, Evaluation), HeatError> {
    let freeze = state.baseline.observe(reading, cfg);
    let total = aggregate_penalties(&state.staged, cfg);
    state.baseline.commit(&total)?;
    let eval = finish_cycle(reading, location_label, cfg, state, freeze, now);
    Ok((total, eval))
}

fn finish_cycle(
    reading: &EnvironmentalReading,
    location_label: &str,
    cfg: &HeatCfg,
    state: &mut HeatState,
    freeze: FreezeOutcome,
    now: DateTime<Utc>,
) -> Evaluation {
    // observe() always leaves an effective value behind.
    let effective_c = state.baseline.effective_c.unwrap_or(freeze.frozen_c);
    let thresholds = ThresholdSet::for_status(state.acclimatized, cfg);
    let classification = classify(effective_c, &thresholds, cfg);

    let mut logged = false;
    if state.baseline.penalties_applied {
        let entry = AuditLogEntry::record(
            now,
            &DecisionSnapshot {
                location_label,
                dry_bulb_c: reading.dry_bulb_c,
                rh_pct: reading.rh_clamped(),
                globe_temp_c: reading.globe_temp_c,
                baseline_c: freeze.estimate.raw_c,
                total_penalty_c: state.baseline.total_penalty_c,
                effective_c,
                band: classification.band,
                chsi_surrogate: classification.surrogate.value,
            },
        );
        logged = state.audit.push(entry);
    }

    Evaluation {
        freeze,
        phase: state.baseline.phase(),
        total_penalty_c: state.baseline.total_penalty_c,
        effective_c,
        thresholds,
        classification,
        logged,
    }
}
