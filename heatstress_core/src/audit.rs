use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decide::RiskBand;

// ---------------------------------------------------------------------
// Audit trail: append-only, adjacent duplicates suppressed.
// ---------------------------------------------------------------------

/// Column headers of the flat tabular form, in order.
pub const AUDIT_COLUMNS: [&str; 10] = [
    "timestamp",
    "location",
    "DB (°C)",
    "RH (%)",
    "GT (°C)",
    "WBGT baseline (°C)",
    "Penalty total (°C)",
    "WBGT eff (°C)",
    "Risk",
    "CHSI scaled (illustrative)",
];

#[inline]
fn tenths(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Immutable snapshot of one decision.
///
/// Values are stored at their recorded precision (0.1 °C, whole % and whole
/// surrogate points, whole seconds), so two decisions that would print the
/// same row compare equal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Utc>,
    pub location_label: String,
    pub dry_bulb_c: f64,
    pub rh_pct: f64,
    pub globe_temp_c: f64,
    pub baseline_c: f64,
    pub total_penalty_c: f64,
    pub effective_c: f64,
    pub band: RiskBand,
    pub chsi_surrogate: f64,
}

/// Unrounded inputs for an [`AuditLogEntry`].
#[derive(Clone, Debug)]
pub struct DecisionSnapshot<'a> {
    pub location_label: &'a str,
    pub dry_bulb_c: f64,
    pub rh_pct: f64,
    pub globe_temp_c: f64,
    pub baseline_c: f64,
    pub total_penalty_c: f64,
    pub effective_c: f64,
    pub band: RiskBand,
    pub chsi_surrogate: f64,
}

impl AuditLogEntry {
    pub fn record(at: DateTime<Utc>, d: &DecisionSnapshot<'_>) -> Self {
        Self {
            timestamp: at.trunc_subsecs(0),
            location_label: d.location_label.to_string(),
            dry_bulb_c: tenths(d.dry_bulb_c),
            rh_pct: d.rh_pct.round(),
            globe_temp_c: tenths(d.globe_temp_c),
            baseline_c: tenths(d.baseline_c),
            total_penalty_c: tenths(d.total_penalty_c),
            effective_c: tenths(d.effective_c),
            band: d.band,
            chsi_surrogate: d.chsi_surrogate.round(),
        }
    }

    /// One row of the tabular form, matching [`AUDIT_COLUMNS`].
    pub fn to_row(&self) -> [String; 10] {
        [
            self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.location_label.clone(),
            format!("{:.1}", self.dry_bulb_c),
            format!("{:.0}", self.rh_pct),
            format!("{:.1}", self.globe_temp_c),
            format!("{:.1}", self.baseline_c),
            format!("{:.1}", self.total_penalty_c),
            format!("{:.1}", self.effective_c),
            self.band.label().to_string(),
            format!("{:.0}", self.chsi_surrogate),
        ]
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditLogEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless equal to the current last entry. Returns whether it was appended.
    pub fn push(&mut self, entry: AuditLogEntry) -> bool {
        if self.entries.last() == Some(&entry) {
            debug!("audit entry unchanged; suppressed");
            return false;
        }
        debug!(effective_c = entry.effective_c, band = ?entry.band, "audit entry appended");
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&AuditLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> Vec<[String; 10]> {
        self.entries.iter().map(AuditLogEntry::to_row).collect()
    }
}
