use serde::{Deserialize, Serialize};

use crate::audit::AuditLog;
use crate::freeze::BaselineState;
use crate::penalty::PenaltySet;

/// All mutable state of one assessment session.
///
/// Single owner, no interior locking: callers that share it across threads
/// wrap the owner, not the fields.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HeatState {
    pub baseline: BaselineState,
    /// Penalties being configured; not in effect until committed.
    pub staged: PenaltySet,
    pub acclimatized: bool,
    pub audit: AuditLog,
}

impl HeatState {
    pub fn new(acclimatized: bool) -> Self {
        Self {
            acclimatized,
            ..Self::default()
        }
    }

    #[inline]
    pub fn stage(&mut self, penalties: PenaltySet) {
        self.staged = penalties;
    }

    /// Export is enabled exactly while penalties are in effect.
    #[inline]
    pub fn export_enabled(&self) -> bool {
        self.baseline.penalties_applied
    }
}
