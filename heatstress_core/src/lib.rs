pub mod reading;
pub mod estimate;

pub mod freeze;
pub mod penalty;
pub mod cfg;
pub mod state;
pub mod decide;
pub mod audit;
pub mod pipeline;
pub mod error;

pub use reading::{EnvironmentalReading, EnvironmentSignature};
pub use estimate::{natural_wet_bulb_c, globe_damping_factor, wind_damped_globe_c, wbgt_outdoor_c, estimate_wbgt, WbgtEstimate};

pub use freeze::{BaselinePhase, BaselineState, FreezeOutcome};
pub use penalty::{PenaltyCategory, PenaltySet, PenaltySelection, PenaltyTotal, aggregate_penalties};
pub use cfg::{HeatCfg, PenaltyCeilings};
pub use state::HeatState;
pub use decide::{RiskBand, ThresholdSet, Classification, ChsiSurrogate, SurrogateTier, classify, chsi_surrogate, SURROGATE_LABEL};
pub use audit::{AuditLog, AuditLogEntry, DecisionSnapshot, AUDIT_COLUMNS};
pub use pipeline::{Evaluation, evaluate_cycle, apply_penalties};
pub use error::HeatError;
