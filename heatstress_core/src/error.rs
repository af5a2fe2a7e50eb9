use thiserror::Error;

/// Failures reported by the engine and the layers around it.
///
/// Numeric estimators never fail; out-of-range humidity or penalty inputs are
/// clamped rather than rejected.
#[derive(Debug, Error)]
pub enum HeatError {
    #[error("no frozen baseline WBGT available; supply environmental inputs first")]
    NoBaseline,

    #[error("audit export is disabled until penalties have been applied")]
    ExportDisabled,

    #[error("no location set; search and select a location first")]
    NoLocation,

    #[error("no update available from {0}")]
    NoUpdate(&'static str),

    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
