//! heatstress_supervisor
//!
//! Outside-world facing orchestration layer for `heatstress_core`.
//!
//! Responsibilities:
//! - own per-session engine state (`HeatSession`)
//! - shard sessions by `session_id` (deterministic)
//! - convert display units, weather and geocoding results into canonical inputs
//! - render the audit log for export
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no persistence across restarts

pub mod adapter;
pub mod export;
pub mod session;
pub mod supervisor;

pub use adapter::{
    c_to_f,
    f_to_c,
    ms_to_mph,
    mph_to_ms,
    kpa_to_inhg,
    inhg_to_kpa,
    UnitSystem,
    DisplayReading,
    Normalizer,
    WeatherObservation,
    GeocodeMatch,
    Location,
    WeatherSource,
    Geocoder,
};

pub use export::{render_csv, export_csv, export_file_name};
pub use session::HeatSession;
pub use supervisor::HeatSupervisor;
