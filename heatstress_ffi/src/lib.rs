#![allow(clippy::missing_safety_doc)]

use std::ptr;

use chrono::Utc;
use heatstress_core::{
    BaselinePhase, Evaluation, HeatCfg, HeatError, PenaltySet, RiskBand, SurrogateTier, SURROGATE_LABEL,
};
use heatstress_supervisor::HeatSupervisor;

/// FFI ABI version for heatstress_ffi.
///
/// Bump this when any `#[repr(C)]` struct layout or exported function signature changes.
pub const HS_FFI_VERSION: u32 = 2;

#[no_mangle]
pub extern "C" fn hs_ffi_version() -> u32 {
    HS_FFI_VERSION
}

// Return codes.
pub const HS_OK: i32 = 0;
pub const HS_ERR_ARGS: i32 = -1;
pub const HS_ERR_UTF8: i32 = -2;
pub const HS_ERR_UNKNOWN_SESSION: i32 = -3;
pub const HS_ERR_NO_BASELINE: i32 = -4;
pub const HS_ERR_EXPORT_DISABLED: i32 = -5;
pub const HS_ERR_OTHER: i32 = -9;

fn rc_for(e: &HeatError) -> i32 {
    match e {
        HeatError::UnknownSession(_) => HS_ERR_UNKNOWN_SESSION,
        HeatError::NoBaseline => HS_ERR_NO_BASELINE,
        HeatError::ExportDisabled => HS_ERR_EXPORT_DISABLED,
        _ => HS_ERR_OTHER,
    }
}

/// Opaque handle exposed over FFI.
#[repr(C)]
pub struct HsSupervisor {
    inner: HeatSupervisor,
}

/// FFI string view (UTF-8 bytes).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HsStr {
    pub ptr: *const u8,
    pub len: usize,
}

impl HsStr {
    fn as_str(&self) -> Option<&str> {
        if self.ptr.is_null() {
            return None;
        }
        let bytes = unsafe { std::slice::from_raw_parts(self.ptr, self.len) };
        std::str::from_utf8(bytes).ok()
    }
}

/// Reading in canonical units (°C, %, m/s, kPa).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HsReading {
    pub dry_bulb_c: f64,
    pub relative_humidity_pct: f64,
    pub wind_speed_ms: f64,
    pub pressure_kpa: f64,
    pub globe_temp_c: f64,
}

/// Staged penalty deltas (°C), unclamped.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HsPenalties {
    pub ppe_c: f64,
    pub enclosure_c: f64,
    pub radiant_c: f64,
    pub adhoc_c: f64,
}

/// Risk band as a C-friendly enum.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HsBand {
    Low = 0,
    Caution = 1,
    HighStrain = 2,
    Withdrawal = 3,
}

fn band_to_ffi(b: RiskBand) -> HsBand {
    match b {
        RiskBand::Low => HsBand::Low,
        RiskBand::Caution => HsBand::Caution,
        RiskBand::HighStrain => HsBand::HighStrain,
        RiskBand::Withdrawal => HsBand::Withdrawal,
    }
}

fn tier_to_ffi(t: SurrogateTier) -> u8 {
    match t {
        SurrogateTier::LowStrain => 0,
        SurrogateTier::MildAccumulation => 1,
        SurrogateTier::MajorStrain => 2,
    }
}

fn static_str(s: &'static str) -> HsStr {
    HsStr { ptr: s.as_ptr(), len: s.len() }
}

/// Caveat that must accompany any displayed surrogate value. Static, never freed.
#[no_mangle]
pub extern "C" fn hs_surrogate_label() -> HsStr {
    static_str(SURROGATE_LABEL)
}

/// Message for a `surrogate_tier` code. Static, never freed; null for unknown codes.
#[no_mangle]
pub extern "C" fn hs_surrogate_tier_message(tier: u8) -> HsStr {
    let t = match tier {
        0 => SurrogateTier::LowStrain,
        1 => SurrogateTier::MildAccumulation,
        2 => SurrogateTier::MajorStrain,
        _ => return HsStr { ptr: ptr::null(), len: 0 },
    };
    static_str(t.message())
}

/// Result of one evaluation cycle. Numeric fields are only meaningful when `rc == 0`.
#[repr(C)]
pub struct HsOutcome {
    pub rc: i32,
    pub raw_c: f64,
    pub frozen_c: f64,
    pub effective_c: f64,
    pub total_penalty_c: f64,
    pub band: HsBand,
    /// Illustrative surrogate (0..=50), not a validated heat-strain index.
    /// Render it together with `hs_surrogate_label()`.
    pub surrogate: f64,
    /// 0 = low strain, 1 = mild accumulation, 2 = major strain
    pub surrogate_tier: u8,
    /// 0 = no baseline, 1 = frozen, 2 = frozen with penalties applied
    pub phase: u8,
    pub rearmed: u8,
    pub logged: u8,
    pub export_enabled: u8,
}

impl HsOutcome {
    fn err(rc: i32) -> Self {
        HsOutcome {
            rc,
            raw_c: 0.0,
            frozen_c: 0.0,
            effective_c: 0.0,
            total_penalty_c: 0.0,
            band: HsBand::Low,
            surrogate: 0.0,
            surrogate_tier: 0,
            phase: 0,
            rearmed: 0,
            logged: 0,
            export_enabled: 0,
        }
    }

    fn from_eval(e: &Evaluation) -> Self {
        let phase = match e.phase {
            BaselinePhase::NoBaseline => 0,
            BaselinePhase::FrozenUnapplied => 1,
            BaselinePhase::FrozenApplied => 2,
        };
        HsOutcome {
            rc: HS_OK,
            raw_c: e.freeze.estimate.raw_c,
            frozen_c: e.freeze.frozen_c,
            effective_c: e.effective_c,
            total_penalty_c: e.total_penalty_c,
            band: band_to_ffi(e.classification.band),
            surrogate: e.classification.surrogate.value,
            surrogate_tier: tier_to_ffi(e.classification.surrogate.tier),
            phase,
            rearmed: e.freeze.rearmed as u8,
            logged: e.logged as u8,
            export_enabled: (e.phase == BaselinePhase::FrozenApplied) as u8,
        }
    }
}

fn outcome(r: Result<Evaluation, HeatError>) -> HsOutcome {
    match r {
        Ok(e) => HsOutcome::from_eval(&e),
        Err(e) => HsOutcome::err(rc_for(&e)),
    }
}

/// Owned byte buffer (for CSV export).
#[repr(C)]
pub struct HsBytes {
    pub ptr: *mut u8,
    pub len: usize,
    pub rc: i32,
}

impl HsBytes {
    fn err(rc: i32) -> Self {
        HsBytes { ptr: ptr::null_mut(), len: 0, rc }
    }
}

/// Supervisor cfg for FFI (keep it minimal).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HsCfg {
    pub thr_a_c: f64,
    pub thr_b_c: f64,
    pub thr_c_c: f64,
    pub unacclimatized_shift_c: f64,
    pub penalty_cap_c: f64,
}

#[no_mangle]
pub extern "C" fn hs_cfg_default() -> HsCfg {
    let d = HeatCfg::default();
    HsCfg {
        thr_a_c: d.thr_a_c,
        thr_b_c: d.thr_b_c,
        thr_c_c: d.thr_c_c,
        unacclimatized_shift_c: d.unacclimatized_shift_c,
        penalty_cap_c: d.penalty_cap_c,
    }
}

fn cfg_from_ffi(c: HsCfg) -> HeatCfg {
    HeatCfg {
        thr_a_c: c.thr_a_c,
        thr_b_c: c.thr_b_c,
        thr_c_c: c.thr_c_c,
        unacclimatized_shift_c: c.unacclimatized_shift_c,
        penalty_cap_c: c.penalty_cap_c,
        ..HeatCfg::default()
    }
}

/// Create a new supervisor handle. Returns null if `cfg` is invalid.
///
/// This library does not spawn threads. Concurrent calls on one handle
/// serialize per shard via internal mutexes.
#[no_mangle]
pub extern "C" fn hs_supervisor_new(shards: usize, cfg: HsCfg) -> *mut HsSupervisor {
    let cfg = cfg_from_ffi(cfg);
    if cfg.validate().is_err() {
        return ptr::null_mut();
    }
    let handle = HsSupervisor {
        inner: HeatSupervisor::new(shards.max(1), cfg),
    };
    Box::into_raw(Box::new(handle))
}

#[no_mangle]
pub unsafe extern "C" fn hs_supervisor_free(h: *mut HsSupervisor) {
    if !h.is_null() {
        drop(Box::from_raw(h));
    }
}

unsafe fn resolve<'a>(h: *mut HsSupervisor, id: &'a HsStr) -> Result<(&'a HeatSupervisor, &'a str), i32> {
    if h.is_null() {
        return Err(HS_ERR_ARGS);
    }
    let id = id.as_str().ok_or(HS_ERR_UTF8)?;
    Ok((&(*h).inner, id))
}

/// Returns 1 if created, 0 if it already existed, negative on error.
#[no_mangle]
pub unsafe extern "C" fn hs_session_open(h: *mut HsSupervisor, id: HsStr) -> i32 {
    match resolve(h, &id) {
        Ok((sup, id)) => sup.open_session(id) as i32,
        Err(rc) => rc,
    }
}

/// Returns 1 if a session was closed, 0 if there was none, negative on error.
#[no_mangle]
pub unsafe extern "C" fn hs_session_close(h: *mut HsSupervisor, id: HsStr) -> i32 {
    match resolve(h, &id) {
        Ok((sup, id)) => sup.close_session(id) as i32,
        Err(rc) => rc,
    }
}

#[no_mangle]
pub unsafe extern "C" fn hs_submit_reading(h: *mut HsSupervisor, id: HsStr, r: HsReading) -> HsOutcome {
    let (sup, id) = match resolve(h, &id) {
        Ok(v) => v,
        Err(rc) => return HsOutcome::err(rc),
    };
    let reading = heatstress_core::EnvironmentalReading {
        dry_bulb_c: r.dry_bulb_c,
        relative_humidity_pct: r.relative_humidity_pct,
        wind_speed_ms: r.wind_speed_ms,
        pressure_kpa: r.pressure_kpa,
        globe_temp_c: r.globe_temp_c,
    };
    outcome(sup.submit_reading(id, reading, Utc::now()))
}

/// Stage all four categories at once. Nothing takes effect until `hs_apply`.
#[no_mangle]
pub unsafe extern "C" fn hs_stage_penalties(h: *mut HsSupervisor, id: HsStr, p: HsPenalties) -> HsOutcome {
    let (sup, id) = match resolve(h, &id) {
        Ok(v) => v,
        Err(rc) => return HsOutcome::err(rc),
    };
    let staged = PenaltySet {
        ppe_c: p.ppe_c,
        enclosure_c: p.enclosure_c,
        radiant_c: p.radiant_c,
        adhoc_c: p.adhoc_c,
    };
    outcome(sup.with_session(id, |s| {
        s.stage_all(staged);
        s.evaluate_at(Utc::now())
    }))
}

#[no_mangle]
pub unsafe extern "C" fn hs_set_acclimatized(h: *mut HsSupervisor, id: HsStr, acclimatized: u8) -> HsOutcome {
    let (sup, id) = match resolve(h, &id) {
        Ok(v) => v,
        Err(rc) => return HsOutcome::err(rc),
    };
    outcome(sup.set_acclimatized(id, acclimatized != 0, Utc::now()))
}

#[no_mangle]
pub unsafe extern "C" fn hs_evaluate(h: *mut HsSupervisor, id: HsStr) -> HsOutcome {
    let (sup, id) = match resolve(h, &id) {
        Ok(v) => v,
        Err(rc) => return HsOutcome::err(rc),
    };
    outcome(sup.evaluate(id, Utc::now()))
}

#[no_mangle]
pub unsafe extern "C" fn hs_apply(h: *mut HsSupervisor, id: HsStr) -> HsOutcome {
    let (sup, id) = match resolve(h, &id) {
        Ok(v) => v,
        Err(rc) => return HsOutcome::err(rc),
    };
    outcome(sup.apply(id, Utc::now()).map(|(_, e)| e))
}

/// Export the audit log as UTF-8 CSV. Free with `hs_bytes_free`.
#[no_mangle]
pub unsafe extern "C" fn hs_export_csv(h: *mut HsSupervisor, id: HsStr) -> HsBytes {
    let (sup, id) = match resolve(h, &id) {
        Ok(v) => v,
        Err(rc) => return HsBytes::err(rc),
    };
    let csv = match sup.export_csv(id) {
        Ok(s) => s,
        Err(e) => return HsBytes::err(rc_for(&e)),
    };

    let mut boxed = csv.into_bytes().into_boxed_slice();
    let ptr = boxed.as_mut_ptr();
    let len = boxed.len();
    std::mem::forget(boxed);

    HsBytes { ptr, len, rc: HS_OK }
}

#[no_mangle]
pub unsafe extern "C" fn hs_bytes_free(b: HsBytes) {
    if !b.ptr.is_null() {
        let slice_ptr = std::ptr::slice_from_raw_parts_mut(b.ptr, b.len);
        drop(Box::from_raw(slice_ptr));
    }
}
