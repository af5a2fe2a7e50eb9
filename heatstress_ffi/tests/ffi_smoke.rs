//! FFI smoke tests.
//!
//! These tests call the exported `extern "C"` functions directly (as an external consumer would),
//! to validate:
//! - ABI surface compiles and links
//! - allocation/free symmetry for returned buffers
//! - stage → apply → export works end to end

use std::ptr;

use heatstress_ffi::*;

fn s(s: &str) -> HsStr {
    HsStr {
        ptr: s.as_ptr(),
        len: s.len(),
    }
}

fn reference_reading() -> HsReading {
    HsReading {
        dry_bulb_c: 32.0,
        relative_humidity_pct: 60.0,
        wind_speed_ms: 1.0,
        pressure_kpa: 101.3,
        globe_temp_c: 35.0,
    }
}

#[test]
fn ffi_version_and_default_cfg() {
    assert_eq!(hs_ffi_version(), HS_FFI_VERSION);

    let cfg = hs_cfg_default();
    assert_eq!(cfg.thr_a_c, 29.0);
    assert_eq!(cfg.thr_c_c, 35.0);
    assert_eq!(cfg.penalty_cap_c, 10.0);
}

#[test]
fn ffi_rejects_invalid_cfg() {
    let mut cfg = hs_cfg_default();
    cfg.thr_b_c = 20.0;
    assert!(hs_supervisor_new(1, cfg).is_null());
}

#[test]
fn ffi_unknown_session_and_null_handle() {
    let h = hs_supervisor_new(1, hs_cfg_default());
    let out = unsafe { hs_evaluate(h, s("ghost")) };
    assert_eq!(out.rc, HS_ERR_UNKNOWN_SESSION);

    let out = unsafe { hs_evaluate(ptr::null_mut(), s("ghost")) };
    assert_eq!(out.rc, HS_ERR_ARGS);

    let bad = HsStr { ptr: ptr::null(), len: 0 };
    assert_eq!(unsafe { hs_session_open(h, bad) }, HS_ERR_UTF8);

    unsafe { hs_supervisor_free(h) };
}

#[test]
fn ffi_stage_apply_export() {
    let h = hs_supervisor_new(2, hs_cfg_default());
    assert!(!h.is_null());
    assert_eq!(unsafe { hs_session_open(h, s("site-7")) }, 1);
    assert_eq!(unsafe { hs_session_open(h, s("site-7")) }, 0);

    let first = unsafe { hs_submit_reading(h, s("site-7"), reference_reading()) };
    assert_eq!(first.rc, HS_OK);
    assert_eq!(first.phase, 1);
    assert_eq!(first.band, HsBand::Low);
    assert_eq!(first.surrogate_tier, 1);

    // Export is gated until penalties are applied.
    let b = unsafe { hs_export_csv(h, s("site-7")) };
    assert_eq!(b.rc, HS_ERR_EXPORT_DISABLED);
    assert!(b.ptr.is_null());

    let staged = unsafe {
        hs_stage_penalties(
            h,
            s("site-7"),
            HsPenalties { ppe_c: 3.0, enclosure_c: 2.0, radiant_c: 4.0, adhoc_c: 4.0 },
        )
    };
    assert_eq!(staged.effective_c, first.effective_c);

    let applied = unsafe { hs_apply(h, s("site-7")) };
    assert_eq!(applied.rc, HS_OK);
    assert_eq!(applied.phase, 2);
    assert_eq!(applied.total_penalty_c, 10.0);
    assert_eq!(applied.band, HsBand::Withdrawal);
    assert_eq!(applied.export_enabled, 1);
    assert_eq!(applied.surrogate, 50.0);
    assert_eq!(applied.surrogate_tier, 2);

    let b = unsafe { hs_export_csv(h, s("site-7")) };
    assert_eq!(b.rc, HS_OK);
    assert!(!b.ptr.is_null());
    let text = unsafe { std::str::from_utf8(std::slice::from_raw_parts(b.ptr, b.len)).unwrap().to_string() };
    assert!(text.starts_with("timestamp,location,"));
    assert!(text.lines().next().unwrap().ends_with("CHSI scaled (illustrative)"));
    assert!(text.contains("Withdrawal / Stop Work"));
    unsafe { hs_bytes_free(b) };

    let accl = unsafe { hs_set_acclimatized(h, s("site-7"), 0) };
    assert_eq!(accl.rc, HS_OK);
    assert_eq!(accl.rearmed, 0);

    assert_eq!(unsafe { hs_session_close(h, s("site-7")) }, 1);
    unsafe { hs_supervisor_free(h) };
}

fn view(v: HsStr) -> String {
    let bytes = unsafe { std::slice::from_raw_parts(v.ptr, v.len) };
    std::str::from_utf8(bytes).unwrap().to_string()
}

#[test]
fn ffi_surrogate_label_and_tiers() {
    assert!(view(hs_surrogate_label()).contains("not a validated"));
    assert_eq!(view(hs_surrogate_tier_message(0)), "low internal strain");
    assert_eq!(view(hs_surrogate_tier_message(2)), "major heat strain risk");
    assert!(hs_surrogate_tier_message(7).ptr.is_null());
}

#[test]
fn ffi_nan_humidity_keeps_applied_penalties() {
    let h = hs_supervisor_new(1, hs_cfg_default());
    assert_eq!(unsafe { hs_session_open(h, s("nan")) }, 1);
    let r = HsReading {
        relative_humidity_pct: f64::NAN,
        ..reference_reading()
    };

    let first = unsafe { hs_submit_reading(h, s("nan"), r) };
    assert_eq!(first.rc, HS_OK);
    unsafe {
        hs_stage_penalties(h, s("nan"), HsPenalties { ppe_c: 3.0, enclosure_c: 0.0, radiant_c: 0.0, adhoc_c: 0.0 })
    };
    let applied = unsafe { hs_apply(h, s("nan")) };
    assert_eq!(applied.phase, 2);

    let again = unsafe { hs_submit_reading(h, s("nan"), r) };
    assert_eq!(again.rearmed, 0);
    assert_eq!(again.phase, 2);
    assert_eq!(again.effective_c, applied.effective_c);
    assert_eq!(again.logged, 0);

    unsafe { hs_supervisor_free(h) };
}
