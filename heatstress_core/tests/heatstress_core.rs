use chrono::{TimeZone, Utc};
use heatstress_core::*;

fn reading(db: f64, rh: f64, ws: f64, gt: f64) -> EnvironmentalReading {
    EnvironmentalReading {
        dry_bulb_c: db,
        relative_humidity_pct: rh,
        wind_speed_ms: ws,
        pressure_kpa: 101.3,
        globe_temp_c: gt,
    }
}

#[test]
fn wet_bulb_finite_over_humidity_range() {
    for t in [-20.0, 0.0, 15.0, 32.0, 50.0] {
        let mut rh = 0.0;
        while rh <= 100.0 {
            assert!(natural_wet_bulb_c(t, rh).is_finite());
            rh += 2.5;
        }
    }
}

#[test]
fn wet_bulb_saturated_close_to_dry_bulb() {
    for t in [5.0, 20.0, 32.0, 45.0] {
        let tw = natural_wet_bulb_c(t, 100.0);
        assert!((tw - t).abs() < 0.5, "t={t} tw={tw}");
    }
}

#[test]
fn damped_globe_between_dry_bulb_and_globe() {
    let cfg = HeatCfg::default();
    for ws in [0.0, 0.1, 1.0, 4.0, 25.0] {
        let g = wind_damped_globe_c(30.0, 40.0, ws, &cfg);
        assert!((30.0..=40.0).contains(&g), "ws={ws} g={g}");
        // globe colder than air is pulled up, not past it
        let g = wind_damped_globe_c(30.0, 25.0, ws, &cfg);
        assert!((25.0..=30.0).contains(&g));
    }
}

#[test]
fn zero_wind_uses_floor() {
    let cfg = HeatCfg::default();
    let a = wind_damped_globe_c(30.0, 40.0, 0.0, &cfg);
    let b = wind_damped_globe_c(30.0, 40.0, 0.1, &cfg);
    assert!((a - b).abs() < 1e-12);
}

#[test]
fn reference_scenario() {
    let cfg = HeatCfg::default();
    let est = estimate_wbgt(&reading(32.0, 60.0, 1.0, 35.0), &cfg);

    let tw = natural_wet_bulb_c(32.0, 60.0);
    assert!((est.wet_bulb_c - tw).abs() < 1e-12);
    assert!((est.globe_adj_c - (32.0 + 3.0 / 1.4)).abs() < 1e-9);
    let expect = 0.7 * tw + 0.2 * est.globe_adj_c + 0.1 * 32.0;
    assert!((est.raw_c - expect).abs() < 1e-9);

    // Below 29 and above 27: Low when acclimatized, Caution when not.
    assert!(est.raw_c > 27.0 && est.raw_c < 29.0);
    let acc = ThresholdSet::for_status(true, &cfg);
    let non = ThresholdSet::for_status(false, &cfg);
    assert_eq!(acc.band(est.raw_c), RiskBand::Low);
    assert_eq!(non.band(est.raw_c), RiskBand::Caution);
}

#[test]
fn threshold_boundaries_are_lower_inclusive() {
    let cfg = HeatCfg::default();
    let t = ThresholdSet::for_status(true, &cfg);
    assert_eq!(t.band(28.999), RiskBand::Low);
    assert_eq!(t.band(29.0), RiskBand::Caution);
    assert_eq!(t.band(32.0), RiskBand::HighStrain);
    assert_eq!(t.band(34.999), RiskBand::HighStrain);
    assert_eq!(t.band(35.0), RiskBand::Withdrawal);

    let n = ThresholdSet::for_status(false, &cfg);
    assert_eq!((n.a_c, n.b_c, n.c_c), (27.0, 30.0, 33.0));
    assert_eq!(n.band(27.0), RiskBand::Caution);
    assert_eq!(n.band(33.0), RiskBand::Withdrawal);
}

#[test]
fn classification_carries_guidance_and_surrogate() {
    let cfg = HeatCfg::default();
    let t = ThresholdSet::for_status(true, &cfg);
    let c = classify(36.0, &t, &cfg);
    assert_eq!(c.band, RiskBand::Withdrawal);
    assert_eq!(c.guidance, RiskBand::Withdrawal.guidance());
    assert_eq!(c.surrogate.value, 50.0);
    assert_eq!(c.surrogate.tier, SurrogateTier::MajorStrain);
    assert_eq!(c.surrogate.label(), SURROGATE_LABEL);
}

#[test]
fn surrogate_tier_messages_and_category_labels() {
    assert_eq!(SurrogateTier::from_value(14.9).message(), "low internal strain");
    assert_eq!(SurrogateTier::from_value(15.0).message(), "mild heat accumulation");
    assert_eq!(SurrogateTier::from_value(30.0).message(), "major heat strain risk");
    assert_eq!(PenaltyCategory::Ppe.label(), "Clothing / PPE");
    assert_eq!(PenaltyCategory::Adhoc.label(), "Ad-hoc / Site-specific");
}

#[test]
fn surrogate_is_bounded_linear() {
    let cfg = HeatCfg::default();
    assert_eq!(chsi_surrogate(20.0, &cfg).value, 0.0);
    assert!((chsi_surrogate(27.0, &cfg).value - 10.0).abs() < 1e-9);
    assert!((chsi_surrogate(30.0, &cfg).value - 25.0).abs() < 1e-9);
    assert_eq!(chsi_surrogate(30.0, &cfg).tier, SurrogateTier::MildAccumulation);
    assert_eq!(chsi_surrogate(60.0, &cfg).value, 50.0);
}

#[test]
fn penalty_out_of_range_clamps_to_bounds() {
    let cfg = HeatCfg::default();
    let staged = PenaltySet { ppe_c: 7.0, enclosure_c: -2.0, radiant_c: 1.5, adhoc_c: f64::NAN };
    let total = aggregate_penalties(&staged, &cfg);
    assert_eq!(total.clamped.ppe_c, 3.0);
    assert_eq!(total.clamped.enclosure_c, 0.0);
    assert_eq!(total.clamped.radiant_c, 1.5);
    assert_eq!(total.clamped.adhoc_c, 0.0);
    assert!((total.total_c - 4.5).abs() < 1e-12);
    assert!(!total.capped);
}

#[test]
fn penalty_global_cap_binds_on_clamped_sum() {
    let cfg = HeatCfg::default();
    let staged = PenaltySet::from_presets("Heavy", "Enclosed", "Direct radiant", "Severe");
    assert_eq!(staged.sum(), 13.0);
    let total = aggregate_penalties(&staged, &cfg);
    assert_eq!(total.clamped, staged);
    assert_eq!(total.total_c, 10.0);
    assert!(total.capped);

    // One wild category cannot push the others out: clamped first.
    let staged = PenaltySet { ppe_c: 100.0, enclosure_c: 1.0, radiant_c: 1.0, adhoc_c: 1.0 };
    let total = aggregate_penalties(&staged, &cfg);
    assert_eq!(total.total_c, 6.0);
}

#[test]
fn preset_lookup_and_override() {
    assert_eq!(PenaltyCategory::Enclosure.preset_delta("poorly ventilated"), Some(3.0));
    assert_eq!(PenaltyCategory::Radiant.preset_delta("nope"), None);
    assert_eq!(PenaltySelection::Preset("Moderate".into()).delta_c(PenaltyCategory::Adhoc), 2.0);
    assert_eq!(PenaltySelection::Override(2.7).delta_c(PenaltyCategory::Ppe), 2.7);
}

#[test]
fn humidity_out_of_range_is_clamped_before_estimate() {
    let cfg = HeatCfg::default();
    let wet = estimate_wbgt(&reading(32.0, 130.0, 1.0, 35.0), &cfg);
    assert_eq!(wet, estimate_wbgt(&reading(32.0, 100.0, 1.0, 35.0), &cfg));
    let dry = estimate_wbgt(&reading(32.0, -5.0, 1.0, 35.0), &cfg);
    assert_eq!(dry, estimate_wbgt(&reading(32.0, 0.0, 1.0, 35.0), &cfg));
    let nan = estimate_wbgt(&reading(32.0, f64::NAN, 1.0, 35.0), &cfg);
    assert_eq!(nan, dry);
    assert!(nan.raw_c.is_finite());
}

#[test]
fn signature_matches_what_the_estimator_reads() {
    assert_eq!(reading(32.0, 130.0, 1.0, 35.0).signature(), reading(32.0, 100.0, 1.0, 35.0).signature());
    assert_eq!(reading(32.0, f64::NAN, 1.0, 35.0).signature(), reading(32.0, f64::NAN, 1.0, 35.0).signature());
    assert_eq!(reading(f64::NAN, 60.0, 1.0, 35.0).signature(), reading(f64::NAN, 60.0, 1.0, 35.0).signature());
    assert_eq!(reading(32.0, 60.0, -0.0, 35.0).signature(), reading(32.0, 60.0, 0.0, 35.0).signature());
    assert_ne!(reading(32.0, 60.0, 1.0, 35.0).signature(), reading(32.0, 61.0, 1.0, 35.0).signature());
}

#[test]
fn nan_humidity_keeps_applied_penalties_on_identical_cycle() {
    let cfg = HeatCfg::default();
    let r = reading(32.0, f64::NAN, 1.0, 35.0);
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
    let mut st = HeatState::new(true);
    evaluate_cycle(&r, "", &cfg, &mut st, now);
    st.stage(PenaltySet::from_presets("Heavy", "None", "None", "None"));
    let (_, applied) = apply_penalties(&r, "", &cfg, &mut st, now).unwrap();
    assert!(applied.logged);

    let next = evaluate_cycle(&r, "", &cfg, &mut st, now);
    assert!(!next.freeze.rearmed);
    assert_eq!(next.phase, BaselinePhase::FrozenApplied);
    assert_eq!(next.effective_c, applied.effective_c);
    assert!(!next.logged);
    assert_eq!(st.audit.len(), 1);
    assert!(st.export_enabled());
}

#[test]
fn freeze_is_sticky_per_signature() {
    let cfg = HeatCfg::default();
    let r = reading(32.0, 60.0, 1.0, 35.0);
    let mut st = BaselineState::default();
    assert_eq!(st.phase(), BaselinePhase::NoBaseline);

    let first = st.observe(&r, &cfg);
    assert!(first.rearmed);
    assert_eq!(st.phase(), BaselinePhase::FrozenUnapplied);

    // Pressure is not part of the signature.
    let mut r2 = r;
    r2.pressure_kpa = 99.0;
    for _ in 0..5 {
        let o = st.observe(&r2, &cfg);
        assert!(!o.rearmed);
        assert_eq!(o.frozen_c, first.frozen_c);
    }
    assert_eq!(st.frozen_c, Some(first.frozen_c));
}

#[test]
fn frozen_value_not_replaced_while_signature_holds() {
    let cfg = HeatCfg::default();
    let r = reading(32.0, 60.0, 1.0, 35.0);
    let mut st = BaselineState::default();
    st.observe(&r, &cfg);
    st.frozen_c = Some(99.0);
    let o = st.observe(&r, &cfg);
    assert_eq!(o.frozen_c, 99.0);
    assert!((o.estimate.raw_c - 99.0).abs() > 1.0);
}

#[test]
fn any_signature_field_change_rearms_same_cycle() {
    let cfg = HeatCfg::default();
    let base = reading(32.0, 60.0, 1.0, 35.0);
    let tweaks: [fn(&mut EnvironmentalReading); 4] = [
        |r| r.dry_bulb_c += 1.0,
        |r| r.relative_humidity_pct += 5.0,
        |r| r.wind_speed_ms += 0.5,
        |r| r.globe_temp_c += 2.0,
    ];
    for tweak in tweaks {
        let mut st = BaselineState::default();
        st.observe(&base, &cfg);
        st.commit(&aggregate_penalties(&PenaltySet { ppe_c: 2.0, ..Default::default() }, &cfg))
            .unwrap();
        assert_eq!(st.phase(), BaselinePhase::FrozenApplied);

        let mut changed = base;
        tweak(&mut changed);
        let o = st.observe(&changed, &cfg);
        assert!(o.rearmed);
        assert!(!st.penalties_applied);
        assert_eq!(st.total_penalty_c, 0.0);
        assert_eq!(st.frozen_c, Some(o.estimate.raw_c));
        assert_eq!(st.effective_c, Some(o.estimate.raw_c));
        assert_eq!(st.phase(), BaselinePhase::FrozenUnapplied);
    }
}

#[test]
fn commit_without_baseline_is_reported() {
    let cfg = HeatCfg::default();
    let mut st = BaselineState::default();
    let total = aggregate_penalties(&PenaltySet { ppe_c: 1.0, ..Default::default() }, &cfg);
    assert!(matches!(st.commit(&total), Err(HeatError::NoBaseline)));
    assert!(!st.penalties_applied);
    assert_eq!(st.effective_c, None);
    assert_eq!(st.total_penalty_c, 0.0);
}

#[test]
fn staged_penalties_do_not_leak_until_applied() {
    let cfg = HeatCfg::default();
    let r = reading(32.0, 60.0, 1.0, 35.0);
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
    let mut st = HeatState::new(true);

    let e0 = evaluate_cycle(&r, "", &cfg, &mut st, now);
    st.stage(PenaltySet::from_presets("Heavy", "None", "None", "None"));
    let e1 = evaluate_cycle(&r, "", &cfg, &mut st, now);
    assert_eq!(e1.effective_c, e0.effective_c);
    assert_eq!(e1.phase, BaselinePhase::FrozenUnapplied);
    assert!(!e1.logged);
    assert!(!st.export_enabled());

    let (total, e2) = apply_penalties(&r, "Site", &cfg, &mut st, now).unwrap();
    assert_eq!(total.total_c, 3.0);
    assert!((e2.effective_c - (e0.effective_c + 3.0)).abs() < 1e-12);
    assert_eq!(e2.phase, BaselinePhase::FrozenApplied);
    assert!(e2.logged);
    assert!(st.export_enabled());

    // Editing the stage again does not move the committed value.
    st.stage(PenaltySet::default());
    let e3 = evaluate_cycle(&r, "Site", &cfg, &mut st, now);
    assert_eq!(e3.effective_c, e2.effective_c);
}

#[test]
fn audit_dedup_on_unchanged_cycles() {
    let cfg = HeatCfg::default();
    let r = reading(32.0, 60.0, 1.0, 35.0);
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
    let mut st = HeatState::new(true);
    st.stage(PenaltySet::from_presets("Light", "Open", "None", "None"));
    apply_penalties(&r, "Dubai, Dubai, AE", &cfg, &mut st, now).unwrap();
    assert_eq!(st.audit.len(), 1);

    let e = evaluate_cycle(&r, "Dubai, Dubai, AE", &cfg, &mut st, now);
    assert!(!e.logged);
    assert_eq!(st.audit.len(), 1);

    // Later second: a distinct snapshot.
    let later = now + chrono::Duration::seconds(1);
    assert!(evaluate_cycle(&r, "Dubai, Dubai, AE", &cfg, &mut st, later).logged);
    assert_eq!(st.audit.len(), 2);

    // Environment change clears the applied flag: nothing logged.
    let e = evaluate_cycle(&reading(33.0, 60.0, 1.0, 35.0), "Dubai, Dubai, AE", &cfg, &mut st, later);
    assert!(!e.logged);
    assert!(!st.export_enabled());
    assert_eq!(st.audit.len(), 2);
}

#[test]
fn audit_push_suppresses_identical_last() {
    let at = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
    let snap = DecisionSnapshot {
        location_label: "Phoenix, Arizona, US",
        dry_bulb_c: 41.04,
        rh_pct: 12.4,
        globe_temp_c: 44.0,
        baseline_c: 30.01,
        total_penalty_c: 2.0,
        effective_c: 32.01,
        band: RiskBand::HighStrain,
        chsi_surrogate: 35.04,
    };
    let mut log = AuditLog::new();
    assert!(log.push(AuditLogEntry::record(at, &snap)));
    assert!(!log.push(AuditLogEntry::record(at, &snap)));
    assert_eq!(log.len(), 1);

    let row = &log.rows()[0];
    assert_eq!(row.len(), AUDIT_COLUMNS.len());
    assert_eq!(row[0], "2025-07-01 12:00:00");
    assert_eq!(row[2], "41.0");
    assert_eq!(row[3], "12");
    assert_eq!(row[8], "High strain warning");
    assert_eq!(row[9], "35");
}

#[test]
fn cfg_defaults_and_json() {
    let cfg = HeatCfg::from_json_str(r#"{ "penalty_cap_c": 8.0, "ceilings": { "radiant_c": 6.0 } }"#).unwrap();
    assert_eq!(cfg.penalty_cap_c, 8.0);
    assert_eq!(cfg.ceilings.radiant_c, 6.0);
    assert_eq!(cfg.ceilings.ppe_c, 3.0);
    assert_eq!(cfg.thr_a_c, 29.0);

    assert!(matches!(
        HeatCfg::from_json_str(r#"{ "thr_a_c": 33.0 }"#),
        Err(HeatError::Config(_))
    ));
    assert!(matches!(HeatCfg::from_json_str("{ nope"), Err(HeatError::ConfigParse(_))));

    let back: HeatCfg = serde_json::from_str(&serde_json::to_string(&HeatCfg::default()).unwrap()).unwrap();
    assert_eq!(back, HeatCfg::default());
}
