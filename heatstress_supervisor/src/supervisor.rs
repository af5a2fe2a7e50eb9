//! Sharded session supervisor.
//!
//! Serves many assessors at once while keeping every session's frozen
//! baseline, staged penalties and audit log isolated:
//! - owns per-session `HeatSession`
//! - shards sessions by `session_id` (deterministic)
//! - applies per-session cfg overrides
//!
//! No IO. No async. Concurrency is achieved by sharding state by `session_id`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use heatstress_core::{
    EnvironmentalReading, Evaluation, HeatCfg, HeatError, PenaltyCategory, PenaltySelection, PenaltyTotal,
};

use crate::export::export_csv;
use crate::session::HeatSession;

#[derive(Default, Debug)]
struct Shard {
    sessions: HashMap<String, HeatSession>,
}

/// Deterministic FNV-1a hash (stable across runs).
fn fnv1a_u64(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn shard_index(session_id: &str, shard_count: usize) -> usize {
    if shard_count <= 1 {
        return 0;
    }
    (fnv1a_u64(session_id) as usize) % shard_count
}

/// One "assessment" is one `(session_id -> HeatSession)` entry.
///
/// - `shards == 1` behaves like a single-threaded supervisor.
/// - Sessions never share state; sharding only reduces lock contention.
#[derive(Debug)]
pub struct HeatSupervisor {
    cfg: HeatCfg,
    /// Optional per-session cfg overrides, picked up when a session opens.
    cfg_overrides: HashMap<String, HeatCfg>,
    shards: usize,
    // NOTE: State is behind a Mutex for interior mutability. This crate does not spawn threads.
    state_shards: Vec<std::sync::Mutex<Shard>>,
}

impl HeatSupervisor {
    pub fn new(shards: usize, cfg: HeatCfg) -> Self {
        let shards = shards.max(1);
        let mut state_shards = Vec::with_capacity(shards);
        for _ in 0..shards {
            state_shards.push(std::sync::Mutex::new(Shard::default()));
        }

        Self {
            cfg,
            cfg_overrides: HashMap::new(),
            shards,
            state_shards,
        }
    }

    pub fn set_cfg_override(&mut self, session_id: impl Into<String>, cfg: HeatCfg) {
        self.cfg_overrides.insert(session_id.into(), cfg);
    }

    pub fn clear_cfg_override(&mut self, session_id: &str) {
        self.cfg_overrides.remove(session_id);
    }

    fn cfg_for(&self, session_id: &str) -> &HeatCfg {
        self.cfg_overrides.get(session_id).unwrap_or(&self.cfg)
    }

    fn shard_for(&self, session_id: &str) -> std::sync::MutexGuard<'_, Shard> {
        let idx = shard_index(session_id, self.shards);
        self.state_shards[idx]
            .lock()
            .expect("heat supervisor shard mutex poisoned")
    }

    /// Open a session if it does not exist yet. Returns true if it was created.
    pub fn open_session(&self, session_id: &str) -> bool {
        let cfg = self.cfg_for(session_id).clone();
        let mut guard = self.shard_for(session_id);
        if guard.sessions.contains_key(session_id) {
            return false;
        }
        debug!(session_id, "session opened");
        guard.sessions.insert(session_id.to_string(), HeatSession::new(cfg));
        true
    }

    /// Drop a session and everything it held.
    pub fn close_session(&self, session_id: &str) -> bool {
        self.shard_for(session_id).sessions.remove(session_id).is_some()
    }

    /// All open session ids, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        for shard in &self.state_shards {
            let guard = shard
                .lock()
                .expect("heat supervisor shard mutex poisoned");
            out.extend(guard.sessions.keys().cloned());
        }
        out.sort();
        out
    }

    /// Run `f` against one session while holding only its shard.
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut HeatSession) -> R,
    ) -> Result<R, HeatError> {
        let mut guard = self.shard_for(session_id);
        let session = guard
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| HeatError::UnknownSession(session_id.to_string()))?;
        Ok(f(session))
    }

    /// Replace the reading and re-evaluate.
    pub fn submit_reading(
        &self,
        session_id: &str,
        reading: EnvironmentalReading,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, HeatError> {
        self.with_session(session_id, |s| {
            s.set_reading(reading);
            s.evaluate_at(now)
        })
    }

    pub fn stage(
        &self,
        session_id: &str,
        cat: PenaltyCategory,
        selection: &PenaltySelection,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, HeatError> {
        self.with_session(session_id, |s| {
            s.stage(cat, selection);
            s.evaluate_at(now)
        })
    }

    pub fn set_acclimatized(
        &self,
        session_id: &str,
        acclimatized: bool,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, HeatError> {
        self.with_session(session_id, |s| {
            s.set_acclimatized(acclimatized);
            s.evaluate_at(now)
        })
    }

    pub fn evaluate(&self, session_id: &str, now: DateTime<Utc>) -> Result<Evaluation, HeatError> {
        self.with_session(session_id, |s| s.evaluate_at(now))
    }

    pub fn apply(&self, session_id: &str, now: DateTime<Utc>) -> Result<(PenaltyTotal, Evaluation), HeatError> {
        self.with_session(session_id, |s| s.apply_at(now))?
    }

    pub fn export_csv(&self, session_id: &str) -> Result<String, HeatError> {
        self.with_session(session_id, |s| export_csv(s))?
    }
}
