//! One assessment session: the owner of all mutable heat-stress state.
//!
//! Every trigger (new reading, staged edit, apply) is followed by a full
//! evaluation cycle, top to bottom. Nothing here blocks or spawns.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use heatstress_core::{
    apply_penalties, evaluate_cycle, AuditLog, EnvironmentalReading, Evaluation, HeatCfg, HeatError,
    HeatState, PenaltyCategory, PenaltySelection, PenaltySet, PenaltyTotal, ThresholdSet,
};

use crate::adapter::{DisplayReading, GeocodeMatch, Geocoder, Location, Normalizer, UnitSystem, WeatherSource};

#[derive(Clone, Debug)]
pub struct HeatSession {
    cfg: HeatCfg,
    reading: EnvironmentalReading,
    location: Option<Location>,
    normalizer: Normalizer,
    state: HeatState,
}

impl HeatSession {
    /// Starts from the default reading with acclimatized workers.
    pub fn new(cfg: HeatCfg) -> Self {
        Self {
            cfg,
            reading: EnvironmentalReading::default(),
            location: None,
            normalizer: Normalizer::default(),
            state: HeatState::new(true),
        }
    }

    pub fn cfg(&self) -> &HeatCfg {
        &self.cfg
    }

    pub fn state(&self) -> &HeatState {
        &self.state
    }

    pub fn reading(&self) -> &EnvironmentalReading {
        &self.reading
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn location_label(&self) -> &str {
        self.location.as_ref().map(|l| l.label.as_str()).unwrap_or("")
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.normalizer = Normalizer::new(units);
    }

    pub fn set_reading(&mut self, reading: EnvironmentalReading) {
        self.reading = reading;
    }

    pub fn set_display_reading(&mut self, d: &DisplayReading) {
        self.reading = self.normalizer.to_canonical(d);
    }

    pub fn set_acclimatized(&mut self, acclimatized: bool) {
        self.state.acclimatized = acclimatized;
    }

    pub fn thresholds(&self) -> ThresholdSet {
        ThresholdSet::for_status(self.state.acclimatized, &self.cfg)
    }

    /// Look up candidates. No match is reported, and leaves the session unchanged.
    pub fn search_location<G: Geocoder>(&self, geocoder: &G, query: &str) -> Result<Vec<GeocodeMatch>, HeatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(HeatError::NoUpdate("geocoder"));
        }
        let matches = geocoder.search(query);
        if matches.is_empty() {
            warn!(query, "no matching locations found");
            return Err(HeatError::NoUpdate("geocoder"));
        }
        Ok(matches)
    }

    pub fn select_location(&mut self, m: &GeocodeMatch) {
        let loc = Location::from(m);
        info!(label = %loc.label, lat = loc.latitude, lon = loc.longitude, "location selected");
        self.location = Some(loc);
    }

    /// Pull current weather for the selected location into the reading.
    pub fn fetch_weather<W: WeatherSource>(&mut self, source: &W) -> Result<EnvironmentalReading, HeatError> {
        let loc = self.location.as_ref().ok_or(HeatError::NoLocation)?;
        let Some(obs) = source.current(loc.latitude, loc.longitude) else {
            warn!(label = %loc.label, "weather provider returned nothing");
            return Err(HeatError::NoUpdate("weather"));
        };
        self.reading = obs.merge_into(&self.reading, &self.cfg);
        info!(dry_bulb_c = self.reading.dry_bulb_c, "weather updated");
        Ok(self.reading)
    }

    pub fn staged(&self) -> &PenaltySet {
        &self.state.staged
    }

    /// Stage one category. Not in effect until [`HeatSession::apply_at`].
    pub fn stage(&mut self, cat: PenaltyCategory, selection: &PenaltySelection) {
        let delta = selection.delta_c(cat);
        debug!(category = cat.label(), delta_c = delta, "penalty staged");
        self.state.staged.set(cat, delta);
    }

    /// Staged delta for one category in display units.
    pub fn staged_display(&self, cat: PenaltyCategory) -> f64 {
        self.normalizer.delta_from_c(self.state.staged.get(cat))
    }

    /// Stage a free-form override typed in display units.
    pub fn stage_display_override(&mut self, cat: PenaltyCategory, delta: f64) {
        let delta_c = self.normalizer.delta_to_c(delta);
        self.state.staged.set(cat, delta_c);
    }

    pub fn stage_all(&mut self, penalties: PenaltySet) {
        self.state.stage(penalties);
    }

    pub fn evaluate_at(&mut self, now: DateTime<Utc>) -> Evaluation {
        let label = self.location.as_ref().map(|l| l.label.as_str()).unwrap_or("");
        let eval = evaluate_cycle(&self.reading, label, &self.cfg, &mut self.state, now);
        let surrogate = &eval.classification.surrogate;
        debug!(
            band = eval.classification.band.label(),
            surrogate = surrogate.value,
            tier = surrogate.tier.message(),
            note = surrogate.label(),
            "cycle evaluated"
        );
        eval
    }

    pub fn evaluate(&mut self) -> Evaluation {
        self.evaluate_at(Utc::now())
    }

    /// Commit staged penalties over the frozen baseline and run the cycle.
    pub fn apply_at(&mut self, now: DateTime<Utc>) -> Result<(PenaltyTotal, Evaluation), HeatError> {
        let label = self.location.as_ref().map(|l| l.label.as_str()).unwrap_or("");
        apply_penalties(&self.reading, label, &self.cfg, &mut self.state, now)
    }

    pub fn apply(&mut self) -> Result<(PenaltyTotal, Evaluation), HeatError> {
        self.apply_at(Utc::now())
    }

    pub fn audit(&self) -> &AuditLog {
        &self.state.audit
    }

    pub fn export_enabled(&self) -> bool {
        self.state.export_enabled()
    }
}
