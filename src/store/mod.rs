//! The station map: the authoritative registry of committed stations.
//!
//! All reads and writes go through one coarse lock held for the whole
//! operation, including tree walks, propagation and export.

pub(crate) mod walk;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::Result;
use crate::config::MapConfig;
use crate::error::{Error, ParseFailure};
use crate::propagate;
use crate::render::geojson::{self, Export};
use crate::render::text;
use crate::station::{START, Station, StationId};
use crate::survey::{Survey, SurveyParser};

/// Stations keyed by id, plus the name and children indexes.
#[derive(Debug, Default)]
pub(crate) struct Stations {
    by_id: BTreeMap<StationId, Station>,
    names: HashMap<String, StationId>,
    children: HashMap<StationId, Vec<StationId>>,
}

impl Stations {
    /// Caller has checked the id is free.
    pub(crate) fn insert(&mut self, station: Station) {
        if station.name != START {
            self.names.entry(station.name.clone()).or_insert(station.id);
        }
        if let Some(parent) = station.from {
            let kids = self.children.entry(parent).or_default();
            if let Err(pos) = kids.binary_search(&station.id) {
                kids.insert(pos, station.id);
            }
        }
        self.by_id.insert(station.id, station);
    }

    pub(crate) fn get(&self, id: StationId) -> Option<&Station> {
        self.by_id.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.by_id.get_mut(&id)
    }

    pub(crate) fn contains(&self, id: StationId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub(crate) fn id_of(&self, name: &str) -> Option<StationId> {
        self.names.get(name).copied()
    }

    /// Children of `id` in id order.
    pub(crate) fn children(&self, id: StationId) -> &[StationId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Stations in id order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Station> {
        self.by_id.values()
    }

    /// Anchor ids in id order.
    pub(crate) fn anchor_ids(&self) -> Vec<StationId> {
        self.iter().filter(|s| s.is_anchor()).map(|s| s.id).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    fn max_id(&self) -> u32 {
        self.by_id.keys().next_back().map(|id| id.0).unwrap_or(0)
    }

    /// Reject any non-`START` name already in the map or repeated within
    /// the candidate survey.
    fn check_names(&self, survey: &[Station]) -> Result<()> {
        let mut seen = HashSet::new();
        for s in survey.iter().filter(|s| s.name != START) {
            if self.names.contains_key(&s.name) || !seen.insert(s.name.as_str()) {
                return Err(Error::DuplicateName(s.name.clone()));
            }
        }
        Ok(())
    }
}

/// A named cave map: a forest of survey stations rooted at anchors.
pub struct CaveMap {
    name: String,
    config: MapConfig,
    inner: Mutex<Stations>,
}

impl CaveMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, MapConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: MapConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Stations::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Every mutation leaves the indexes consistent before returning, so a
    /// poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, Stations> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of one station.
    pub fn station(&self, id: StationId) -> Option<Station> {
        self.lock().get(id).cloned()
    }

    /// Snapshot of every station in id order.
    pub fn stations(&self) -> Vec<Station> {
        self.lock().iter().cloned().collect()
    }

    pub fn lookup_id_by_name(&self, name: &str) -> Option<StationId> {
        self.lock().id_of(name)
    }

    /// Parse survey notes using this map's diagnostics setting.
    pub fn parse_survey(&self, text: &str, prefix: &str) -> Result<Survey, ParseFailure> {
        SurveyParser::new(prefix)
            .with_debug(self.config.debug)
            .parse(text)
    }

    /// Insert stations whose ids and parent links are already assigned.
    ///
    /// Nothing is inserted unless the whole batch is accepted: ids must be
    /// free, parents must exist in the map or the batch, and parent links
    /// must not loop.
    pub fn insert_detached_survey(&self, survey: Vec<Station>) -> Result<()> {
        let mut inner = self.lock();

        let mut batch_ids = HashSet::new();
        for s in &survey {
            if inner.contains(s.id) || !batch_ids.insert(s.id) {
                return Err(Error::DuplicateId {
                    id: s.id,
                    name: s.name.clone(),
                });
            }
        }
        for s in &survey {
            if let Some(parent) = s.from {
                if !inner.contains(parent) && !batch_ids.contains(&parent) {
                    return Err(Error::DanglingParent { id: s.id, parent });
                }
            }
        }
        if let Some(id) = walk::find_cycle(&survey) {
            return Err(Error::Cycle { id });
        }

        for s in survey {
            if self.config.debug {
                debug!(id = %s.id, station = %s, "adding");
            }
            inner.insert(s);
        }
        Ok(())
    }

    /// Check that no station name in `survey` is already taken.
    pub fn validate(&self, survey: &[Station]) -> Result<()> {
        self.lock().check_names(survey)
    }

    /// Commit a parsed survey hanging from the station named `start`.
    ///
    /// Stations get consecutive ids after the largest id in the map and are
    /// chained in order: the first to `start` (no parent for [`START`]),
    /// each following one to its predecessor. Returns the assigned ids.
    pub fn commit(&self, mut survey: Vec<Station>, start: &str) -> Result<Vec<StationId>> {
        if survey.is_empty() {
            return Err(Error::EmptySurvey);
        }

        let mut inner = self.lock();
        let mut from = if start == START {
            None
        } else {
            Some(
                inner
                    .id_of(start)
                    .ok_or_else(|| Error::UnknownStation(start.to_string()))?,
            )
        };
        if self.config.debug {
            debug!(start, ?from, "from station");
        }
        inner.check_names(&survey)?;

        let mut next = inner.max_id();
        for s in &mut survey {
            next = next.checked_add(1).ok_or_else(|| Error::IdsExhausted {
                last: StationId(next),
                name: s.name.clone(),
            })?;
            s.id = StationId(next);
            s.from = from;
            from = Some(s.id);
        }
        for s in &survey {
            if inner.contains(s.id) {
                return Err(Error::DuplicateId {
                    id: s.id,
                    name: s.name.clone(),
                });
            }
        }

        let ids: Vec<StationId> = survey.iter().map(|s| s.id).collect();
        for s in survey {
            if self.config.debug {
                debug!(id = %s.id, station = %s, "adding");
            }
            inner.insert(s);
        }
        info!(map = %self.name, start, stations = ids.len(), "survey committed");
        Ok(ids)
    }

    /// Validate and commit a parsed survey.
    pub fn add_survey(&self, survey: Survey) -> Result<Vec<StationId>> {
        self.commit(survey.stations, &survey.start)
    }

    /// Fill in the position of every derived station reachable from an
    /// anchor. Returns how many stations were placed.
    pub fn propagate(&self) -> usize {
        let mut inner = self.lock();
        let placed = propagate::propagate(&mut inner, self.config.debug);
        info!(map = %self.name, placed, "locations propagated");
        placed
    }

    /// Export the map as a GeoJSON feature collection.
    pub fn export(&self) -> Result<Export> {
        geojson::export(&self.lock(), self.config.debug)
    }

    /// GeoJSON text of the map.
    pub fn to_geojson(&self) -> Result<String> {
        Ok(self.export()?.geojson)
    }

    /// Each anchor followed by its parent->child edges.
    pub fn outline(&self) -> String {
        let summary = self.to_string();
        text::outline(&summary, &self.lock())
    }

    /// Render `survey` in Walls SRV format, looking up the depth of the
    /// station it starts from.
    pub fn survey_as_srv(&self, survey: &Survey) -> Result<String> {
        let inner = self.lock();
        if survey.start == START {
            return Ok(text::format_srv(survey, None));
        }
        if survey.is_empty() {
            return Ok(String::new());
        }
        let depth = inner
            .id_of(&survey.start)
            .and_then(|id| inner.get(id))
            .map(|s| s.depth)
            .ok_or_else(|| Error::UnknownStation(survey.start.clone()))?;
        Ok(text::format_srv(survey, Some(depth)))
    }
}

impl fmt::Display for CaveMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} stations", self.name, self.len())
    }
}
