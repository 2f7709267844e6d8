//! Station data model.

use std::fmt;

/// Placeholder name of the station a survey hangs from when it starts at an
/// anchor of its own. It is exempt from name uniqueness.
pub const START: &str = "START";

/// Numeric station identifier, unique within a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic point, longitude first as GeoJSON orders it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Reading that connects a derived station to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    /// Bearing in degrees from the parent, 0 = north, clockwise.
    pub azimuth: f64,
    /// Horizontal distance in meters.
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StationKind {
    /// Position known directly (GPS fix).
    Anchor,
    /// Position follows from the parent and the leg.
    Derived(Leg),
}

/// A point along a survey.
///
/// Anchors are built with a position; derived stations start without one
/// and get it from location propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub from: Option<StationId>,
    pub section: String,
    pub kind: StationKind,
    pub depth: f64,
    pub comment: String,
    pub position: Option<LonLat>,
}

impl Station {
    pub fn anchor(name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            id: StationId::default(),
            name: name.into(),
            from: None,
            section: String::new(),
            kind: StationKind::Anchor,
            depth: 0.0,
            comment: String::new(),
            position: Some(LonLat::new(lon, lat)),
        }
    }

    pub fn derived(name: impl Into<String>, azimuth: f64, distance: f64) -> Self {
        Self {
            id: StationId::default(),
            name: name.into(),
            from: None,
            section: String::new(),
            kind: StationKind::Derived(Leg { azimuth, distance }),
            depth: 0.0,
            comment: String::new(),
            position: None,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = StationId(id);
        self
    }

    pub fn with_from(mut self, from: u32) -> Self {
        self.from = Some(StationId(from));
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self.kind, StationKind::Anchor)
    }

    pub fn leg(&self) -> Option<Leg> {
        match self.kind {
            StationKind::Anchor => None,
            StationKind::Derived(leg) => Some(leg),
        }
    }

    pub(crate) fn leg_mut(&mut self) -> Option<&mut Leg> {
        match &mut self.kind {
            StationKind::Anchor => None,
            StationKind::Derived(leg) => Some(leg),
        }
    }
}

/// Anchors show their fix, derived stations their name.
impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.position) {
            (StationKind::Anchor, Some(p)) => {
                write!(f, "{}/{}", significant(p.lon, 8), significant(p.lat, 8))
            }
            _ => f.write_str(&self.name),
        }
    }
}

/// Format `x` with at most `digits` significant digits, trailing zeros
/// trimmed.
pub(crate) fn significant(x: f64, digits: usize) -> String {
    if x == 0.0 || !x.is_finite() {
        return format!("{x}");
    }
    let magnitude = x.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    let s = format!("{x:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
