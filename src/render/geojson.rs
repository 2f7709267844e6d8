//! GeoJSON export.
//!
//! Output shape:
//! - one `Point` feature per station, properties `{comment, depth, name}`,
//!   ordered by [`NameOrder`];
//! - then one feature per anchor, in id order, whose geometry is a
//!   `GeometryCollection` of two-point `LineString`s (one per leg below
//!   the anchor), properties `{name}`.
//!
//! Stations without a position are written at `[0, 0]` and left out of the
//! line segments; [`Export::unreached`] names them.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::Result;
use crate::render::order::NameOrder;
use crate::station::{LonLat, Station, StationId};
use crate::store::{Stations, walk};

/// Result of an export.
#[derive(Debug, Clone)]
pub struct Export {
    pub geojson: String,
    /// Stations no anchor leads to, in id order. These are left unplaced
    /// by propagation.
    pub unreached: Vec<StationId>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
struct FeatureCollection<'a> {
    features: Vec<Feature<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
struct Feature<'a> {
    geometry: Geometry,
    properties: Properties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
    GeometryCollection { geometries: Vec<Geometry> },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Properties<'a> {
    Station {
        comment: &'a str,
        depth: f64,
        name: &'a str,
    },
    Anchor {
        name: &'a str,
    },
}

fn coordinates(p: LonLat) -> [f64; 2] {
    [p.lon, p.lat]
}

fn point_feature(s: &Station) -> Feature<'_> {
    Feature {
        geometry: Geometry::Point {
            coordinates: s.position.map(coordinates).unwrap_or([0.0, 0.0]),
        },
        properties: Properties::Station {
            comment: &s.comment,
            depth: s.depth,
            name: &s.name,
        },
    }
}

pub(crate) fn export(stations: &Stations, debug: bool) -> Result<Export> {
    let order = NameOrder::new()?;

    let mut points: Vec<&Station> = stations.iter().collect();
    points.sort_by(|a, b| order.compare(&a.name, &b.name).then(a.id.cmp(&b.id)));

    let mut features: Vec<Feature<'_>> = points.into_iter().map(point_feature).collect();

    let mut reached: BTreeSet<StationId> = BTreeSet::new();
    for anchor_id in stations.anchor_ids() {
        let Some(anchor) = stations.get(anchor_id) else {
            continue;
        };
        reached.insert(anchor_id);
        if debug {
            debug!(anchor = %anchor, "walking survey");
        }

        let mut lines = Vec::new();
        for (parent, child) in walk::preorder(stations, anchor_id) {
            reached.insert(child);
            let (Some(from), Some(to)) = (stations.get(parent), stations.get(child)) else {
                continue;
            };
            if debug {
                debug!("{from}->{to}");
            }
            if let (Some(a), Some(b)) = (from.position, to.position) {
                lines.push(Geometry::LineString {
                    coordinates: vec![coordinates(a), coordinates(b)],
                });
            }
        }

        features.push(Feature {
            geometry: Geometry::GeometryCollection { geometries: lines },
            properties: Properties::Anchor { name: &anchor.name },
        });
    }

    let unreached: Vec<StationId> = stations
        .iter()
        .filter(|s| !reached.contains(&s.id))
        .map(|s| s.id)
        .collect();
    for id in &unreached {
        if let Some(s) = stations.get(*id) {
            warn!(%id, name = %s.name, from = ?s.from, "missed station, no anchor leads to it");
        }
    }

    let geojson = serde_json::to_string(&FeatureCollection { features })?;
    Ok(Export { geojson, unreached })
}
