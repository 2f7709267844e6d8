//! Location propagation from anchors down their survey trees.

use tracing::{debug, warn};

use crate::geo::forward_position;
use crate::store::Stations;
use crate::store::walk;

/// Place every unplaced derived station reachable from an anchor.
///
/// Each tree is walked parent-first, so a station's parent always has its
/// position by the time the station is visited. Stations that already have
/// a position are left alone, which makes repeated calls no-ops. Returns the
/// number of stations placed.
pub(crate) fn propagate(stations: &mut Stations, debug: bool) -> usize {
    let mut placed = 0;

    for anchor in stations.anchor_ids() {
        for (parent, child) in walk::preorder(stations, anchor) {
            let Some(origin) = stations.get(parent).and_then(|s| s.position) else {
                warn!(%parent, %child, "parent has no position, skipping");
                continue;
            };
            let Some(station) = stations.get_mut(child) else {
                continue;
            };
            if station.position.is_some() {
                continue;
            }
            let Some(leg) = station.leg() else {
                continue;
            };

            let position = forward_position(origin, leg.azimuth, leg.distance);
            station.position = Some(position);
            placed += 1;
            if debug {
                debug!(
                    station = %station.name,
                    lon = position.lon,
                    lat = position.lat,
                    "update"
                );
            }
        }
    }

    placed
}
