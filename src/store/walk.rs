//! Tree walks over the parent/child relation.
//!
//! Walks use an explicit stack so survey depth never grows the call stack,
//! and a visited set so a malformed link can never loop.

use std::collections::{HashMap, HashSet};

use crate::station::{Station, StationId};
use crate::store::Stations;

/// Parent-to-child edges below `root` in pre-order, siblings in id order.
pub(crate) fn preorder(stations: &Stations, root: StationId) -> Vec<(StationId, StationId)> {
    let mut edges = Vec::new();
    let mut seen = HashSet::from([root]);
    let mut stack: Vec<(Option<StationId>, StationId)> = vec![(None, root)];

    while let Some((parent, id)) = stack.pop() {
        if let Some(parent) = parent {
            edges.push((parent, id));
        }
        for &child in stations.children(id).iter().rev() {
            if seen.insert(child) {
                stack.push((Some(id), child));
            }
        }
    }

    edges
}

/// First station of `batch` whose parent links loop within the batch.
///
/// Links leaving the batch end the chain: stations already in a map form a
/// forest and never point back into an uncommitted batch.
pub(crate) fn find_cycle(batch: &[Station]) -> Option<StationId> {
    let parent_of: HashMap<StationId, Option<StationId>> =
        batch.iter().map(|s| (s.id, s.from)).collect();
    let mut acyclic: HashSet<StationId> = HashSet::new();

    for station in batch {
        let mut path = HashSet::new();
        let mut cur = Some(station.id);
        while let Some(id) = cur {
            if acyclic.contains(&id) {
                break;
            }
            let Some(parent) = parent_of.get(&id) else {
                break;
            };
            if !path.insert(id) {
                return Some(station.id);
            }
            cur = *parent;
        }
        acyclic.extend(path);
    }

    None
}
