//! Plain-text renderings: survey notes, Walls SRV and the map outline.

use std::fmt::Write;

use crate::station::{START, StationKind, significant};
use crate::store::{Stations, walk};
use crate::survey::Survey;

const SRV_HEADER: &str = "#UNITS Meters ORDER=DA TAPE=SS\n";

/// Render a parsed survey back into tab-separated notes.
pub fn format_survey(survey: &Survey) -> String {
    let mut out = String::new();
    if survey.start != START {
        let _ = writeln!(out, "{}", survey.start);
    }
    for s in &survey.stations {
        match (s.kind, s.position) {
            (StationKind::Anchor, Some(p)) => {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}",
                    s.name,
                    significant(p.lon, 8),
                    significant(p.lat, 8)
                );
            }
            (StationKind::Derived(leg), _) => {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    s.name, leg.azimuth, leg.distance, s.depth, s.comment
                );
            }
            (StationKind::Anchor, None) => {}
        }
    }
    out
}

/// Render a survey as Walls SRV shots.
///
/// `start_depth` is the depth of the station the survey continues from;
/// `None` means the survey opens at its own first station.
pub fn format_srv(survey: &Survey, start_depth: Option<f64>) -> String {
    let mut out = String::from(SRV_HEADER);
    let mut from: Option<(&str, f64)> = start_depth.map(|d| (survey.start.as_str(), d));

    for s in &survey.stations {
        if let Some((name, depth)) = from {
            let (azimuth, distance) = s
                .leg()
                .map(|leg| (leg.azimuth, leg.distance))
                .unwrap_or((0.0, 0.0));
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t;{}",
                name, s.name, distance, azimuth, depth, s.depth, s.comment
            );
        }
        from = Some((s.name.as_str(), s.depth));
    }
    out
}

/// `Map: <summary>`, then each anchor and the legs below it.
pub(crate) fn outline(summary: &str, stations: &Stations) -> String {
    let mut out = format!("Map: {summary}\n");
    for anchor in stations.anchor_ids() {
        let Some(station) = stations.get(anchor) else {
            continue;
        };
        let _ = writeln!(out, "{station}: ");
        for (parent, child) in walk::preorder(stations, anchor) {
            if let (Some(p), Some(c)) = (stations.get(parent), stations.get(child)) {
                let _ = writeln!(out, "{p}->{c}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaveMap;
    use crate::survey::parse_survey;
    use pretty_assertions::assert_eq;

    const GPS: &str = "auto
0\t-87.451223\t20.317874
1\t108\t18\t0.0\troof inside cavern
2\t79\t4.55\t2.63\tceiling, calcite, R
";

    #[test]
    fn survey_round_trips_through_text() {
        let survey = parse_survey(GPS, "GPS").unwrap();
        assert_eq!(
            format_survey(&survey),
            "GPS0\t-87.451223\t20.317874\n\
             GPS1\t108\t18\t0\troof inside cavern\n\
             GPS2\t79\t4.55\t2.63\tceiling, calcite, R\n"
        );
    }

    #[test]
    fn survey_text_keeps_start_line() {
        let survey = parse_survey("GPS2\n3\t122\t2.16\t4.06\tdome\n", "").unwrap();
        assert_eq!(format_survey(&survey), "GPS2\n3\t122\t2.16\t4.06\tdome\n");
    }

    #[test]
    fn srv_from_own_anchor_skips_first_station() {
        let survey = parse_survey(GPS, "GPS").unwrap();
        assert_eq!(
            format_srv(&survey, None),
            "#UNITS Meters ORDER=DA TAPE=SS\n\
             GPS0\tGPS1\t18\t108\t0\t0\t;roof inside cavern\n\
             GPS1\tGPS2\t4.55\t79\t0\t2.63\t;ceiling, calcite, R\n"
        );
    }

    #[test]
    fn outline_lists_legs_per_anchor() {
        let map = CaveMap::new("Test");
        map.add_survey(parse_survey(GPS, "GPS").unwrap()).unwrap();
        assert_eq!(
            map.outline(),
            "Map: Test 3 stations\n-87.451223/20.317874: \n-87.451223/20.317874->GPS1\nGPS1->GPS2\n"
        );
    }
}
