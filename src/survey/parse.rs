use tracing::debug;

use crate::error::ParseFailure;
use crate::geo::{average_azimuth, reverse_azimuth};
use crate::station::Station;
use crate::survey::Survey;
use crate::survey::line::{Directive, Fixup, Layout, Line, normalize};

/// Parse survey notes with the given name prefix.
///
/// See [`SurveyParser::parse`].
pub fn parse_survey(text: &str, prefix: &str) -> Result<Survey, ParseFailure> {
    SurveyParser::new(prefix).parse(text)
}

/// Survey notes parser.
///
/// Lines are tab-separated; empty lines and lines starting with `#` are
/// skipped. Directives:
/// - `auto`: prefix every following station name with the parser prefix
///   (only when the prefix is non-empty);
/// - `reverse`: the notes were taken walking back along the line. Leg lines
///   switch to the depth-first layout and, at the end, station order and
///   bearings are reversed. With a prefix, stations are renumbered
///   `<prefix>1..`;
/// - any other single word names the station the survey starts from.
#[derive(Debug, Clone)]
pub struct SurveyParser<'p> {
    prefix: &'p str,
    debug: bool,
}

impl<'p> SurveyParser<'p> {
    pub fn new(prefix: &'p str) -> Self {
        Self {
            prefix,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Parse `text` into an uncommitted survey.
    ///
    /// On failure the returned [`ParseFailure`] carries the survey as far as
    /// it got.
    pub fn parse(&self, text: &str) -> Result<Survey, ParseFailure> {
        let mut survey = Survey::default();
        let mut label = "";
        let mut reverse = false;

        for (lineno, line) in text.lines().enumerate() {
            let lno = lineno + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.iter().all(|f| f.is_empty()) {
                continue;
            }

            let (fields, fixup) = normalize(fields);
            if self.debug {
                match fixup {
                    Fixup::None => {}
                    Fixup::Compacted => {
                        debug!(line = lno, "compacting multiple empty fields into one")
                    }
                    Fixup::Trimmed => debug!(line = lno, "dropping trailing empty fields"),
                    Fixup::CommentAdded => debug!(line = lno, "adding empty comment"),
                }
                debug!(line = lno, ?fields, "survey line");
            }

            let layout = if reverse {
                Layout::Reversed
            } else {
                Layout::Forward
            };
            let parsed = match Line::classify(lno, &fields, layout) {
                Ok(parsed) => parsed,
                Err(error) => {
                    return Err(ParseFailure {
                        error,
                        partial: survey,
                    });
                }
            };

            match parsed {
                Line::Directive(Directive::Auto) if !self.prefix.is_empty() => {
                    label = self.prefix;
                }
                Line::Directive(Directive::Reverse) => reverse = true,
                Line::Directive(Directive::Auto) => survey.start = "auto".to_string(),
                Line::Directive(Directive::Start(name)) => survey.start = name.to_string(),
                Line::Anchor { name, lon, lat } => {
                    survey
                        .stations
                        .push(Station::anchor(format!("{label}{name}"), lon, lat));
                }
                Line::SingleSighting {
                    name,
                    azimuth,
                    distance,
                    depth,
                    comment,
                } => {
                    survey.stations.push(
                        Station::derived(format!("{label}{name}"), azimuth, distance)
                            .with_depth(depth)
                            .with_comment(comment),
                    );
                }
                Line::DoubleSighting {
                    name,
                    azimuth,
                    distance,
                    back_azimuth,
                    depth,
                    comment,
                } => {
                    let azimuth = match back_azimuth {
                        Some(back) => average_azimuth(azimuth, back),
                        None => azimuth,
                    };
                    survey.stations.push(
                        Station::derived(format!("{label}{name}"), azimuth, distance)
                            .with_depth(depth)
                            .with_comment(comment),
                    );
                }
            }
        }

        if reverse {
            survey.stations.reverse();
            for (i, station) in survey.stations.iter_mut().enumerate() {
                if let Some(leg) = station.leg_mut() {
                    leg.azimuth = reverse_azimuth(leg.azimuth);
                }
                if !self.prefix.is_empty() {
                    station.name = format!("{}{}", self.prefix, i + 1);
                }
            }
        }

        Ok(survey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::station::{LonLat, START, StationKind};
    use pretty_assertions::assert_eq;

    const GPS: &str = "
#Survey from the tree in front of the entrance, to the start of the
#cave line.
#
#Name\tAzi\tLen\tDepth\tComments
auto
0\t-87.451223\t20.317874
1\t108\t18\t0.0\troof inside cavern
2\t79\t4.55\t2.63\tceiling, calcite, R
3\t122\t2.16\t4.06\tceiling small dome
";

    fn names(survey: &Survey) -> Vec<&str> {
        survey.stations.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn parses_auto_prefixed_survey() {
        let survey = parse_survey(GPS, "GPS").unwrap();
        assert_eq!(survey.start, START);
        assert_eq!(names(&survey), vec!["GPS0", "GPS1", "GPS2", "GPS3"]);

        let anchor = &survey.stations[0];
        assert_eq!(anchor.kind, StationKind::Anchor);
        assert_eq!(anchor.position, Some(LonLat::new(-87.451223, 20.317874)));

        let second = &survey.stations[2];
        assert_eq!(second.leg().map(|l| (l.azimuth, l.distance)), Some((79.0, 4.55)));
        assert_eq!(second.depth, 2.63);
        assert_eq!(second.comment, "ceiling, calcite, R");
        assert_eq!(second.position, None);
    }

    #[test]
    fn auto_without_prefix_is_a_start_name() {
        let survey = parse_survey("auto\n0\t-87.4\t20.3\n1\t10\t2\t0\t\n", "").unwrap();
        assert_eq!(survey.start, "auto");
        assert_eq!(names(&survey), vec!["0", "1"]);
    }

    #[test]
    fn start_station_and_comment_less_lines() {
        let text = "GPS3\n4\t177\t5.92\t8.4\n5\t201\t2.15\t9.4\tR end\n";
        let survey = parse_survey(text, "Cs").unwrap();
        assert_eq!(survey.start, "GPS3");
        assert_eq!(names(&survey), vec!["4", "5"]);
        assert_eq!(survey.stations[0].comment, "");
        assert_eq!(survey.stations[0].depth, 8.4);
    }

    #[test]
    fn two_sightings_are_averaged() {
        let text = "A0\t-87.0\t20.0\nA1\t350\t3.0\t10\t1.5\tdome\nA2\t90\t4.0\t-\t2.0\t\n";
        let survey = parse_survey(text, "").unwrap();
        assert_eq!(survey.stations[1].leg().unwrap().azimuth, 0.0);
        assert_eq!(survey.stations[1].comment, "dome");
        assert_eq!(survey.stations[2].leg().unwrap().azimuth, 90.0);
        assert_eq!(survey.stations[2].depth, 2.0);
    }

    #[test]
    fn reverse_flips_order_and_bearings() {
        let text = "auto\nreverse\n3\t4.06\t122\t2.16\tdome\n2\t2.63\t79\t4.55\tcalcite\n";
        let survey = parse_survey(text, "R").unwrap();
        assert_eq!(names(&survey), vec!["R1", "R2"]);

        let first = &survey.stations[0];
        assert_eq!(first.leg().unwrap().azimuth, 259.0);
        assert_eq!(first.leg().unwrap().distance, 4.55);
        assert_eq!(first.depth, 2.63);

        let second = &survey.stations[1];
        assert_eq!(second.leg().unwrap().azimuth, 302.0);
        assert_eq!(second.comment, "dome");
    }

    #[test]
    fn reverse_without_prefix_keeps_names() {
        let text = "reverse\n3\t4.06\t122\t2.16\tdome\n2\t2.63\t79\t4.55\tcalcite\n";
        let survey = parse_survey(text, "").unwrap();
        assert_eq!(names(&survey), vec!["2", "3"]);
        assert_eq!(survey.stations[0].leg().unwrap().azimuth, 259.0);
    }

    #[test]
    fn malformed_number_keeps_partial_survey() {
        let text = "GPS3\n4\t177\t5.92\t8.4\tok\n5\tnorth\t2.15\t9.4\tbad\n";
        let failure = parse_survey(text, "").unwrap_err();
        assert_eq!(failure.partial.start, "GPS3");
        assert_eq!(names(&failure.partial), vec!["4"]);
        match failure.error {
            Error::MalformedField { line, field, .. } => {
                assert_eq!(line, 3);
                assert_eq!(field, "azimuth");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unexpected_field_count() {
        let failure = parse_survey("0\t1\n", "").unwrap_err();
        assert!(matches!(
            failure.error,
            Error::UnexpectedFieldCount { line: 1, .. }
        ));
    }

    #[test]
    fn debug_parser_gives_same_result() {
        let quiet = parse_survey(GPS, "GPS").unwrap();
        let loud = SurveyParser::new("GPS").with_debug(true).parse(GPS).unwrap();
        assert_eq!(quiet, loud);
    }
}
