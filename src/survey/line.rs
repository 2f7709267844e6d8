//! Line normalization and classification for the survey grammar.
//!
//! A survey line is a tab-separated record. The record kind follows from
//! the field count once authoring shortcuts are undone:
//!
//! ```text
//! name                                          directive or start station
//! name  lon  lat                                anchor
//! name  azimuth  distance  depth  comment       one sighting
//! name  azimuth  distance  back  depth  comment two sightings ("-" = none)
//! ```
//!
//! After a `reverse` directive, leg lines put depth first:
//! `name depth azimuth distance comment` and
//! `name depth azimuth distance back comment`.

use crate::error::Error;
use crate::Result;

/// Placeholder for a missing second sighting.
pub const NO_SIGHTING: &str = "-";

/// Which column layout leg lines follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Forward,
    Reversed,
}

/// What normalization did to a line, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixup {
    None,
    /// Trailing blank cells collapsed into one empty comment.
    Compacted,
    /// Trailing blank cells after a comment dropped.
    Trimmed,
    /// An empty comment appended to a comment-less line.
    CommentAdded,
}

/// A classified survey line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Directive(Directive<'a>),
    Anchor {
        name: &'a str,
        lon: f64,
        lat: f64,
    },
    SingleSighting {
        name: &'a str,
        azimuth: f64,
        distance: f64,
        depth: f64,
        comment: &'a str,
    },
    DoubleSighting {
        name: &'a str,
        azimuth: f64,
        distance: f64,
        back_azimuth: Option<f64>,
        depth: f64,
        comment: &'a str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Auto,
    Reverse,
    Start(&'a str),
}

fn is_number(s: &str) -> bool {
    s.parse::<f64>().is_ok()
}

/// Reconstruct the field count the grammar expects.
///
/// This is a best-effort rule, not part of the grammar. Notes often end in
/// stray tabs, and a reading without a comment simply has no comment column:
///
/// - trailing blank cells after a number become a single empty comment;
/// - trailing blank cells after a comment are dropped;
/// - a line of at least four fields where nothing after the name fails to
///   parse as a number gets an empty comment appended.
pub fn normalize(mut fields: Vec<&str>) -> (Vec<&str>, Fixup) {
    let has_empty = fields.iter().any(|f| f.is_empty());
    let last = fields.iter().rposition(|f| !f.is_empty());
    let has_comment = fields
        .iter()
        .skip(1)
        .any(|f| !f.is_empty() && *f != NO_SIGHTING && !is_number(f));

    match last {
        Some(last) if has_empty => {
            let numeric_tail = is_number(fields[last]);
            fields.truncate(last + 1);
            if numeric_tail {
                fields.push("");
                (fields, Fixup::Compacted)
            } else {
                (fields, Fixup::Trimmed)
            }
        }
        _ if !has_comment && fields.len() >= 4 => {
            fields.push("");
            (fields, Fixup::CommentAdded)
        }
        _ => (fields, Fixup::None),
    }
}

fn number(line: usize, field: &'static str, value: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|source| Error::MalformedField {
        line,
        field,
        value: value.to_string(),
        source,
    })
}

impl<'a> Line<'a> {
    /// Classify a normalized line. `line` is the 1-based line number used in
    /// errors.
    pub fn classify(line: usize, fields: &[&'a str], layout: Layout) -> Result<Self> {
        match (fields, layout) {
            (&[word], _) => Ok(Line::Directive(match word {
                "auto" => Directive::Auto,
                "reverse" => Directive::Reverse,
                name => Directive::Start(name),
            })),
            (&[name, lon, lat], _) => Ok(Line::Anchor {
                name,
                lon: number(line, "longitude", lon)?,
                lat: number(line, "latitude", lat)?,
            }),
            (&[name, azimuth, distance, depth, comment], Layout::Forward)
            | (&[name, depth, azimuth, distance, comment], Layout::Reversed) => {
                Ok(Line::SingleSighting {
                    name,
                    azimuth: number(line, "azimuth", azimuth)?,
                    distance: number(line, "distance", distance)?,
                    depth: number(line, "depth", depth)?,
                    comment,
                })
            }
            (&[name, azimuth, distance, back, depth, comment], Layout::Forward)
            | (&[name, depth, azimuth, distance, back, comment], Layout::Reversed) => {
                let azimuth = number(line, "azimuth", azimuth)?;
                let distance = number(line, "distance", distance)?;
                let back_azimuth = match back {
                    NO_SIGHTING => None,
                    back => Some(number(line, "back azimuth", back)?),
                };
                Ok(Line::DoubleSighting {
                    name,
                    azimuth,
                    distance,
                    back_azimuth,
                    depth: number(line, "depth", depth)?,
                    comment,
                })
            }
            _ => Err(Error::UnexpectedFieldCount {
                line,
                fields: fields.iter().map(|f| f.to_string()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(line: &str) -> Vec<&str> {
        line.split('\t').collect()
    }

    #[test]
    fn complete_lines_untouched() {
        let (f, fix) = normalize(fields("1\t108\t18\t0.0\troof inside cavern"));
        assert_eq!(fix, Fixup::None);
        assert_eq!(f.len(), 5);

        let (f, fix) = normalize(fields("0\t-87.451223\t20.317874"));
        assert_eq!(fix, Fixup::None);
        assert_eq!(f.len(), 3);

        let (f, fix) = normalize(fields("auto"));
        assert_eq!(fix, Fixup::None);
        assert_eq!(f, vec!["auto"]);
    }

    #[test]
    fn missing_comment_is_added() {
        let (f, fix) = normalize(fields("4\t177\t5.92\t8.4"));
        assert_eq!(fix, Fixup::CommentAdded);
        assert_eq!(f, vec!["4", "177", "5.92", "8.4", ""]);
    }

    #[test]
    fn missing_comment_with_two_sightings() {
        let (f, fix) = normalize(fields("4\t177\t5.92\t-\t8.4"));
        assert_eq!(fix, Fixup::CommentAdded);
        assert_eq!(f, vec!["4", "177", "5.92", "-", "8.4", ""]);
    }

    #[test]
    fn trailing_blanks_become_one_comment() {
        let (f, fix) = normalize(fields("4\t177\t5.92\t8.4\t\t\t"));
        assert_eq!(fix, Fixup::Compacted);
        assert_eq!(f, vec!["4", "177", "5.92", "8.4", ""]);
    }

    #[test]
    fn trailing_blanks_after_comment_dropped() {
        let (f, fix) = normalize(fields("4\t177\t5.92\t8.4\tsilt\t\t"));
        assert_eq!(fix, Fixup::Trimmed);
        assert_eq!(f, vec!["4", "177", "5.92", "8.4", "silt"]);
    }

    #[test]
    fn classify_directives() {
        assert_eq!(
            Line::classify(1, &["auto"], Layout::Forward).unwrap(),
            Line::Directive(Directive::Auto)
        );
        assert_eq!(
            Line::classify(1, &["reverse"], Layout::Forward).unwrap(),
            Line::Directive(Directive::Reverse)
        );
        assert_eq!(
            Line::classify(1, &["GPS3"], Layout::Forward).unwrap(),
            Line::Directive(Directive::Start("GPS3"))
        );
    }

    #[test]
    fn classify_forward_and_reversed_legs() {
        let forward = Line::classify(2, &["2", "79", "4.55", "2.63", "calcite"], Layout::Forward);
        assert_eq!(
            forward.unwrap(),
            Line::SingleSighting {
                name: "2",
                azimuth: 79.0,
                distance: 4.55,
                depth: 2.63,
                comment: "calcite",
            }
        );

        let reversed = Line::classify(2, &["2", "2.63", "79", "4.55", "calcite"], Layout::Reversed);
        assert_eq!(reversed.unwrap(), forward_single());

        let double = Line::classify(3, &["3", "120", "2.16", "124", "4.06", ""], Layout::Forward);
        assert_eq!(
            double.unwrap(),
            Line::DoubleSighting {
                name: "3",
                azimuth: 120.0,
                distance: 2.16,
                back_azimuth: Some(124.0),
                depth: 4.06,
                comment: "",
            }
        );

        let double = Line::classify(3, &["3", "4.06", "120", "2.16", "-", ""], Layout::Reversed);
        assert_eq!(
            double.unwrap(),
            Line::DoubleSighting {
                name: "3",
                azimuth: 120.0,
                distance: 2.16,
                back_azimuth: None,
                depth: 4.06,
                comment: "",
            }
        );
    }

    fn forward_single() -> Line<'static> {
        Line::SingleSighting {
            name: "2",
            azimuth: 79.0,
            distance: 4.55,
            depth: 2.63,
            comment: "calcite",
        }
    }

    #[test]
    fn malformed_field_names_role() {
        let err = Line::classify(7, &["0", "-87.45", "north"], Layout::Forward).unwrap_err();
        match err {
            Error::MalformedField { line, field, value, .. } => {
                assert_eq!(line, 7);
                assert_eq!(field, "latitude");
                assert_eq!(value, "north");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn wrong_field_count() {
        let err = Line::classify(9, &["a", "b"], Layout::Forward).unwrap_err();
        match err {
            Error::UnexpectedFieldCount { line, fields } => {
                assert_eq!(line, 9);
                assert_eq!(fields, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
