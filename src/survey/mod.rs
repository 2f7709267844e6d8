//! Survey text parsing.
//!
//! A survey is an ordered batch of readings sharing one parent chain. The
//! parser turns survey notes into stations that are not yet part of any map;
//! ids and parent links are assigned when the survey is committed.

pub mod line;
pub mod parse;

pub use parse::{SurveyParser, parse_survey};

use crate::station::{START, Station};

/// A parsed, uncommitted survey.
#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    /// Name of the station the survey continues from, or [`START`].
    pub start: String,
    pub stations: Vec<Station>,
}

impl Default for Survey {
    fn default() -> Self {
        Self {
            start: START.to_string(),
            stations: Vec::new(),
        }
    }
}

impl Survey {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
