//! Error types for survey parsing and map maintenance.
//!
//! Every failure is returned to the caller as a value; nothing in the core
//! retries or aborts the process.

use std::num::ParseFloatError;

use crate::station::StationId;
use crate::survey::Survey;

/// Errors raised while parsing, committing or exporting surveys.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A station id is already present in the map.
    #[error("station {name} already in map with id {id}")]
    DuplicateId { id: StationId, name: String },

    /// A survey reuses a station name that the map already holds.
    #[error("duplicate station name {0}")]
    DuplicateName(String),

    /// A survey starts from a station the map does not know.
    #[error("unknown station {0}")]
    UnknownStation(String),

    /// A numeric field failed to parse.
    #[error("line {line} parsing {field}: invalid number {value:?}")]
    MalformedField {
        line: usize,
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// A line does not match any record shape of the survey grammar.
    #[error("line {line} parsing line: wrong number {} of fields {fields:?}", .fields.len())]
    UnexpectedFieldCount { line: usize, fields: Vec<String> },

    /// `commit` was handed a survey with no stations.
    #[error("can't add empty survey")]
    EmptySurvey,

    /// No station id is left above the largest one in the map.
    #[error("no station id left after {last} for {name}")]
    IdsExhausted { last: StationId, name: String },

    /// A preassigned station points at a parent that does not exist.
    #[error("station {id} references missing parent {parent}")]
    DanglingParent { id: StationId, parent: StationId },

    /// Preassigned parent links loop back on themselves.
    #[error("station {id} is part of a parent cycle")]
    Cycle { id: StationId },

    /// The station-name pattern failed to compile.
    #[error("invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// GeoJSON serialization failed.
    #[error("failed to marshal: {0}")]
    Json(#[from] serde_json::Error),
}

/// A parse error together with everything parsed before it.
///
/// `partial` holds the stations and start name collected up to the failing
/// line, which helps when tracking down a bad survey file.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ParseFailure {
    pub error: Error,
    pub partial: Survey,
}

impl From<ParseFailure> for Error {
    fn from(failure: ParseFailure) -> Self {
        failure.error
    }
}
