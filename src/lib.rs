//! Underwater cave survey mapping.
//!
//! Survey notes (bearing, distance and depth readings hanging from GPS-fixed
//! anchors) are parsed into stations, committed to a [`CaveMap`], placed by
//! forward geodesic propagation and exported as GeoJSON.
//!
//! ```
//! use cavemap::CaveMap;
//!
//! let map = CaveMap::new("Chico");
//! let survey = map
//!     .parse_survey("auto\n0\t-87.451223\t20.317874\n1\t108\t18\t0.0\troof\n", "GPS")
//!     .unwrap();
//! map.add_survey(survey).unwrap();
//! map.propagate();
//! let export = map.export().unwrap();
//! assert!(export.unreached.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod geo;
mod propagate;
pub mod render;
pub mod station;
mod store;
pub mod survey;

pub use config::MapConfig;
pub use error::{Error, ParseFailure};
pub use render::Export;
pub use station::{Leg, LonLat, START, Station, StationId, StationKind};
pub use store::CaveMap;
pub use survey::{Survey, SurveyParser, parse_survey};

pub type Result<T, E = Error> = std::result::Result<T, E>;
