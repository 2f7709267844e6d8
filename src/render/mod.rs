//! Output renderers over the station map.

pub mod geojson;
pub mod order;
pub mod text;

pub use geojson::Export;
pub use order::NameOrder;
pub use text::{format_srv, format_survey};
