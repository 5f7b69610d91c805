//! Format-specific reading and writing.
//!
//! - `geojson` - constituency documents in, annotated documents out
//! - `svg` - choropleth export for quick visual checks

pub mod geojson;
pub mod svg;
