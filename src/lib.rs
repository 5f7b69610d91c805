#![doc = "kenmap public API"]
mod config;
mod error;
mod feature;
mod geometry;
mod io;
mod source;
mod stats;
mod store;
mod view;

#[doc(inline)]
pub use config::{LatLng, ViewConfig, DEFAULT_SOURCE, MAPS_API_KEY_ENV};

#[doc(inline)]
pub use error::{ConfigError, DataLoadError, MissingFieldError};

#[doc(inline)]
pub use feature::{ConstituencyProps, Density, Feature, FeatureCollection, FeatureId};

#[doc(inline)]
pub use io::geojson::{feature_collection_from_value, parse_feature_collection, to_geojson};

#[doc(inline)]
pub use io::svg::{render_svg, write_svg, SvgOptions};

#[doc(inline)]
pub use source::DataSource;

#[doc(inline)]
pub use stats::{format_count, format_decimal, percent, Demographics, PLACEHOLDER};

#[doc(inline)]
pub use store::{RejectReason, SelectOutcome, SelectionChange, SelectionObserver, SelectionStore, SubscriptionId};

#[doc(inline)]
pub use view::{
    detail_panel, feature_style, list_entries, styled_features, ColorRamp, DetailPanel, DetailRow, FeatureStyle, ListEntry,
    Metric, Rgb, StyleConfig, StylePainter, StyledFeature, ViewSnapshot,
};

/// Source property names.
pub mod fields {
    pub use crate::feature::{AREA_FIELD, DENSITY_FIELD, FEMALE_FIELD, HOUSEHOLDS_FIELD, MALE_FIELD, NAME_FIELD, TOTAL_FIELD};
}
