mod collection;
mod id;
mod props;

pub use collection::{Feature, FeatureCollection};
pub use id::FeatureId;
pub use props::{ConstituencyProps, Density};
pub use props::{AREA_FIELD, DENSITY_FIELD, FEMALE_FIELD, HOUSEHOLDS_FIELD, MALE_FIELD, NAME_FIELD, TOTAL_FIELD};
