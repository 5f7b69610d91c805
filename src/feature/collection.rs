use geo::{MultiPolygon, Point, Rect};
use serde_json::{Map, Value};

use crate::geometry::BoundaryIndex;
use super::{id::FeatureId, props::ConstituencyProps};

/// One constituency: its boundary and its published statistics.
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: MultiPolygon<f64>,
    pub props: ConstituencyProps,
    /// The source `properties` object, kept verbatim for export.
    pub raw_props: Map<String, Value>,
}

impl Feature {
    /// Display name, falling back to the id for unnamed features.
    pub fn label(&self) -> String {
        self.props.name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Constituency #{}", self.id))
    }
}

/// Ordered, immutable set of constituencies loaded from one document.
///
/// `features[i].id == FeatureId(i)` holds for every feature, so lookup by id is
/// a plain index.
#[derive(Debug, Clone)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    index: BoundaryIndex,
}

impl FeatureCollection {
    /// Build a collection from boundaries and properties in source order,
    /// assigning ids by position.
    pub fn from_parts(parts: Vec<(MultiPolygon<f64>, Map<String, Value>)>) -> Self {
        let features: Vec<Feature> = parts.into_iter().enumerate()
            .map(|(i, (geometry, raw_props))| Feature {
                id: FeatureId(i as u32),
                props: ConstituencyProps::from_json(&Value::Object(raw_props.clone())),
                geometry,
                raw_props,
            })
            .collect();

        let index = BoundaryIndex::new(features.iter().map(|f| &f.geometry));
        Self { features, index }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Feature] { &self.features }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> + '_ { self.features.iter() }

    pub fn ids(&self) -> impl Iterator<Item = FeatureId> + '_ {
        self.features.iter().map(|f| f.id)
    }

    #[inline] pub fn contains(&self, id: FeatureId) -> bool { id.index() < self.features.len() }

    /// O(1) retrieval by id.
    #[inline]
    pub fn get(&self, id: FeatureId) -> Option<&Feature> { self.features.get(id.index()) }

    /// First feature whose name matches `name`, ignoring case and surrounding spaces.
    pub fn find_by_name(&self, name: &str) -> Option<&Feature> {
        let needle = name.trim();
        self.features.iter()
            .find(|f| f.props.name().is_some_and(|n| n.eq_ignore_ascii_case(needle)))
    }

    /// Feature whose boundary contains the point (lon, lat).
    pub fn feature_at(&self, lon: f64, lat: f64) -> Option<&Feature> {
        self.index.locate(Point::new(lon, lat), |i| self.features.get(i).map(|f| &f.geometry))
            .and_then(|i| self.features.get(i))
    }

    /// Bounding rectangle of all boundaries, or `None` if nothing has a boundary.
    pub fn bounds(&self) -> Option<Rect<f64>> { self.index.bounds() }
}
