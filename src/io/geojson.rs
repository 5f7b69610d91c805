use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};

use crate::{error::DataLoadError, feature::FeatureCollection};

/// Parse a GeoJSON FeatureCollection document into constituencies.
/// Features keep their source order; that order becomes their id.
pub fn parse_feature_collection(bytes: &[u8]) -> Result<FeatureCollection, DataLoadError> {
    let value: Value = serde_json::from_slice(bytes)?;
    feature_collection_from_value(&value)
}

/// Same as [`parse_feature_collection`] for an already-decoded JSON value.
pub fn feature_collection_from_value(value: &Value) -> Result<FeatureCollection, DataLoadError> {
    let obj = value.as_object()
        .ok_or_else(|| DataLoadError::Malformed("top-level value is not an object".into()))?;

    if let Some(ty) = obj.get("type").and_then(Value::as_str) {
        if ty != "FeatureCollection" {
            return Err(DataLoadError::Malformed(format!("expected type FeatureCollection, found {ty:?}")));
        }
    }

    let features = obj.get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| DataLoadError::Malformed("missing \"features\" array".into()))?;

    let mut parts = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let feature = feature.as_object()
            .ok_or_else(|| DataLoadError::feature(index, "feature is not an object"))?;

        let geometry = match feature.get("geometry") {
            None | Some(Value::Null) => MultiPolygon(Vec::new()),
            Some(geometry) => parse_geometry(geometry).map_err(|reason| DataLoadError::feature(index, reason))?,
        };

        let props = match feature.get("properties") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        parts.push((geometry, props));
    }

    Ok(FeatureCollection::from_parts(parts))
}

/// Convert a GeoJSON geometry object into a MultiPolygon.
/// Polygons are promoted; geometry collections are flattened.
fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>, String> {
    let ty = geometry["type"].as_str()
        .ok_or_else(|| "geometry has no type".to_string())?;

    match ty {
        "Polygon" => {
            let rings = coordinates(geometry)?;
            Ok(MultiPolygon(vec![parse_polygon_coords(rings)?]))
        }
        "MultiPolygon" => {
            let polygons = coordinates(geometry)?.iter()
                .map(|poly| {
                    let rings = poly.as_array().ok_or_else(|| "polygon is not an array".to_string())?;
                    parse_polygon_coords(rings)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MultiPolygon(polygons))
        }
        "GeometryCollection" => {
            let members = geometry["geometries"].as_array()
                .ok_or_else(|| "GeometryCollection has no geometries array".to_string())?;
            let mut polygons = Vec::new();
            for member in members {
                polygons.extend(parse_geometry(member)?.0);
            }
            Ok(MultiPolygon(polygons))
        }
        other => Err(format!("unsupported geometry type {other:?}; expected Polygon or MultiPolygon")),
    }
}

fn coordinates(geometry: &Value) -> Result<&Vec<Value>, String> {
    geometry["coordinates"].as_array()
        .ok_or_else(|| "geometry has no coordinates array".to_string())
}

/// Parse polygon coordinates: `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>, String> {
    let mut rings = rings.iter().map(|ring| {
        let ring = ring.as_array().ok_or_else(|| "ring is not an array".to_string())?;
        parse_ring_coords(ring)
    });

    let exterior = rings.next()
        .ok_or_else(|| "polygon has no exterior ring".to_string())??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from GeoJSON coordinates: `[[x, y], [x, y], ...]`.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>, String> {
    let mut points = Vec::with_capacity(coords.len() + 1);

    for position in coords {
        let position = position.as_array()
            .filter(|p| p.len() >= 2)
            .ok_or_else(|| "position must be an array of at least two numbers".to_string())?;
        let x = position[0].as_f64().ok_or_else(|| "longitude must be a number".to_string())?;
        let y = position[1].as_f64().ok_or_else(|| "latitude must be a number".to_string())?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }

    Ok(LineString(points))
}

/// Export the collection as a GeoJSON FeatureCollection.
/// Each feature carries its id both as the GeoJSON `id` and as `properties.id`;
/// all source properties pass through untouched.
pub fn to_geojson(collection: &FeatureCollection) -> Value {
    let features: Vec<Value> = collection.iter()
        .map(|feature| {
            let mut properties = feature.raw_props.clone();
            properties.insert("id".to_string(), json!(feature.id.0));

            json!({
                "type": "Feature",
                "id": feature.id.0,
                "geometry": multipolygon_to_geojson(&feature.geometry),
                "properties": properties,
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Convert a MultiPolygon to a GeoJSON MultiPolygon geometry value.
fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let ring = |ls: &LineString<f64>| -> Vec<[f64; 2]> {
        ls.coords().map(|c| [c.x, c.y]).collect()
    };

    let polygons: Vec<Vec<Vec<[f64; 2]>>> = mp.0.iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(ring)
                .collect()
        })
        .collect();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}
