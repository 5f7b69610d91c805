use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::MissingFieldError;

/// Source field names, as they appear in the constituency document.
pub const NAME_FIELD: &str = "Constituency";
pub const TOTAL_FIELD: &str = "Total";
pub const MALE_FIELD: &str = "Male";
pub const FEMALE_FIELD: &str = "Female";
pub const HOUSEHOLDS_FIELD: &str = "Households";
pub const AREA_FIELD: &str = "Area in Sq. Km.";
pub const DENSITY_FIELD: &str = "Density";

/// Descriptive properties of a single constituency.
///
/// Every field is optional: the document is not validated, and an absent or
/// unparseable value is simply `None`. Numeric fields accept JSON numbers as
/// well as numeric strings such as `"12,345"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConstituencyProps {
    #[serde(rename = "Constituency", default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(rename = "Total", default, deserialize_with = "lenient_number")]
    pub total: Option<f64>,
    #[serde(rename = "Male", default, deserialize_with = "lenient_number")]
    pub male: Option<f64>,
    #[serde(rename = "Female", default, deserialize_with = "lenient_number")]
    pub female: Option<f64>,
    #[serde(rename = "Households", default, deserialize_with = "lenient_number")]
    pub households: Option<f64>,
    #[serde(rename = "Area in Sq. Km.", default, deserialize_with = "lenient_number")]
    pub area_km2: Option<f64>,
    #[serde(rename = "Density", default, deserialize_with = "lenient_density")]
    pub density: Option<Density>,
}

/// Population density as published: usually a number, sometimes free text.
#[derive(Debug, Clone, PartialEq)]
pub enum Density {
    Number(f64),
    Text(String),
}

impl Density {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Density::Number(v) => Some(*v),
            Density::Text(_) => None,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Density::Number(v) => write!(f, "{}", crate::stats::format_decimal(*v, 2)),
            Density::Text(s) => write!(f, "{s}"),
        }
    }
}

impl ConstituencyProps {
    /// Read the known fields out of a GeoJSON `properties` value.
    /// Anything that is not an object yields an empty record.
    pub fn from_json(value: &Value) -> Self {
        if !value.is_object() { return Self::default() }
        Self::deserialize(value).unwrap_or_default()
    }

    /// Name for display; constituencies without one are labelled by id upstream.
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// Expected fields absent from this record, in source field order.
    pub fn missing(&self) -> Vec<MissingFieldError> {
        let present = [
            (NAME_FIELD, self.name.is_some()),
            (TOTAL_FIELD, self.total.is_some()),
            (MALE_FIELD, self.male.is_some()),
            (FEMALE_FIELD, self.female.is_some()),
            (HOUSEHOLDS_FIELD, self.households.is_some()),
            (AREA_FIELD, self.area_km2.is_some()),
            (DENSITY_FIELD, self.density.is_some()),
        ];
        present.into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(field, _)| MissingFieldError { field })
            .collect()
    }
}

/// Parse a numeric string, tolerating thousands separators and padding.
fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars()
        .filter(|c| !matches!(c, ',' | '_') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() { return None }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_density<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Density>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(_) => number_from_value(&value).map(Density::Number),
        Value::String(s) => match parse_number(s) {
            Some(v) => Some(Density::Number(v)),
            None if !s.trim().is_empty() => Some(Density::Text(s.trim().to_string())),
            None => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_all_fields() {
        let props = ConstituencyProps::from_json(&json!({
            "Constituency": "Westlands",
            "Total": 309164,
            "Male": 153818,
            "Female": 155337,
            "Households": 116011,
            "Area in Sq. Km.": 97.6,
            "Density": 3169,
        }));

        assert_eq!(props.name(), Some("Westlands"));
        assert_eq!(props.total, Some(309164.0));
        assert_eq!(props.male, Some(153818.0));
        assert_eq!(props.female, Some(155337.0));
        assert_eq!(props.households, Some(116011.0));
        assert_eq!(props.area_km2, Some(97.6));
        assert_eq!(props.density, Some(Density::Number(3169.0)));
        assert!(props.missing().is_empty());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let props = ConstituencyProps::from_json(&json!({
            "Total": "12,345",
            "Area in Sq. Km.": " 4.5 ",
            "Density": "2,743",
        }));
        assert_eq!(props.total, Some(12345.0));
        assert_eq!(props.area_km2, Some(4.5));
        assert_eq!(props.density, Some(Density::Number(2743.0)));
    }

    #[test]
    fn textual_density_is_kept_as_text() {
        let props = ConstituencyProps::from_json(&json!({ "Density": "n/a (urban)" }));
        assert_eq!(props.density, Some(Density::Text("n/a (urban)".into())));
        assert_eq!(props.density.as_ref().and_then(Density::as_f64), None);
    }

    #[test]
    fn garbage_values_become_none() {
        let props = ConstituencyProps::from_json(&json!({
            "Constituency": null,
            "Total": { "nested": true },
            "Male": [1, 2],
            "Female": "many",
            "Households": false,
        }));
        assert_eq!(props.name, None);
        assert_eq!(props.total, None);
        assert_eq!(props.male, None);
        assert_eq!(props.female, None);
        assert_eq!(props.households, None);
    }

    #[test]
    fn non_object_properties_are_empty() {
        assert_eq!(ConstituencyProps::from_json(&Value::Null), ConstituencyProps::default());
        assert_eq!(ConstituencyProps::from_json(&json!(["Westlands", 1])), ConstituencyProps::default());
    }

    #[test]
    fn missing_lists_absent_fields_in_order() {
        let props = ConstituencyProps::from_json(&json!({ "Constituency": "Lari", "Total": 1 }));
        let fields: Vec<_> = props.missing().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![MALE_FIELD, FEMALE_FIELD, HOUSEHOLDS_FIELD, AREA_FIELD, DENSITY_FIELD]);
    }

    #[test]
    fn parse_number_rejects_empty_and_non_finite() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("  "), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1_000"), Some(1000.0));
    }
}
