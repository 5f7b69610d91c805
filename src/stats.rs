//! Figures derived from a constituency's published counts.

use crate::{error::MissingFieldError, feature::ConstituencyProps};

/// Shown wherever a value is missing from the source record.
pub const PLACEHOLDER: &str = "N/A";

/// Derived demographic figures for one constituency.
#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    pub total: Option<f64>,
    pub male: Option<f64>,
    pub female: Option<f64>,
    /// Share of `total`, rounded to whole percent.
    pub male_pct: Option<u32>,
    pub female_pct: Option<u32>,
    pub households: Option<f64>,
    /// People per household, one decimal.
    pub avg_household_size: Option<f64>,
    pub area_km2: Option<f64>,
    /// Published density if numeric, otherwise `total / area`.
    pub density: Option<f64>,
    missing: Vec<MissingFieldError>,
}

impl Demographics {
    pub fn from_props(props: &ConstituencyProps) -> Self {
        let total = props.total;
        let density = props.density.as_ref()
            .and_then(|d| d.as_f64())
            .or_else(|| ratio(total, props.area_km2));

        Self {
            total,
            male: props.male,
            female: props.female,
            male_pct: percent(props.male, total),
            female_pct: percent(props.female, total),
            households: props.households,
            avg_household_size: ratio(total, props.households).map(|v| (v * 10.0).round() / 10.0),
            area_km2: props.area_km2,
            density,
            missing: props.missing(),
        }
    }

    /// Expected source fields that were absent.
    pub fn missing(&self) -> &[MissingFieldError] { &self.missing }
}

/// `part / whole` as a rounded whole percentage; `None` for a missing or zero whole.
pub fn percent(part: Option<f64>, whole: Option<f64>) -> Option<u32> {
    ratio(part.map(|p| p * 100.0), whole)
        .filter(|r| *r >= 0.0)
        .map(|r| r.round() as u32)
}

fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d).filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Format a count with thousands separators: `1234567` -> `"1,234,567"`.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 { out.push('-') }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 { out.push(',') }
        out.push(ch);
    }
    out
}

/// Format with separators and at most `places` decimals, trailing zeros dropped.
pub fn format_decimal(value: f64, places: usize) -> String {
    let fixed = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let int_value: f64 = int_part.parse().unwrap_or(0.0);
    let mut out = format_count(int_value);
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Render an optional count, or the placeholder.
pub fn count_or_placeholder(value: Option<f64>) -> String {
    value.map(format_count).unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn demographics(value: serde_json::Value) -> Demographics {
        Demographics::from_props(&ConstituencyProps::from_json(&value))
    }

    #[test]
    fn sex_split_rounds_to_whole_percent() {
        let d = demographics(json!({ "Total": 1000, "Male": 520, "Female": 480 }));
        assert_eq!(d.male_pct, Some(52));
        assert_eq!(d.female_pct, Some(48));
    }

    #[test]
    fn sex_split_rounds_half_up() {
        let d = demographics(json!({ "Total": 200, "Male": 101, "Female": 99 }));
        assert_eq!(d.male_pct, Some(51)); // 50.5
        assert_eq!(d.female_pct, Some(50)); // 49.5
    }

    #[test]
    fn zero_or_missing_total_has_no_percentages() {
        let d = demographics(json!({ "Total": 0, "Male": 0, "Female": 0 }));
        assert_eq!(d.male_pct, None);
        assert_eq!(d.female_pct, None);

        let d = demographics(json!({ "Male": 10 }));
        assert_eq!(d.male_pct, None);
    }

    #[test]
    fn density_prefers_published_value() {
        let d = demographics(json!({ "Total": 1000, "Area in Sq. Km.": 10, "Density": 150 }));
        assert_eq!(d.density, Some(150.0));
    }

    #[test]
    fn density_falls_back_to_total_over_area() {
        let d = demographics(json!({ "Total": 1000, "Area in Sq. Km.": 8 }));
        assert_eq!(d.density, Some(125.0));

        let d = demographics(json!({ "Total": 1000, "Area in Sq. Km.": 8, "Density": "unknown" }));
        assert_eq!(d.density, Some(125.0));
    }

    #[test]
    fn average_household_size_has_one_decimal() {
        let d = demographics(json!({ "Total": 1000, "Households": 300 }));
        assert_eq!(d.avg_household_size, Some(3.3));
    }

    #[test]
    fn missing_fields_are_reported_not_fatal() {
        let d = demographics(json!({ "Constituency": "Lari" }));
        assert_eq!(d.total, None);
        assert_eq!(d.missing().len(), 6);
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(309164.0), "309,164");
        assert_eq!(format_count(1234567.4), "1,234,567");
        assert_eq!(format_count(-4500.0), "-4,500");
    }

    #[test]
    fn format_decimal_trims_zeros() {
        assert_eq!(format_decimal(97.6, 2), "97.6");
        assert_eq!(format_decimal(3169.0, 2), "3,169");
        assert_eq!(format_decimal(1234.567, 2), "1,234.57");
        assert_eq!(format_decimal(-0.001, 2), "0");
        assert_eq!(format_decimal(-2.5, 1), "-2.5");
    }

    #[test]
    fn placeholder_for_missing_count() {
        assert_eq!(count_or_placeholder(None), PLACEHOLDER);
        assert_eq!(count_or_placeholder(Some(1500.0)), "1,500");
    }
}
