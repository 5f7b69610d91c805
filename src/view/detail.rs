use std::fmt;

use serde::Serialize;

use crate::{
    feature::{Density, Feature, FeatureId},
    stats::{count_or_placeholder, format_count, format_decimal, Demographics, PLACEHOLDER},
    store::SelectionStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Statistics for the selected constituency, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailPanel {
    pub id: FeatureId,
    pub title: String,
    pub rows: Vec<DetailRow>,
}

impl DetailPanel {
    pub fn for_feature(feature: &Feature) -> Self {
        let d = Demographics::from_props(&feature.props);

        let share = |count: Option<f64>, pct: Option<u32>| match (count, pct) {
            (Some(c), Some(p)) => format!("{} ({p}%)", format_count(c)),
            (count, _) => count_or_placeholder(count),
        };

        let density = match &feature.props.density {
            Some(Density::Text(text)) => text.clone(),
            _ => d.density
                .map(|v| format!("{} per km²", format_decimal(v, 2)))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        };

        let rows = vec![
            DetailRow { label: "Population", value: count_or_placeholder(d.total) },
            DetailRow { label: "Male", value: share(d.male, d.male_pct) },
            DetailRow { label: "Female", value: share(d.female, d.female_pct) },
            DetailRow { label: "Households", value: count_or_placeholder(d.households) },
            DetailRow {
                label: "Average household size",
                value: d.avg_household_size
                    .map(|v| format_decimal(v, 1))
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            },
            DetailRow {
                label: "Area",
                value: d.area_km2
                    .map(|v| format!("{} km²", format_decimal(v, 2)))
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            },
            DetailRow { label: "Density", value: density },
        ];

        Self { id: feature.id, title: feature.label(), rows }
    }

    pub fn row(&self, label: &str) -> Option<&str> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.value.as_str())
    }
}

impl fmt::Display for DetailPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (#{})", self.title, self.id)?;
        let width = self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        for row in &self.rows {
            writeln!(f, "  {:<width$}  {}", row.label, row.value)?;
        }
        Ok(())
    }
}

/// Panel for the current selection; absent when nothing is selected.
pub fn detail_panel(store: &SelectionStore) -> Option<DetailPanel> {
    store.selected_feature().map(DetailPanel::for_feature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(props: serde_json::Value) -> SelectionStore {
        let mut store = SelectionStore::new();
        store.load_value(&json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "geometry": null, "properties": props }]
        })).unwrap();
        store
    }

    #[test]
    fn absent_without_selection() {
        let store = store(json!({ "Constituency": "Lari" }));
        assert!(detail_panel(&store).is_none());
    }

    #[test]
    fn full_record() {
        let mut store = store(json!({
            "Constituency": "Sample",
            "Total": 1000,
            "Male": 520,
            "Female": 480,
            "Households": 250,
            "Area in Sq. Km.": 12.5,
            "Density": 80,
        }));
        store.select(FeatureId(0));
        let panel = detail_panel(&store).unwrap();

        assert_eq!(panel.title, "Sample");
        assert_eq!(panel.row("Population"), Some("1,000"));
        assert_eq!(panel.row("Male"), Some("520 (52%)"));
        assert_eq!(panel.row("Female"), Some("480 (48%)"));
        assert_eq!(panel.row("Households"), Some("250"));
        assert_eq!(panel.row("Average household size"), Some("4"));
        assert_eq!(panel.row("Area"), Some("12.5 km²"));
        assert_eq!(panel.row("Density"), Some("80 per km²"));
    }

    #[test]
    fn missing_fields_show_placeholder() {
        let mut store = store(json!({ "Constituency": "Sparse", "Male": 10 }));
        store.select(FeatureId(0));
        let panel = detail_panel(&store).unwrap();

        assert_eq!(panel.row("Population"), Some(PLACEHOLDER));
        assert_eq!(panel.row("Male"), Some("10"));
        assert_eq!(panel.row("Female"), Some(PLACEHOLDER));
        assert_eq!(panel.row("Area"), Some(PLACEHOLDER));
        assert_eq!(panel.row("Density"), Some(PLACEHOLDER));
    }

    #[test]
    fn text_density_is_shown_verbatim() {
        let mut store = store(json!({ "Constituency": "Odd", "Density": "not surveyed" }));
        store.select(FeatureId(0));
        assert_eq!(detail_panel(&store).unwrap().row("Density"), Some("not surveyed"));
    }

    #[test]
    fn display_lists_rows() {
        let mut store = store(json!({ "Constituency": "Sample", "Total": 1000 }));
        store.select(FeatureId(0));
        let text = detail_panel(&store).unwrap().to_string();
        assert!(text.starts_with("Sample (#0)\n"));
        assert!(text.contains("Population"));
        assert!(text.contains("1,000"));
    }
}
