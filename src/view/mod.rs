//! Read-only surfaces over the selection store: map styles, the sidebar list
//! and the detail panel.

mod color;
mod detail;
mod list;
mod style;

use serde::Serialize;

pub use color::{ColorRamp, Rgb};
pub use detail::{detail_panel, DetailPanel, DetailRow};
pub use list::{list_entries, ListEntry};
pub use style::{feature_style, FeatureStyle, Metric, StyleConfig, StylePainter};

use crate::{feature::FeatureId, store::SelectionStore};

/// Map paint for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledFeature {
    pub id: FeatureId,
    pub selected: bool,
    pub style: FeatureStyle,
}

/// Map paint for every loaded feature, in id order, from a single painter.
pub fn styled_features(store: &SelectionStore, config: &StyleConfig) -> Vec<StyledFeature> {
    let Some(collection) = store.collection() else { return Vec::new() };
    let painter = StylePainter::new(store, config);

    collection.iter()
        .map(|feature| StyledFeature {
            id: feature.id,
            selected: painter.is_selected(feature),
            style: painter.style(feature),
        })
        .collect()
}

/// All three surfaces captured from one store state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub revision: u64,
    pub selected: Option<FeatureId>,
    pub map: Vec<StyledFeature>,
    pub list: Vec<ListEntry>,
    pub detail: Option<DetailPanel>,
}

impl ViewSnapshot {
    pub fn capture(store: &SelectionStore, config: &StyleConfig) -> Self {
        Self {
            revision: store.revision(),
            selected: store.current_selection(),
            map: styled_features(store, config),
            list: list_entries(store),
            detail: detail_panel(store),
        }
    }

    /// Whether map, list and panel all name the same single selection.
    pub fn is_consistent(&self) -> bool {
        let highlighted: Vec<_> = self.map.iter().filter(|f| f.selected).map(|f| f.id).collect();
        let listed: Vec<_> = self.list.iter().filter(|e| e.selected).map(|e| e.id).collect();
        let expected: Vec<_> = self.selected.into_iter().collect();

        highlighted == expected
            && listed == expected
            && self.detail.as_ref().map(|d| d.id) == self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> SelectionStore {
        let feature = |name: &str| json!({
            "type": "Feature",
            "geometry": null,
            "properties": { "Constituency": name, "Total": 1000, "Male": 520, "Female": 480 }
        });
        let mut store = SelectionStore::new();
        store.load_value(&json!({
            "type": "FeatureCollection",
            "features": [feature("A"), feature("B"), feature("C")]
        })).unwrap();
        store
    }

    #[test]
    fn empty_store_renders_nothing() {
        let snapshot = ViewSnapshot::capture(&SelectionStore::new(), &StyleConfig::default());
        assert!(snapshot.map.is_empty());
        assert!(snapshot.list.is_empty());
        assert!(snapshot.detail.is_none());
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn surfaces_agree_through_a_click_sequence() {
        let mut store = store();
        let config = StyleConfig::default();

        for id in [0, 1, 1, 7, 2, 0] {
            store.select(FeatureId(id));
            let snapshot = ViewSnapshot::capture(&store, &config);
            assert!(snapshot.is_consistent(), "inconsistent after select({id}): {snapshot:?}");
        }

        let snapshot = ViewSnapshot::capture(&store, &config);
        assert_eq!(snapshot.selected, Some(FeatureId(0)));
        assert_eq!(snapshot.detail.map(|d| d.title), Some("A".to_string()));
    }

    #[test]
    fn switching_selection_leaves_one_selected() {
        let mut store = store();
        let config = StyleConfig::default();
        store.select(FeatureId(0));
        store.select(FeatureId(1));

        let snapshot = ViewSnapshot::capture(&store, &config);
        assert_eq!(snapshot.map.iter().filter(|f| f.selected).count(), 1);
        assert_eq!(snapshot.list.iter().filter(|e| e.selected).count(), 1);
        assert_eq!(snapshot.map[1].style, FeatureStyle::highlight());
        assert_eq!(snapshot.detail.as_ref().and_then(|d| d.row("Male")), Some("520 (52%)"));
    }

    #[test]
    fn batch_styles_match_single_lookups() {
        let mut store = store();
        store.select(FeatureId(2));
        let config = StyleConfig { choropleth: Some(Metric::Population), ..Default::default() };

        let styled = styled_features(&store, &config);
        assert_eq!(styled.len(), 3);
        for entry in &styled {
            let feature = store.lookup(entry.id).unwrap();
            assert_eq!(entry.style, feature_style(&store, &config, feature));
        }
        assert!(styled[2].selected);
    }

    #[test]
    fn tampered_snapshot_is_inconsistent() {
        let mut store = store();
        store.select(FeatureId(1));
        let mut snapshot = ViewSnapshot::capture(&store, &StyleConfig::default());
        snapshot.list[0].selected = true;
        assert!(!snapshot.is_consistent());
    }
}
