use serde::Serialize;

use crate::{feature::FeatureId, store::SelectionStore};

/// One row of the constituency sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub id: FeatureId,
    pub name: String,
    pub selected: bool,
}

/// Sidebar rows in collection order. Empty until a collection is loaded.
pub fn list_entries(store: &SelectionStore) -> Vec<ListEntry> {
    let Some(collection) = store.collection() else { return Vec::new() };

    collection.iter()
        .map(|feature| ListEntry {
            id: feature.id,
            name: feature.label(),
            selected: store.is_selected(feature.id),
        })
        .collect()
}
