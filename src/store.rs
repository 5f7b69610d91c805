use std::{fmt, sync::Arc};

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::DataLoadError,
    feature::{Feature, FeatureCollection, FeatureId},
    io::geojson::{feature_collection_from_value, parse_feature_collection},
    source::DataSource,
};

/// A selection transition, handed to observers while the store is mid-update.
#[derive(Debug, Clone, Copy)]
pub struct SelectionChange<'a> {
    pub previous: Option<FeatureId>,
    pub current: Option<&'a Feature>,
}

impl SelectionChange<'_> {
    pub fn current_id(&self) -> Option<FeatureId> { self.current.map(|f| f.id) }
}

/// A display surface that wants to hear about store updates.
///
/// Callbacks run synchronously inside the mutating call, so by the time
/// `select` returns every surface has seen the new state.
pub trait SelectionObserver {
    fn collection_loaded(&mut self, _collection: &Arc<FeatureCollection>) {}

    fn selection_changed(&mut self, change: &SelectionChange<'_>);
}

impl<F: FnMut(&SelectionChange<'_>)> SelectionObserver for F {
    fn selection_changed(&mut self, change: &SelectionChange<'_>) { self(change) }
}

/// Handle returned by [`SelectionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// No collection has been loaded yet (or the load failed).
    NotLoaded,
    /// The id is outside the loaded collection.
    UnknownId(FeatureId),
    /// No constituency carries this name.
    UnknownName(String),
    /// The point is outside every boundary.
    NoFeatureAt { lon: f64, lat: f64 },
}

/// What a select call did.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Changed { previous: Option<FeatureId>, current: FeatureId },
    /// The feature was already selected.
    Unchanged,
    /// Nothing changed; the previous selection is kept.
    Rejected(RejectReason),
}

impl SelectOutcome {
    #[inline] pub fn is_changed(&self) -> bool { matches!(self, SelectOutcome::Changed { .. }) }
}

/// Single source of truth for the loaded constituencies and the current selection.
///
/// The map, the list and the detail panel all read from here, so they cannot
/// disagree about which constituency is selected.
#[derive(Default)]
pub struct SelectionStore {
    collection: Option<Arc<FeatureCollection>>,
    selected: Option<FeatureId>,
    revision: u64,
    observers: Vec<(SubscriptionId, Box<dyn SelectionObserver>)>,
    next_subscription: u64,
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("features", &self.collection.as_ref().map(|c| c.len()))
            .field("selected", &self.selected)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl SelectionStore {
    pub fn new() -> Self { Self::default() }

    /// Parse a raw GeoJSON document and install it as the current collection.
    ///
    /// On failure the store is left exactly as it was.
    pub fn load(&mut self, raw: &[u8]) -> Result<Arc<FeatureCollection>, DataLoadError> {
        let collection = parse_feature_collection(raw)
            .inspect_err(|e| warn!(error = %e, "constituency load failed"))?;
        Ok(self.install(collection))
    }

    /// Same as [`load`](Self::load) for an already-decoded JSON document.
    pub fn load_value(&mut self, raw: &Value) -> Result<Arc<FeatureCollection>, DataLoadError> {
        let collection = feature_collection_from_value(raw)
            .inspect_err(|e| warn!(error = %e, "constituency load failed"))?;
        Ok(self.install(collection))
    }

    /// Fetch the document from `source`, then load it.
    pub fn load_from(&mut self, source: &DataSource) -> Result<Arc<FeatureCollection>, DataLoadError> {
        let bytes = source.fetch()
            .inspect_err(|e| warn!(source = %source, error = %e, "constituency fetch failed"))?;
        self.load(&bytes)
    }

    /// Install a parsed collection, replacing any previous one.
    /// Ids are positional, so the old selection is dropped.
    pub fn install(&mut self, collection: FeatureCollection) -> Arc<FeatureCollection> {
        let collection = Arc::new(collection);
        let previous = self.selected.take();

        debug!(features = collection.len(), "constituencies loaded");
        for feature in collection.iter() {
            for missing in feature.props.missing() {
                debug!(id = %feature.id, "{missing}");
            }
        }

        self.collection = Some(collection.clone());
        self.revision += 1;

        for (_, observer) in &mut self.observers {
            observer.collection_loaded(&collection);
        }
        if previous.is_some() {
            let change = SelectionChange { previous, current: None };
            notify(&mut self.observers, &change);
        }

        collection
    }

    /// Make `id` the selected constituency, replacing any previous selection.
    ///
    /// Selecting the already-selected feature is a no-op (never a toggle). An id
    /// outside the loaded collection, or any id before a load, is ignored with a
    /// warning and the previous selection stays.
    pub fn select(&mut self, id: FeatureId) -> SelectOutcome {
        let Some(collection) = self.collection.as_deref() else {
            warn!(id = %id, "select ignored: no constituencies loaded");
            return SelectOutcome::Rejected(RejectReason::NotLoaded);
        };
        let Some(feature) = collection.get(id) else {
            warn!(id = %id, features = collection.len(), "select ignored: no such constituency");
            return SelectOutcome::Rejected(RejectReason::UnknownId(id));
        };
        if self.selected == Some(id) {
            return SelectOutcome::Unchanged;
        }

        let previous = self.selected.replace(id);
        self.revision += 1;
        debug!(id = %id, name = feature.props.name().unwrap_or_default(), "selected");

        let change = SelectionChange { previous, current: Some(feature) };
        notify(&mut self.observers, &change);

        SelectOutcome::Changed { previous, current: id }
    }

    /// Select the constituency under a map click at (lon, lat).
    /// Clicking outside every boundary leaves the selection alone.
    pub fn select_at(&mut self, lon: f64, lat: f64) -> SelectOutcome {
        let Some(collection) = self.collection.as_deref() else {
            return SelectOutcome::Rejected(RejectReason::NotLoaded);
        };
        match collection.feature_at(lon, lat).map(|f| f.id) {
            Some(id) => self.select(id),
            None => {
                debug!(lon, lat, "click outside every constituency");
                SelectOutcome::Rejected(RejectReason::NoFeatureAt { lon, lat })
            }
        }
    }

    /// Select by constituency name, ignoring case.
    pub fn select_by_name(&mut self, name: &str) -> SelectOutcome {
        let Some(collection) = self.collection.as_deref() else {
            return SelectOutcome::Rejected(RejectReason::NotLoaded);
        };
        match collection.find_by_name(name).map(|f| f.id) {
            Some(id) => self.select(id),
            None => {
                warn!(name, "select ignored: no constituency with that name");
                SelectOutcome::Rejected(RejectReason::UnknownName(name.to_string()))
            }
        }
    }

    /// Drop the selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let Some(previous) = self.selected.take() else { return false };
        self.revision += 1;

        let change = SelectionChange { previous: Some(previous), current: None };
        notify(&mut self.observers, &change);
        true
    }

    #[inline] pub fn current_selection(&self) -> Option<FeatureId> { self.selected }

    #[inline] pub fn is_selected(&self, id: FeatureId) -> bool { self.selected == Some(id) }

    #[inline] pub fn is_loaded(&self) -> bool { self.collection.is_some() }

    /// O(1) lookup in the loaded collection.
    pub fn lookup(&self, id: FeatureId) -> Option<&Feature> {
        self.collection.as_deref().and_then(|c| c.get(id))
    }

    pub fn selected_feature(&self) -> Option<&Feature> {
        self.selected.and_then(|id| self.lookup(id))
    }

    pub fn collection(&self) -> Option<&Arc<FeatureCollection>> { self.collection.as_ref() }

    /// Bumped on every effective change (load, select, clear).
    #[inline] pub fn revision(&self) -> u64 { self.revision }

    /// Register a surface. It is told about future changes only.
    pub fn subscribe(&mut self, observer: impl SelectionObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Detach a surface, e.g. when its view is torn down.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }
}

fn notify(observers: &mut [(SubscriptionId, Box<dyn SelectionObserver>)], change: &SelectionChange<'_>) {
    for (_, observer) in observers {
        observer.selection_changed(change);
    }
}
