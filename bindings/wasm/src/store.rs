use std::{cell::RefCell, collections::HashMap};

use kenmap_core::{
    detail_panel, list_entries, styled_features, to_geojson, DetailPanel, FeatureId, FeatureStyle,
    SelectOutcome, SelectionChange, SelectionObserver, SelectionStore, SubscriptionId, ViewConfig,
    ViewSnapshot,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::common::{js_err, json_to_js, to_js};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureView<'a> {
    id: FeatureId,
    name: String,
    properties: &'a Map<String, Value>,
    detail: DetailPanel,
}

/// Everything a surface needs to redraw after a selection change.
///
/// The callback runs while the store is still mutably borrowed, so reading
/// the store back from inside it throws; the payload carries the new state
/// instead. Unselected styles do not depend on the selection, so the map can
/// restore `previous` from the style it already holds.
#[derive(Debug, Serialize)]
struct ChangeEvent {
    previous: Option<FeatureId>,
    current: Option<FeatureId>,
    name: Option<String>,
    detail: Option<DetailPanel>,
}

impl ChangeEvent {
    fn from_change(change: &SelectionChange<'_>) -> Self {
        Self {
            previous: change.previous,
            current: change.current_id(),
            name: change.current.map(|f| f.label()),
            detail: change.current.map(DetailPanel::for_feature),
        }
    }
}

/// Forwards selection changes to a JS callback as a [`ChangeEvent`].
struct JsObserver {
    callback: js_sys::Function,
}

impl SelectionObserver for JsObserver {
    fn selection_changed(&mut self, change: &SelectionChange<'_>) {
        let event = ChangeEvent::from_change(change);
        let Ok(payload) = to_js(&event)
            .inspect_err(|e| warn!("could not serialize selection event: {e:?}")) else { return };
        if let Err(e) = self.callback.call1(&JsValue::NULL, &payload) {
            warn!("selection callback threw: {e:?}");
        }
    }
}

#[wasm_bindgen]
pub struct WasmStore {
    inner: SelectionStore,
    config: ViewConfig,
    subscriptions: HashMap<u32, SubscriptionId>,
    next_handle: u32,
    /// Styles for every feature, valid for one store revision.
    style_cache: RefCell<Option<(u64, Vec<FeatureStyle>)>>,
}

#[wasm_bindgen]
impl WasmStore {
    /// Create an empty store. `config` is an optional partial view config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmStore, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            ViewConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_err)?
        };
        Ok(Self {
            inner: SelectionStore::new(),
            config,
            subscriptions: HashMap::new(),
            next_handle: 1,
            style_cache: RefCell::new(None),
        })
    }

    /// The configured initial view: `{ source, center, zoom, style }`.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(&self.config)
    }

    /// Load a GeoJSON document from its text. Returns the feature count.
    /// On error the previous collection and selection are kept.
    pub fn load(&mut self, text: &str) -> Result<u32, JsValue> {
        self.load_bytes(text.as_bytes())
    }

    /// Load a GeoJSON document from raw bytes (e.g. a fetched `ArrayBuffer`).
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<u32, JsValue> {
        let collection = self.inner.load(bytes).map_err(js_err)?;
        Ok(collection.len() as u32)
    }

    #[wasm_bindgen(getter)]
    pub fn loaded(&self) -> bool { self.inner.is_loaded() }

    /// Number of loaded constituencies (0 before a successful load).
    pub fn len(&self) -> u32 {
        self.inner.collection().map_or(0, |c| c.len() as u32)
    }

    /// Select by id. Returns true only if the selection changed.
    pub fn select(&mut self, id: u32) -> bool {
        self.inner.select(FeatureId(id)).is_changed()
    }

    /// Select whatever constituency covers the clicked point; returns its id.
    pub fn select_at(&mut self, lng: f64, lat: f64) -> Option<u32> {
        match self.inner.select_at(lng, lat) {
            SelectOutcome::Rejected(_) => None,
            _ => self.inner.current_selection().map(|id| id.0),
        }
    }

    pub fn select_by_name(&mut self, name: &str) -> Option<u32> {
        match self.inner.select_by_name(name) {
            SelectOutcome::Rejected(_) => None,
            _ => self.inner.current_selection().map(|id| id.0),
        }
    }

    pub fn clear(&mut self) -> bool { self.inner.clear() }

    pub fn current_selection(&self) -> Option<u32> {
        self.inner.current_selection().map(|id| id.0)
    }

    /// Bumped on every load and every effective selection change.
    pub fn revision(&self) -> f64 { self.inner.revision() as f64 }

    /// `{ id, name, properties, detail }` for one constituency, or undefined.
    pub fn lookup(&self, id: u32) -> Result<JsValue, JsValue> {
        let Some(feature) = self.inner.lookup(FeatureId(id)) else { return Ok(JsValue::UNDEFINED) };
        to_js(&FeatureView {
            id: feature.id,
            name: feature.label(),
            properties: &feature.raw_props,
            detail: DetailPanel::for_feature(feature),
        })
    }

    /// Map style for one constituency, or undefined if the id is unknown.
    ///
    /// Meant as the widget's per-feature style callback: all styles are
    /// computed once per revision, so a full repaint stays linear.
    pub fn style(&self, id: u32) -> Result<JsValue, JsValue> {
        let revision = self.inner.revision();
        let mut cache = self.style_cache.borrow_mut();
        if cache.as_ref().is_none_or(|(cached, _)| *cached != revision) {
            let styles = styled_features(&self.inner, &self.config.style)
                .into_iter()
                .map(|styled| styled.style)
                .collect();
            *cache = Some((revision, styles));
        }

        match cache.as_ref().and_then(|(_, styles)| styles.get(id as usize)) {
            Some(style) => to_js(style),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// `[{ id, selected, style }]` for every constituency, in id order.
    pub fn styles(&self) -> Result<JsValue, JsValue> {
        to_js(&styled_features(&self.inner, &self.config.style))
    }

    /// The loaded collection as GeoJSON, each feature carrying its `id`.
    pub fn to_geojson(&self) -> Result<JsValue, JsValue> {
        let collection = self.inner.collection()
            .ok_or_else(|| js_err("[to_geojson] No constituencies loaded"))?;
        json_to_js(&to_geojson(collection))
    }

    pub fn list(&self) -> Result<JsValue, JsValue> {
        to_js(&list_entries(&self.inner))
    }

    /// Detail panel for the selection, or undefined when nothing is selected.
    pub fn detail(&self) -> Result<JsValue, JsValue> {
        match detail_panel(&self.inner) {
            Some(panel) => to_js(&panel),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Map styles, list and detail panel captured at one revision.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&ViewSnapshot::capture(&self.inner, &self.config.style))
    }

    /// Call `callback({ previous, current, name, detail })` after every selection change.
    ///
    /// The callback runs synchronously inside `select`/`clear`/`load` and must
    /// not call back into this store; everything it needs is in the event.
    /// Defer other reads (e.g. `snapshot()`) with `queueMicrotask`.
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.inner.subscribe(JsObserver { callback });
        let handle = self.next_handle;
        self.next_handle += 1;
        self.subscriptions.insert(handle, id);
        handle
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        self.subscriptions.remove(&handle)
            .is_some_and(|id| self.inner.unsubscribe(id))
    }
}
