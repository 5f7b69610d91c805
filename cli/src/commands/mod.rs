pub mod export;
pub mod list;
pub mod render;
pub mod show;

use anyhow::{bail, Context, Result};
use kenmap::{DataSource, RejectReason, SelectOutcome, SelectionStore, ViewConfig};

use crate::cli::{Cli, Selection};

/// Config file (if any) plus environment.
pub(crate) fn load_config(cli: &Cli) -> Result<ViewConfig> {
    let config = match &cli.config {
        Some(path) => ViewConfig::from_file(path)?,
        None => ViewConfig::default(),
    };
    Ok(config.with_env())
}

/// Fetch and load the constituencies, preferring the source given on the command line.
pub(crate) fn load_store(config: &ViewConfig, source: Option<&DataSource>) -> Result<SelectionStore> {
    let source = source.unwrap_or(&config.source);
    tracing::info!(%source, "loading constituencies");

    let mut store = SelectionStore::new();
    let collection = store.load_from(source)
        .with_context(|| format!("[load] could not load constituencies from {source}"))?;
    tracing::info!(features = collection.len(), "loaded");

    Ok(store)
}

/// Apply `--id` / `--name`. Returns false if neither was given.
pub(crate) fn apply_selection(store: &mut SelectionStore, selection: &Selection) -> Result<bool> {
    let outcome = match (selection.id, &selection.name) {
        (Some(id), _) => store.select(id.into()),
        (None, Some(name)) => store.select_by_name(name),
        (None, None) => return Ok(false),
    };

    match outcome {
        SelectOutcome::Changed { .. } | SelectOutcome::Unchanged => Ok(true),
        SelectOutcome::Rejected(RejectReason::UnknownId(id)) => {
            let len = store.collection().map(|c| c.len()).unwrap_or(0);
            bail!("[select] no constituency with id {id} (ids run 0..{len})")
        }
        SelectOutcome::Rejected(RejectReason::UnknownName(name)) => {
            bail!("[select] no constituency named {name:?}")
        }
        SelectOutcome::Rejected(reason) => bail!("[select] selection rejected: {reason:?}"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use kenmap::FeatureId;
    use std::path::{Path, PathBuf};

    /// Two side-by-side squares, the second without census figures.
    pub(crate) fn fixture(dir: &Path) -> PathBuf {
        let path = dir.join("constituencies.geojson");
        std::fs::write(&path, r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Polygon", "coordinates": [[[36.7, -1.4], [36.8, -1.4], [36.8, -1.3], [36.7, -1.3], [36.7, -1.4]]] },
                    "properties": { "Constituency": "Kibra", "Total": 185777 }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "Polygon", "coordinates": [[[36.8, -1.4], [36.9, -1.4], [36.9, -1.3], [36.8, -1.3], [36.8, -1.4]]] },
                    "properties": { "Constituency": "Embakasi East" }
                }
            ]
        }"#).unwrap();
        path
    }

    fn store() -> (tempfile::TempDir, SelectionStore) {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::Path(fixture(dir.path()));
        let store = load_store(&ViewConfig::default(), Some(&source)).unwrap();
        (dir, store)
    }

    #[test]
    fn selects_by_id_and_name() {
        let (_dir, mut store) = store();

        let by_id = Selection { id: Some(1), name: None };
        assert!(apply_selection(&mut store, &by_id).unwrap());
        assert_eq!(store.current_selection(), Some(FeatureId(1)));

        let by_name = Selection { id: None, name: Some("kibra".into()) };
        assert!(apply_selection(&mut store, &by_name).unwrap());
        assert_eq!(store.current_selection(), Some(FeatureId(0)));
    }

    #[test]
    fn no_selection_flags_is_not_an_error() {
        let (_dir, mut store) = store();
        assert!(!apply_selection(&mut store, &Selection::default()).unwrap());
    }

    #[test]
    fn unknown_id_is_reported() {
        let (_dir, mut store) = store();
        let err = apply_selection(&mut store, &Selection { id: Some(5), name: None }).unwrap_err();
        assert!(err.to_string().contains("no constituency with id 5"));
    }

    #[test]
    fn missing_source_is_reported() {
        let source = DataSource::Path("definitely/not/here.geojson".into());
        let err = load_store(&ViewConfig::default(), Some(&source)).unwrap_err();
        assert!(err.to_string().contains("[load]"));
    }
}
