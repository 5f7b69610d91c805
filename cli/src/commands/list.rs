use std::io::Write;

use anyhow::Result;
use kenmap::{format_count, list_entries, Demographics, SelectionStore, PLACEHOLDER};

use super::{load_config, load_store};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ListArgs) -> Result<()> {
    let config = load_config(cli)?;
    let store = load_store(&config, args.source.as_ref())?;

    let mut stdout = std::io::stdout().lock();
    write_list(&mut stdout, &store, args.json)
}

fn write_list<W: Write>(out: &mut W, store: &SelectionStore, json: bool) -> Result<()> {
    let entries = list_entries(store);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    for entry in &entries {
        let population = store.lookup(entry.id)
            .and_then(|f| Demographics::from_props(&f.props).total)
            .map(format_count)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        writeln!(out, "{:>4}  {:<width$}  {:>12}", entry.id.to_string(), entry.name, population)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::fixture;
    use kenmap::{DataSource, ViewConfig};

    fn store(dir: &std::path::Path) -> SelectionStore {
        load_store(&ViewConfig::default(), Some(&DataSource::Path(fixture(dir)))).unwrap()
    }

    #[test]
    fn table_has_one_row_per_constituency() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        write_list(&mut out, &store(dir.path()), false).unwrap();

        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].trim_start().starts_with("0  Kibra"));
        assert!(rows[0].ends_with("185,777"));
        assert!(rows[1].ends_with(PLACEHOLDER));
    }

    #[test]
    fn json_lists_ids_and_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        write_list(&mut out, &store(dir.path()), true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[1]["id"], 1);
        assert_eq!(value[1]["name"], "Embakasi East");
        assert_eq!(value[1]["selected"], false);
    }
}
