use std::io::Write;

use anyhow::{Context, Result};
use kenmap::to_geojson;

use super::{load_config, load_store};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ExportArgs) -> Result<()> {
    let config = load_config(cli)?;
    let store = load_store(&config, args.source.as_ref())?;

    let collection = store.collection()
        .context("[export] no constituencies loaded")?;
    let bytes = serde_json::to_vec(&to_geojson(collection))?;

    match &args.output {
        Some(path) => {
            tracing::info!(path = %path.display(), "writing GeoJSON");
            std::fs::write(path, &bytes)
                .with_context(|| format!("[export] failed to write {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Commands};
    use crate::commands::tests::fixture;

    #[test]
    fn exported_features_carry_ids() {
        let dir = tempfile::tempdir().unwrap();
        let source = fixture(dir.path());
        let out = dir.path().join("annotated.geojson");

        let cli = Cli::try_parse_from(["kenmap", "export", source.to_str().unwrap(), "-o", out.to_str().unwrap()]).unwrap();
        let Commands::Export(args) = &cli.command else { unreachable!() };
        super::run(&cli, args).unwrap();

        let exported: serde_json::Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        let features = exported["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        for (i, feature) in features.iter().enumerate() {
            assert_eq!(feature["properties"]["id"], i);
        }
        assert_eq!(features[0]["properties"]["Constituency"], "Kibra");
    }
}
