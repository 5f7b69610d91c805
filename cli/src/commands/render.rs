use std::path::PathBuf;

use anyhow::Result;
use kenmap::{write_svg, SvgOptions};

use super::{apply_selection, load_config, load_store};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    if args.choropleth.is_some() {
        config.style.choropleth = args.choropleth;
    }

    let mut store = load_store(&config, args.source.as_ref())?;
    apply_selection(&mut store, &args.selection)?;

    let out_path = args.output.clone().unwrap_or_else(|| PathBuf::from("./constituencies.svg"));
    let options = SvgOptions { width: args.width, max_height: args.max_height, ..Default::default() };

    tracing::info!(path = %out_path.display(), "writing map");
    write_svg(&out_path, &store, &config.style, &options)?;

    Ok(())
}
