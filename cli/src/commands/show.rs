use anyhow::{anyhow, Result};
use kenmap::detail_panel;

use super::{apply_selection, load_config, load_store};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ShowArgs) -> Result<()> {
    let config = load_config(cli)?;
    let mut store = load_store(&config, args.source.as_ref())?;

    if !apply_selection(&mut store, &args.selection)? {
        return Err(anyhow!("[show] pass --id or --name to pick a constituency"));
    }

    let panel = detail_panel(&store)
        .ok_or_else(|| anyhow!("[show] nothing selected"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&panel)?);
    } else {
        print!("{panel}");
    }

    Ok(())
}
