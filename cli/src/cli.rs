use std::path::PathBuf;

use kenmap::{DataSource, Metric};

/// Kenyan constituency map viewer (headless)
#[derive(clap::Parser, Debug)]
#[command(name = "kenmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON view config (source, center, zoom, style)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List constituencies with their ids
    List(ListArgs),

    /// Print the detail panel for one constituency
    Show(ShowArgs),

    /// Draw the constituencies as an SVG map
    Render(RenderArgs),

    /// Write the GeoJSON with ids attached
    Export(ExportArgs),
}

/// Which constituency to select, by id or by name.
#[derive(clap::Args, Debug, Default)]
pub struct Selection {
    /// Constituency id (position in the source document)
    #[arg(long, conflicts_with = "name")]
    pub id: Option<u32>,

    /// Constituency name, case-insensitive
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// GeoJSON file or http(s) URL; defaults to the config's source
    pub source: Option<DataSource>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// GeoJSON file or http(s) URL; defaults to the config's source
    pub source: Option<DataSource>,

    #[command(flatten)]
    pub selection: Selection,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// GeoJSON file or http(s) URL; defaults to the config's source
    pub source: Option<DataSource>,

    /// Output SVG file, defaults to "./constituencies.svg"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub selection: Selection,

    /// Shade by population, density, households, area or male-share
    #[arg(long)]
    pub choropleth: Option<Metric>,

    /// Image width in pixels
    #[arg(long, default_value_t = 1200.0)]
    pub width: f64,

    /// Upper bound on image height in pixels; tall maps are scaled down to fit
    #[arg(long, default_value_t = 1200.0)]
    pub max_height: f64,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// GeoJSON file or http(s) URL; defaults to the config's source
    pub source: Option<DataSource>,

    /// Output file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
