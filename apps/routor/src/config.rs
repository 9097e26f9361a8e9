//! Runtime settings, logging, and map loading.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::LevelFilter;

use rt_graph::RoadGraph;
use rt_routing::{TurnPenalty, WeightRegistry};

use crate::cli::Cli;

/// Options shared by every subcommand, resolved from flags and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub map:                Option<PathBuf>,
    pub travel_time_weight: String,
    pub log_level:          Option<LevelFilter>,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            map:                cli.map.clone(),
            travel_time_weight: cli.travel_time_weight.clone(),
            log_level:          level_for(cli.verbose),
        }
    }

    /// The configured map path, or an error naming both ways to set it.
    pub fn map_path(&self) -> Result<&Path> {
        match &self.map {
            Some(path) => Ok(path.as_path()),
            None => bail!("no map given: pass --map or set ROUTOR_MAP_PATH"),
        }
    }
}

/// `-v` count → log level.  `None` defers to `RUST_LOG`.
pub fn level_for(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Log to stderr so stdout carries only the JSON result.
pub fn init_logging(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// The weights the CLI exposes by name.
pub fn weight_registry() -> Result<WeightRegistry> {
    let mut registry = WeightRegistry::with_defaults();
    registry.register("turn_penalty", TurnPenalty::default())?;
    Ok(registry)
}

/// Load a map from a CSV directory or, with the `osm` feature, a PBF file.
pub fn load_map(path: &Path) -> Result<RoadGraph> {
    if path.is_dir() {
        return rt_graph::load_csv_dir(path)
            .with_context(|| format!("loading CSV map from {}", path.display()));
    }
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pbf")) {
        return load_pbf(path);
    }
    bail!(
        "unsupported map {}: expected a directory with nodes.csv and edges.csv or an .osm.pbf file",
        path.display()
    )
}

#[cfg(feature = "osm")]
fn load_pbf(path: &Path) -> Result<RoadGraph> {
    rt_graph::osm::load_from_pbf(path)
        .with_context(|| format!("loading OSM extract {}", path.display()))
}

#[cfg(not(feature = "osm"))]
fn load_pbf(path: &Path) -> Result<RoadGraph> {
    bail!("cannot read {}: routor was built without the `osm` feature", path.display())
}
