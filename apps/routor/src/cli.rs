//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use rt_core::Location;

/// Shortest paths over a road network.
#[derive(Parser, Debug)]
#[command(name = "routor", version)]
#[command(about = "Route between two GPS positions over a road network")]
#[command(long_about = "Route between two GPS positions over a road network:
  routor --map bristol route 51.4966,-2.6794 51.4540,-2.5907 travel_time
  routor weights

--map is a directory holding nodes.csv and edges.csv, or an .osm.pbf extract
when built with the `osm` feature.")]
pub struct Cli {
    /// Map directory (nodes.csv + edges.csv) or OSM PBF extract
    #[arg(long, env = "ROUTOR_MAP_PATH", global = true)]
    pub map: Option<PathBuf>,

    /// Weight function used to report `travel_time`
    #[arg(long, env = "ROUTOR_TRAVEL_TIME_WEIGHT", default_value = "travel_time", global = true)]
    pub travel_time_weight: String,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate a shortest path
    Route {
        /// Start position, `latitude,longitude`
        #[arg(allow_hyphen_values = true)]
        origin: Location,

        /// End position, `latitude,longitude`
        #[arg(allow_hyphen_values = true)]
        destination: Location,

        /// Name of a registered weight function (see `routor weights`)
        weight: String,

        /// Give up after this many search expansions
        #[arg(long)]
        max_expansions: Option<usize>,
    },

    /// List the registered weight functions
    Weights,
}
