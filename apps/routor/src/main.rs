//! routor — route between two GPS positions over a road network.
//!
//! Loads a map, snaps both positions to their nearest graph nodes, searches
//! under the named weight function, and prints the route as JSON:
//!
//! ```text
//! $ routor --map bristol route 51.4966,-2.6794 51.4540,-2.5907 travel_time
//! {
//!   "costs": 612.4,
//!   "length": 7421.87,
//!   "travel_time": 612.4,
//!   "path": [ { "latitude": 51.4965, "longitude": -2.6793 }, ... ]
//! }
//! ```

mod cli;
mod config;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;

use rt_routing::{Engine, SearchOptions};

use cli::{Cli, Command};
use config::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli);
    config::init_logging(settings.log_level);

    let output = run(&settings, cli.command)?;
    println!("{output}");
    Ok(())
}

/// Execute `command` and return what should go to stdout.
fn run(settings: &Settings, command: Command) -> Result<String> {
    let registry = config::weight_registry()?;

    match command {
        Command::Weights => Ok(registry.names().join("\n")),

        Command::Route { origin, destination, weight, max_expansions } => {
            // Resolve names before paying for the map load.
            let weight_fn = registry.get(&weight)?;
            let travel_time = registry
                .get(&settings.travel_time_weight)
                .context("resolving the travel-time weight")?;

            let graph = config::load_map(settings.map_path()?)?;
            let engine = Engine::new(graph)
                .with_travel_time_weight(travel_time)
                .with_search_options(SearchOptions { max_expansions, ..Default::default() });

            let route = engine
                .route(origin, destination, &*weight_fn)
                .with_context(|| format!("routing {origin} -> {destination} by {weight}"))?;
            log::info!("route has {} nodes", route.path.len());

            Ok(serde_json::to_string_pretty(&route.rounded(2))?)
        }
    }
}
