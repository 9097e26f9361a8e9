//! Tests for the routor binary: argument parsing, settings, and whole runs
//! against a small CSV map in a temp directory.

#[cfg(test)]
mod helpers {
    use std::path::Path;

    use crate::config::Settings;

    pub const NODES: &str = "\
node_id,osm_id,latitude,longitude
1,101,51.000,-2.000
2,102,51.001,-2.000
3,103,51.002,-2.000
";

    pub const EDGES: &str = "\
start,end,osm_id,oneway,length,travel_time,geometry
1,2,7,true,10.5,2.25,
2,3,8,true,20.25,3.5,\"LINESTRING (-2.000 51.001, -2.000 51.002)\"
";

    pub fn write_map(dir: &Path) {
        std::fs::write(dir.join("nodes.csv"), NODES).unwrap();
        std::fs::write(dir.join("edges.csv"), EDGES).unwrap();
    }

    pub fn settings(map: &Path) -> Settings {
        Settings {
            map:                Some(map.to_path_buf()),
            travel_time_weight: "travel_time".to_string(),
            log_level:          None,
        }
    }
}

// ── Argument parsing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod parsing {
    use std::path::PathBuf;

    use clap::Parser;
    use log::LevelFilter;

    use crate::cli::{Cli, Command};
    use crate::config::{level_for, Settings};

    #[test]
    fn route_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "routor", "--map", "bristol", "route", "-33.9249,18.4241", "-33.9,18.5", "length",
        ])
        .unwrap();
        assert_eq!(cli.map, Some(PathBuf::from("bristol")));
        match cli.command {
            Command::Route { origin, destination, weight, max_expansions } => {
                assert_eq!(origin.latitude, -33.9249);
                assert_eq!(destination.longitude, 18.5);
                assert_eq!(weight, "length");
                assert_eq!(max_expansions, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "routor", "route", "51.0,-2.0", "51.1,-2.1", "travel_time",
            "--max-expansions", "500", "-vv", "--map", "m",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.map, Some(PathBuf::from("m")));
        assert!(matches!(cli.command, Command::Route { max_expansions: Some(500), .. }));
    }

    #[test]
    fn invalid_location_is_rejected() {
        for bad in ["51.0", "north,west", "91.0,0.0"] {
            let result = Cli::try_parse_from(["routor", "route", bad, "51.0,-2.0", "length"]);
            assert!(result.is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn weights_subcommand() {
        let cli = Cli::try_parse_from(["routor", "weights"]).unwrap();
        assert!(matches!(cli.command, Command::Weights));
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), None);
        assert_eq!(level_for(1), Some(LevelFilter::Info));
        assert_eq!(level_for(2), Some(LevelFilter::Debug));
        assert_eq!(level_for(7), Some(LevelFilter::Trace));
    }

    #[test]
    fn settings_from_cli() {
        let cli = Cli::try_parse_from([
            "routor", "-v", "--travel-time-weight", "length", "--map", "m", "weights",
        ])
        .unwrap();
        let settings = Settings::from_cli(&cli);
        assert_eq!(settings.travel_time_weight, "length");
        assert_eq!(settings.log_level, Some(LevelFilter::Info));
        assert_eq!(settings.map_path().unwrap(), std::path::Path::new("m"));
    }
}

// ── Whole runs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use rt_core::Location;
    use rt_routing::{ErrorKind, RoutingError};

    use crate::cli::Command;
    use crate::config::{self, Settings};
    use crate::run;

    use super::helpers::{settings, write_map};

    fn route(weight: &str) -> Command {
        Command::Route {
            origin:         Location::new_unchecked(51.0, -2.0),
            destination:    Location::new_unchecked(51.002, -2.0),
            weight:         weight.to_string(),
            max_expansions: None,
        }
    }

    #[test]
    fn lists_weights() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(&settings(dir.path()), Command::Weights).unwrap();
        assert_eq!(out, "travel_time\nlength\nturn_penalty");
    }

    #[test]
    fn routes_and_prints_json() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path());

        let out = run(&settings(dir.path()), route("length")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["costs"].as_f64(), Some(30.75));
        assert_eq!(json["length"].as_f64(), Some(30.75));
        assert_eq!(json["travel_time"].as_f64(), Some(5.75));
        let path = json["path"].as_array().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[2]["latitude"].as_f64(), Some(51.002));
        assert_eq!(path[2]["longitude"].as_f64(), Some(-2.0));
    }

    #[test]
    fn travel_time_weight_is_configurable() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path());
        let mut settings = settings(dir.path());
        settings.travel_time_weight = "LENGTH".to_string();

        let out = run(&settings, route("travel_time")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["costs"].as_f64(), Some(5.75));
        assert_eq!(json["travel_time"].as_f64(), Some(30.75));
    }

    #[test]
    fn unknown_weight_fails_before_loading() {
        let settings = settings(std::path::Path::new("/definitely/not/a/map"));
        let err = run(&settings, route("fuel")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RoutingError>(),
            Some(RoutingError::UnknownWeight { .. })
        ));
    }

    #[test]
    fn missing_map_is_reported() {
        let settings = Settings {
            map:                None,
            travel_time_weight: "travel_time".to_string(),
            log_level:          None,
        };
        let err = run(&settings, route("length")).unwrap_err();
        assert!(err.to_string().contains("ROUTOR_MAP_PATH"));
    }

    #[test]
    fn expansion_budget_is_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path());
        let command = Command::Route {
            origin:         Location::new_unchecked(51.0, -2.0),
            destination:    Location::new_unchecked(51.002, -2.0),
            weight:         "length".to_string(),
            max_expansions: Some(1),
        };
        let err = run(&settings(dir.path()), command).unwrap_err();
        let routing = err.downcast_ref::<RoutingError>().unwrap();
        assert!(matches!(routing, RoutingError::ExpansionLimit { .. }));
    }

    #[test]
    fn unreachable_destination_is_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path());
        let command = Command::Route {
            origin:         Location::new_unchecked(51.002, -2.0),
            destination:    Location::new_unchecked(51.0, -2.0),
            weight:         "length".to_string(),
            max_expansions: None,
        };
        let err = run(&settings(dir.path()), command).unwrap_err();
        let routing = err.downcast_ref::<RoutingError>().unwrap();
        assert_eq!(routing.kind(), ErrorKind::PathNotFound);
    }

    #[test]
    fn unsupported_map_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("map.graphml");
        std::fs::write(&file, "<graphml/>").unwrap();
        let err = config::load_map(&file).unwrap_err();
        assert!(err.to_string().contains("unsupported map"));
    }

    #[cfg(not(feature = "osm"))]
    #[test]
    fn pbf_needs_the_osm_feature() {
        let err = config::load_map(std::path::Path::new("bristol.osm.pbf")).unwrap_err();
        assert!(err.to_string().contains("osm"));
    }
}
