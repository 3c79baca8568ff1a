//! worldutf - World UTF exporter
//!
//! Loads a RON scene and writes its game-world entities as a World UTF
//! text file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgMatches, Command};
use worldutf_core::{export_to_file, ExportConfig, ExportSettings, Scene};

use worldutf::config::AppConfig;

fn cli() -> Command {
    Command::new("worldutf")
        .about("Export a scene graph to a World UTF file")
        .arg(
            Arg::new("scene")
                .value_name("SCENE")
                .help("Scene file (.ron) to export")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding default.toml and user.toml")
                .default_value("config")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .value_name("DIR")
                .help("Output directory (default: the scene's directory)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Output file name without extension (default: the scene's name)"),
        )
        .arg(
            Arg::new("ext")
                .long("ext")
                .value_name("EXT")
                .help("Output file extension (default: txt)"),
        )
        .arg(
            Arg::new("map-name")
                .long("map-name")
                .value_name("NAME")
                .help("Map name written on the first line (default: default)"),
        )
}

/// Command-line flags win over every configured value
fn apply_overrides(mut export: ExportConfig, matches: &ArgMatches) -> ExportConfig {
    if let Some(dir) = matches.get_one::<PathBuf>("output-dir") {
        export.directory = Some(dir.clone());
    }
    if let Some(name) = matches.get_one::<String>("name") {
        export.name = Some(name.clone());
    }
    if let Some(ext) = matches.get_one::<String>("ext") {
        export.extension = Some(ext.clone());
    }
    if let Some(map) = matches.get_one::<String>("map-name") {
        export.map_name = Some(map.clone());
    }
    export
}

fn run(matches: &ArgMatches, config: AppConfig) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let scene_path = matches
        .get_one::<PathBuf>("scene")
        .ok_or("no scene file given")?;

    log::info!("Loading scene {}", scene_path.display());
    let mut scene = Scene::load(scene_path)?;

    let export = apply_overrides(config.export, matches);
    let settings = ExportSettings::resolve(&export, scene.properties(), scene.source())?;
    Ok(export_to_file(&mut scene, &settings)?)
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    let config_dir = matches
        .get_one::<PathBuf>("config-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("config"));
    let loaded = AppConfig::load_from(&config_dir);

    let level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    match run(&matches, config) {
        Ok(path) => {
            log::info!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("worldutf: {}", e);
            ExitCode::FAILURE
        }
    }
}
