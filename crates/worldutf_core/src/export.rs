//! Export driver
//!
//! [`collect`] runs the six category scans in dependency order (catalogs
//! before the instance lists that index into them), then picks up door
//! controllers. [`export_to_file`] wraps a run in an object-mode guard,
//! validates the result and writes it atomically.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use tempfile::NamedTempFile;

use crate::attributes::AttributeMap;
use crate::builders::{
    build_camera_animation, build_door_controller, build_instances, build_model_catalog,
    build_sound_catalog,
};
use crate::classify::{self, EntityCategory};
use crate::entities::{CatalogKind, WorldExport};
use crate::error::{AttributeContext, ExportError};
use crate::graph::SceneGraph;
use crate::mode::{ModeControl, ObjectModeGuard};
use crate::validate::WorldValidator;
use crate::writer::write_world;

/// Scene property overriding the output directory
pub const PROP_EXPORT_PATH: &str = "export_path";
/// Scene property overriding the output file stem
pub const PROP_EXPORT_NAME: &str = "export_name";
/// Scene property overriding the output extension
pub const PROP_EXPORT_FEXT: &str = "export_fext";
/// Scene property naming the map
pub const PROP_MAP_NAME: &str = "mapname";

/// Walk the scene and build every entity list
pub fn collect<G: SceneGraph>(graph: &G) -> Result<WorldExport, ExportError> {
    let mut world = WorldExport::default();

    for category in EntityCategory::SCAN_ORDER {
        let containers = classify::scan(graph, category);
        log::debug!("{} container(s) tagged {}", containers.len(), category.tag());

        if containers.len() > 1 && category != EntityCategory::CameraAnimation {
            log::warn!(
                "{} containers tagged {}, only '{}' is kept",
                containers.len(),
                category.tag(),
                containers.last().map(|n| graph.name(*n)).unwrap_or_default()
            );
        }

        for &container in &containers {
            match category {
                EntityCategory::StaticModelList => {
                    world.static_models = build_model_catalog(graph, container)?;
                }
                EntityCategory::DynamicModelList => {
                    world.dynamic_models = build_model_catalog(graph, container)?;
                }
                EntityCategory::SoundList => {
                    world.sounds = build_sound_catalog(graph, container)?;
                }
                EntityCategory::CameraAnimation => {
                    if let Some(animation) = build_camera_animation(graph, container)? {
                        world.camera_animations.push(animation);
                    }
                }
                EntityCategory::StaticModelInstances => {
                    world.static_instances =
                        build_instances(graph, container, &world.static_models, CatalogKind::Static)?;
                }
                EntityCategory::DynamicModelInstances => {
                    world.dynamic_instances =
                        build_instances(graph, container, &world.dynamic_models, CatalogKind::Dynamic)?;
                }
            }
        }
    }

    for node in classify::scan_door_controllers(graph) {
        world.door_controllers.push(build_door_controller(graph, node)?);
    }

    Ok(world)
}

/// Export settings as configured; unset fields fall back to scene properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory
    pub directory: Option<PathBuf>,
    /// Output file stem
    pub name: Option<String>,
    /// Output file extension, without the dot
    pub extension: Option<String>,
    /// Map name written on the first line
    pub map_name: Option<String>,
}

/// Fully resolved export target
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub directory: PathBuf,
    pub name: String,
    pub extension: String,
    pub map_name: String,
}

impl ExportSettings {
    pub const DEFAULT_NAME: &'static str = "untitled";
    pub const DEFAULT_EXTENSION: &'static str = "txt";
    pub const DEFAULT_MAP_NAME: &'static str = "default";

    /// Resolve each setting: config value, then scene property, then default
    ///
    /// The default directory and name come from `source`, the file the
    /// scene was loaded from.
    pub fn resolve(
        config: &ExportConfig,
        properties: &AttributeMap,
        source: Option<&Path>,
    ) -> Result<Self, ExportError> {
        let property = |key: &str| -> Result<Option<String>, ExportError> {
            Ok(properties
                .string(key)
                .in_node("scene", "scene")?
                .filter(|s| !s.is_empty())
                .map(str::to_string))
        };

        let directory = match &config.directory {
            Some(dir) => dir.clone(),
            None => match property(PROP_EXPORT_PATH)? {
                Some(dir) => PathBuf::from(dir),
                None => source
                    .and_then(Path::parent)
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
            },
        };
        let directory = if directory.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            directory
        };

        let name = match &config.name {
            Some(name) => name.clone(),
            None => match property(PROP_EXPORT_NAME)? {
                Some(name) => name,
                None => source
                    .and_then(Path::file_stem)
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| Self::DEFAULT_NAME.to_string()),
            },
        };

        let extension = match &config.extension {
            Some(ext) => ext.clone(),
            None => property(PROP_EXPORT_FEXT)?.unwrap_or_else(|| Self::DEFAULT_EXTENSION.to_string()),
        };
        let extension = extension.trim_start_matches('.').to_string();

        let map_name = match &config.map_name {
            Some(map) => map.clone(),
            None => property(PROP_MAP_NAME)?.unwrap_or_else(|| Self::DEFAULT_MAP_NAME.to_string()),
        };

        Ok(Self { directory, name, extension, map_name })
    }

    /// `<directory>/<name>.<extension>`
    pub fn path(&self) -> PathBuf {
        if self.extension.is_empty() {
            self.directory.join(&self.name)
        } else {
            self.directory.join(format!("{}.{}", self.name, self.extension))
        }
    }
}

/// Collect, validate and serialize a scene into `out`
pub fn export_to_writer<G: SceneGraph, W: Write>(
    graph: &G,
    map_name: &str,
    out: W,
) -> Result<W, ExportError> {
    let world = collect(graph)?;
    WorldValidator::validate_or_error(&world).map_err(ExportError::Invalid)?;
    log_counts(&world);
    Ok(write_world(out, map_name, &world)?)
}

/// Export a host scene to the file named by `settings`
///
/// The host is kept in object mode for the traversal and restored
/// afterwards, also on failure. Output goes to a temporary file next to
/// the target, which replaces the target only once everything is written.
pub fn export_to_file<H: SceneGraph + ModeControl>(
    host: &mut H,
    settings: &ExportSettings,
) -> Result<PathBuf, ExportError> {
    let path = settings.path();
    log::info!("Exporting world '{}' to {}", settings.map_name, path.display());

    let world = {
        let guard = ObjectModeGuard::enter(host);
        collect(&*guard)?
    };
    WorldValidator::validate_or_error(&world).map_err(ExportError::Invalid)?;
    log_counts(&world);

    fs::create_dir_all(&settings.directory)?;
    let mut tmp = NamedTempFile::new_in(&settings.directory)?;
    write_world(BufWriter::new(tmp.as_file_mut()), &settings.map_name, &world)?;
    tmp.persist(&path).map_err(|e| e.error)?;

    log::info!("Export complete: {}", path.display());
    Ok(path)
}

fn log_counts(world: &WorldExport) {
    log::info!(
        "{} static / {} dynamic models, {} sounds",
        world.static_models.len(),
        world.dynamic_models.len(),
        world.sounds.len()
    );
    log::info!(
        "{} static / {} dynamic instances, {} camera animations, {} door controllers",
        world.static_instances.len(),
        world.dynamic_instances.len(),
        world.camera_animations.len(),
        world.door_controllers.len()
    );
}
