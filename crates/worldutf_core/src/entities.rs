//! Exported entity records
//!
//! Every record is a snapshot taken during one export run. Catalog entries
//! are identified by their position in their list; instances refer to them
//! by that index.

use worldutf_math::{Mat4, Quat, Vec3};

/// Which model catalog an instance list indexes into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogKind {
    Static,
    Dynamic,
}

impl CatalogKind {
    /// `entity_type` expected on an instance of this kind
    pub fn instance_tag(self) -> &'static str {
        match self {
            CatalogKind::Static => "STATIC_MODEL",
            CatalogKind::Dynamic => "DYNAMIC_MODEL",
        }
    }
}

/// A model that instances may place
#[derive(Clone, Debug, PartialEq)]
pub struct ModelCatalogEntry {
    /// Group name instances use to refer to this model
    pub group: String,
    pub link_path: String,
    pub link_file: String,
}

impl ModelCatalogEntry {
    /// `<link_path>\<link_file>`, the form written to the file
    pub fn reference(&self) -> String {
        join_link(&self.link_path, &self.link_file)
    }
}

/// A placed copy of a catalog model
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInstance {
    /// Index into the matching catalog
    pub model: u32,
    pub position: Vec3,
    pub rotation: Mat4,
}

/// An ambient sound resource
#[derive(Clone, Debug, PartialEq)]
pub struct SoundEntry {
    pub link_path: String,
    pub link_file: String,
}

impl SoundEntry {
    pub fn reference(&self) -> String {
        join_link(&self.link_path, &self.link_file)
    }
}

fn join_link(path: &str, file: &str) -> String {
    format!("{}\\{}", path, file)
}

/// One keyframe of a camera animation
#[derive(Clone, Debug, PartialEq)]
pub struct CameraMarker {
    pub position: Vec3,
    pub rotation: Mat4,
    /// XYZ Euler angles in degrees
    pub euler: Vec3,
    pub index: u16,
    pub speed: f32,
    pub interpolate_speed: bool,
    /// Vertical field of view in degrees
    pub fovy: f32,
    pub interpolate_fovy: bool,
}

impl CameraMarker {
    pub const DEFAULT_SPEED: f32 = 1.0;
    pub const DEFAULT_FOVY: f32 = 60.0;
}

/// A scripted camera path; markers are in playback order
#[derive(Clone, Debug, PartialEq)]
pub struct CameraAnimation {
    pub name: String,
    pub position: Vec3,
    pub rotation: Mat4,
    pub start: u16,
    pub markers: Vec<CameraMarker>,
}

/// Oriented box: center line from transform data, size from geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub position: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
}

impl BoundingBox {
    /// Half the componentwise spread of a point set
    ///
    /// Returns zero extents for an empty set. The result is never negative.
    pub fn half_extents_of(points: &[Vec3]) -> Vec3 {
        let Some((first, rest)) = points.split_first() else {
            return Vec3::ZERO;
        };
        let (min, max) = rest.iter().fold((*first, *first), |(min, max), p| {
            (min.min_components(*p), max.max_components(*p))
        });
        (max - min) / 2.0
    }
}

/// A trigger volume driving a door
///
/// The behaviour slots are free-form references that downstream tools fill
/// in; the exporter writes placeholders.
#[derive(Clone, Debug, PartialEq)]
pub struct DoorController {
    pub name: String,
    pub bbox: BoundingBox,
    pub door: String,
    pub anim_default: String,
    pub anim_enter: String,
    pub anim_leave: String,
    pub sound_enter: String,
    pub sound_leave: String,
}

impl DoorController {
    pub const PLACEHOLDER_DOOR: &'static str = "door_model";
    pub const PLACEHOLDER_SLOT: &'static str = "none";

    /// A controller with every reference slot set to its placeholder
    pub fn new(name: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            name: name.into(),
            bbox,
            door: Self::PLACEHOLDER_DOOR.to_string(),
            anim_default: Self::PLACEHOLDER_SLOT.to_string(),
            anim_enter: Self::PLACEHOLDER_SLOT.to_string(),
            anim_leave: Self::PLACEHOLDER_SLOT.to_string(),
            sound_enter: Self::PLACEHOLDER_SLOT.to_string(),
            sound_leave: Self::PLACEHOLDER_SLOT.to_string(),
        }
    }
}

/// Everything one export run produces, ready for the writer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldExport {
    pub static_models: Vec<ModelCatalogEntry>,
    pub dynamic_models: Vec<ModelCatalogEntry>,
    pub sounds: Vec<SoundEntry>,
    pub static_instances: Vec<ModelInstance>,
    pub dynamic_instances: Vec<ModelInstance>,
    pub camera_animations: Vec<CameraAnimation>,
    pub door_controllers: Vec<DoorController>,
}

impl WorldExport {
    pub fn catalog(&self, kind: CatalogKind) -> &[ModelCatalogEntry] {
        match kind {
            CatalogKind::Static => &self.static_models,
            CatalogKind::Dynamic => &self.dynamic_models,
        }
    }

    pub fn instances(&self, kind: CatalogKind) -> &[ModelInstance] {
        match kind {
            CatalogKind::Static => &self.static_instances,
            CatalogKind::Dynamic => &self.dynamic_instances,
        }
    }
}
