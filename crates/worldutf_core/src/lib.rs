//! World UTF exporter engine
//!
//! Turns a scene graph of meshes, empties and group references tagged with
//! custom attributes into a World UTF text file:
//!
//! - [`SceneGraph`] - Read-only capabilities consumed from a host scene
//! - [`Scene`] - In-memory, RON-loadable host scene
//! - [`EntityCategory`] - Container tags recognised by the classifier
//! - [`WorldExport`] - Every entity list one export run produces
//! - [`WorldValidator`] - Consistency checks over an assembled world
//! - [`RecordWriter`] / [`write_world`] - The line-oriented serializer
//! - [`collect`] / [`export_to_file`] - Drivers tying it all together

pub mod attributes;
pub mod graph;
pub mod classify;
pub mod builders;
mod entities;
mod error;
mod mode;
mod scene;
mod validate;
mod writer;
mod export;

pub use attributes::{AttrValue, AttributeError, AttributeMap};
pub use graph::{GroupView, NodeKind, Placement, SceneGraph};
pub use classify::EntityCategory;
pub use entities::{
    BoundingBox, CameraAnimation, CameraMarker, CatalogKind, DoorController, ModelCatalogEntry,
    ModelInstance, SoundEntry, WorldExport,
};
pub use error::ExportError;
pub use mode::{InteractionMode, ModeControl, ObjectModeGuard};
pub use scene::{Bounds, GroupTemplate, NodeKey, NodeTemplate, Scene, SceneFile, SceneLoadError};
pub use validate::{ValidationError, WorldValidator};
pub use writer::{write_world, RecordWriter, Section};
pub use export::{collect, export_to_file, export_to_writer, ExportConfig, ExportSettings};

// Re-export the math types records are built from
pub use worldutf_math::{Mat4, Quat, Vec3};
