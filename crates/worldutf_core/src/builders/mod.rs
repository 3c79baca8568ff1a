//! Entity builders
//!
//! Each builder takes one classified container, checks the shape of its
//! children and materializes typed records. Builders return their records;
//! nothing is accumulated between calls.

mod catalog;
mod instance;
mod camera;
mod door;

pub use catalog::{build_model_catalog, build_sound_catalog};
pub use instance::{build_instances, CatalogIndex};
pub use camera::build_camera_animation;
pub use door::build_door_controller;

use crate::error::{AttributeContext, ExportError};
use crate::graph::{self, SceneGraph};

/// Fail unless `node` is an organizational node
fn require_empty<G: SceneGraph>(
    graph: &G,
    container: &str,
    node: G::Node,
    what: &str,
) -> Result<(), ExportError> {
    if graph::is_organizational(graph, node) {
        Ok(())
    } else {
        Err(ExportError::schema(
            container,
            graph.name(node),
            format!("{} must be an EMPTY object", what),
        ))
    }
}

/// Read a string attribute that must be present
fn required_string<G: SceneGraph>(
    graph: &G,
    container: &str,
    node: G::Node,
    key: &str,
) -> Result<String, ExportError> {
    let name = graph.name(node);
    graph
        .attributes(node)
        .string(key)
        .in_node(container, name)?
        .map(str::to_string)
        .ok_or_else(|| {
            ExportError::schema(container, name, format!("missing required attribute '{}'", key))
        })
}

/// Check the optional `entity_type` tag of a container child
///
/// A mismatched tag is an error. A missing tag only warns and the child is
/// treated as `expected`.
fn check_entity_type<G: SceneGraph>(
    graph: &G,
    container: &str,
    node: G::Node,
    expected: &str,
) -> Result<(), ExportError> {
    let name = graph.name(node);
    match graph::entity_type(graph, node).in_node(container, name)? {
        Some(tag) if tag == expected => Ok(()),
        Some(tag) => Err(ExportError::schema(
            container,
            name,
            format!("entity_type is '{}', expected '{}'", tag, expected),
        )),
        None => {
            log::warn!(
                "'{}' in '{}' has no entity_type, assuming {}",
                name,
                container,
                expected
            );
            Ok(())
        }
    }
}
