//! Camera animations

use worldutf_math::{mat4, Clean};

use crate::entities::{CameraAnimation, CameraMarker};
use crate::error::{AttributeContext, ExportError};
use crate::graph::{self, SceneGraph};

use super::{check_entity_type, require_empty};

const CAMERA_MARKER: &str = "CAMERA_MARKER";
const INDEX: &str = "index";
const SPEED: &str = "speed";
const INTERPOLATE_SPEED: &str = "interpolate_speed";
const FOVY: &str = "fovy";
const INTERPOLATE_FOVY: &str = "interpolate_fovy";

/// Build one camera animation from a `CAMERA_ANIMATION` container
///
/// Returns `Ok(None)` when the container yields no markers; such an
/// animation is never recorded.
pub fn build_camera_animation<G: SceneGraph>(
    graph: &G,
    container: G::Node,
) -> Result<Option<CameraAnimation>, ExportError> {
    let name = graph.name(container);
    require_empty(graph, name, container, "camera animation")?;

    let children = graph.children(container);
    if children.is_empty() {
        log::warn!("Camera animation '{}' has no markers, skipping", name);
        return Ok(None);
    }

    let placement = graph::world_placement(graph, container);
    let mut animation = CameraAnimation {
        name: name.to_string(),
        position: placement.position,
        rotation: placement.rotation,
        start: 0,
        markers: Vec::with_capacity(children.len()),
    };

    for (position, &child) in children.iter().enumerate() {
        animation.markers.push(build_marker(graph, name, child, position)?);
    }

    if animation.markers.is_empty() {
        log::warn!("Camera animation '{}' has no markers, skipping", name);
        return Ok(None);
    }
    log::debug!("Camera animation '{}' with {} markers", name, animation.markers.len());
    Ok(Some(animation))
}

fn build_marker<G: SceneGraph>(
    graph: &G,
    animation: &str,
    node: G::Node,
    position: usize,
) -> Result<CameraMarker, ExportError> {
    let name = graph.name(node);
    require_empty(graph, animation, node, "camera marker")?;
    let has_members = graph
        .instanced_group(node)
        .is_some_and(|group| !group.members.is_empty());
    if !has_members {
        return Err(ExportError::schema(
            animation,
            name,
            "camera marker must reference a non-empty group",
        ));
    }
    check_entity_type(graph, animation, node, CAMERA_MARKER)?;

    let attributes = graph.attributes(node);
    let index = match attributes.u16(INDEX).in_node(animation, name)? {
        Some(index) => index,
        None => u16::try_from(position).map_err(|_| {
            ExportError::schema(animation, name, "too many markers for a 16-bit index")
        })?,
    };

    let placement = graph::world_placement(graph, node);
    Ok(CameraMarker {
        position: placement.position,
        rotation: placement.rotation,
        euler: mat4::euler_xyz_degrees(placement.rotation).cleaned(),
        index,
        speed: attributes
            .float(SPEED)
            .in_node(animation, name)?
            .unwrap_or(CameraMarker::DEFAULT_SPEED),
        interpolate_speed: attributes
            .flag(INTERPOLATE_SPEED)
            .in_node(animation, name)?
            .unwrap_or(true),
        fovy: attributes
            .float(FOVY)
            .in_node(animation, name)?
            .unwrap_or(CameraMarker::DEFAULT_FOVY),
        interpolate_fovy: attributes
            .flag(INTERPOLATE_FOVY)
            .in_node(animation, name)?
            .unwrap_or(true),
    })
}
