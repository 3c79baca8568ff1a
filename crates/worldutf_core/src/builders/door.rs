//! Door controller trigger volumes

use worldutf_math::{mat4, Clean};

use crate::entities::{BoundingBox, DoorController};
use crate::error::ExportError;
use crate::graph::{self, SceneGraph};

/// Build a door controller from a node [`is_door_controller`] accepted
///
/// The box size comes from the world-space corners of the node's bounds;
/// its position and rotation are the node's local transform channels.
///
/// [`is_door_controller`]: crate::classify::is_door_controller
pub fn build_door_controller<G: SceneGraph>(
    graph: &G,
    node: G::Node,
) -> Result<DoorController, ExportError> {
    let name = graph.name(node);
    if !graph::is_group_instance(graph, node, 1) {
        return Err(ExportError::schema(
            name,
            name,
            "door controller must be an EMPTY referencing a single-member group",
        ));
    }

    let world = graph.world_matrix(node);
    let corners = graph
        .local_bound_corners(node)
        .map(|corner| mat4::transform_point(world, corner));

    let bbox = BoundingBox {
        position: graph.local_location(node).cleaned(),
        rotation: graph.local_rotation(node).cleaned(),
        half_extents: BoundingBox::half_extents_of(&corners).cleaned(),
    };
    log::debug!("Door controller '{}' half extents {:?}", name, bbox.half_extents);
    Ok(DoorController::new(name, bbox))
}
