//! Read-only view of a host scene graph
//!
//! The exporter never owns scene data. Anything that can answer the queries
//! on [`SceneGraph`] can be exported: the in-memory [`Scene`](crate::Scene)
//! loaded from RON, or a binding to a live authoring tool.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Serialize, Deserialize};
use worldutf_math::{mat4, Clean, Mat4, Quat, Vec3};

use crate::attributes::{AttributeError, AttributeMap};
use crate::classify::ENTITY_TYPE;

/// Structural kind of a scene node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Organizational node with no geometry of its own (plain axes, group
    /// instances)
    #[default]
    Empty,
    /// Node carrying mesh geometry
    Mesh,
    /// Anything else the host knows about (lights, cameras, curves)
    Other,
}

/// A reusable collection of nodes that a group-reference node stands in for
#[derive(Clone, Copy, Debug)]
pub struct GroupView<'a, N> {
    pub name: &'a str,
    pub members: &'a [N],
}

/// Capabilities the exporter consumes from a host scene
pub trait SceneGraph {
    /// Cheap handle identifying one node
    type Node: Copy + Eq + Hash + Debug;

    /// Every node in the scene, in host enumeration order
    fn nodes(&self) -> &[Self::Node];

    fn name(&self, node: Self::Node) -> &str;

    fn kind(&self, node: Self::Node) -> NodeKind;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Direct children in traversal order
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// Full object-to-world matrix
    fn world_matrix(&self, node: Self::Node) -> Mat4;

    /// Object-to-parent matrix
    fn local_matrix(&self, node: Self::Node) -> Mat4;

    /// Translation channel of the local transform
    fn local_location(&self, node: Self::Node) -> Vec3;

    /// Rotation channel of the local transform
    fn local_rotation(&self, node: Self::Node) -> Quat;

    fn attributes(&self, node: Self::Node) -> &AttributeMap;

    /// The group this node instances, if it is a group reference
    fn instanced_group(&self, node: Self::Node) -> Option<GroupView<'_, Self::Node>>;

    /// The 8 corners of the node's bounding box in its local space
    fn local_bound_corners(&self, node: Self::Node) -> [Vec3; 8];
}

/// Whether the node is an organizational ("empty") node
pub fn is_organizational<G: SceneGraph>(graph: &G, node: G::Node) -> bool {
    graph.kind(node) == NodeKind::Empty
}

/// Whether the node is an empty instancing a group of exactly `members` nodes
pub fn is_group_instance<G: SceneGraph>(graph: &G, node: G::Node, members: usize) -> bool {
    is_organizational(graph, node)
        && graph
            .instanced_group(node)
            .is_some_and(|group| group.members.len() == members)
}

/// Read a node's `entity_type` tag
///
/// The node's own attribute wins; group references fall back to the first
/// member of the instanced group that carries the tag.
pub fn entity_type<G: SceneGraph>(graph: &G, node: G::Node) -> Result<Option<&str>, AttributeError> {
    if let Some(tag) = graph.attributes(node).string(ENTITY_TYPE)? {
        return Ok(Some(tag));
    }
    if let Some(group) = graph.instanced_group(node) {
        for &member in group.members {
            if let Some(tag) = graph.attributes(member).string(ENTITY_TYPE)? {
                return Ok(Some(tag));
            }
        }
    }
    Ok(None)
}

/// World-space position and orientation of a node, numerically cleaned
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Mat4,
}

/// Derive the world placement of a node
///
/// The position is the local translation carried into world space by the
/// parent's frame. The rotation is the orientation part of the parent's
/// frame composed with the local matrix, translation cleared. Both are
/// cleaned.
pub fn world_placement<G: SceneGraph>(graph: &G, node: G::Node) -> Placement {
    let frame = graph
        .parent(node)
        .map(|parent| graph.world_matrix(parent))
        .unwrap_or(mat4::IDENTITY);

    Placement {
        position: mat4::transform_point(frame, graph.local_location(node)).cleaned(),
        rotation: mat4::without_translation(mat4::mul(frame, graph.local_matrix(node))).cleaned(),
    }
}
