//! Entity classification
//!
//! Container nodes announce what they hold through an `entity_type`
//! attribute. [`scan`] selects the containers of one category; door
//! controllers are recognised per node by [`is_door_controller`], falling
//! back to a `DC_` naming convention when the tag is absent.

use crate::graph::{self, SceneGraph};

/// Attribute naming a node's entity category
pub const ENTITY_TYPE: &str = "entity_type";

/// Tag carried by a door controller's group member
pub const DOOR_CONTROLLER: &str = "DOOR_CONTROLLER";

/// Name prefix that marks a door controller when no tag is present
pub const DOOR_CONTROLLER_PREFIX: &str = "DC";

/// Container categories, in the order they must be scanned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    StaticModelList,
    DynamicModelList,
    SoundList,
    CameraAnimation,
    StaticModelInstances,
    DynamicModelInstances,
}

impl EntityCategory {
    /// Catalogs come before the instance lists that index into them
    pub const SCAN_ORDER: [EntityCategory; 6] = [
        EntityCategory::StaticModelList,
        EntityCategory::DynamicModelList,
        EntityCategory::SoundList,
        EntityCategory::CameraAnimation,
        EntityCategory::StaticModelInstances,
        EntityCategory::DynamicModelInstances,
    ];

    /// The `entity_type` value marking a container of this category
    pub fn tag(self) -> &'static str {
        match self {
            EntityCategory::StaticModelList => "STATIC_MODEL_LIST",
            EntityCategory::DynamicModelList => "DYNAMIC_MODEL_LIST",
            EntityCategory::SoundList => "SOUND_LIST",
            EntityCategory::CameraAnimation => "CAMERA_ANIMATION",
            EntityCategory::StaticModelInstances => "STATIC_MODEL_INSTANCES",
            EntityCategory::DynamicModelInstances => "DYNAMIC_MODEL_INSTANCES",
        }
    }
}

/// Containers tagged with `category`, in host enumeration order
///
/// Nodes without the attribute, or whose tag is not a string, are skipped.
pub fn scan<G: SceneGraph>(graph: &G, category: EntityCategory) -> Vec<G::Node> {
    graph
        .nodes()
        .iter()
        .copied()
        .filter(|&node| {
            let tag = graph.attributes(node).string(ENTITY_TYPE).ok().flatten();
            let matched = tag == Some(category.tag());
            if matched {
                log::debug!("'{}' is a {} container", graph.name(node), category.tag());
            }
            matched
        })
        .collect()
}

/// Whether the first `_`-delimited token of `name` is `DC`
pub fn has_door_controller_prefix(name: &str) -> bool {
    name.split('_').next() == Some(DOOR_CONTROLLER_PREFIX)
}

/// Whether a node is a door controller trigger volume
///
/// The node must instance a single-member group. The member's
/// `entity_type` decides when present; only without it is the member's
/// name consulted.
pub fn is_door_controller<G: SceneGraph>(graph: &G, node: G::Node) -> bool {
    if !graph::is_group_instance(graph, node, 1) {
        return false;
    }
    let Some(member) = graph
        .instanced_group(node)
        .and_then(|group| group.members.first().copied())
    else {
        return false;
    };

    let attributes = graph.attributes(member);
    if attributes.contains(ENTITY_TYPE) {
        return attributes.string(ENTITY_TYPE).ok().flatten() == Some(DOOR_CONTROLLER);
    }
    has_door_controller_prefix(graph.name(member))
}

/// All door controllers, in host enumeration order
pub fn scan_door_controllers<G: SceneGraph>(graph: &G) -> Vec<G::Node> {
    graph
        .nodes()
        .iter()
        .copied()
        .filter(|&node| {
            let matched = is_door_controller(graph, node);
            if matched {
                log::debug!("'{}' is a door controller", graph.name(node));
            }
            matched
        })
        .collect()
}
