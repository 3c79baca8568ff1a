//! In-memory host scene
//!
//! [`Scene`] is a self-contained scene graph that implements [`SceneGraph`],
//! so worlds can be authored as RON files and exported without a running
//! authoring tool. [`SceneFile`] is the serialized form: a tree of
//! [`NodeTemplate`]s, named groups, scene-level properties and the
//! interaction mode the scene was saved in.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use slotmap::{new_key_type, SlotMap};
use worldutf_math::{mat4, Mat4, Quat, Vec3};

use crate::attributes::{AttrValue, AttributeMap};
use crate::graph::{GroupView, NodeKind, SceneGraph};
use crate::mode::{InteractionMode, ModeControl};

new_key_type! {
    /// Handle to a node stored in a [`Scene`]
    pub struct NodeKey;
}

/// Local-space bounds of a node
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    /// The unit cube an empty is drawn with
    fn default() -> Self {
        Self {
            min: Vec3::new(-1.0, -1.0, -1.0),
            max: Vec3::ONE,
        }
    }
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The 8 corners, x varying slowest
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(b.x, b.y, a.z),
        ]
    }
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// Serializable description of a node and its subtree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub location: Vec3,
    /// Rotation quaternion (w, x, y, z)
    #[serde(default)]
    pub rotation: Quat,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub attributes: AttributeMap,
    /// Name of the group this node instances
    #[serde(default)]
    pub instance_of: Option<String>,
    /// Local bounds; empties default to the unit cube
    #[serde(default)]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            attributes: AttributeMap::new(),
            instance_of: None,
            bounds: None,
            children: Vec::new(),
        }
    }

    /// An organizational node
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Empty)
    }

    /// A geometry node
    pub fn mesh(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Mesh)
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.location = Vec3::new(x, y, z);
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Make this node a reference to the named group
    pub fn instance_of(mut self, group: impl Into<String>) -> Self {
        self.instance_of = Some(group.into());
        self
    }

    pub fn with_bounds(mut self, min: Vec3, max: Vec3) -> Self {
        self.bounds = Some(Bounds::new(min, max));
        self
    }

    pub fn with_child(mut self, child: NodeTemplate) -> Self {
        self.children.push(child);
        self
    }
}

/// Serializable description of a group: member nodes referenced by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTemplate {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<String>,
}

/// The on-disk form of a [`Scene`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    /// Scene-level properties (`mapname`, `export_path`, ...)
    #[serde(default)]
    pub properties: AttributeMap,
    #[serde(default)]
    pub mode: InteractionMode,
    pub nodes: Vec<NodeTemplate>,
    #[serde(default)]
    pub groups: Vec<GroupTemplate>,
}

struct NodeData {
    name: String,
    kind: NodeKind,
    location: Vec3,
    rotation: Quat,
    local: Mat4,
    attributes: AttributeMap,
    instance_of: Option<String>,
    bounds: Bounds,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

struct Group {
    name: String,
    members: Vec<NodeKey>,
}

/// An in-memory scene graph
pub struct Scene {
    nodes: SlotMap<NodeKey, NodeData>,
    /// Enumeration order: depth-first, parents before children
    order: Vec<NodeKey>,
    by_name: HashMap<String, NodeKey>,
    groups: HashMap<String, Group>,
    properties: AttributeMap,
    mode: InteractionMode,
    source: Option<PathBuf>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene in object mode
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            order: Vec::new(),
            by_name: HashMap::new(),
            groups: HashMap::new(),
            properties: AttributeMap::new(),
            mode: InteractionMode::Object,
            source: None,
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let file: SceneFile = ron::from_str(&contents)?;
        let mut scene = Self::from_file(file)?;
        scene.source = Some(path.to_path_buf());
        Ok(scene)
    }

    /// Build a scene from its serialized form
    pub fn from_file(file: SceneFile) -> Result<Self, SceneLoadError> {
        let mut scene = Self::new();
        scene.properties = file.properties;
        scene.mode = file.mode;
        for template in file.nodes {
            scene.add_node(template)?;
        }
        for group in file.groups {
            let members: Vec<&str> = group.objects.iter().map(String::as_str).collect();
            scene.add_group(&group.name, &members)?;
        }
        for key in &scene.order {
            let node = &scene.nodes[*key];
            if let Some(group) = &node.instance_of {
                if !scene.groups.contains_key(group) {
                    return Err(SceneLoadError::UnknownGroup {
                        node: node.name.clone(),
                        group: group.clone(),
                    });
                }
            }
        }
        Ok(scene)
    }

    /// Add a root node and its subtree
    pub fn add_node(&mut self, template: NodeTemplate) -> Result<NodeKey, SceneLoadError> {
        self.insert(None, template)
    }

    /// Add a node and its subtree under an existing parent
    pub fn add_child(&mut self, parent: NodeKey, template: NodeTemplate) -> Result<NodeKey, SceneLoadError> {
        self.insert(Some(parent), template)
    }

    fn insert(&mut self, parent: Option<NodeKey>, template: NodeTemplate) -> Result<NodeKey, SceneLoadError> {
        if self.by_name.contains_key(&template.name) {
            return Err(SceneLoadError::DuplicateNode(template.name));
        }

        let NodeTemplate {
            name,
            kind,
            location,
            rotation,
            scale,
            attributes,
            instance_of,
            bounds,
            children,
        } = template;

        let key = self.nodes.insert(NodeData {
            name: name.clone(),
            kind,
            location,
            rotation,
            local: mat4::from_trs(location, rotation, scale),
            attributes,
            instance_of,
            bounds: bounds.unwrap_or_default(),
            parent,
            children: Vec::new(),
        });
        self.by_name.insert(name, key);
        self.order.push(key);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(key);
        }

        for child in children {
            self.insert(Some(key), child)?;
        }
        Ok(key)
    }

    /// Define a group from existing node names
    pub fn add_group(&mut self, name: &str, objects: &[&str]) -> Result<(), SceneLoadError> {
        if self.groups.contains_key(name) {
            return Err(SceneLoadError::DuplicateGroup(name.to_string()));
        }
        let mut members = Vec::with_capacity(objects.len());
        for object in objects {
            match self.by_name.get(*object) {
                Some(key) => members.push(*key),
                None => {
                    return Err(SceneLoadError::UnknownGroupMember {
                        group: name.to_string(),
                        node: object.to_string(),
                    })
                }
            }
        }
        self.groups.insert(name.to_string(), Group { name: name.to_string(), members });
        Ok(())
    }

    /// Look a node up by name
    pub fn find(&self, name: &str) -> Option<NodeKey> {
        self.by_name.get(name).copied()
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Scene-level properties
    pub fn properties(&self) -> &AttributeMap {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut AttributeMap {
        &mut self.properties
    }

    /// File the scene was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }
}

impl SceneGraph for Scene {
    type Node = NodeKey;

    fn nodes(&self) -> &[NodeKey] {
        &self.order
    }

    fn name(&self, node: NodeKey) -> &str {
        self.nodes.get(node).map(|n| n.name.as_str()).unwrap_or("")
    }

    fn kind(&self, node: NodeKey) -> NodeKind {
        self.nodes.get(node).map(|n| n.kind).unwrap_or(NodeKind::Other)
    }

    fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeKey) -> &[NodeKey] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn world_matrix(&self, node: NodeKey) -> Mat4 {
        let mut world = self.local_matrix(node);
        let mut current = self.parent(node);
        while let Some(parent) = current {
            world = mat4::mul(self.local_matrix(parent), world);
            current = self.parent(parent);
        }
        world
    }

    fn local_matrix(&self, node: NodeKey) -> Mat4 {
        self.nodes.get(node).map(|n| n.local).unwrap_or(mat4::IDENTITY)
    }

    fn local_location(&self, node: NodeKey) -> Vec3 {
        self.nodes.get(node).map(|n| n.location).unwrap_or_default()
    }

    fn local_rotation(&self, node: NodeKey) -> Quat {
        self.nodes.get(node).map(|n| n.rotation).unwrap_or_default()
    }

    fn attributes(&self, node: NodeKey) -> &AttributeMap {
        static NONE: AttributeMap = AttributeMap::EMPTY;
        self.nodes.get(node).map(|n| &n.attributes).unwrap_or(&NONE)
    }

    fn instanced_group(&self, node: NodeKey) -> Option<GroupView<'_, NodeKey>> {
        let name = self.nodes.get(node)?.instance_of.as_ref()?;
        let group = self.groups.get(name)?;
        Some(GroupView {
            name: &group.name,
            members: &group.members,
        })
    }

    fn local_bound_corners(&self, node: NodeKey) -> [Vec3; 8] {
        self.nodes
            .get(node)
            .map(|n| n.bounds)
            .unwrap_or_default()
            .corners()
    }
}

impl ModeControl for Scene {
    fn interaction_mode(&self) -> InteractionMode {
        self.mode
    }

    fn set_interaction_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Two nodes share a name
    DuplicateNode(String),
    /// Two groups share a name
    DuplicateGroup(String),
    /// A group lists a node that does not exist
    UnknownGroupMember { group: String, node: String },
    /// A node instances a group that does not exist
    UnknownGroup { node: String, group: String },
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneLoadError::DuplicateNode(name) => write!(f, "Duplicate node name: '{}'", name),
            SceneLoadError::DuplicateGroup(name) => write!(f, "Duplicate group name: '{}'", name),
            SceneLoadError::UnknownGroupMember { group, node } => {
                write!(f, "Group '{}' lists unknown node '{}'", group, node)
            }
            SceneLoadError::UnknownGroup { node, group } => {
                write!(f, "Node '{}' instances unknown group '{}'", node, group)
            }
        }
    }
}

impl std::error::Error for SceneLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneLoadError::Io(e) => Some(e),
            SceneLoadError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{self, is_group_instance};

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON && (a.z - b.z).abs() < EPSILON
    }

    fn nested_scene() -> Scene {
        let mut scene = Scene::new();
        scene
            .add_node(
                NodeTemplate::empty("root")
                    .at(10.0, 0.0, 0.0)
                    .with_child(NodeTemplate::empty("child").at(1.0, 2.0, 3.0)),
            )
            .unwrap();
        scene.add_node(NodeTemplate::mesh("crate_mesh")).unwrap();
        scene.add_group("crate", &["crate_mesh"]).unwrap();
        scene
    }

    #[test]
    fn test_enumeration_order_is_depth_first() {
        let scene = nested_scene();
        let names: Vec<&str> = scene.nodes().iter().map(|n| scene.name(*n)).collect();
        assert_eq!(names, vec!["root", "child", "crate_mesh"]);
    }

    #[test]
    fn test_parent_child_links() {
        let scene = nested_scene();
        let root = scene.find("root").unwrap();
        let child = scene.find("child").unwrap();
        assert_eq!(scene.parent(child), Some(root));
        assert_eq!(scene.children(root), &[child]);
        assert!(scene.parent(root).is_none());
    }

    #[test]
    fn test_world_matrix_follows_parent_chain() {
        let scene = nested_scene();
        let child = scene.find("child").unwrap();
        let world = scene.world_matrix(child);
        assert!(vec_approx_eq(mat4::translation(world), Vec3::new(11.0, 2.0, 3.0)));
    }

    #[test]
    fn test_world_placement_of_child() {
        let scene = nested_scene();
        let child = scene.find("child").unwrap();
        let placement = graph::world_placement(&scene, child);
        assert_eq!(placement.position, Vec3::new(11.0, 2.0, 3.0));
        assert_eq!(placement.rotation, mat4::IDENTITY);
    }

    #[test]
    fn test_group_membership() {
        let mut scene = nested_scene();
        scene
            .add_node(NodeTemplate::empty("crate.001").instance_of("crate"))
            .unwrap();
        let instance = scene.find("crate.001").unwrap();
        let group = scene.instanced_group(instance).unwrap();
        assert_eq!(group.name, "crate");
        assert_eq!(group.members.len(), 1);
        assert!(is_group_instance(&scene, instance, 1));
        assert!(!is_group_instance(&scene, instance, 2));
        assert!(!is_group_instance(&scene, scene.find("root").unwrap(), 1));
    }

    #[test]
    fn test_default_bounds_are_unit_cube() {
        let scene = nested_scene();
        let corners = scene.local_bound_corners(scene.find("root").unwrap());
        assert!(corners.contains(&Vec3::new(-1.0, -1.0, -1.0)));
        assert!(corners.contains(&Vec3::ONE));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut scene = nested_scene();
        let err = scene.add_node(NodeTemplate::empty("root")).unwrap_err();
        assert!(matches!(err, SceneLoadError::DuplicateNode(name) if name == "root"));
    }

    #[test]
    fn test_unknown_group_member_rejected() {
        let mut scene = nested_scene();
        let err = scene.add_group("barrel", &["barrel_mesh"]).unwrap_err();
        assert_eq!(format!("{}", err), "Group 'barrel' lists unknown node 'barrel_mesh'");
    }

    #[test]
    fn test_unknown_instanced_group_rejected() {
        let file = SceneFile {
            nodes: vec![NodeTemplate::empty("ghost").instance_of("missing")],
            ..Default::default()
        };
        let err = Scene::from_file(file).err().unwrap();
        assert!(matches!(err, SceneLoadError::UnknownGroup { .. }));
    }

    #[test]
    fn test_mode_control() {
        let mut scene = Scene::new();
        assert_eq!(scene.interaction_mode(), InteractionMode::Object);
        scene.set_interaction_mode(InteractionMode::Edit);
        assert_eq!(scene.interaction_mode(), InteractionMode::Edit);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Scene::load("/nonexistent/level.ron").err().unwrap();
        assert!(matches!(err, SceneLoadError::Io(_)));
    }

    #[test]
    fn test_parse_scene_file_format() {
        let scene_ron = r#"
SceneFile(
    properties: { "mapname": "level1" },
    mode: Edit,
    nodes: [
        NodeTemplate(name: "crate_mesh", kind: Mesh),
        NodeTemplate(
            name: "StaticModels",
            attributes: { "entity_type": "STATIC_MODEL_LIST" },
            children: [
                NodeTemplate(
                    name: "crate_entry",
                    attributes: { "group": "crate", "link_path": "models", "link_file": "crate.mdl" },
                ),
            ],
        ),
        NodeTemplate(
            name: "crate.001",
            location: Vec3(x: 1.0, y: 2.0, z: 3.0),
            rotation: Quat(w: 1.0, x: 0.0, y: 0.0, z: 0.0),
            instance_of: Some("crate"),
            bounds: Some(Bounds(min: Vec3(x: -0.5, y: -0.5, z: 0.0), max: Vec3(x: 0.5, y: 0.5, z: 1.0))),
        ),
    ],
    groups: [ GroupTemplate(name: "crate", objects: ["crate_mesh"]) ],
)
"#;
        let file: SceneFile = ron::from_str(scene_ron).unwrap();
        let scene = Scene::from_file(file).unwrap();

        assert_eq!(scene.node_count(), 4);
        assert_eq!(scene.interaction_mode(), InteractionMode::Edit);
        assert_eq!(scene.properties().string("mapname"), Ok(Some("level1")));

        let list = scene.find("StaticModels").unwrap();
        assert_eq!(scene.kind(list), NodeKind::Empty);
        assert_eq!(scene.children(list).len(), 1);

        let mesh = scene.find("crate_mesh").unwrap();
        assert_eq!(scene.kind(mesh), NodeKind::Mesh);

        let instance = scene.find("crate.001").unwrap();
        assert_eq!(scene.local_location(instance), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.instanced_group(instance).unwrap().name, "crate");
        assert!(scene
            .local_bound_corners(instance)
            .contains(&Vec3::new(0.5, 0.5, 1.0)));
    }
}
