//! End-to-end export tests
//!
//! These tests drive a complete export over in-memory scenes:
//! 1. Catalogs and instance lists resolve to stable indices
//! 2. Camera animations keep marker order
//! 3. Door controllers are found by tag or by name
//! 4. Files are written atomically and the host mode is restored

use std::fs;

use worldutf_core::{
    collect, export_to_file, export_to_writer, ExportError, ExportSettings, InteractionMode,
    ModeControl, NodeTemplate, Scene, SceneFile, SceneGraph, Vec3,
};

fn export_text(scene: &Scene, map_name: &str) -> Result<String, ExportError> {
    let bytes = export_to_writer(scene, map_name, Vec::new())?;
    Ok(String::from_utf8(bytes).expect("output should be UTF-8"))
}

/// Position of `line` in the output, panicking with the full text if absent
fn line_index(lines: &[&str], line: &str) -> usize {
    lines
        .iter()
        .position(|l| *l == line)
        .unwrap_or_else(|| panic!("line {:?} not found in:\n{}", line, lines.join("\n")))
}

fn catalog_entry(name: &str, group: &str) -> NodeTemplate {
    NodeTemplate::empty(name)
        .with_attr("group", group)
        .with_attr("link_path", "models")
        .with_attr("link_file", format!("{}.mdl", group))
}

/// A scene with `crate` and `barrel` mesh groups and a static catalog
/// listing them in that order
fn level_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_node(NodeTemplate::mesh("crate_mesh")).unwrap();
    scene.add_node(NodeTemplate::mesh("barrel_mesh")).unwrap();
    scene.add_group("crate", &["crate_mesh"]).unwrap();
    scene.add_group("barrel", &["barrel_mesh"]).unwrap();
    scene
        .add_node(
            NodeTemplate::empty("StaticModels")
                .with_attr("entity_type", "STATIC_MODEL_LIST")
                .with_child(catalog_entry("crate_entry", "crate"))
                .with_child(catalog_entry("barrel_entry", "barrel")),
        )
        .unwrap();
    scene
}

// ==================== Catalogs and Instances ====================

#[test]
fn test_static_catalog_line() {
    let mut scene = Scene::new();
    scene
        .add_node(
            NodeTemplate::empty("StaticModels")
                .with_attr("entity_type", "STATIC_MODEL_LIST")
                .with_child(catalog_entry("entry", "crate")),
        )
        .unwrap();

    let text = export_text(&scene, "level1").unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let at = line_index(&lines, "1 # number of static models");
    assert_eq!(lines[at + 1], "models\\crate.mdl");
}

#[test]
fn test_static_instance_record() {
    let mut scene = level_scene();
    scene
        .add_node(
            NodeTemplate::empty("StaticInstances")
                .with_attr("entity_type", "STATIC_MODEL_INSTANCES")
                .with_child(NodeTemplate::empty("crate.001").instance_of("crate").at(1.0, 2.0, 3.0)),
        )
        .unwrap();

    let text = export_text(&scene, "level1").unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let at = line_index(&lines, "1 # number of static model instances");
    assert_eq!(lines[at + 1], "0");
    assert_eq!(lines[at + 2], "1 2 3");
    assert_eq!(lines[at + 3], "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1");
}

#[test]
fn test_instance_indices_match_catalog_positions() {
    let mut scene = level_scene();
    scene
        .add_node(
            NodeTemplate::empty("StaticInstances")
                .with_attr("entity_type", "STATIC_MODEL_INSTANCES")
                .with_child(NodeTemplate::empty("barrel.001").instance_of("barrel"))
                .with_child(NodeTemplate::empty("crate.001").instance_of("crate"))
                .with_child(NodeTemplate::empty("barrel.002").instance_of("barrel")),
        )
        .unwrap();

    let world = collect(&scene).unwrap();
    for instance in &world.static_instances {
        let entry = &world.static_models[instance.model as usize];
        assert!(entry.group == "crate" || entry.group == "barrel");
    }
    let models: Vec<u32> = world.static_instances.iter().map(|i| i.model).collect();
    assert_eq!(models, vec![1, 0, 1]);
}

#[test]
fn test_instances_of_nested_container_are_in_world_space() {
    let mut scene = level_scene();
    scene
        .add_node(
            NodeTemplate::empty("Props").at(10.0, 0.0, 0.0).with_child(
                NodeTemplate::empty("StaticInstances")
                    .with_attr("entity_type", "STATIC_MODEL_INSTANCES")
                    .with_child(NodeTemplate::empty("crate.001").instance_of("crate").at(1.0, 2.0, 3.0)),
            ),
        )
        .unwrap();

    let world = collect(&scene).unwrap();
    assert_eq!(world.static_instances[0].position, Vec3::new(11.0, 2.0, 3.0));
}

#[test]
fn test_unmapped_group_aborts_export() {
    let mut scene = level_scene();
    scene.add_node(NodeTemplate::mesh("wall_mesh")).unwrap();
    scene.add_group("wall", &["wall_mesh"]).unwrap();
    scene
        .add_node(
            NodeTemplate::empty("StaticInstances")
                .with_attr("entity_type", "STATIC_MODEL_INSTANCES")
                .with_child(NodeTemplate::empty("wall.001").instance_of("wall")),
        )
        .unwrap();

    let err = export_text(&scene, "level1").unwrap_err();
    assert!(matches!(err, ExportError::Reference { .. }));
    let msg = err.to_string();
    assert!(msg.contains("StaticInstances"), "message should name the container: {}", msg);
    assert!(msg.contains("wall.001"), "message should name the child: {}", msg);
    assert!(msg.contains("must reference a model from a list"));
}

#[test]
fn test_dynamic_instances_use_dynamic_catalog() {
    let mut scene = level_scene();
    scene
        .add_node(
            NodeTemplate::empty("DynamicModels")
                .with_attr("entity_type", "DYNAMIC_MODEL_LIST")
                .with_child(catalog_entry("barrel_dyn", "barrel")),
        )
        .unwrap();
    scene
        .add_node(
            NodeTemplate::empty("DynamicInstances")
                .with_attr("entity_type", "DYNAMIC_MODEL_INSTANCES")
                .with_child(NodeTemplate::empty("barrel.001").instance_of("barrel")),
        )
        .unwrap();

    let world = collect(&scene).unwrap();
    assert_eq!(world.dynamic_instances.len(), 1);
    assert_eq!(world.dynamic_instances[0].model, 0);
    assert!(world.static_instances.is_empty());
}

#[test]
fn test_sound_catalog() {
    let mut scene = Scene::new();
    scene
        .add_node(
            NodeTemplate::empty("Sounds")
                .with_attr("entity_type", "SOUND_LIST")
                .with_child(
                    NodeTemplate::empty("wind")
                        .with_attr("link_path", "sounds")
                        .with_attr("link_file", "wind.wav"),
                ),
        )
        .unwrap();

    let text = export_text(&scene, "level1").unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let at = line_index(&lines, "1 # number of sounds");
    assert_eq!(lines[at + 1], "sounds\\wind.wav");
}

// ==================== Camera Animations ====================

fn marker_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_node(NodeTemplate::mesh("marker_mesh")).unwrap();
    scene.add_group("marker", &["marker_mesh"]).unwrap();
    scene
}

#[test]
fn test_camera_animation_two_markers() {
    let mut scene = marker_scene();
    scene
        .add_node(
            NodeTemplate::empty("Flyby")
                .with_attr("entity_type", "CAMERA_ANIMATION")
                .with_child(NodeTemplate::empty("Flyby.m0").instance_of("marker").at(0.0, -5.0, 2.0))
                .with_child(NodeTemplate::empty("Flyby.m1").instance_of("marker").at(5.0, 0.0, 2.0)),
        )
        .unwrap();

    let text = export_text(&scene, "level1").unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let at = line_index(&lines, "1 # number of camera animations");
    assert_eq!(lines[at + 1], "Flyby");
    assert_eq!(lines[at + 4], "0");
    assert_eq!(lines[at + 5], "2 # of markers");

    // each marker: position, matrix, euler, index, speed, flag, fovy, flag
    let first = at + 6;
    let second = first + 8;
    assert_eq!(lines[first], "0 -5 2");
    assert_eq!(lines[first + 3], "0");
    assert_eq!(lines[second], "5 0 2");
    assert_eq!(lines[second + 3], "1");
    assert_eq!(lines[second + 4], "1");
    assert_eq!(lines[second + 5], "1");
    assert_eq!(lines[second + 6], "60");
    assert_eq!(lines[second + 7], "1");
}

#[test]
fn test_empty_camera_animation_not_emitted() {
    let mut scene = marker_scene();
    scene
        .add_node(NodeTemplate::empty("Idle").with_attr("entity_type", "CAMERA_ANIMATION"))
        .unwrap();

    let world = collect(&scene).unwrap();
    assert!(world.camera_animations.is_empty());
    let text = export_text(&scene, "level1").unwrap();
    assert!(text.contains("0 # number of camera animations\n"));
}

// ==================== Door Controllers ====================

#[test]
fn test_door_controller_by_name_convention() {
    let mut scene = Scene::new();
    scene.add_node(NodeTemplate::mesh("DC_Door01")).unwrap();
    scene.add_group("door_trigger", &["DC_Door01"]).unwrap();
    scene
        .add_node(
            NodeTemplate::empty("Trigger.001")
                .instance_of("door_trigger")
                .at(2.0, 0.0, 0.0)
                .scaled(Vec3::new(1.0, 0.5, 2.0)),
        )
        .unwrap();

    let text = export_text(&scene, "level1").unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let at = line_index(&lines, "1 # number of door controllers");
    assert_eq!(
        &lines[at + 1..],
        &["Trigger.001", "2 0 0", "1 0 0 0", "1 0.5 2", "none", "none", "none", "none", "none"]
    );
}

#[test]
fn test_door_member_tag_overrides_name() {
    let mut scene = Scene::new();
    scene
        .add_node(NodeTemplate::mesh("DC_Prop").with_attr("entity_type", "STATIC_MODEL"))
        .unwrap();
    scene.add_group("prop", &["DC_Prop"]).unwrap();
    scene.add_node(NodeTemplate::empty("Prop.001").instance_of("prop")).unwrap();

    let world = collect(&scene).unwrap();
    assert!(world.door_controllers.is_empty());
}

// ==================== Full File ====================

#[test]
fn test_full_file_section_order() {
    let mut scene = level_scene();
    scene
        .add_node(
            NodeTemplate::empty("StaticInstances")
                .with_attr("entity_type", "STATIC_MODEL_INSTANCES")
                .with_child(NodeTemplate::empty("crate.001").instance_of("crate")),
        )
        .unwrap();

    let text = export_text(&scene, "castle").unwrap();
    let banners: Vec<&str> = text.lines().filter(|l| l.starts_with("### ")).collect();
    assert_eq!(
        banners,
        vec![
            "### STATIC MODELS",
            "### DYNAMIC MODELS",
            "### SOUNDS",
            "### STATIC MODEL INSTANCES",
            "### DYNAMIC MODEL INSTANCES",
            "### CAMERA ANIMATIONS",
            "### DOOR CONTROLLERS",
        ]
    );
    assert!(text.starts_with("castle\n"));
    assert!(text.ends_with("0 # number of door controllers\n"));
}

#[test]
fn test_export_is_deterministic() {
    let scene = level_scene();
    assert_eq!(export_text(&scene, "a").unwrap(), export_text(&scene, "a").unwrap());
}

// ==================== Files and Host Mode ====================

fn settings_in(dir: &std::path::Path) -> ExportSettings {
    ExportSettings {
        directory: dir.to_path_buf(),
        name: "level".to_string(),
        extension: "txt".to_string(),
        map_name: "level1".to_string(),
    }
}

#[test]
fn test_export_to_file_writes_target() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = level_scene();

    let path = export_to_file(&mut scene, &settings_in(dir.path())).unwrap();
    assert_eq!(path, dir.path().join("level.txt"));

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("level1\n"));
    assert!(text.contains("models\\barrel.mdl\n"));

    let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1, "temporary file should have been renamed");
}

#[test]
fn test_failed_export_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("level.txt");
    fs::write(&target, "previous export\n").unwrap();

    let mut scene = level_scene();
    scene
        .add_node(NodeTemplate::mesh("Broken").with_attr("entity_type", "SOUND_LIST"))
        .unwrap();

    let err = export_to_file(&mut scene, &settings_in(dir.path())).unwrap_err();
    assert!(matches!(err, ExportError::Schema { .. }));
    assert_eq!(fs::read_to_string(&target).unwrap(), "previous export\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_mode_restored_after_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = level_scene();
    scene.set_interaction_mode(InteractionMode::Edit);

    export_to_file(&mut scene, &settings_in(dir.path())).unwrap();
    assert_eq!(scene.interaction_mode(), InteractionMode::Edit);
}

#[test]
fn test_mode_restored_after_failed_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = level_scene();
    scene
        .add_node(
            NodeTemplate::empty("StaticInstances")
                .with_attr("entity_type", "STATIC_MODEL_INSTANCES")
                .with_child(NodeTemplate::empty("loose")),
        )
        .unwrap();
    scene.set_interaction_mode(InteractionMode::Sculpt);

    assert!(export_to_file(&mut scene, &settings_in(dir.path())).is_err());
    assert_eq!(scene.interaction_mode(), InteractionMode::Sculpt);
}

// ==================== Scene Files ====================

const LEVEL_RON: &str = r#"
SceneFile(
    properties: { "mapname": "castle" },
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
            name: "StaticInstances",
            attributes: { "entity_type": "STATIC_MODEL_INSTANCES" },
            children: [
                NodeTemplate(name: "crate.001", instance_of: Some("crate"), location: (x: 1.0, y: 2.0, z: 3.0)),
            ],
        ),
    ],
    groups: [
        GroupTemplate(name: "crate", objects: ["crate_mesh"]),
    ],
)
"#;

#[test]
fn test_load_and_export_ron_scene() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("castle.ron");
    fs::write(&scene_path, LEVEL_RON).unwrap();

    let mut scene = Scene::load(&scene_path).unwrap();
    assert_eq!(scene.interaction_mode(), InteractionMode::Edit);
    assert_eq!(scene.node_count(), 5);

    let settings =
        ExportSettings::resolve(&Default::default(), scene.properties(), scene.source()).unwrap();
    assert_eq!(settings.map_name, "castle");
    assert_eq!(settings.path(), dir.path().join("castle.txt"));

    let path = export_to_file(&mut scene, &settings).unwrap();
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("1 # number of static model instances\n0\n1 2 3\n"));
}

#[test]
fn test_scene_file_rejects_unknown_group() {
    let file: SceneFile = ron::from_str(
        r#"SceneFile(nodes: [NodeTemplate(name: "a", instance_of: Some("missing"))])"#,
    )
    .unwrap();
    assert!(Scene::from_file(file).is_err());
}

#[test]
fn test_scene_graph_enumerates_all_nodes() {
    let scene = level_scene();
    assert_eq!(scene.nodes().len(), scene.node_count());
}
