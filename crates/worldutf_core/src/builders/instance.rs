//! Model instances

use std::collections::HashMap;

use crate::entities::{CatalogKind, ModelCatalogEntry, ModelInstance};
use crate::error::ExportError;
use crate::graph::{self, SceneGraph};

use super::{check_entity_type, require_empty};

/// Group name to catalog index lookup
pub struct CatalogIndex {
    indices: HashMap<String, u32>,
}

impl CatalogIndex {
    /// Index a catalog by group name
    ///
    /// When two entries share a group name the first one wins.
    pub fn new(catalog: &[ModelCatalogEntry]) -> Self {
        let mut indices = HashMap::with_capacity(catalog.len());
        for (i, entry) in catalog.iter().enumerate() {
            if indices.contains_key(&entry.group) {
                log::warn!("Duplicate catalog group '{}' at index {} ignored", entry.group, i);
                continue;
            }
            indices.insert(entry.group.clone(), i as u32);
        }
        Self { indices }
    }

    pub fn get(&self, group: &str) -> Option<u32> {
        self.indices.get(group).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Build placed instances from a `*_MODEL_INSTANCES` container
///
/// Each child must be an empty instancing a non-empty group whose name
/// appears in `catalog`.
pub fn build_instances<G: SceneGraph>(
    graph: &G,
    container: G::Node,
    catalog: &[ModelCatalogEntry],
    kind: CatalogKind,
) -> Result<Vec<ModelInstance>, ExportError> {
    let list = graph.name(container);
    require_empty(graph, list, container, "instance list")?;

    let index = CatalogIndex::new(catalog);
    let mut instances = Vec::with_capacity(graph.children(container).len());

    for &child in graph.children(container) {
        let name = graph.name(child);
        require_empty(graph, list, child, "model instance")?;

        let group = graph.instanced_group(child).ok_or_else(|| {
            ExportError::schema(list, name, "model instance must reference a group")
        })?;
        if group.members.is_empty() {
            return Err(ExportError::schema(
                list,
                name,
                format!("referenced group '{}' is empty", group.name),
            ));
        }
        let model = index
            .get(group.name)
            .ok_or_else(|| ExportError::reference(list, name, group.name))?;

        check_entity_type(graph, list, child, kind.instance_tag())?;

        let placement = graph::world_placement(graph, child);
        log::debug!("Instance '{}' -> model {} at {:?}", name, model, placement.position);
        instances.push(ModelInstance {
            model,
            position: placement.position,
            rotation: placement.rotation,
        });
    }
    Ok(instances)
}
