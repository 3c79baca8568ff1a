//! Model and sound catalogs

use crate::entities::{ModelCatalogEntry, SoundEntry};
use crate::error::ExportError;
use crate::graph::SceneGraph;

use super::{require_empty, required_string};

/// Build a model catalog from a `*_MODEL_LIST` container
///
/// Every child must be an empty carrying `group`, `link_path` and
/// `link_file`. Child order is the catalog index order.
pub fn build_model_catalog<G: SceneGraph>(
    graph: &G,
    container: G::Node,
) -> Result<Vec<ModelCatalogEntry>, ExportError> {
    let list = graph.name(container);
    require_empty(graph, list, container, "model list")?;

    let mut entries = Vec::with_capacity(graph.children(container).len());
    for &child in graph.children(container) {
        require_empty(graph, list, child, "model list entry")?;
        let entry = ModelCatalogEntry {
            group: required_string(graph, list, child, "group")?,
            link_path: required_string(graph, list, child, "link_path")?,
            link_file: required_string(graph, list, child, "link_file")?,
        };
        log::debug!("Model [{}] '{}' -> {}", entries.len(), entry.group, entry.reference());
        entries.push(entry);
    }
    Ok(entries)
}

/// Build the sound catalog from a `SOUND_LIST` container
pub fn build_sound_catalog<G: SceneGraph>(
    graph: &G,
    container: G::Node,
) -> Result<Vec<SoundEntry>, ExportError> {
    let list = graph.name(container);
    require_empty(graph, list, container, "sound list")?;

    let mut entries = Vec::with_capacity(graph.children(container).len());
    for &child in graph.children(container) {
        require_empty(graph, list, child, "sound list entry")?;
        let entry = SoundEntry {
            link_path: required_string(graph, list, child, "link_path")?,
            link_file: required_string(graph, list, child, "link_file")?,
        };
        log::debug!("Sound [{}] {}", entries.len(), entry.reference());
        entries.push(entry);
    }
    Ok(entries)
}
