//! World validation
//!
//! The builders already reject malformed input node by node. The
//! [`WorldValidator`] re-checks the assembled [`WorldExport`] as a whole
//! before anything reaches disk: instance indices must land inside their
//! catalog, recorded animations must carry markers and trigger volumes must
//! have non-negative, finite extents.

use crate::entities::{CatalogKind, WorldExport};

/// Inconsistency found in an assembled world
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// An instance points past the end of its catalog
    InstanceOutOfRange {
        kind: CatalogKind,
        instance: usize,
        model: u32,
        catalog_len: usize,
    },
    /// A recorded camera animation has no markers
    EmptyAnimation(String),
    /// A door controller box has a negative or non-finite half extent
    InvalidHalfExtents(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InstanceOutOfRange { kind, instance, model, catalog_len } => {
                let section = match kind {
                    CatalogKind::Static => "static",
                    CatalogKind::Dynamic => "dynamic",
                };
                write!(
                    f,
                    "{} instance {} references model {} but the catalog has {} entries",
                    section, instance, model, catalog_len
                )
            }
            ValidationError::EmptyAnimation(name) => {
                write!(f, "Camera animation '{}' has no markers", name)
            }
            ValidationError::InvalidHalfExtents(name) => {
                write!(f, "Door controller '{}' has invalid half extents", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Consistency checks over a [`WorldExport`]
pub struct WorldValidator;

impl WorldValidator {
    /// Validate a world, returning every problem found
    pub fn validate(world: &WorldExport) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for kind in [CatalogKind::Static, CatalogKind::Dynamic] {
            let catalog_len = world.catalog(kind).len();
            for (instance, record) in world.instances(kind).iter().enumerate() {
                if record.model as usize >= catalog_len {
                    errors.push(ValidationError::InstanceOutOfRange {
                        kind,
                        instance,
                        model: record.model,
                        catalog_len,
                    });
                }
            }
        }

        for animation in &world.camera_animations {
            if animation.markers.is_empty() {
                errors.push(ValidationError::EmptyAnimation(animation.name.clone()));
            }
        }

        for controller in &world.door_controllers {
            let extents = controller.bbox.half_extents.to_array();
            if extents.iter().any(|e| !e.is_finite() || *e < 0.0) {
                errors.push(ValidationError::InvalidHalfExtents(controller.name.clone()));
            }
        }

        errors
    }

    /// Validate and return Result (Ok if no errors, Err with all errors)
    pub fn validate_or_error(world: &WorldExport) -> Result<(), Vec<ValidationError>> {
        let errors = Self::validate(world);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
