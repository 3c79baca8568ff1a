//! Host interaction mode
//!
//! Authoring tools only expose up-to-date object data in object mode. The
//! exporter switches the host into object mode for the duration of a
//! traversal through [`ObjectModeGuard`], which restores the previous mode
//! when dropped, including when the traversal fails.

use std::ops::Deref;

use serde::{Serialize, Deserialize};

/// Editing mode of the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Object,
    Edit,
    Sculpt,
    VertexPaint,
    WeightPaint,
    TexturePaint,
    Pose,
}

/// Hosts whose interaction mode can be queried and switched
pub trait ModeControl {
    fn interaction_mode(&self) -> InteractionMode;
    fn set_interaction_mode(&mut self, mode: InteractionMode);
}

/// Keeps a host in object mode until dropped
pub struct ObjectModeGuard<'a, H: ModeControl> {
    host: &'a mut H,
    previous: InteractionMode,
}

impl<'a, H: ModeControl> ObjectModeGuard<'a, H> {
    /// Switch the host to object mode, remembering the current mode
    pub fn enter(host: &'a mut H) -> Self {
        let previous = host.interaction_mode();
        if previous != InteractionMode::Object {
            log::debug!("Switching host from {:?} to object mode", previous);
            host.set_interaction_mode(InteractionMode::Object);
        }
        Self { host, previous }
    }

    /// Mode that will be restored on drop
    pub fn previous(&self) -> InteractionMode {
        self.previous
    }
}

impl<H: ModeControl> Deref for ObjectModeGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: ModeControl> Drop for ObjectModeGuard<'_, H> {
    fn drop(&mut self) {
        if self.host.interaction_mode() != self.previous {
            log::debug!("Restoring host to {:?} mode", self.previous);
            self.host.set_interaction_mode(self.previous);
        }
    }
}
