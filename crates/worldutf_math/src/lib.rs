//! 3D Mathematics Library
//!
//! This crate provides the small set of 3D types the World UTF exporter needs
//! to derive world-space placements from scene transforms.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - Rotation quaternion stored as (w, x, y, z)
//! - [`Mat4`] - Row-major 4x4 affine matrix
//!
//! ## Numeric Cleanup
//!
//! - [`Clean`] - Snaps near-zero components to exactly zero

mod vec3;
mod quat;
pub mod mat4;
pub mod clean;

pub use vec3::Vec3;
pub use quat::Quat;
pub use mat4::Mat4;
pub use clean::{Clean, CLEAN_EPSILON};
