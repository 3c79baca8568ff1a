//! Numeric cleanup
//!
//! Transform composition leaves tiny residues such as `6.1e-17` where an
//! exact zero was meant. Every vector and matrix written to a World UTF file
//! passes through [`Clean`] first so those residues are emitted as `0`.

use crate::{Mat4, Quat, Vec3};

/// Components whose absolute value is below this are snapped to zero
pub const CLEAN_EPSILON: f32 = 1e-5;

/// Snap near-zero components to exactly `0.0`
///
/// Cleaning is idempotent: `x.cleaned().cleaned() == x.cleaned()`.
pub trait Clean {
    fn cleaned(self) -> Self;
}

impl Clean for f32 {
    #[inline]
    fn cleaned(self) -> Self {
        // also folds -0.0 into 0.0
        if self.abs() < CLEAN_EPSILON {
            0.0
        } else {
            self
        }
    }
}

impl Clean for Vec3 {
    fn cleaned(self) -> Self {
        Vec3::new(self.x.cleaned(), self.y.cleaned(), self.z.cleaned())
    }
}

impl Clean for Quat {
    fn cleaned(self) -> Self {
        Quat::new(self.w.cleaned(), self.x.cleaned(), self.y.cleaned(), self.z.cleaned())
    }
}

impl Clean for Mat4 {
    fn cleaned(self) -> Self {
        self.map(|row| row.map(Clean::cleaned))
    }
}
