// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mathematics primitives used across Prism.
//!
//! Linear algebra comes from [`glam`] and is re-exported here so that downstream
//! crates never name `glam` directly. Matrices are column-major and compose
//! right-to-left: `parent * local` maps a point from local space into the
//! parent's space.

pub mod color;

pub use self::color::LinearRgba;
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

/// The canonical forward axis of a light or camera in its local space.
pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// The translation and rotation extracted from an affine world transform.
///
/// Scale is discarded; lights only care about where they are and where they point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidParts {
    /// The world-space translation.
    pub translation: Vec3,
    /// The world-space rotation.
    pub rotation: Quat,
}

impl RigidParts {
    /// Decomposes an affine matrix into its translation and rotation.
    ///
    /// A singular matrix yields an unspecified rotation.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        if scale.min_element().abs() < EPSILON {
            log::warn!("Decomposing a degenerate transform with scale {scale}");
        }
        Self {
            translation,
            rotation,
        }
    }

    /// Rotates the canonical [`FORWARD`] axis and normalizes the result.
    pub fn forward(&self) -> Vec3 {
        (self.rotation * FORWARD).normalize()
    }
}

/// Performs an approximate equality comparison using [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rigid_parts_extracts_translation_and_rotation() {
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            rotation,
            Vec3::new(1.0, 2.0, 3.0),
        );

        let parts = RigidParts::from_matrix(&matrix);

        assert_abs_diff_eq!(parts.translation, Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
        // A quarter turn around +Y takes -Z to -X.
        assert_abs_diff_eq!(parts.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn identity_points_forward() {
        let parts = RigidParts::from_matrix(&Mat4::IDENTITY);
        assert_abs_diff_eq!(parts.forward(), FORWARD, epsilon = EPSILON);
        assert!(approx_eq(parts.translation.length(), 0.0));
    }
}
