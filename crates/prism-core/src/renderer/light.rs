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

//! Light sources as a closed set of variants.
//!
//! Lights live in a flat list owned by the scene; nodes refer to them by index.
//! When a node is compiled, its world transform is pushed into the lights it
//! carries through [`Light::apply_world_transform`].

use crate::math::{LinearRgba, Quat, Vec3, FORWARD};

/// Properties shared by every light type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightCommon {
    /// The color of the light in linear RGB space.
    pub color: LinearRgba,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Disabled lights are kept in the scene but contribute nothing.
    pub enabled: bool,
}

impl Default for LightCommon {
    fn default() -> Self {
        Self {
            color: LinearRgba::WHITE,
            intensity: 1.0,
            enabled: true,
        }
    }
}

/// The type-specific payload of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// An infinitely distant light with parallel rays.
    Directional {
        /// Direction the light travels (normalized).
        direction: Vec3,
    },
    /// A light radiating in every direction from a point.
    Point {
        /// World-space position.
        position: Vec3,
        /// Distance beyond which the light has no effect.
        range: f32,
    },
    /// A light restricted to a cone.
    Spot {
        /// World-space position.
        position: Vec3,
        /// Direction the cone points to (normalized).
        direction: Vec3,
        /// Distance beyond which the light has no effect.
        range: f32,
        /// Angle in radians where the falloff starts.
        inner_cone_angle: f32,
        /// Angle in radians where the light is fully attenuated.
        outer_cone_angle: f32,
    },
}

/// The discriminant of a [`LightKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    /// See [`LightKind::Directional`].
    Directional,
    /// See [`LightKind::Point`].
    Point,
    /// See [`LightKind::Spot`].
    Spot,
}

/// Importer names of the light types.
pub const LIGHT_TYPE_NAMES: [(&str, LightType); 3] = [
    ("directional", LightType::Directional),
    ("point", LightType::Point),
    ("spot", LightType::Spot),
];

impl LightType {
    /// Looks a light type up by its importer name.
    pub fn from_name(name: &str) -> Option<Self> {
        LIGHT_TYPE_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, ty)| *ty)
    }

    /// The importer name of this type.
    pub fn name(self) -> &'static str {
        match self {
            LightType::Directional => "directional",
            LightType::Point => "point",
            LightType::Spot => "spot",
        }
    }
}

/// A light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Shared properties.
    pub common: LightCommon,
    /// Type-specific properties.
    pub kind: LightKind,
}

impl Light {
    /// A white directional light.
    pub fn directional(direction: Vec3) -> Self {
        Self {
            common: LightCommon::default(),
            kind: LightKind::Directional {
                direction: direction.normalize_or_zero(),
            },
        }
    }

    /// A white point light at the origin.
    pub fn point(range: f32) -> Self {
        Self {
            common: LightCommon::default(),
            kind: LightKind::Point {
                position: Vec3::ZERO,
                range,
            },
        }
    }

    /// A white spot light at the origin pointing down -Z.
    pub fn spot(range: f32, inner_cone_angle: f32, outer_cone_angle: f32) -> Self {
        Self {
            common: LightCommon::default(),
            kind: LightKind::Spot {
                position: Vec3::ZERO,
                direction: FORWARD,
                range,
                inner_cone_angle,
                outer_cone_angle,
            },
        }
    }

    /// Replaces the shared properties.
    #[must_use]
    pub fn with_common(mut self, common: LightCommon) -> Self {
        self.common = common;
        self
    }

    /// The type of this light.
    pub fn light_type(&self) -> LightType {
        match self.kind {
            LightKind::Directional { .. } => LightType::Directional,
            LightKind::Point { .. } => LightType::Point,
            LightKind::Spot { .. } => LightType::Spot,
        }
    }

    /// The world position, for lights that have one.
    pub fn position(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Directional { .. } => None,
            LightKind::Point { position, .. } | LightKind::Spot { position, .. } => Some(position),
        }
    }

    /// The direction, for lights that have one.
    pub fn direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Directional { direction } | LightKind::Spot { direction, .. } => {
                Some(direction)
            }
            LightKind::Point { .. } => None,
        }
    }

    /// Places the light at the translation and orientation of its owning node.
    ///
    /// Point lights take the translation. Spot lights also point along the
    /// rotated forward axis. Directional lights are left untouched.
    pub fn apply_world_transform(&mut self, translation: Vec3, rotation: Quat) {
        match &mut self.kind {
            LightKind::Directional { .. } => {}
            LightKind::Point { position, .. } => *position = translation,
            LightKind::Spot {
                position,
                direction,
                ..
            } => {
                *position = translation;
                *direction = (rotation * FORWARD).normalize();
            }
        }
    }
}
