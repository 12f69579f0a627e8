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

//! Materials and the vertex formats they require.
//!
//! A [`Material`] is pure data. Two parts of it matter to the draw-submission
//! lanes:
//!
//! - The **shading requirements**: the shader id, the [`VertexFormat`] the
//!   meshes drawn with it provide, and which texture slots are bound with which
//!   texcoord set. These decide which compiled shader variant the material
//!   needs and are fixed at construction.
//! - The **factors** (base color, metallic, roughness, ...), written into the
//!   material's uniform buffer. Importers may adjust them with the `set_*`
//!   methods.
//!
//! # Examples
//!
//! ```
//! use prism_core::math::LinearRgba;
//! use prism_core::renderer::TextureViewId;
//! use prism_data::{Material, TextureSlot, VertexAttributes, VertexFormat};
//!
//! let format = VertexFormat::new(VertexAttributes::POSITION | VertexAttributes::NORMAL, 1);
//! let brick = Material::new("brick", format)
//!     .with_shader("pbr")
//!     .with_base_color(LinearRgba::rgb(0.6, 0.3, 0.2))
//!     .with_roughness(0.9)
//!     .with_texture(TextureSlot::BaseColor, TextureViewId(4), 0);
//!
//! assert_eq!(brick.shader_id(), Some("pbr"));
//! assert!(brick.texture(TextureSlot::BaseColor).is_some());
//! ```

use std::collections::BTreeMap;

use prism_core::math::{LinearRgba, Vec3};
use prism_core::renderer::{MaterialUniforms, TextureViewId};

prism_core::prism_bitflags! {
    /// The per-vertex attributes a mesh provides.
    pub struct VertexAttributes: u32 {
        /// Object-space position.
        const POSITION = 1 << 0;
        /// Object-space normal.
        const NORMAL = 1 << 1;
        /// Tangent with handedness in w.
        const TANGENT = 1 << 2;
        /// Per-vertex color.
        const COLOR = 1 << 3;
        /// At least one texture coordinate set.
        const TEXCOORD = 1 << 4;
        /// Skinning joint indices.
        const JOINTS = 1 << 5;
        /// Skinning joint weights.
        const WEIGHTS = 1 << 6;
    }
}

/// The vertex layout a mesh provides and a material requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexFormat {
    attributes: VertexAttributes,
    texcoord_sets: u8,
}

impl VertexFormat {
    /// Creates a format. A non-zero `texcoord_sets` implies
    /// [`VertexAttributes::TEXCOORD`], and the flag without sets is dropped.
    pub fn new(attributes: VertexAttributes, texcoord_sets: u8) -> Self {
        let mut attributes = attributes;
        attributes.set(VertexAttributes::TEXCOORD, texcoord_sets > 0);
        Self {
            attributes,
            texcoord_sets,
        }
    }

    /// The attribute mask.
    pub fn attributes(&self) -> VertexAttributes {
        self.attributes
    }

    /// The number of texture coordinate sets.
    pub fn texcoord_sets(&self) -> u8 {
        self.texcoord_sets
    }

    /// `true` if every attribute of `attributes` is present.
    pub fn has(&self, attributes: VertexAttributes) -> bool {
        self.attributes.contains(attributes)
    }
}

impl Default for VertexFormat {
    fn default() -> Self {
        Self::new(VertexAttributes::POSITION, 0)
    }
}

/// The texture slots a material can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    /// Albedo.
    BaseColor,
    /// Metallic in blue, roughness in green.
    MetallicRoughness,
    /// Tangent-space normal map.
    Normal,
    /// Ambient occlusion in red.
    Occlusion,
    /// Emissive color.
    Emissive,
    /// Specular color.
    Specular,
    /// Diffuse color for non-PBR shading.
    Diffuse,
}

impl TextureSlot {
    /// Every slot, in binding order.
    pub const ALL: [TextureSlot; 7] = [
        TextureSlot::BaseColor,
        TextureSlot::MetallicRoughness,
        TextureSlot::Normal,
        TextureSlot::Occlusion,
        TextureSlot::Emissive,
        TextureSlot::Specular,
        TextureSlot::Diffuse,
    ];

    /// Upper-case name used to build shader defines, e.g. `BASE_COLOR`.
    pub const fn define_name(self) -> &'static str {
        match self {
            TextureSlot::BaseColor => "BASE_COLOR",
            TextureSlot::MetallicRoughness => "METALLIC_ROUGHNESS",
            TextureSlot::Normal => "NORMAL",
            TextureSlot::Occlusion => "OCCLUSION",
            TextureSlot::Emissive => "EMISSIVE",
            TextureSlot::Specular => "SPECULAR",
            TextureSlot::Diffuse => "DIFFUSE",
        }
    }
}

/// A texture bound to a slot, sampled with one texcoord set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    /// The texture view.
    pub texture: TextureViewId,
    /// Which texcoord set the shader samples it with.
    pub texcoord_set: u8,
}

/// Surface appearance of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    shader_id: Option<String>,
    vertex_format: VertexFormat,
    base_color: LinearRgba,
    metallic: f32,
    roughness: f32,
    emissive: Vec3,
    specular: Vec3,
    shininess: f32,
    occlusion_strength: f32,
    textures: BTreeMap<TextureSlot, TextureBinding>,
}

impl Material {
    /// Creates a material with default factors and no textures.
    pub fn new(name: impl Into<String>, vertex_format: VertexFormat) -> Self {
        Self {
            name: name.into(),
            shader_id: None,
            vertex_format,
            base_color: LinearRgba::WHITE,
            metallic: 1.0,
            roughness: 1.0,
            emissive: Vec3::ZERO,
            specular: Vec3::ONE,
            shininess: 32.0,
            occlusion_strength: 1.0,
            textures: BTreeMap::new(),
        }
    }

    /// Selects the shading technique by id.
    #[must_use]
    pub fn with_shader(mut self, shader_id: impl Into<String>) -> Self {
        self.shader_id = Some(shader_id.into());
        self
    }

    /// Binds `texture` to `slot`, sampled with `texcoord_set`.
    #[must_use]
    pub fn with_texture(
        mut self,
        slot: TextureSlot,
        texture: TextureViewId,
        texcoord_set: u8,
    ) -> Self {
        self.textures.insert(
            slot,
            TextureBinding {
                texture,
                texcoord_set,
            },
        );
        self
    }

    /// Sets the base color.
    #[must_use]
    pub fn with_base_color(mut self, color: LinearRgba) -> Self {
        self.base_color = color;
        self
    }

    /// Sets the metallic factor.
    #[must_use]
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    /// Sets the roughness factor.
    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    /// Sets the emissive color.
    #[must_use]
    pub fn with_emissive(mut self, emissive: Vec3) -> Self {
        self.emissive = emissive;
        self
    }

    /// Sets the specular color and exponent.
    #[must_use]
    pub fn with_specular(mut self, specular: Vec3, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    /// Sets the base color.
    pub fn set_base_color(&mut self, color: LinearRgba) {
        self.base_color = color;
    }

    /// Sets the metallic factor.
    pub fn set_metallic(&mut self, metallic: f32) {
        self.metallic = metallic;
    }

    /// Sets the roughness factor.
    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness;
    }

    /// Sets the emissive color.
    pub fn set_emissive(&mut self, emissive: Vec3) {
        self.emissive = emissive;
    }

    /// Sets the specular color.
    pub fn set_specular(&mut self, specular: Vec3) {
        self.specular = specular;
    }

    /// Sets the specular exponent.
    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess;
    }

    /// Sets how strongly the occlusion map darkens the surface.
    pub fn set_occlusion_strength(&mut self, strength: f32) {
        self.occlusion_strength = strength;
    }

    /// The material name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The requested shading technique, if any.
    pub fn shader_id(&self) -> Option<&str> {
        self.shader_id.as_deref()
    }

    /// The vertex format of the meshes drawn with this material.
    pub fn vertex_format(&self) -> VertexFormat {
        self.vertex_format
    }

    /// Base color factor.
    pub fn base_color(&self) -> LinearRgba {
        self.base_color
    }

    /// Metallic factor.
    pub fn metallic(&self) -> f32 {
        self.metallic
    }

    /// Roughness factor.
    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    /// Emissive color.
    pub fn emissive(&self) -> Vec3 {
        self.emissive
    }

    /// Specular color.
    pub fn specular(&self) -> Vec3 {
        self.specular
    }

    /// Specular exponent.
    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Occlusion strength.
    pub fn occlusion_strength(&self) -> f32 {
        self.occlusion_strength
    }

    /// The texture bound to `slot`.
    pub fn texture(&self, slot: TextureSlot) -> Option<&TextureBinding> {
        self.textures.get(&slot)
    }

    /// Every bound texture, in slot order.
    pub fn textures(&self) -> impl Iterator<Item = (TextureSlot, &TextureBinding)> {
        self.textures.iter().map(|(slot, binding)| (*slot, binding))
    }

    /// The factors laid out for the material uniform buffer.
    pub fn uniforms(&self) -> MaterialUniforms {
        MaterialUniforms {
            base_color: self.base_color,
            emissive: LinearRgba::from_vec3(self.emissive).with_alpha(self.occlusion_strength),
            specular: LinearRgba::from_vec3(self.specular).with_alpha(self.shininess),
            metallic_roughness: [self.metallic, self.roughness, 0.0, 0.0],
        }
    }
}
