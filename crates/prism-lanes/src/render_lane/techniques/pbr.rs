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

use prism_data::{Material, TextureSlot, VertexAttributes};

use super::{
    interface, texture_defines, uv_varyings, vertex_attribute_inputs, vertex_format_defines,
    Direction,
};
use crate::render_lane::shaders::PBR_GLSL;
use crate::render_lane::{ShadingTechnique, VariantParams};

/// Set in [`VariantParams::flags`] when the fragment stage must derive a
/// tangent frame from screen-space derivatives.
pub const DERIVE_TANGENT_FRAME: u32 = 1 << 0;

const SLOTS: &[TextureSlot] = &[
    TextureSlot::BaseColor,
    TextureSlot::MetallicRoughness,
    TextureSlot::Normal,
    TextureSlot::Occlusion,
    TextureSlot::Emissive,
];

/// Metallic-roughness physically based shading.
#[derive(Debug, Default, Clone, Copy)]
pub struct PbrTechnique;

impl PbrTechnique {
    fn derives_tangents(material: &Material) -> bool {
        material.texture(TextureSlot::Normal).is_some()
            && !material.vertex_format().has(VertexAttributes::TANGENT)
    }

    fn varyings(material: &Material) -> Vec<String> {
        let format = material.vertex_format();
        let mut decls = vec!["vec3 v_world_position".to_owned()];
        if format.has(VertexAttributes::NORMAL) {
            decls.push("vec3 v_world_normal".to_owned());
        }
        if format.has(VertexAttributes::TANGENT) {
            decls.push("vec4 v_world_tangent".to_owned());
        }
        if format.has(VertexAttributes::COLOR) {
            decls.push("vec4 v_color".to_owned());
        }
        decls.extend(uv_varyings(format));
        decls
    }
}

impl ShadingTechnique for PbrTechnique {
    fn family(&self) -> &'static str {
        "pbr"
    }

    fn shader_source(&self) -> &'static str {
        PBR_GLSL
    }

    fn texture_slots(&self) -> &'static [TextureSlot] {
        SLOTS
    }

    fn shader_defines(&self, material: &Material) -> Vec<String> {
        let mut defines = vertex_format_defines(material.vertex_format());
        defines.extend(texture_defines(material, SLOTS));
        if Self::derives_tangents(material) {
            defines.push("DERIVE_TANGENT_FRAME".to_owned());
        }
        defines
    }

    fn vertex_inputs(&self, material: &Material) -> Vec<String> {
        vertex_attribute_inputs(material.vertex_format())
    }

    fn vertex_outputs(&self, material: &Material) -> Vec<String> {
        interface(Direction::Out, &Self::varyings(material))
    }

    fn fragment_inputs(&self, material: &Material) -> Vec<String> {
        interface(Direction::In, &Self::varyings(material))
    }

    fn variant_params(&self, material: &Material) -> VariantParams {
        let format = material.vertex_format();
        VariantParams {
            attribute_mask: format.attributes().bits(),
            texcoord_sets: u32::from(format.texcoord_sets()),
            texture_count: self.bound_textures(material).len() as u32,
            flags: if Self::derives_tangents(material) {
                DERIVE_TANGENT_FRAME
            } else {
                0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::renderer::TextureViewId;
    use prism_data::VertexFormat;

    fn lit() -> VertexFormat {
        VertexFormat::new(VertexAttributes::POSITION | VertexAttributes::NORMAL, 1)
    }

    #[test]
    fn normal_map_without_tangents_derives_frame() {
        let material =
            Material::new("m", lit()).with_texture(TextureSlot::Normal, TextureViewId(1), 0);
        let defines = PbrTechnique.shader_defines(&material);
        assert!(defines.contains(&"HAS_NORMAL_MAP".to_owned()));
        assert_eq!(
            defines.last().map(String::as_str),
            Some("DERIVE_TANGENT_FRAME")
        );
        assert_eq!(
            PbrTechnique.variant_params(&material).flags,
            DERIVE_TANGENT_FRAME
        );
    }

    #[test]
    fn unsupported_slots_are_ignored() {
        let plain = Material::new("a", lit());
        let with_diffuse =
            Material::new("b", lit()).with_texture(TextureSlot::Diffuse, TextureViewId(1), 0);
        assert_eq!(
            PbrTechnique.shader_defines(&plain),
            PbrTechnique.shader_defines(&with_diffuse)
        );
        assert_eq!(PbrTechnique.material_layout_entries(&with_diffuse).len(), 2);
    }

    #[test]
    fn vertex_outputs_feed_fragment_inputs() {
        let material = Material::new("m", lit());
        let outputs = PbrTechnique.vertex_outputs(&material);
        let inputs = PbrTechnique.fragment_inputs(&material);
        assert_eq!(outputs.len(), inputs.len());
        assert_eq!(outputs[1], "layout(location = 1) out vec3 v_world_normal");
        assert_eq!(inputs[1], "layout(location = 1) in vec3 v_world_normal");
    }
}
