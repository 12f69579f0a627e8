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

use super::{interface, texture_defines, uv_varyings, vertex_attribute_inputs, Direction};
use crate::render_lane::shaders::UNLIT_GLSL;
use crate::render_lane::ShadingTechnique;

const SLOTS: &[TextureSlot] = &[TextureSlot::BaseColor];

/// Base color only, no lighting.
///
/// Normals and tangents stay in the vertex layout but are never interpolated.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlitTechnique;

impl UnlitTechnique {
    fn varyings(material: &Material) -> Vec<String> {
        let format = material.vertex_format();
        let mut decls = Vec::new();
        if format.has(VertexAttributes::COLOR) {
            decls.push("vec4 v_color".to_owned());
        }
        if material.texture(TextureSlot::BaseColor).is_some() {
            decls.extend(uv_varyings(format));
        }
        decls
    }
}

impl ShadingTechnique for UnlitTechnique {
    fn family(&self) -> &'static str {
        "unlit"
    }

    fn shader_source(&self) -> &'static str {
        UNLIT_GLSL
    }

    fn texture_slots(&self) -> &'static [TextureSlot] {
        SLOTS
    }

    fn shader_defines(&self, material: &Material) -> Vec<String> {
        let mut defines = Vec::new();
        if material.vertex_format().has(VertexAttributes::COLOR) {
            defines.push("HAS_VERTEX_COLOR".to_owned());
        }
        defines.extend(texture_defines(material, SLOTS));
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::renderer::TextureViewId;
    use prism_data::VertexFormat;

    #[test]
    fn uvs_are_only_interpolated_when_sampled() {
        let format = VertexFormat::new(VertexAttributes::POSITION, 1);
        let flat = Material::new("flat", format);
        let textured =
            Material::new("tex", format).with_texture(TextureSlot::BaseColor, TextureViewId(3), 0);

        assert!(UnlitTechnique.fragment_inputs(&flat).is_empty());
        assert_eq!(
            UnlitTechnique.fragment_inputs(&textured),
            vec!["layout(location = 0) in vec2 v_uv0"]
        );
        assert_eq!(UnlitTechnique.material_layout_entries(&textured).len(), 3);
    }
}
