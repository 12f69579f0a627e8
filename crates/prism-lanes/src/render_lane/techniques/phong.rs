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
use crate::render_lane::shaders::PHONG_GLSL;
use crate::render_lane::ShadingTechnique;

const SLOTS: &[TextureSlot] = &[
    TextureSlot::Diffuse,
    TextureSlot::Specular,
    TextureSlot::Normal,
    TextureSlot::Emissive,
];

/// Blinn-Phong shading driven by the specular color and shininess factors.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhongTechnique;

impl PhongTechnique {
    fn varyings(material: &Material) -> Vec<String> {
        let format = material.vertex_format();
        let mut decls = vec![
            "vec3 v_world_position".to_owned(),
            "vec3 v_world_normal".to_owned(),
        ];
        if format.has(VertexAttributes::COLOR) {
            decls.push("vec4 v_color".to_owned());
        }
        decls.extend(uv_varyings(format));
        decls
    }
}

impl ShadingTechnique for PhongTechnique {
    fn family(&self) -> &'static str {
        "phong"
    }

    fn shader_source(&self) -> &'static str {
        PHONG_GLSL
    }

    fn texture_slots(&self) -> &'static [TextureSlot] {
        SLOTS
    }

    fn shader_defines(&self, material: &Material) -> Vec<String> {
        let mut defines = vertex_format_defines(material.vertex_format());
        defines.extend(texture_defines(material, SLOTS));
        if !material.vertex_format().has(VertexAttributes::NORMAL) {
            defines.push("FLAT_NORMALS".to_owned());
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_data::VertexFormat;

    #[test]
    fn missing_normals_fall_back_to_flat_shading() {
        let material = Material::new("m", VertexFormat::default());
        assert_eq!(
            PhongTechnique.shader_defines(&material),
            vec!["FLAT_NORMALS"]
        );
        // The normal is still interpolated; the vertex stage writes a face normal.
        assert_eq!(PhongTechnique.fragment_inputs(&material).len(), 2);
    }
}
