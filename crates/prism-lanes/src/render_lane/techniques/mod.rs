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

//! Built-in shading techniques and the helpers they share.
//!
//! Stage interfaces are GLSL declarations. The shader sources are GLSL
//! programs compiled once per stage by the backend, with the variant's
//! defines prepended.

mod pbr;
mod phong;
mod unlit;

pub use pbr::PbrTechnique;
pub use phong::PhongTechnique;
pub use unlit::UnlitTechnique;

use prism_data::{Material, TextureSlot, VertexAttributes, VertexFormat};

use crate::render_lane::FIRST_TEXTURE_BINDING;

/// Defines derived from the vertex format alone.
pub(crate) fn vertex_format_defines(format: VertexFormat) -> Vec<String> {
    let mut defines = Vec::new();
    if format.has(VertexAttributes::NORMAL) {
        defines.push("HAS_NORMALS".to_owned());
    }
    if format.has(VertexAttributes::TANGENT) {
        defines.push("HAS_TANGENTS".to_owned());
    }
    if format.has(VertexAttributes::COLOR) {
        defines.push("HAS_VERTEX_COLOR".to_owned());
    }
    if format.texcoord_sets() > 0 {
        defines.push(format!("TEXCOORD_SETS {}", format.texcoord_sets()));
    }
    defines
}

/// `HAS_<SLOT>_MAP`, `<SLOT>_UV n` and `<SLOT>_BINDING b` for every texture
/// of `material` in `slots`. Bindings are dense, starting at
/// [`FIRST_TEXTURE_BINDING`].
pub(crate) fn texture_defines(material: &Material, slots: &[TextureSlot]) -> Vec<String> {
    let mut defines = Vec::new();
    let mut binding = FIRST_TEXTURE_BINDING;
    for &slot in slots {
        if let Some(texture) = material.texture(slot) {
            let name = slot.define_name();
            defines.push(format!("HAS_{name}_MAP"));
            defines.push(format!("{name}_UV {}", texture.texcoord_set));
            defines.push(format!("{name}_BINDING {binding}"));
            binding += 1;
        }
    }
    defines
}

/// Vertex buffer attributes in location order.
pub(crate) fn vertex_attribute_inputs(format: VertexFormat) -> Vec<String> {
    let mut decls = vec!["vec3 a_position".to_owned()];
    if format.has(VertexAttributes::NORMAL) {
        decls.push("vec3 a_normal".to_owned());
    }
    if format.has(VertexAttributes::TANGENT) {
        decls.push("vec4 a_tangent".to_owned());
    }
    if format.has(VertexAttributes::COLOR) {
        decls.push("vec4 a_color".to_owned());
    }
    decls.extend((0..format.texcoord_sets()).map(|set| format!("vec2 a_uv{set}")));
    if format.has(VertexAttributes::JOINTS) {
        decls.push("uvec4 a_joints".to_owned());
    }
    if format.has(VertexAttributes::WEIGHTS) {
        decls.push("vec4 a_weights".to_owned());
    }
    interface(Direction::In, &decls)
}

/// The storage qualifier of a stage interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    In,
    Out,
}

/// Numbers `decls` from location 0 with the given qualifier.
pub(crate) fn interface(direction: Direction, decls: &[String]) -> Vec<String> {
    let qualifier = match direction {
        Direction::In => "in",
        Direction::Out => "out",
    };
    decls
        .iter()
        .enumerate()
        .map(|(location, decl)| format!("layout(location = {location}) {qualifier} {decl}"))
        .collect()
}

/// `vec2 v_uvN` for every texcoord set of the format.
pub(crate) fn uv_varyings(format: VertexFormat) -> impl Iterator<Item = String> {
    (0..format.texcoord_sets()).map(|set| format!("vec2 v_uv{set}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::renderer::TextureViewId;

    #[test]
    fn attribute_locations_are_dense() {
        let format = VertexFormat::new(
            VertexAttributes::POSITION | VertexAttributes::COLOR | VertexAttributes::NORMAL,
            2,
        );
        assert_eq!(
            vertex_attribute_inputs(format),
            vec![
                "layout(location = 0) in vec3 a_position",
                "layout(location = 1) in vec3 a_normal",
                "layout(location = 2) in vec4 a_color",
                "layout(location = 3) in vec2 a_uv0",
                "layout(location = 4) in vec2 a_uv1",
            ]
        );
    }

    #[test]
    fn format_and_texture_defines() {
        let format = VertexFormat::new(VertexAttributes::POSITION | VertexAttributes::TANGENT, 1);
        assert_eq!(
            vertex_format_defines(format),
            vec!["HAS_TANGENTS", "TEXCOORD_SETS 1"]
        );

        let material = Material::new("m", format)
            .with_texture(TextureSlot::Normal, TextureViewId(1), 0)
            .with_texture(TextureSlot::Emissive, TextureViewId(2), 0)
            .with_texture(TextureSlot::Diffuse, TextureViewId(3), 0);
        assert_eq!(
            texture_defines(&material, &[TextureSlot::Normal, TextureSlot::Emissive]),
            vec![
                "HAS_NORMAL_MAP",
                "NORMAL_UV 0",
                "NORMAL_BINDING 2",
                "HAS_EMISSIVE_MAP",
                "EMISSIVE_UV 0",
                "EMISSIVE_BINDING 3",
            ]
        );
    }
}
