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

use std::sync::Arc;

use prism_core::renderer::{BindGroupId, GraphicsDevice};
use prism_data::{MaterialIndex, Model};

use super::{MaterialShader, MaterialShaderFactory, ShaderError};

/// One shader and the materials drawn with it.
#[derive(Debug, Clone)]
pub struct ShaderGroup {
    /// The shared shader.
    pub shader: Arc<MaterialShader>,
    /// Each material with the descriptor set created for it, in material order.
    pub materials: Vec<(MaterialIndex, BindGroupId)>,
}

/// The material → shader mapping of one model, grouped by shader.
///
/// Groups keep the order in which their shader was first seen while walking
/// the materials of the model.
#[derive(Debug, Clone, Default)]
pub struct ShaderAssignment {
    groups: Vec<ShaderGroup>,
}

impl ShaderAssignment {
    /// Validates `model`, then resolves each of its materials through
    /// `factory` and creates its descriptor set.
    ///
    /// Any failure aborts the whole resolution.
    pub fn resolve(
        model: &Model,
        factory: &mut MaterialShaderFactory,
        device: &dyn GraphicsDevice,
    ) -> Result<Self, ShaderError> {
        model.validate()?;

        let mut groups: Vec<ShaderGroup> = Vec::new();
        for (index, material) in model.materials().iter().enumerate() {
            let shader = factory.create_shader_for(device, material)?;
            let bind_group = shader.create_material_bind_group(device, material)?;
            match groups.iter_mut().find(|g| Arc::ptr_eq(&g.shader, &shader)) {
                Some(group) => group.materials.push((index, bind_group)),
                None => groups.push(ShaderGroup {
                    shader,
                    materials: vec![(index, bind_group)],
                }),
            }
        }

        log::info!(
            "Resolved {} materials of '{}' to {} shaders",
            model.materials().len(),
            model.name(),
            groups.len()
        );
        Ok(Self { groups })
    }

    /// The groups, in first-seen order.
    pub fn groups(&self) -> &[ShaderGroup] {
        &self.groups
    }

    /// The number of distinct shaders.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The number of materials across every group.
    pub fn material_count(&self) -> usize {
        self.groups.iter().map(|g| g.materials.len()).sum()
    }

    /// The shader `material_index` resolved to.
    pub fn shader_for(&self, material_index: MaterialIndex) -> Option<&Arc<MaterialShader>> {
        self.groups
            .iter()
            .find(|g| g.materials.iter().any(|&(m, _)| m == material_index))
            .map(|g| &g.shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::test_support::CountingDevice;
    use crate::render_lane::ShaderAllocatorRegistry;
    use prism_core::renderer::{BufferId, IndexFormat, RenderSettings};
    use prism_data::{Material, Mesh, SceneError, VertexAttributes, VertexFormat};

    fn format() -> VertexFormat {
        VertexFormat::new(VertexAttributes::POSITION | VertexAttributes::NORMAL, 0)
    }

    fn factory() -> MaterialShaderFactory {
        MaterialShaderFactory::new(
            ShaderAllocatorRegistry::with_builtin_techniques(),
            RenderSettings::default(),
        )
    }

    #[test]
    fn groups_follow_first_seen_order() {
        let device = CountingDevice::default();
        let mut model = Model::new("m", BufferId(1), BufferId(2), IndexFormat::Uint32);
        model.add_material(Material::new("lit_a", format()));
        model.add_material(Material::new("flat", format()).with_shader("unlit"));
        model.add_material(Material::new("lit_b", format()).with_metallic(1.0));

        let assignment = ShaderAssignment::resolve(&model, &mut factory(), &device).unwrap();

        assert_eq!(assignment.group_count(), 2);
        assert_eq!(assignment.material_count(), 3);
        let groups = assignment.groups();
        assert_eq!(groups[0].shader.family(), "pbr");
        assert_eq!(
            groups[0].materials.iter().map(|&(m, _)| m).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(groups[1].shader.family(), "unlit");
        assert!(Arc::ptr_eq(assignment.shader_for(2).unwrap(), &groups[0].shader));
        assert!(assignment.shader_for(7).is_none());
    }

    #[test]
    fn invalid_models_are_rejected_before_any_shader_is_built() {
        let device = CountingDevice::default();
        let mut factory = factory();
        let mut model = Model::new("m", BufferId(1), BufferId(2), IndexFormat::Uint32);
        model.add_material(Material::new("only", format()));
        model.add_mesh(Mesh::new("box", format(), BindGroupId(9)).with_submesh(0, 3, 4));

        let err = ShaderAssignment::resolve(&model, &mut factory, &device).unwrap_err();

        assert!(matches!(
            err,
            ShaderError::Scene(SceneError::MaterialIndexOutOfRange {
                material_index: 4,
                ..
            })
        ));
        assert_eq!(factory.cached_count(), 0);
    }
}
