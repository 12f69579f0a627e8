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

//! The three levels of the batching tree: shader, material, mesh.

use std::sync::{Arc, Weak};

use prism_core::renderer::{
    BindGroupId, CommandRecorder, PipelineLayoutId, RecordStats, MATERIAL_SLOT, OBJECT_SLOT,
    SCENE_SLOT,
};
use prism_data::{MaterialIndex, Mesh, MeshIndex, Model, SubMesh};

use super::{MaterialShader, ShaderGroup};

/// The submeshes of one mesh drawn with one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    mesh_index: MeshIndex,
    object_bind_group: BindGroupId,
    submeshes: Vec<SubMesh>,
}

impl MeshNode {
    /// Filters `mesh` down to the submeshes using `material_index`.
    ///
    /// Returns `None` if the mesh never uses the material.
    pub fn build(
        mesh_index: MeshIndex,
        mesh: &Mesh,
        material_index: MaterialIndex,
    ) -> Option<Self> {
        let submeshes: Vec<SubMesh> = mesh.submeshes_for(material_index).copied().collect();
        if submeshes.is_empty() {
            return None;
        }
        Some(Self {
            mesh_index,
            object_bind_group: mesh.object_bind_group,
            submeshes,
        })
    }

    /// The index of the mesh in its model.
    pub fn mesh_index(&self) -> MeshIndex {
        self.mesh_index
    }

    /// The matching submeshes, in mesh order.
    pub fn submeshes(&self) -> &[SubMesh] {
        &self.submeshes
    }

    /// The per-object descriptor set.
    pub fn object_bind_group(&self) -> BindGroupId {
        self.object_bind_group
    }

    fn record(
        &self,
        recorder: &mut dyn CommandRecorder,
        layout: PipelineLayoutId,
        stats: &mut RecordStats,
    ) {
        recorder.bind_descriptor_set(layout, OBJECT_SLOT, self.object_bind_group);
        stats.object_binds += 1;
        for submesh in &self.submeshes {
            if submesh.is_empty() {
                stats.skipped_empty += 1;
                continue;
            }
            recorder.draw_indexed(submesh.index_count, submesh.first_index);
            stats.draw_calls += 1;
            stats.indices_drawn += u64::from(submesh.index_count);
        }
    }
}

/// One material and every mesh of the model drawn with it.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialNode {
    material_index: MaterialIndex,
    bind_group: BindGroupId,
    meshes: Vec<MeshNode>,
}

impl MaterialNode {
    /// Scans every mesh of `model` for submeshes using `material_index`.
    ///
    /// Returns `None` if no mesh uses the material.
    pub fn build(
        model: &Model,
        material_index: MaterialIndex,
        bind_group: BindGroupId,
    ) -> Option<Self> {
        let meshes: Vec<MeshNode> = model
            .meshes()
            .iter()
            .enumerate()
            .filter_map(|(i, mesh)| MeshNode::build(i, mesh, material_index))
            .collect();
        if meshes.is_empty() {
            return None;
        }
        Some(Self {
            material_index,
            bind_group,
            meshes,
        })
    }

    /// The index of the material in its model.
    pub fn material_index(&self) -> MaterialIndex {
        self.material_index
    }

    /// The material descriptor set.
    pub fn bind_group(&self) -> BindGroupId {
        self.bind_group
    }

    /// The mesh nodes, in mesh order.
    pub fn meshes(&self) -> &[MeshNode] {
        &self.meshes
    }

    fn record(
        &self,
        recorder: &mut dyn CommandRecorder,
        layout: PipelineLayoutId,
        stats: &mut RecordStats,
    ) {
        recorder.bind_descriptor_set(layout, MATERIAL_SLOT, self.bind_group);
        stats.material_binds += 1;
        for mesh in &self.meshes {
            mesh.record(recorder, layout, stats);
        }
    }
}

/// One shader and the materials of one model drawn with it.
///
/// The shader is held weakly: the factory cache owns it.
#[derive(Debug, Clone)]
pub struct ShaderNode {
    model_slot: usize,
    shader: Weak<MaterialShader>,
    family: String,
    hash: u64,
    materials: Vec<MaterialNode>,
}

impl ShaderNode {
    /// Builds the material nodes of `group` against `model`, dropping
    /// materials no mesh uses.
    ///
    /// `model_slot` identifies the model's buffers inside the render graph.
    pub fn build(model_slot: usize, model: &Model, group: &ShaderGroup) -> Self {
        let materials: Vec<MaterialNode> = group
            .materials
            .iter()
            .filter_map(|&(index, bind_group)| {
                let node = MaterialNode::build(model, index, bind_group);
                if node.is_none() {
                    log::trace!(
                        "Material {} of '{}' is not used by any mesh",
                        index,
                        model.name()
                    );
                }
                node
            })
            .collect();
        Self {
            model_slot,
            shader: Arc::downgrade(&group.shader),
            family: group.shader.family().to_owned(),
            hash: group.shader.hash(),
            materials,
        }
    }

    /// The render graph slot of the model this node draws.
    pub fn model_slot(&self) -> usize {
        self.model_slot
    }

    /// The shader, if it is still cached and not released.
    pub fn shader(&self) -> Option<Arc<MaterialShader>> {
        self.shader.upgrade().filter(|s| !s.is_released())
    }

    /// The shading family.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The structural hash of the shader.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// The material nodes, in assignment order.
    pub fn materials(&self) -> &[MaterialNode] {
        &self.materials
    }

    /// `true` if no material of the group is drawn.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub(crate) fn record(
        &self,
        shader: &MaterialShader,
        scene: Option<BindGroupId>,
        recorder: &mut dyn CommandRecorder,
        stats: &mut RecordStats,
    ) {
        let layout = shader.pipeline_layout();
        recorder.bind_pipeline(shader.pipeline());
        stats.pipeline_binds += 1;
        if let Some(scene) = scene {
            recorder.bind_descriptor_set(layout, SCENE_SLOT, scene);
        }
        for material in &self.materials {
            log::trace!(
                "Recording material {} with '{}'",
                material.material_index,
                self.family
            );
            material.record(recorder, layout, stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::renderer::{BufferId, IndexFormat};
    use prism_data::{Material, VertexAttributes, VertexFormat};

    fn format() -> VertexFormat {
        VertexFormat::new(VertexAttributes::POSITION, 0)
    }

    fn mesh() -> Mesh {
        // Six submeshes over three materials.
        Mesh::new("mesh", format(), BindGroupId(40))
            .with_submesh(0, 3, 0)
            .with_submesh(3, 6, 1)
            .with_submesh(9, 3, 0)
            .with_submesh(12, 0, 2)
            .with_submesh(12, 3, 1)
            .with_submesh(15, 3, 2)
    }

    #[test]
    fn each_used_material_gets_a_non_empty_node() {
        let mesh = mesh();
        let nodes: Vec<MeshNode> = (0..3)
            .map(|m| MeshNode::build(0, &mesh, m).unwrap())
            .collect();

        let mut union: Vec<SubMesh> = nodes
            .iter()
            .flat_map(|n| n.submeshes().iter().copied())
            .collect();
        union.sort_by_key(|s| (s.first_index, s.index_count));
        let mut all = mesh.submeshes.clone();
        all.sort_by_key(|s| (s.first_index, s.index_count));

        assert_eq!(union, all);
        assert_eq!(nodes[1].submeshes().len(), 2);
    }

    #[test]
    fn unused_material_gives_no_node() {
        assert!(MeshNode::build(0, &mesh(), 3).is_none());
    }

    #[test]
    fn material_node_skips_meshes_without_the_material() {
        let mut model = Model::new("m", BufferId(1), BufferId(2), IndexFormat::Uint16);
        for name in ["a", "b", "c"] {
            model.add_material(Material::new(name, format()));
        }
        model.add_mesh(Mesh::new("first", format(), BindGroupId(1)).with_submesh(0, 3, 0));
        model.add_mesh(Mesh::new("second", format(), BindGroupId(2)).with_submesh(0, 3, 1));
        model.add_mesh(Mesh::new("third", format(), BindGroupId(3)).with_submesh(3, 3, 0));

        let node = MaterialNode::build(&model, 0, BindGroupId(10)).unwrap();
        let meshes: Vec<MeshIndex> = node.meshes().iter().map(MeshNode::mesh_index).collect();

        assert_eq!(meshes, vec![0, 2]);
        assert!(MaterialNode::build(&model, 2, BindGroupId(12)).is_none());
    }
}
