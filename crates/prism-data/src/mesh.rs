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

//! Meshes and their material-bound index ranges.

use prism_core::renderer::BindGroupId;

use crate::material::VertexFormat;

/// Index of a mesh in its model's mesh list.
pub type MeshIndex = usize;

/// Index of a material in its model's material list.
pub type MaterialIndex = usize;

/// A contiguous range of the model's index buffer drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubMesh {
    /// First index of the range.
    pub first_index: u32,
    /// Number of indices. Zero is legal and draws nothing.
    pub index_count: u32,
    /// The material the range is drawn with.
    pub material_index: MaterialIndex,
}

impl SubMesh {
    /// Creates a submesh.
    pub const fn new(first_index: u32, index_count: u32, material_index: MaterialIndex) -> Self {
        Self {
            first_index,
            index_count,
            material_index,
        }
    }

    /// `true` if the range holds no index.
    pub const fn is_empty(&self) -> bool {
        self.index_count == 0
    }
}

/// A drawable made of one or more submeshes sharing a vertex format.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// A debug name.
    pub name: String,
    /// The index ranges, in import order.
    pub submeshes: Vec<SubMesh>,
    /// The vertex layout of every submesh.
    pub vertex_format: VertexFormat,
    /// The per-object descriptor set (model matrix) bound before drawing.
    pub object_bind_group: BindGroupId,
}

impl Mesh {
    /// Creates a mesh without submeshes.
    pub fn new(
        name: impl Into<String>,
        vertex_format: VertexFormat,
        object_bind_group: BindGroupId,
    ) -> Self {
        Self {
            name: name.into(),
            submeshes: Vec::new(),
            vertex_format,
            object_bind_group,
        }
    }

    /// Appends a submesh.
    #[must_use]
    pub fn with_submesh(
        mut self,
        first_index: u32,
        index_count: u32,
        material: MaterialIndex,
    ) -> Self {
        self.submeshes
            .push(SubMesh::new(first_index, index_count, material));
        self
    }

    /// The submeshes drawn with `material_index`, in order.
    pub fn submeshes_for(&self, material_index: MaterialIndex) -> impl Iterator<Item = &SubMesh> {
        self.submeshes
            .iter()
            .filter(move |s| s.material_index == material_index)
    }

    /// The distinct materials used by this mesh, in first-use order.
    pub fn material_indices(&self) -> Vec<MaterialIndex> {
        let mut indices = Vec::new();
        for submesh in &self.submeshes {
            if !indices.contains(&submesh.material_index) {
                indices.push(submesh.material_index);
            }
        }
        indices
    }

    /// `true` if any submesh uses `material_index`.
    pub fn uses_material(&self, material_index: MaterialIndex) -> bool {
        self.submeshes
            .iter()
            .any(|s| s.material_index == material_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_materials_in_first_use_order() {
        let mesh = Mesh::new("m", VertexFormat::default(), BindGroupId(0))
            .with_submesh(0, 3, 2)
            .with_submesh(3, 3, 0)
            .with_submesh(6, 3, 2);

        assert_eq!(mesh.material_indices(), vec![2, 0]);
        assert_eq!(mesh.submeshes_for(2).count(), 2);
        assert!(!mesh.uses_material(1));
    }

    #[test]
    fn empty_range() {
        assert!(SubMesh::new(12, 0, 0).is_empty());
        assert!(!SubMesh::new(12, 3, 0).is_empty());
    }
}
