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

//! The `Model` aggregate.

use prism_core::math::Mat4;
use prism_core::renderer::{BufferId, IndexFormat, Light, TextureViewId};

use crate::error::SceneError;
use crate::material::Material;
use crate::mesh::{MaterialIndex, Mesh, MeshIndex};
use crate::node::{NodeArena, NodeId};

/// Index of a light in its model's light list.
pub type LightId = usize;

/// A texture owned by a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRef {
    /// A debug name, usually the source image path.
    pub name: String,
    /// The GPU view materials bind.
    pub view: TextureViewId,
}

/// A loaded scene: one transform tree plus the geometry and materials it draws.
///
/// Every mesh indexes into the shared `vertex_buffer`/`index_buffer`. Structural
/// edits go through the model so the cached list of geometry nodes can never
/// be read stale: it is dropped on every edit and rebuilt by [`Model::compile`].
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    root: NodeId,
    nodes: NodeArena,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    index_format: IndexFormat,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    textures: Vec<TextureRef>,
    lights: Vec<Light>,
    geometry_nodes: Option<Vec<NodeId>>,
    transforms_dirty: bool,
}

impl Model {
    /// Creates an empty model whose root has the identity transform.
    pub fn new(
        name: impl Into<String>,
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        index_format: IndexFormat,
    ) -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.new_root(Mat4::IDENTITY);
        Self {
            name: name.into(),
            root,
            nodes,
            vertex_buffer,
            index_buffer,
            index_format,
            meshes: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            lights: Vec::new(),
            geometry_nodes: None,
            transforms_dirty: true,
        }
    }

    /// Appends a mesh and returns its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshIndex {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Appends a material and returns its index.
    pub fn add_material(&mut self, material: Material) -> MaterialIndex {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Appends a texture and returns its index.
    pub fn add_texture(&mut self, texture: TextureRef) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    /// Appends a light and returns its index.
    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// Adds a node under `parent`.
    pub fn add_node(&mut self, parent: NodeId, local: Mat4) -> Result<NodeId, SceneError> {
        let id = self.nodes.add_child(parent, local)?;
        self.geometry_nodes = None;
        self.transforms_dirty = true;
        Ok(id)
    }

    /// Draws mesh `mesh` at `node`.
    pub fn attach_mesh(&mut self, node: NodeId, mesh: MeshIndex) -> Result<(), SceneError> {
        if mesh >= self.meshes.len() {
            return Err(SceneError::UnknownMesh(mesh));
        }
        self.nodes.attach_mesh(node, mesh)?;
        self.geometry_nodes = None;
        self.transforms_dirty = true;
        Ok(())
    }

    /// Makes light `light` follow `node`.
    pub fn attach_light(&mut self, node: NodeId, light: LightId) -> Result<(), SceneError> {
        if light >= self.lights.len() {
            return Err(SceneError::UnknownLight(light));
        }
        self.nodes.attach_light(node, light)?;
        self.transforms_dirty = true;
        Ok(())
    }

    /// Replaces the local transform of `node`.
    ///
    /// World transforms and lights keep their previous values until the next
    /// [`compile`](Self::compile).
    pub fn set_local(&mut self, node: NodeId, local: Mat4) -> Result<(), SceneError> {
        self.nodes.set_local(node, local)?;
        self.transforms_dirty = true;
        Ok(())
    }

    /// Propagates world transforms from the root, moves attached lights and
    /// rebuilds the geometry node cache, all in one pre-order pass.
    pub fn compile(&mut self) -> Result<(), SceneError> {
        let mut geometry = Vec::new();
        self.nodes
            .compile_with(self.root, &mut self.lights, |id, node| {
                if node.has_geometry() {
                    geometry.push(id);
                }
            })?;
        log::debug!(
            "Compiled model '{}': {} nodes, {} geometry nodes",
            self.name,
            self.nodes.len(),
            geometry.len()
        );
        self.geometry_nodes = Some(geometry);
        self.transforms_dirty = false;
        Ok(())
    }

    /// `true` once [`compile`](Self::compile) ran after the last edit, so
    /// every world transform and light position is current.
    ///
    /// Editing a node deep in the tree only invalidates its own subtree in the
    /// arena, so the model tracks edits itself instead of asking the root.
    pub fn is_compiled(&self) -> bool {
        self.geometry_nodes.is_some() && !self.transforms_dirty
    }

    /// The nodes owning at least one mesh, in pre-order.
    pub fn geometry_nodes(&self) -> Result<&[NodeId], SceneError> {
        self.geometry_nodes
            .as_deref()
            .ok_or_else(|| SceneError::NotCompiled(self.name.clone()))
    }

    /// Checks the invariants the render graph relies on.
    ///
    /// Every submesh must reference an existing material, and every mesh drawn
    /// with a material must provide the vertex format that material requires.
    /// Returns the first violation.
    pub fn validate(&self) -> Result<(), SceneError> {
        for mesh in &self.meshes {
            for (position, submesh) in mesh.submeshes.iter().enumerate() {
                let Some(material) = self.materials.get(submesh.material_index) else {
                    log::error!(
                        "Mesh '{}' references missing material {}",
                        mesh.name,
                        submesh.material_index
                    );
                    return Err(SceneError::MaterialIndexOutOfRange {
                        mesh: mesh.name.clone(),
                        submesh: position,
                        material_index: submesh.material_index,
                        material_count: self.materials.len(),
                    });
                };
                if material.vertex_format() != mesh.vertex_format {
                    log::error!(
                        "Material '{}' is shared by meshes with different vertex formats",
                        material.name()
                    );
                    return Err(SceneError::MixedVertexFormat {
                        material: material.name().to_owned(),
                        mesh: mesh.name.clone(),
                        expected: material.vertex_format(),
                        found: mesh.vertex_format,
                    });
                }
            }
        }
        Ok(())
    }

    /// The model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The transform hierarchy.
    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    /// The shared vertex buffer.
    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    /// The shared index buffer.
    pub fn index_buffer(&self) -> BufferId {
        self.index_buffer
    }

    /// The element type of the index buffer.
    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    /// The mesh at `index`.
    pub fn mesh(&self, index: MeshIndex) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    /// All meshes.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// The material at `index`.
    pub fn material(&self, index: MaterialIndex) -> Option<&Material> {
        self.materials.get(index)
    }

    /// Mutable access to a material's factors during import.
    pub fn material_mut(&mut self, index: MaterialIndex) -> Option<&mut Material> {
        self.materials.get_mut(index)
    }

    /// All materials.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// All textures.
    pub fn textures(&self) -> &[TextureRef] {
        &self.textures
    }

    /// All lights, positioned as of the last compile.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{VertexAttributes, VertexFormat};
    use prism_core::renderer::BindGroupId;

    fn model() -> Model {
        Model::new("test", BufferId(0), BufferId(1), IndexFormat::Uint32)
    }

    #[test]
    fn geometry_nodes_need_compile() {
        let mut model = model();
        let mesh = model.add_mesh(Mesh::new("cube", VertexFormat::default(), BindGroupId(0)));
        let root = model.root();
        let empty = model.add_node(root, Mat4::IDENTITY).unwrap();
        let first = model.add_node(empty, Mat4::IDENTITY).unwrap();
        let second = model.add_node(root, Mat4::IDENTITY).unwrap();
        model.attach_mesh(second, mesh).unwrap();
        model.attach_mesh(first, mesh).unwrap();

        assert_eq!(
            model.geometry_nodes(),
            Err(SceneError::NotCompiled("test".into()))
        );

        model.compile().unwrap();
        assert_eq!(model.geometry_nodes().unwrap(), &[first, second]);
        assert!(model.is_compiled());

        // Any structural edit drops the cache.
        model.add_node(root, Mat4::IDENTITY).unwrap();
        assert!(model.geometry_nodes().is_err());
    }

    #[test]
    fn set_local_keeps_cache_but_marks_uncompiled() {
        let mut model = model();
        let node = model.add_node(model.root(), Mat4::IDENTITY).unwrap();
        let leaf = model.add_node(node, Mat4::IDENTITY).unwrap();
        model.compile().unwrap();
        assert!(model.is_compiled());

        model
            .set_local(node, Mat4::from_scale(prism_core::math::Vec3::splat(2.0)))
            .unwrap();
        assert!(model.geometry_nodes().is_ok());
        assert!(!model.is_compiled());
        assert!(!model.nodes().is_compiled(node));
        assert!(!model.nodes().is_compiled(leaf));

        model.compile().unwrap();
        assert!(model.is_compiled());
        assert!(model.nodes().is_compiled(leaf));
        assert_eq!(
            model.nodes().world(leaf).copied(),
            Some(Mat4::from_scale(prism_core::math::Vec3::splat(2.0)))
        );
    }

    #[test]
    fn attaching_a_light_deep_in_the_tree_needs_compile() {
        let mut model = model();
        let light = model.add_light(Light::point(5.0));
        let parent = model.add_node(model.root(), Mat4::IDENTITY).unwrap();
        let child = model.add_node(parent, Mat4::IDENTITY).unwrap();
        model.compile().unwrap();

        model.attach_light(child, light).unwrap();
        assert!(!model.is_compiled());

        model.compile().unwrap();
        assert!(model.is_compiled());
    }

    #[test]
    fn attach_checks_indices() {
        let mut model = model();
        let root = model.root();
        assert_eq!(model.attach_mesh(root, 0), Err(SceneError::UnknownMesh(0)));
        assert_eq!(model.attach_light(root, 3), Err(SceneError::UnknownLight(3)));
    }

    #[test]
    fn validate_rejects_out_of_range_material() {
        let mut model = model();
        model.add_material(Material::new("only", VertexFormat::default()));
        model.add_mesh(
            Mesh::new("bad", VertexFormat::default(), BindGroupId(0))
                .with_submesh(0, 3, 0)
                .with_submesh(3, 3, 1),
        );

        assert_eq!(
            model.validate(),
            Err(SceneError::MaterialIndexOutOfRange {
                mesh: "bad".into(),
                submesh: 1,
                material_index: 1,
                material_count: 1,
            })
        );
    }

    #[test]
    fn validate_rejects_mixed_vertex_formats() {
        let lit = VertexFormat::new(VertexAttributes::POSITION | VertexAttributes::NORMAL, 0);
        let mut model = model();
        model.add_material(Material::new("shared", lit));
        model.add_mesh(Mesh::new("a", lit, BindGroupId(0)).with_submesh(0, 3, 0));
        model.add_mesh(
            Mesh::new("b", VertexFormat::default(), BindGroupId(1)).with_submesh(3, 3, 0),
        );

        let err = model.validate().unwrap_err();
        assert!(matches!(err, SceneError::MixedVertexFormat { ref mesh, .. } if mesh == "b"));
    }
}
