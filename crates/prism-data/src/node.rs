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

//! The transform hierarchy.
//!
//! Nodes live in a [`NodeArena`] and refer to each other through [`NodeId`]
//! handles. A node owns its children (ordered) and keeps a non-owning handle
//! to its parent, only ever used to read the parent's last compiled world
//! transform.

use prism_core::math::{Mat4, RigidParts};
use prism_core::renderer::Light;

use crate::error::SceneError;
use crate::mesh::MeshIndex;
use crate::model::LightId;

/// A handle to a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The position of the node inside its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the hierarchy.
#[derive(Debug, Clone)]
pub struct TransformNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Mat4,
    world: Mat4,
    meshes: Vec<MeshIndex>,
    lights: Vec<LightId>,
    compiled: bool,
}

impl TransformNode {
    fn new(parent: Option<NodeId>, local: Mat4) -> Self {
        Self {
            parent,
            children: Vec::new(),
            local,
            world: Mat4::IDENTITY,
            meshes: Vec::new(),
            lights: Vec::new(),
            compiled: false,
        }
    }

    /// The parent handle, `None` for a root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The children, in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The transform relative to the parent.
    pub fn local(&self) -> &Mat4 {
        &self.local
    }

    /// The world transform computed by the last compile pass.
    ///
    /// Only meaningful when [`is_compiled`](Self::is_compiled) is `true`.
    pub fn world(&self) -> &Mat4 {
        &self.world
    }

    /// Meshes drawn at this node.
    pub fn meshes(&self) -> &[MeshIndex] {
        &self.meshes
    }

    /// Lights carried by this node.
    pub fn lights(&self) -> &[LightId] {
        &self.lights
    }

    /// `true` if this node owns at least one mesh.
    pub fn has_geometry(&self) -> bool {
        !self.meshes.is_empty()
    }

    /// `true` if the world transform reflects the current local transforms of
    /// this node and its ancestors.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }
}

/// Owns every node of one or more transform trees.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<TransformNode>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if the arena holds no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a parentless node.
    pub fn new_root(&mut self, local: Mat4) -> NodeId {
        self.push(TransformNode::new(None, local))
    }

    /// Adds a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, local: Mat4) -> Result<NodeId, SceneError> {
        self.node(parent)?;
        let id = self.push(TransformNode::new(Some(parent), local));
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Moves a root node (and its subtree) under `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        if self.node(child)?.parent.is_some() {
            return Err(SceneError::NodeHasParent(child));
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(SceneError::CyclicAttachment { parent, child });
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        self.invalidate(child);
        Ok(())
    }

    /// Returns the node behind `id`.
    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(id.index())
    }

    /// The local transform of `id`.
    pub fn local(&self, id: NodeId) -> Option<&Mat4> {
        self.get(id).map(TransformNode::local)
    }

    /// The world transform of `id` as of the last compile.
    pub fn world(&self, id: NodeId) -> Option<&Mat4> {
        self.get(id).map(TransformNode::world)
    }

    /// The parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(TransformNode::parent)
    }

    /// The children of `id`.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(TransformNode::children).unwrap_or_default()
    }

    /// The meshes attached to `id`.
    pub fn meshes(&self, id: NodeId) -> &[MeshIndex] {
        self.get(id).map(TransformNode::meshes).unwrap_or_default()
    }

    /// The lights attached to `id`.
    pub fn lights(&self, id: NodeId) -> &[LightId] {
        self.get(id).map(TransformNode::lights).unwrap_or_default()
    }

    /// `true` if `id` exists and was compiled since its last change.
    pub fn is_compiled(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(TransformNode::is_compiled)
    }

    /// Replaces the local transform of `id` and marks its subtree uncompiled.
    pub fn set_local(&mut self, id: NodeId, local: Mat4) -> Result<(), SceneError> {
        self.node_mut(id)?.local = local;
        self.invalidate(id);
        Ok(())
    }

    /// Draws `mesh` at `id`.
    pub fn attach_mesh(&mut self, id: NodeId, mesh: MeshIndex) -> Result<(), SceneError> {
        self.node_mut(id)?.meshes.push(mesh);
        Ok(())
    }

    /// Makes `light` follow `id`.
    pub fn attach_light(&mut self, id: NodeId, light: LightId) -> Result<(), SceneError> {
        self.node_mut(id)?.lights.push(light);
        Ok(())
    }

    /// Iterates from the parent of `id` up to its root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Computes world transforms for the subtree rooted at `start`.
    ///
    /// The traversal is pre-order and depth-first, so a node is always
    /// finished before any of its children reads it. `start` is composed with
    /// its parent's last compiled world transform, or with the identity if it
    /// is a root. Point and spot lights attached to a visited node are moved
    /// to the decomposed world transform; light ids outside `lights` are
    /// skipped.
    pub fn compile(&mut self, start: NodeId, lights: &mut [Light]) -> Result<(), SceneError> {
        self.compile_with(start, lights, |_, _| {})
    }

    /// Like [`compile`](Self::compile), calling `visit` on every node right
    /// after its world transform is final, in traversal order.
    pub fn compile_with<F>(
        &mut self,
        start: NodeId,
        lights: &mut [Light],
        mut visit: F,
    ) -> Result<(), SceneError>
    where
        F: FnMut(NodeId, &TransformNode),
    {
        let start_parent = self.node(start)?.parent;
        let base = start_parent
            .and_then(|p| self.world(p).copied())
            .unwrap_or(Mat4::IDENTITY);

        let mut stack = vec![(start, base)];
        let mut visited = 0usize;
        while let Some((id, parent_world)) = stack.pop() {
            let node = &mut self.nodes[id.index()];
            node.world = if node.parent.is_some() {
                parent_world * node.local
            } else {
                node.local
            };
            node.compiled = true;
            visited += 1;

            if !node.lights.is_empty() {
                let parts = RigidParts::from_matrix(&node.world);
                for &light_id in &node.lights {
                    match lights.get_mut(light_id) {
                        Some(light) => {
                            light.apply_world_transform(parts.translation, parts.rotation)
                        }
                        None => log::warn!("Node {:?} carries unknown light {}", id, light_id),
                    }
                }
            }

            let node = &self.nodes[id.index()];
            visit(id, node);
            // Reversed so the first child is popped first.
            stack.extend(node.children.iter().rev().map(|&c| (c, node.world)));
        }

        log::trace!("Compiled {} nodes from {:?}", visited, start);
        Ok(())
    }

    fn push(&mut self, node: TransformNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> Result<&TransformNode, SceneError> {
        self.nodes.get(id.index()).ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut TransformNode, SceneError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(SceneError::UnknownNode(id))
    }

    fn invalidate(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = &mut self.nodes[n.index()];
            node.compiled = false;
            stack.extend_from_slice(&node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prism_core::math::{Quat, Vec3};

    fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, y, z))
    }

    #[test]
    fn three_level_chain_composes_in_order() {
        let l0 = Mat4::from_rotation_z(0.5) * translation(1.0, 0.0, 0.0);
        let l1 = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)) * translation(0.0, 3.0, 0.0);
        let l2 = Mat4::from_rotation_y(1.2) * translation(0.0, 0.0, -4.0);

        let mut arena = NodeArena::new();
        let root = arena.new_root(l0);
        let mid = arena.add_child(root, l1).unwrap();
        let leaf = arena.add_child(mid, l2).unwrap();

        arena.compile(root, &mut []).unwrap();

        assert_relative_eq!(*arena.world(root).unwrap(), l0, epsilon = 1e-5);
        assert_relative_eq!(*arena.world(mid).unwrap(), l0 * l1, epsilon = 1e-5);
        assert_relative_eq!(*arena.world(leaf).unwrap(), l0 * l1 * l2, epsilon = 1e-5);
    }

    #[test]
    fn visit_order_is_pre_order() {
        let mut arena = NodeArena::new();
        let root = arena.new_root(Mat4::IDENTITY);
        let a = arena.add_child(root, Mat4::IDENTITY).unwrap();
        let a1 = arena.add_child(a, Mat4::IDENTITY).unwrap();
        let b = arena.add_child(root, Mat4::IDENTITY).unwrap();
        let a2 = arena.add_child(a, Mat4::IDENTITY).unwrap();

        let mut order = Vec::new();
        arena
            .compile_with(root, &mut [], |id, _| order.push(id))
            .unwrap();

        assert_eq!(order, vec![root, a, a1, a2, b]);
    }

    #[test]
    fn set_local_invalidates_subtree_only() {
        let mut arena = NodeArena::new();
        let root = arena.new_root(Mat4::IDENTITY);
        let a = arena.add_child(root, Mat4::IDENTITY).unwrap();
        let a1 = arena.add_child(a, Mat4::IDENTITY).unwrap();
        let b = arena.add_child(root, Mat4::IDENTITY).unwrap();
        assert!(!arena.is_compiled(root));

        arena.compile(root, &mut []).unwrap();
        arena.set_local(a, translation(0.0, 1.0, 0.0)).unwrap();

        assert!(arena.is_compiled(root));
        assert!(!arena.is_compiled(a));
        assert!(!arena.is_compiled(a1));
        assert!(arena.is_compiled(b));
    }

    #[test]
    fn compiling_a_subtree_uses_last_parent_world() {
        let mut arena = NodeArena::new();
        let root = arena.new_root(translation(10.0, 0.0, 0.0));
        let child = arena.add_child(root, translation(0.0, 1.0, 0.0)).unwrap();
        arena.compile(root, &mut []).unwrap();

        arena.set_local(child, translation(0.0, 5.0, 0.0)).unwrap();
        arena.compile(child, &mut []).unwrap();

        let world = arena.world(child).unwrap();
        assert_relative_eq!(world.w_axis.truncate(), Vec3::new(10.0, 5.0, 0.0));
    }

    #[test]
    fn lights_follow_their_node() {
        let mut lights = [Light::point(4.0), Light::spot(8.0, 0.1, 0.3)];
        let mut arena = NodeArena::new();
        let root = arena.new_root(translation(0.0, 2.0, 0.0));
        let lamp = arena
            .add_child(
                root,
                Mat4::from_rotation_translation(
                    Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                    Vec3::new(1.0, 0.0, 0.0),
                ),
            )
            .unwrap();
        arena.attach_light(root, 0).unwrap();
        arena.attach_light(lamp, 1).unwrap();
        arena.attach_light(lamp, 7).unwrap();

        arena.compile(root, &mut lights).unwrap();

        assert_eq!(lights[0].position(), Some(Vec3::new(0.0, 2.0, 0.0)));
        assert_relative_eq!(lights[1].position().unwrap(), Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(lights[1].direction().unwrap(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn lights_keep_last_compiled_position() {
        let mut lights = [Light::point(1.0)];
        let mut arena = NodeArena::new();
        let root = arena.new_root(translation(1.0, 0.0, 0.0));
        arena.attach_light(root, 0).unwrap();
        arena.compile(root, &mut lights).unwrap();

        arena.set_local(root, translation(5.0, 0.0, 0.0)).unwrap();
        assert_eq!(lights[0].position(), Some(Vec3::X));

        arena.compile(root, &mut lights).unwrap();
        assert_eq!(lights[0].position(), Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn attach_rejects_cycles_and_second_parents() {
        let mut arena = NodeArena::new();
        let root = arena.new_root(Mat4::IDENTITY);
        let child = arena.add_child(root, Mat4::IDENTITY).unwrap();
        let other = arena.new_root(Mat4::IDENTITY);

        assert_eq!(
            arena.attach(root, child),
            Err(SceneError::NodeHasParent(child))
        );
        assert_eq!(
            arena.attach(child, root),
            Err(SceneError::CyclicAttachment {
                parent: child,
                child: root
            })
        );
        arena.attach(child, other).unwrap();
        assert_eq!(arena.parent(other), Some(child));
        assert_eq!(arena.ancestors(other).collect::<Vec<_>>(), vec![child, root]);
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let mut arena = NodeArena::new();
        let ghost = NodeId(42);
        assert_eq!(
            arena.add_child(ghost, Mat4::IDENTITY),
            Err(SceneError::UnknownNode(ghost))
        );
        assert!(arena.compile(ghost, &mut []).is_err());
        assert!(arena.children(ghost).is_empty());
    }
}
