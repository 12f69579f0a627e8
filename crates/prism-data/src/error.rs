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

//! Errors raised while building or validating a scene.

use thiserror::Error;

use crate::material::VertexFormat;
use crate::node::NodeId;

/// A violation of the scene's structural rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// A submesh points past the end of the model's material list.
    #[error(
        "submesh {submesh} of mesh '{mesh}' uses material {material_index}, \
         but the model only has {material_count} materials"
    )]
    MaterialIndexOutOfRange {
        /// The mesh holding the submesh.
        mesh: String,
        /// Position of the submesh inside the mesh.
        submesh: usize,
        /// The offending index.
        material_index: usize,
        /// The size of the material list.
        material_count: usize,
    },
    /// A mesh drawn with a material does not provide the vertex format that
    /// material was built for.
    #[error(
        "mesh '{mesh}' has vertex format {found:?} but material '{material}' requires {expected:?}"
    )]
    MixedVertexFormat {
        /// The material.
        material: String,
        /// The mesh.
        mesh: String,
        /// The format the material requires.
        expected: VertexFormat,
        /// The format of the mesh.
        found: VertexFormat,
    },
    /// A node handle that does not belong to the arena.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    /// A mesh index past the end of the model's mesh list.
    #[error("unknown mesh {0}")]
    UnknownMesh(usize),
    /// A light index past the end of the model's light list.
    #[error("unknown light {0}")]
    UnknownLight(usize),
    /// The node is already the child of another node.
    #[error("node {0:?} already has a parent")]
    NodeHasParent(NodeId),
    /// Attaching the node would make it its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CyclicAttachment {
        /// The prospective parent.
        parent: NodeId,
        /// The node being attached.
        child: NodeId,
    },
    /// Geometry nodes were requested before the model was compiled.
    #[error("model '{0}' has not been compiled since its last structural change")]
    NotCompiled(String),
}
