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

//! # Prism Data
//!
//! The scene representation consumed by the draw-submission lanes.
//!
//! An importer (outside of this workspace) fills a [`Model`]: a transform
//! hierarchy stored in a [`NodeArena`], a shared vertex/index buffer pair, and
//! index-addressed lists of [`Mesh`]es, [`Material`]s, textures and lights.
//! [`Model::compile`] propagates world transforms, moves attached lights, and
//! caches the nodes that carry geometry.

#![warn(missing_docs)]

pub mod error;
pub mod material;
pub mod mesh;
pub mod model;
pub mod node;

pub use self::error::SceneError;
pub use self::material::{Material, TextureBinding, TextureSlot, VertexAttributes, VertexFormat};
pub use self::mesh::{MaterialIndex, Mesh, MeshIndex, SubMesh};
pub use self::model::{LightId, Model, TextureRef};
pub use self::node::{NodeArena, NodeId, TransformNode};
