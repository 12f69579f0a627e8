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

//! Rendering lane: from materials to recorded draw calls.
//!
//! Scene (re)load runs in three steps, all on the rendering thread:
//!
//! 1. [`MaterialShaderFactory::create_shader_for`] turns each material into a
//!    [`MaterialShader`]. Materials with identical shading requirements get the
//!    same cached instance, keyed by a structural hash ([`ShaderKey`]).
//! 2. [`ShaderAssignment::resolve`] does this for a whole [`Model`](prism_data::Model)
//!    and groups the materials by shader.
//! 3. [`RenderGraph::add_model`] builds the batching tree
//!    `ShaderNode -> MaterialNode -> MeshNode` from the grouping.
//!
//! Every frame, [`RenderGraph::record`] walks the tree and drives a
//! [`CommandRecorder`](prism_core::renderer::CommandRecorder): one pipeline bind
//! per shader, one descriptor-set bind per material, and one indexed draw per
//! non-empty submesh.

mod assignment;
mod auxiliary;
mod cache;
mod error;
mod factory;
mod graph;
mod key;
mod nodes;
mod registry;
mod shader;
pub mod shaders;
pub mod techniques;

pub use assignment::*;
pub use auxiliary::*;
pub use cache::*;
pub use error::*;
pub use factory::*;
pub use graph::*;
pub use key::*;
pub use nodes::*;
pub use registry::*;
pub use shader::*;

#[cfg(test)]
pub(crate) mod test_support;
