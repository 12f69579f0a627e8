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

//! Render pipeline and pipeline layout descriptions.

use std::borrow::Cow;

use super::{BindGroupLayoutId, ShaderModuleId};

/// An opaque handle to a pipeline layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineLayoutId(pub usize);

/// An opaque handle to a render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPipelineId(pub usize);

/// Descriptor-set slot of the per-frame scene data (camera, lights).
pub const SCENE_SLOT: u32 = 0;
/// Descriptor-set slot of the per-material data.
pub const MATERIAL_SLOT: u32 = 1;
/// Descriptor-set slot of the per-object data (model matrix).
pub const OBJECT_SLOT: u32 = 2;

/// The element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit indices.
    Uint16,
    /// 32-bit indices.
    #[default]
    Uint32,
}

impl IndexFormat {
    /// Size of one index in bytes.
    pub const fn size(self) -> u32 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Each vertex after the first two forms a triangle with the previous two.
    TriangleStrip,
    /// Every two vertices form a line.
    LineList,
}

/// Which faces are culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// Nothing is culled.
    None,
    /// Front faces are culled.
    Front,
    /// Back faces are culled.
    #[default]
    Back,
}

/// Describes the bind group layouts of a pipeline, indexed by slot.
#[derive(Debug, Clone)]
pub struct PipelineLayoutDescriptor<'a> {
    /// A debug label.
    pub label: Option<Cow<'a, str>>,
    /// The layouts, where index `i` is descriptor-set slot `i`.
    pub bind_group_layouts: &'a [BindGroupLayoutId],
}

/// Describes a render pipeline.
#[derive(Debug, Clone)]
pub struct RenderPipelineDescriptor<'a> {
    /// A debug label.
    pub label: Option<Cow<'a, str>>,
    /// The layout the pipeline is created against.
    pub layout: PipelineLayoutId,
    /// The compiled module holding both stages.
    pub shader: ShaderModuleId,
    /// The vertex attributes the vertex stage reads, in location order.
    pub vertex_inputs: &'a [String],
    /// The primitive topology.
    pub topology: PrimitiveTopology,
    /// Face culling.
    pub cull_mode: CullMode,
    /// Whether depth testing and writing are enabled.
    pub depth_test: bool,
}
