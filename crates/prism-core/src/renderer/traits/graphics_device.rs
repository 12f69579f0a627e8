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

//! The `GraphicsDevice` trait.

use crate::renderer::api::{
    BindGroupDescriptor, BindGroupId, BindGroupLayoutDescriptor, BindGroupLayoutId,
    BufferDescriptor, BufferId, PipelineLayoutDescriptor, PipelineLayoutId,
    RenderPipelineDescriptor, RenderPipelineId, ShaderModuleDescriptor, ShaderModuleId,
};
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// Creates and destroys GPU objects.
///
/// The draw-submission core only calls these methods while building material
/// shaders and their descriptor sets, never from the per-frame traversal.
/// Every created object is identified by an opaque handle; the device owns the
/// underlying resource until the matching `destroy_*` call.
pub trait GraphicsDevice: Send + Sync + Debug {
    /// Compiles a shader module.
    ///
    /// ## Errors
    /// * [`ResourceError::ShaderCompilation`] if the source does not compile with
    ///   the given defines.
    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError>;

    /// Releases a shader module.
    fn destroy_shader_module(&self, id: ShaderModuleId) -> Result<(), ResourceError>;

    /// Creates a bind group layout.
    fn create_bind_group_layout(
        &self,
        descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError>;

    /// Releases a bind group layout.
    fn destroy_bind_group_layout(&self, id: BindGroupLayoutId) -> Result<(), ResourceError>;

    /// Creates a bind group against an existing layout.
    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError>;

    /// Releases a bind group.
    fn destroy_bind_group(&self, id: BindGroupId) -> Result<(), ResourceError>;

    /// Creates a pipeline layout from per-slot bind group layouts.
    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError>;

    /// Releases a pipeline layout.
    fn destroy_pipeline_layout(&self, id: PipelineLayoutId) -> Result<(), ResourceError>;

    /// Creates a render pipeline.
    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError>;

    /// Releases a render pipeline.
    fn destroy_render_pipeline(&self, id: RenderPipelineId) -> Result<(), ResourceError>;

    /// Creates a buffer initialized with `data`.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Releases a buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;
}
