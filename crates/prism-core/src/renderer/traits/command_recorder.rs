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

//! The `CommandRecorder` trait.

use crate::renderer::api::{
    BindGroupId, BufferId, IndexFormat, PipelineLayoutId, RenderPassDescriptor,
    RenderPipelineId, ScissorRect, Viewport,
};

/// Records GPU commands for one frame.
///
/// The render graph drives a recorder in a fixed order: one render pass, the
/// viewport and scissor once, then pipeline, descriptor-set, buffer and draw
/// commands for every batch, then the end of the pass. Implementations
/// translate each call to the backend's command buffer.
pub trait CommandRecorder {
    /// Begins a render pass. Only one pass is open at a time.
    fn begin_render_pass(&mut self, descriptor: &RenderPassDescriptor<'_>);

    /// Sets the viewport for subsequent draws.
    fn set_viewport(&mut self, viewport: &Viewport);

    /// Sets the scissor rectangle for subsequent draws.
    fn set_scissor(&mut self, scissor: &ScissorRect);

    /// Binds a render pipeline.
    fn bind_pipeline(&mut self, pipeline: RenderPipelineId);

    /// Binds a descriptor set at `slot` of `layout`.
    fn bind_descriptor_set(&mut self, layout: PipelineLayoutId, slot: u32, set: BindGroupId);

    /// Binds the vertex buffer used by subsequent draws.
    fn bind_vertex_buffer(&mut self, buffer: BufferId);

    /// Binds the index buffer used by subsequent indexed draws.
    fn bind_index_buffer(&mut self, buffer: BufferId, format: IndexFormat);

    /// Draws `index_count` indices starting at `first_index`.
    fn draw_indexed(&mut self, index_count: u32, first_index: u32);

    /// Draws `vertex_count` vertices without an index buffer.
    fn draw(&mut self, vertex_count: u32, first_vertex: u32);

    /// Ends the current render pass.
    fn end_render_pass(&mut self);
}
