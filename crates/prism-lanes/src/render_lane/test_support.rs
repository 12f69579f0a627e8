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

//! Test doubles shared by the unit tests of this module.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use prism_core::renderer::{
    BindGroupDescriptor, BindGroupId, BindGroupLayoutDescriptor, BindGroupLayoutId,
    BufferDescriptor, BufferId, CommandRecorder, GraphicsDevice, IndexFormat,
    PipelineLayoutDescriptor, PipelineLayoutId, RenderPassDescriptor, RenderPipelineDescriptor,
    RenderPipelineId, ResourceError, ScissorRect, ShaderModuleDescriptor, ShaderModuleId,
    Viewport,
};
use prism_data::{Material, VertexAttributes, VertexFormat};

use super::{MaterialShader, ShaderAllocatorRegistry, ShaderKey, SharedLayouts};

/// Hands out increasing ids and counts live objects.
///
/// Setting `fail_pipelines` or `fail_bind_groups` makes the matching create
/// call return an error without allocating anything.
#[derive(Debug, Default)]
pub struct CountingDevice {
    next: AtomicUsize,
    live: AtomicUsize,
    pub shader_modules: AtomicUsize,
    pub fail_pipelines: AtomicBool,
    pub fail_bind_groups: AtomicBool,
}

impl CountingDevice {
    fn id(&self) -> usize {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn drop_one(&self) -> Result<(), ResourceError> {
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl GraphicsDevice for CountingDevice {
    fn create_shader_module(
        &self,
        _descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError> {
        self.shader_modules.fetch_add(1, Ordering::SeqCst);
        Ok(ShaderModuleId(self.id()))
    }

    fn destroy_shader_module(&self, _id: ShaderModuleId) -> Result<(), ResourceError> {
        self.drop_one()
    }

    fn create_bind_group_layout(
        &self,
        _descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError> {
        Ok(BindGroupLayoutId(self.id()))
    }

    fn destroy_bind_group_layout(&self, _id: BindGroupLayoutId) -> Result<(), ResourceError> {
        self.drop_one()
    }

    fn create_bind_group(
        &self,
        _descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError> {
        if self.fail_bind_groups.load(Ordering::SeqCst) {
            return Err(ResourceError::OutOfMemory("bind group".into()));
        }
        Ok(BindGroupId(self.id()))
    }

    fn destroy_bind_group(&self, _id: BindGroupId) -> Result<(), ResourceError> {
        self.drop_one()
    }

    fn create_pipeline_layout(
        &self,
        _descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError> {
        Ok(PipelineLayoutId(self.id()))
    }

    fn destroy_pipeline_layout(&self, _id: PipelineLayoutId) -> Result<(), ResourceError> {
        self.drop_one()
    }

    fn create_render_pipeline(
        &self,
        _descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError> {
        if self.fail_pipelines.load(Ordering::SeqCst) {
            return Err(ResourceError::Backend("pipeline creation failed".into()));
        }
        Ok(RenderPipelineId(self.id()))
    }

    fn destroy_render_pipeline(&self, _id: RenderPipelineId) -> Result<(), ResourceError> {
        self.drop_one()
    }

    fn create_buffer_with_data(
        &self,
        _descriptor: &BufferDescriptor,
        _data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        Ok(BufferId(self.id()))
    }

    fn destroy_buffer(&self, _id: BufferId) -> Result<(), ResourceError> {
        self.drop_one()
    }
}

/// One recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginPass,
    Viewport,
    Scissor,
    Pipeline(RenderPipelineId),
    DescriptorSet(u32, BindGroupId),
    VertexBuffer(BufferId),
    IndexBuffer(BufferId),
    DrawIndexed(u32, u32),
    Draw(u32),
    EndPass,
}

/// Stores every call in order.
#[derive(Debug, Default)]
pub struct RecordingRecorder {
    pub commands: Vec<Command>,
}

impl RecordingRecorder {
    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl CommandRecorder for RecordingRecorder {
    fn begin_render_pass(&mut self, _descriptor: &RenderPassDescriptor<'_>) {
        self.commands.push(Command::BeginPass);
    }

    fn set_viewport(&mut self, _viewport: &Viewport) {
        self.commands.push(Command::Viewport);
    }

    fn set_scissor(&mut self, _scissor: &ScissorRect) {
        self.commands.push(Command::Scissor);
    }

    fn bind_pipeline(&mut self, pipeline: RenderPipelineId) {
        self.commands.push(Command::Pipeline(pipeline));
    }

    fn bind_descriptor_set(&mut self, _layout: PipelineLayoutId, slot: u32, set: BindGroupId) {
        self.commands.push(Command::DescriptorSet(slot, set));
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId) {
        self.commands.push(Command::VertexBuffer(buffer));
    }

    fn bind_index_buffer(&mut self, buffer: BufferId, _format: IndexFormat) {
        self.commands.push(Command::IndexBuffer(buffer));
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32) {
        self.commands
            .push(Command::DrawIndexed(index_count, first_index));
    }

    fn draw(&mut self, vertex_count: u32, _first_vertex: u32) {
        self.commands.push(Command::Draw(vertex_count));
    }

    fn end_render_pass(&mut self) {
        self.commands.push(Command::EndPass);
    }
}

pub fn key(family: &str, defines: &[&str]) -> ShaderKey {
    ShaderKey::from_parts(
        family,
        defines.iter().map(|d| d.to_string()).collect(),
        vec![],
        vec![],
        vec![],
    )
}

/// Builds a shader for `family` with a hand-made key.
pub fn build_shader(
    device: &CountingDevice,
    family: &str,
    defines: &[&str],
) -> Arc<MaterialShader> {
    let registry = ShaderAllocatorRegistry::with_builtin_techniques();
    let technique = registry.allocate(family).unwrap();
    let shared = SharedLayouts::create(device).unwrap();
    let material = Material::new("test", VertexFormat::new(VertexAttributes::POSITION, 0));
    Arc::new(
        MaterialShader::build(
            device,
            technique.as_ref(),
            key(family, defines),
            &material,
            shared,
        )
        .unwrap(),
    )
}
