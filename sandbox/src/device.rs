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

//! A graphics device that only hands out ids and tracks what is alive.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use prism_core::renderer::{
    BindGroupDescriptor, BindGroupId, BindGroupLayoutDescriptor, BindGroupLayoutId,
    BufferDescriptor, BufferId, GraphicsDevice, PipelineLayoutDescriptor, PipelineLayoutId,
    RenderPipelineDescriptor, RenderPipelineId, ResourceError, ShaderModuleDescriptor,
    ShaderModuleId,
};

#[derive(Debug, Default)]
pub struct InMemoryDevice {
    next_id: AtomicUsize,
    live: AtomicUsize,
    uploaded_bytes: AtomicU64,
    shader_modules: AtomicUsize,
}

impl InMemoryDevice {
    fn allocate(&self, kind: &str, label: Option<&str>) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live.fetch_add(1, Ordering::Relaxed);
        log::trace!("create {kind} #{id} ({})", label.unwrap_or("unnamed"));
        id
    }

    fn free(&self, kind: &str, id: usize) -> Result<(), ResourceError> {
        let previous = self
            .live
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
        if previous.is_err() {
            return Err(ResourceError::InvalidHandle(format!(
                "{kind} #{id} destroyed with no live objects"
            )));
        }
        log::trace!("destroy {kind} #{id}");
        Ok(())
    }

    /// Objects created and not yet destroyed.
    pub fn live_objects(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Bytes handed to buffer creation.
    pub fn uploaded_bytes(&self) -> u64 {
        self.uploaded_bytes.load(Ordering::Relaxed)
    }

    /// Shader modules compiled so far.
    pub fn compiled_modules(&self) -> usize {
        self.shader_modules.load(Ordering::Relaxed)
    }
}

impl GraphicsDevice for InMemoryDevice {
    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError> {
        if descriptor.source.is_empty() {
            return Err(ResourceError::ShaderCompilation {
                label: descriptor.label.as_deref().unwrap_or_default().to_owned(),
                details: "empty source".to_owned(),
            });
        }
        self.shader_modules.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "Compiling '{}' with defines {:?}",
            descriptor.label.as_deref().unwrap_or("unnamed"),
            descriptor.defines
        );
        Ok(ShaderModuleId(
            self.allocate("shader module", descriptor.label.as_deref()),
        ))
    }

    fn destroy_shader_module(&self, id: ShaderModuleId) -> Result<(), ResourceError> {
        self.free("shader module", id.0)
    }

    fn create_bind_group_layout(
        &self,
        descriptor: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayoutId, ResourceError> {
        Ok(BindGroupLayoutId(
            self.allocate("bind group layout", descriptor.label.as_deref()),
        ))
    }

    fn destroy_bind_group_layout(&self, id: BindGroupLayoutId) -> Result<(), ResourceError> {
        self.free("bind group layout", id.0)
    }

    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError> {
        Ok(BindGroupId(
            self.allocate("bind group", descriptor.label.as_deref()),
        ))
    }

    fn destroy_bind_group(&self, id: BindGroupId) -> Result<(), ResourceError> {
        self.free("bind group", id.0)
    }

    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError> {
        Ok(PipelineLayoutId(
            self.allocate("pipeline layout", descriptor.label.as_deref()),
        ))
    }

    fn destroy_pipeline_layout(&self, id: PipelineLayoutId) -> Result<(), ResourceError> {
        self.free("pipeline layout", id.0)
    }

    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError> {
        Ok(RenderPipelineId(
            self.allocate("render pipeline", descriptor.label.as_deref()),
        ))
    }

    fn destroy_render_pipeline(&self, id: RenderPipelineId) -> Result<(), ResourceError> {
        self.free("render pipeline", id.0)
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        self.uploaded_bytes
            .fetch_add(data.len() as u64, Ordering::Relaxed);
        Ok(BufferId(self.allocate("buffer", descriptor.label.as_deref())))
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        self.free("buffer", id.0)
    }
}
