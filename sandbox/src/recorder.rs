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

//! A command recorder that logs every command instead of encoding it.

use prism_core::renderer::{
    BindGroupId, BufferId, CommandRecorder, IndexFormat, PipelineLayoutId, RenderPassDescriptor,
    RenderPipelineId, ScissorRect, Viewport,
};

#[derive(Debug, Default)]
pub struct LoggingRecorder {
    commands: usize,
}

impl LoggingRecorder {
    /// Commands seen since creation.
    pub fn command_count(&self) -> usize {
        self.commands
    }

    fn log(&mut self, args: std::fmt::Arguments<'_>) {
        self.commands += 1;
        log::trace!("[cmd {:>4}] {}", self.commands, args);
    }
}

impl CommandRecorder for LoggingRecorder {
    fn begin_render_pass(&mut self, descriptor: &RenderPassDescriptor<'_>) {
        self.log(format_args!(
            "begin pass '{}' into {:?}",
            descriptor.label.unwrap_or("unnamed"),
            descriptor.color_attachment.view
        ));
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.log(format_args!("viewport {}x{}", viewport.width, viewport.height));
    }

    fn set_scissor(&mut self, scissor: &ScissorRect) {
        self.log(format_args!("scissor {}x{}", scissor.width, scissor.height));
    }

    fn bind_pipeline(&mut self, pipeline: RenderPipelineId) {
        self.log(format_args!("bind pipeline {:?}", pipeline));
    }

    fn bind_descriptor_set(&mut self, _layout: PipelineLayoutId, slot: u32, set: BindGroupId) {
        self.log(format_args!("bind set {} = {:?}", slot, set));
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId) {
        self.log(format_args!("bind vertex buffer {:?}", buffer));
    }

    fn bind_index_buffer(&mut self, buffer: BufferId, format: IndexFormat) {
        self.log(format_args!("bind index buffer {:?} ({:?})", buffer, format));
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32) {
        self.log(format_args!("draw {} indices from {}", index_count, first_index));
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) {
        self.log(format_args!("draw {} vertices from {}", vertex_count, first_vertex));
    }

    fn end_render_pass(&mut self) {
        self.log(format_args!("end pass"));
    }
}
