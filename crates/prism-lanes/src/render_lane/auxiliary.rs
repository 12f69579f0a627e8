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

use std::fmt;

use prism_core::renderer::{
    BindGroupId, BindGroupLayoutId, CommandRecorder, CullMode, GraphicsDevice,
    PipelineLayoutDescriptor, PipelineLayoutId, PrimitiveTopology, RecordStats,
    RenderPipelineDescriptor, RenderPipelineId, ResourceError, ShaderModuleDescriptor,
    ShaderModuleId, SCENE_SLOT,
};

use super::shaders::BACKGROUND_GLSL;

/// A pass recorded alongside the batching tree and not tied to any model.
pub trait AuxiliaryNode: Send + Sync + fmt::Debug {
    /// A short name for logs.
    fn label(&self) -> &str;

    /// Disabled nodes are skipped by the render graph.
    fn is_enabled(&self) -> bool;

    /// Enables or disables the node.
    fn set_enabled(&mut self, enabled: bool);

    /// Records the node's commands inside the open render pass.
    fn record(&self, recorder: &mut dyn CommandRecorder, stats: &mut RecordStats);
}

/// Fills the screen with a sky gradient using one fullscreen triangle.
///
/// Drawn without depth testing, so add it before the models.
#[derive(Debug)]
pub struct BackgroundNode {
    module: ShaderModuleId,
    layout: PipelineLayoutId,
    pipeline: RenderPipelineId,
    bind_group: BindGroupId,
    enabled: bool,
}

impl BackgroundNode {
    /// Builds the background pipeline against the scene layout and the
    /// scene descriptor set it reads the camera from.
    pub fn build(
        device: &dyn GraphicsDevice,
        scene_layout: BindGroupLayoutId,
        scene_bind_group: BindGroupId,
    ) -> Result<Self, ResourceError> {
        let module = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("background".into()),
            source: BACKGROUND_GLSL.into(),
            defines: &[],
        })?;
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("background_layout".into()),
            bind_group_layouts: &[scene_layout],
        })?;
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("background".into()),
            layout,
            shader: module,
            vertex_inputs: &[],
            topology: PrimitiveTopology::TriangleList,
            cull_mode: CullMode::None,
            depth_test: false,
        })?;
        Ok(Self {
            module,
            layout,
            pipeline,
            bind_group: scene_bind_group,
            enabled: true,
        })
    }

    /// Destroys the pipeline, its layout and the shader module.
    pub fn release(&self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_render_pipeline(self.pipeline)?;
        device.destroy_pipeline_layout(self.layout)?;
        device.destroy_shader_module(self.module)
    }
}

impl AuxiliaryNode for BackgroundNode {
    fn label(&self) -> &str {
        "background"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn record(&self, recorder: &mut dyn CommandRecorder, stats: &mut RecordStats) {
        recorder.bind_pipeline(self.pipeline);
        recorder.bind_descriptor_set(self.layout, SCENE_SLOT, self.bind_group);
        recorder.draw(3, 0);
        stats.auxiliary_pipeline_binds += 1;
        stats.draw_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::test_support::{Command, CountingDevice, RecordingRecorder};

    #[test]
    fn background_draws_one_triangle() {
        let device = CountingDevice::default();
        let node = BackgroundNode::build(&device, BindGroupLayoutId(1), BindGroupId(2)).unwrap();
        let mut recorder = RecordingRecorder::default();
        let mut stats = RecordStats::default();

        node.record(&mut recorder, &mut stats);

        assert_eq!(recorder.commands.len(), 3);
        assert_eq!(recorder.commands[1], Command::DescriptorSet(SCENE_SLOT, BindGroupId(2)));
        assert_eq!(recorder.commands[2], Command::Draw(3));
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.auxiliary_pipeline_binds, 1);
        assert_eq!(stats.pipeline_binds, 0);

        node.release(&device).unwrap();
        assert_eq!(device.live(), 0);
    }
}
