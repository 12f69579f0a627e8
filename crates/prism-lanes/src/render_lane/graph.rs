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

use std::sync::Arc;

use prism_core::renderer::{
    BindGroupId, BufferId, CommandRecorder, IndexFormat, RecordStats, RenderError,
    RenderPassDescriptor, RenderSettings, RenderTarget,
};
use prism_data::Model;

use super::{AuxiliaryNode, MaterialShader, ShaderAssignment, ShaderNode};

#[derive(Debug, Clone)]
struct ModelBuffers {
    name: String,
    vertex: BufferId,
    index: BufferId,
    format: IndexFormat,
}

#[derive(Debug)]
enum GraphNode {
    Auxiliary(Box<dyn AuxiliaryNode>),
    Shader(ShaderNode),
}

/// The batching tree of one or more models plus auxiliary passes.
///
/// Top-level nodes record in insertion order. Building touches no GPU state;
/// [`record`](Self::record) is read-only over the tree and can run every frame
/// until the scene's material mapping changes.
#[derive(Debug)]
pub struct RenderGraph {
    settings: RenderSettings,
    nodes: Vec<GraphNode>,
    models: Vec<ModelBuffers>,
    scene_bind_group: Option<BindGroupId>,
    target: Option<RenderTarget>,
    built: bool,
}

impl RenderGraph {
    /// Creates an empty, unbuilt graph.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            nodes: Vec::new(),
            models: Vec::new(),
            scene_bind_group: None,
            target: None,
            built: false,
        }
    }

    /// The settings used when recording.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Appends an auxiliary pass and returns its index among auxiliary nodes.
    pub fn add_auxiliary(&mut self, node: Box<dyn AuxiliaryNode>) -> usize {
        log::debug!("Added auxiliary node '{}'", node.label());
        self.nodes.push(GraphNode::Auxiliary(node));
        self.auxiliary_count() - 1
    }

    /// The auxiliary node at `index`, e.g. to toggle it.
    pub fn auxiliary_mut(&mut self, index: usize) -> Option<&mut (dyn AuxiliaryNode + 'static)> {
        self.nodes
            .iter_mut()
            .filter_map(|node| match node {
                GraphNode::Auxiliary(aux) => Some(aux.as_mut()),
                GraphNode::Shader(_) => None,
            })
            .nth(index)
    }

    /// The number of auxiliary nodes.
    pub fn auxiliary_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, GraphNode::Auxiliary(_)))
            .count()
    }

    /// Appends one shader node per group of `assignment`, built against
    /// `model`, and returns the slot of the model's buffers.
    ///
    /// Groups whose materials no mesh uses add nothing. The graph counts as
    /// built afterwards.
    pub fn add_model(&mut self, model: &Model, assignment: &ShaderAssignment) -> usize {
        let slot = self.models.len();
        self.models.push(ModelBuffers {
            name: model.name().to_owned(),
            vertex: model.vertex_buffer(),
            index: model.index_buffer(),
            format: model.index_format(),
        });

        let mut added = 0;
        for group in assignment.groups() {
            let node = ShaderNode::build(slot, model, group);
            if node.is_empty() {
                log::warn!(
                    "No mesh of '{}' uses shader '{}' ({:#018x}); skipping it",
                    model.name(),
                    node.family(),
                    node.hash()
                );
                continue;
            }
            self.nodes.push(GraphNode::Shader(node));
            added += 1;
        }

        self.built = true;
        log::info!(
            "Render graph: model '{}' added with {} shader nodes",
            model.name(),
            added
        );
        slot
    }

    /// The descriptor set bound at the scene slot after each pipeline bind.
    pub fn set_scene_bind_group(&mut self, bind_group: BindGroupId) {
        self.scene_bind_group = Some(bind_group);
    }

    /// The surfaces the next recorded pass draws into.
    pub fn set_target(&mut self, target: RenderTarget) {
        self.target = Some(target);
    }

    /// `true` once a model was added since the last [`clear`](Self::clear).
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Drops every node and model; the graph must be rebuilt before recording.
    ///
    /// Scene bind group and target are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.models.clear();
        self.built = false;
    }

    /// The shader nodes, in insertion order.
    pub fn shader_nodes(&self) -> impl Iterator<Item = &ShaderNode> {
        self.nodes.iter().filter_map(|node| match node {
            GraphNode::Shader(shader) => Some(shader),
            GraphNode::Auxiliary(_) => None,
        })
    }

    /// Records one frame into `recorder`.
    ///
    /// Every shader is checked before the pass begins, so a failing call
    /// records nothing. A model's vertex and index buffers are bound when the
    /// first of its shader nodes records and again only after another model
    /// or an auxiliary node ran in between.
    ///
    /// ## Errors
    /// - [`RenderError::GraphNotBuilt`] before any model was added.
    /// - [`RenderError::NoRenderTarget`] if no target was set.
    /// - [`RenderError::ShaderReleased`] if a shader was released, e.g. by
    ///   clearing the factory cache, after the graph was built.
    pub fn record(
        &self,
        recorder: &mut dyn CommandRecorder,
    ) -> Result<RecordStats, RenderError> {
        if !self.built {
            return Err(RenderError::GraphNotBuilt);
        }
        let target = self.target.ok_or(RenderError::NoRenderTarget)?;
        let shaders = self.resolve_shaders()?;

        let mut stats = RecordStats::default();
        recorder.begin_render_pass(&RenderPassDescriptor::clearing(
            Some("main_pass"),
            target,
            self.settings.clear_color,
            self.settings.clear_depth,
        ));
        recorder.set_viewport(&self.settings.viewport);
        recorder.set_scissor(&self.settings.effective_scissor());

        let mut bound_model = None;
        let mut shaders = shaders.iter();
        for node in &self.nodes {
            match node {
                GraphNode::Auxiliary(aux) => {
                    if !aux.is_enabled() {
                        log::trace!("Skipping disabled auxiliary node '{}'", aux.label());
                        stats.skipped_auxiliary += 1;
                        continue;
                    }
                    aux.record(recorder, &mut stats);
                    bound_model = None;
                }
                GraphNode::Shader(node) => {
                    let Some(shader) = shaders.next() else {
                        break;
                    };
                    if bound_model != Some(node.model_slot()) {
                        let buffers = &self.models[node.model_slot()];
                        log::trace!("Binding buffers of model '{}'", buffers.name);
                        recorder.bind_vertex_buffer(buffers.vertex);
                        recorder.bind_index_buffer(buffers.index, buffers.format);
                        stats.buffer_binds += 1;
                        bound_model = Some(node.model_slot());
                    }
                    node.record(shader, self.scene_bind_group, recorder, &mut stats);
                }
            }
        }

        recorder.end_render_pass();
        log::trace!(
            "Recorded {} draws with {} pipeline and {} material binds",
            stats.draw_calls,
            stats.pipeline_binds,
            stats.material_binds
        );
        Ok(stats)
    }

    fn resolve_shaders(&self) -> Result<Vec<Arc<MaterialShader>>, RenderError> {
        self.shader_nodes()
            .map(|node| {
                node.shader().ok_or_else(|| {
                    log::error!(
                        "Shader '{}' ({:#018x}) was released while the render graph still uses it",
                        node.family(),
                        node.hash()
                    );
                    RenderError::ShaderReleased {
                        family: node.family().to_owned(),
                        hash: node.hash(),
                    }
                })
            })
            .collect()
    }
}
