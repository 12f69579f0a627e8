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

//! The shading-technique capability and the compiled [`MaterialShader`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use prism_core::renderer::{
    BindGroupDescriptor, BindGroupEntry, BindGroupId, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindGroupLayoutId, BindingResource, BindingType, BufferDescriptor,
    BufferId, BufferUsage, CullMode, GraphicsDevice, PipelineLayoutDescriptor, PipelineLayoutId,
    PrimitiveTopology, RenderPipelineDescriptor, RenderPipelineId, ResourceError,
    ShaderModuleDescriptor, ShaderModuleId, ShaderStage,
};
use prism_data::{Material, TextureBinding, TextureSlot};

use super::ShaderKey;

/// First binding index of material textures; 0 and 1 hold the variant and
/// material uniform buffers.
pub const FIRST_TEXTURE_BINDING: u32 = 2;

/// What one shading family needs from a material.
///
/// Each built-in family (PBR, Phong, unlit) implements this trait. The lists
/// returned here feed the structural hash, so they must be deterministic and
/// depend only on the material's shading requirements, never on its factors.
pub trait ShadingTechnique: Send + Sync + fmt::Debug {
    /// The family id, e.g. `"pbr"`.
    fn family(&self) -> &'static str;

    /// The program source shared by every variant of the family.
    fn shader_source(&self) -> &'static str;

    /// The texture slots the family knows how to sample, in binding order.
    fn texture_slots(&self) -> &'static [TextureSlot];

    /// Preprocessor defines selecting the variant for `material`.
    fn shader_defines(&self, material: &Material) -> Vec<String>;

    /// Vertex stage input declarations.
    fn vertex_inputs(&self, material: &Material) -> Vec<String>;

    /// Vertex stage output declarations.
    fn vertex_outputs(&self, material: &Material) -> Vec<String>;

    /// Fragment stage input declarations.
    fn fragment_inputs(&self, material: &Material) -> Vec<String>;

    /// The textures of `material` this family samples, in binding order.
    fn bound_textures(&self, material: &Material) -> Vec<(TextureSlot, TextureBinding)> {
        self.texture_slots()
            .iter()
            .filter_map(|&slot| material.texture(slot).map(|binding| (slot, *binding)))
            .collect()
    }

    /// Layout of the material descriptor set (slot 1).
    fn material_layout_entries(&self, material: &Material) -> Vec<BindGroupLayoutEntry> {
        let mut entries = vec![
            BindGroupLayoutEntry::uniform(0, ShaderStage::VERTEX | ShaderStage::FRAGMENT),
            BindGroupLayoutEntry::uniform(1, ShaderStage::FRAGMENT),
        ];
        entries.extend(
            (0..self.bound_textures(material).len() as u32)
                .map(|i| BindGroupLayoutEntry::texture(FIRST_TEXTURE_BINDING + i)),
        );
        entries
    }

    /// Contents of the per-variant uniform buffer.
    fn variant_params(&self, material: &Material) -> VariantParams {
        let format = material.vertex_format();
        VariantParams {
            attribute_mask: format.attributes().bits(),
            texcoord_sets: u32::from(format.texcoord_sets()),
            texture_count: self.bound_textures(material).len() as u32,
            flags: 0,
        }
    }
}

/// Per-variant constants uploaded once when the variant is built.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VariantParams {
    /// The vertex attribute bits the variant reads.
    pub attribute_mask: u32,
    /// Number of texcoord sets.
    pub texcoord_sets: u32,
    /// Number of sampled textures.
    pub texture_count: u32,
    /// Family-specific flags.
    pub flags: u32,
}

/// The scene (slot 0) and per-object (slot 2) layouts shared by every
/// material shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedLayouts {
    /// Camera uniforms and the light list.
    pub scene: BindGroupLayoutId,
    /// Model and normal matrices.
    pub object: BindGroupLayoutId,
}

impl SharedLayouts {
    /// Creates both layouts.
    pub fn create(device: &dyn GraphicsDevice) -> Result<Self, ResourceError> {
        let both = ShaderStage::VERTEX | ShaderStage::FRAGMENT;
        let scene = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("scene_layout".into()),
            entries: &[
                BindGroupLayoutEntry::uniform(0, both),
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStage::FRAGMENT,
                    ty: BindingType::StorageBuffer,
                },
            ],
        })?;
        let object = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("object_layout".into()),
            entries: &[BindGroupLayoutEntry::uniform(0, ShaderStage::VERTEX)],
        })?;
        Ok(Self { scene, object })
    }

    /// Destroys both layouts.
    pub fn release(&self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_bind_group_layout(self.scene)?;
        device.destroy_bind_group_layout(self.object)
    }
}

/// One compiled shading variant: pipeline, layouts and variant data buffer.
///
/// Owned by the [`MaterialShaderCache`](super::MaterialShaderCache); render
/// graph nodes only keep weak references. The material descriptor sets created
/// through [`create_material_bind_group`](Self::create_material_bind_group)
/// belong to the shader and are released with it.
pub struct MaterialShader {
    key: ShaderKey,
    module: ShaderModuleId,
    variant_buffer: BufferId,
    material_layout: BindGroupLayoutId,
    pipeline_layout: PipelineLayoutId,
    pipeline: RenderPipelineId,
    texture_slots: Vec<TextureSlot>,
    material_resources: Mutex<Vec<(BindGroupId, BufferId)>>,
    released: AtomicBool,
}

impl MaterialShader {
    /// Compiles the variant described by `key` for the first material that
    /// needs it.
    ///
    /// `material` only provides the layout (which textures are bound); its
    /// factors are not baked into the variant.
    pub fn build(
        device: &dyn GraphicsDevice,
        technique: &dyn ShadingTechnique,
        key: ShaderKey,
        material: &Material,
        shared: SharedLayouts,
    ) -> Result<Self, ResourceError> {
        let label = format!("{}_{:016x}", key.family, key.hash);
        let entries = technique.material_layout_entries(material);

        let mut created = PartialObjects::default();
        let objects = match Self::create_objects(
            device,
            technique,
            &key,
            material,
            shared,
            &label,
            &entries,
            &mut created,
        ) {
            Ok(objects) => objects,
            Err(err) => {
                log::error!("Failed to build material shader '{}': {}", label, err);
                created.destroy(device);
                return Err(err);
            }
        };

        log::debug!(
            "Built material shader '{}' with {} defines and {} texture bindings",
            label,
            key.defines.len(),
            entries.len().saturating_sub(FIRST_TEXTURE_BINDING as usize)
        );

        Ok(Self {
            texture_slots: technique
                .bound_textures(material)
                .into_iter()
                .map(|(slot, _)| slot)
                .collect(),
            key,
            module: objects.module,
            variant_buffer: objects.variant_buffer,
            material_layout: objects.material_layout,
            pipeline_layout: objects.pipeline_layout,
            pipeline: objects.pipeline,
            material_resources: Mutex::new(Vec::new()),
            released: AtomicBool::new(false),
        })
    }

    /// Creates the GPU objects of a variant in dependency order, recording each
    /// one in `created` so a failure part way through can be unwound.
    #[allow(clippy::too_many_arguments)]
    fn create_objects(
        device: &dyn GraphicsDevice,
        technique: &dyn ShadingTechnique,
        key: &ShaderKey,
        material: &Material,
        shared: SharedLayouts,
        label: &str,
        entries: &[BindGroupLayoutEntry],
        created: &mut PartialObjects,
    ) -> Result<VariantObjects, ResourceError> {
        let module = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some(label.into()),
            source: technique.shader_source().into(),
            defines: &key.defines,
        })?;
        created.module = Some(module);

        let params = technique.variant_params(material);
        let variant_buffer = device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(format!("{label}_variant").into()),
                usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            },
            bytemuck::bytes_of(&params),
        )?;
        created.variant_buffer = Some(variant_buffer);

        let material_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(format!("{label}_material_layout").into()),
            entries,
        })?;
        created.material_layout = Some(material_layout);

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(format!("{label}_layout").into()),
            bind_group_layouts: &[shared.scene, material_layout, shared.object],
        })?;
        created.pipeline_layout = Some(pipeline_layout);

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(label.into()),
            layout: pipeline_layout,
            shader: module,
            vertex_inputs: &key.vertex_inputs,
            topology: PrimitiveTopology::TriangleList,
            cull_mode: CullMode::Back,
            depth_test: true,
        })?;

        Ok(VariantObjects {
            module,
            variant_buffer,
            material_layout,
            pipeline_layout,
            pipeline,
        })
    }

    /// Creates the descriptor set `material` is drawn with: the variant
    /// buffer, a new uniform buffer holding the material factors, and the
    /// material's textures.
    pub fn create_material_bind_group(
        &self,
        device: &dyn GraphicsDevice,
        material: &Material,
    ) -> Result<BindGroupId, ResourceError> {
        let uniforms = material.uniforms();
        let buffer = device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(format!("{}_uniforms", material.name()).into()),
                usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            },
            bytemuck::bytes_of(&uniforms),
        )?;

        let mut entries = vec![
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer(self.variant_buffer),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Buffer(buffer),
            },
        ];
        for (i, &slot) in self.texture_slots.iter().enumerate() {
            let Some(texture) = material.texture(slot) else {
                device.destroy_buffer(buffer)?;
                return Err(ResourceError::InvalidHandle(format!(
                    "material '{}' has no {:?} texture required by shader '{}'",
                    material.name(),
                    slot,
                    self.key.family
                )));
            };
            entries.push(BindGroupEntry {
                binding: FIRST_TEXTURE_BINDING + i as u32,
                resource: BindingResource::TextureView(texture.texture),
            });
        }

        let bind_group = match device.create_bind_group(&BindGroupDescriptor {
            label: Some(material.name().into()),
            layout: self.material_layout,
            entries: &entries,
        }) {
            Ok(bind_group) => bind_group,
            Err(err) => {
                device.destroy_buffer(buffer)?;
                return Err(err);
            }
        };

        self.material_resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((bind_group, buffer));
        Ok(bind_group)
    }

    /// Destroys every GPU object owned by this shader, including the material
    /// descriptor sets created through it. Releasing twice is a no-op.
    pub fn release(&self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let resources = std::mem::take(
            &mut *self
                .material_resources
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for (bind_group, buffer) in resources {
            device.destroy_bind_group(bind_group)?;
            device.destroy_buffer(buffer)?;
        }
        device.destroy_render_pipeline(self.pipeline)?;
        device.destroy_pipeline_layout(self.pipeline_layout)?;
        device.destroy_bind_group_layout(self.material_layout)?;
        device.destroy_buffer(self.variant_buffer)?;
        device.destroy_shader_module(self.module)?;
        log::debug!("Released material shader '{}'", self.key.family);
        Ok(())
    }

    /// `true` once [`release`](Self::release) ran.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// The render pipeline.
    pub fn pipeline(&self) -> RenderPipelineId {
        self.pipeline
    }

    /// The pipeline layout descriptor sets are bound against.
    pub fn pipeline_layout(&self) -> PipelineLayoutId {
        self.pipeline_layout
    }

    /// The layout of material descriptor sets.
    pub fn material_layout(&self) -> BindGroupLayoutId {
        self.material_layout
    }

    /// The key this variant was built from.
    pub fn key(&self) -> &ShaderKey {
        &self.key
    }

    /// The structural hash.
    pub fn hash(&self) -> u64 {
        self.key.hash
    }

    /// The shading family.
    pub fn family(&self) -> &str {
        &self.key.family
    }
}

/// Every GPU object of a fully built variant.
struct VariantObjects {
    module: ShaderModuleId,
    variant_buffer: BufferId,
    material_layout: BindGroupLayoutId,
    pipeline_layout: PipelineLayoutId,
    pipeline: RenderPipelineId,
}

/// The objects of a variant created so far.
#[derive(Debug, Default)]
struct PartialObjects {
    module: Option<ShaderModuleId>,
    variant_buffer: Option<BufferId>,
    material_layout: Option<BindGroupLayoutId>,
    pipeline_layout: Option<PipelineLayoutId>,
}

impl PartialObjects {
    /// Destroys whatever was created, in reverse creation order.
    fn destroy(self, device: &dyn GraphicsDevice) {
        let results = [
            self.pipeline_layout
                .map(|id| device.destroy_pipeline_layout(id)),
            self.material_layout
                .map(|id| device.destroy_bind_group_layout(id)),
            self.variant_buffer.map(|id| device.destroy_buffer(id)),
            self.module.map(|id| device.destroy_shader_module(id)),
        ];
        for err in results.into_iter().flatten().filter_map(Result::err) {
            log::warn!("Failed to destroy a partially built shader object: {}", err);
        }
    }
}

impl fmt::Debug for MaterialShader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialShader")
            .field("family", &self.key.family)
            .field("hash", &format_args!("{:#018x}", self.key.hash))
            .field("pipeline", &self.pipeline)
            .field("released", &self.is_released())
            .finish()
    }
}
