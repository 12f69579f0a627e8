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

use prism_core::renderer::{GraphicsDevice, RenderSettings};
use prism_data::Material;

use super::{
    MaterialShader, MaterialShaderCache, ShaderAllocatorRegistry, ShaderError, ShaderKey,
    ShadingTechnique, SharedLayouts,
};

/// Resolves materials to shared, cached [`MaterialShader`]s.
///
/// Two materials with the same [`ShaderKey`] get the same instance. The factory
/// owns the cache and the scene/object descriptor-set layouts every pipeline
/// it builds is laid out against.
#[derive(Debug)]
pub struct MaterialShaderFactory {
    registry: ShaderAllocatorRegistry,
    settings: RenderSettings,
    cache: MaterialShaderCache,
    shared: Option<SharedLayouts>,
}

impl MaterialShaderFactory {
    /// Creates a factory with an empty cache.
    pub fn new(registry: ShaderAllocatorRegistry, settings: RenderSettings) -> Self {
        Self {
            registry,
            settings,
            cache: MaterialShaderCache::new(),
            shared: None,
        }
    }

    /// The settings the factory was created with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The allocator registry.
    pub fn registry(&self) -> &ShaderAllocatorRegistry {
        &self.registry
    }

    fn technique_for(
        &self,
        material: &Material,
    ) -> Result<Box<dyn ShadingTechnique>, ShaderError> {
        let shader_id = material
            .shader_id()
            .unwrap_or(&self.settings.default_shader_id);
        self.registry.allocate(shader_id).ok_or_else(|| {
            log::error!(
                "No shader allocator registered for '{}' (material '{}')",
                shader_id,
                material.name()
            );
            ShaderError::UnknownShader {
                material: material.name().to_owned(),
                shader_id: shader_id.to_owned(),
            }
        })
    }

    /// Computes the structural key of `material`.
    ///
    /// Materials without a shader id use the configured default.
    pub fn structural_key(&self, material: &Material) -> Result<ShaderKey, ShaderError> {
        let technique = self.technique_for(material)?;
        Ok(ShaderKey::for_material(technique.as_ref(), material))
    }

    /// Returns the shader `material` is drawn with, building and caching it
    /// on first use.
    ///
    /// ## Errors
    /// - [`ShaderError::UnknownShader`] if no allocator matches the shader id.
    /// - [`ShaderError::HashCollision`] if key verification is enabled and the
    ///   cached shader under the same hash was built from other requirements.
    /// - [`ShaderError::Resource`] if the device fails to create an object.
    pub fn create_shader_for(
        &mut self,
        device: &dyn GraphicsDevice,
        material: &Material,
    ) -> Result<Arc<MaterialShader>, ShaderError> {
        let technique = self.technique_for(material)?;
        let key = ShaderKey::for_material(technique.as_ref(), material);

        if let Some(shader) = self.cache.get(key.hash) {
            if self.settings.verify_shader_keys && !shader.key().same_requirements(&key) {
                log::error!(
                    "Material '{}' hashes to {:#018x} but needs different code than '{}'",
                    material.name(),
                    key.hash,
                    shader.family()
                );
                return Err(ShaderError::HashCollision {
                    hash: key.hash,
                    material: material.name().to_owned(),
                    family: shader.family().to_owned(),
                });
            }
            log::debug!(
                "Shader cache hit for material '{}' ({:#018x})",
                material.name(),
                key.hash
            );
            return Ok(shader);
        }

        log::debug!(
            "Shader cache miss for material '{}' ({:#018x}), building '{}'",
            material.name(),
            key.hash,
            key.family
        );
        let shared = self.shared_layouts(device)?;
        let shader = MaterialShader::build(device, technique.as_ref(), key, material, shared)?;
        self.cache.insert(Arc::new(shader))
    }

    /// The scene (slot 0) and object (slot 2) layouts, created on first use.
    ///
    /// Applications create their scene and per-object descriptor sets against
    /// these.
    pub fn shared_layouts(
        &mut self,
        device: &dyn GraphicsDevice,
    ) -> Result<SharedLayouts, ShaderError> {
        if let Some(shared) = self.shared {
            return Ok(shared);
        }
        let shared = SharedLayouts::create(device)?;
        self.shared = Some(shared);
        Ok(shared)
    }

    /// Releases every cached shader and empties the cache.
    ///
    /// Render graphs built before this call refuse to record until rebuilt.
    /// The shared layouts survive.
    pub fn clear_cache(&mut self, device: &dyn GraphicsDevice) -> Result<(), ShaderError> {
        let count = self.cache.len();
        let mut first_error = None;
        for shader in self.cache.drain() {
            if let Err(e) = shader.release(device) {
                log::error!("Failed to release shader '{}': {}", shader.family(), e);
                first_error.get_or_insert(e);
            }
        }
        log::info!("Cleared {} cached material shaders", count);
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Clears the cache and destroys the shared layouts.
    pub fn release_all(&mut self, device: &dyn GraphicsDevice) -> Result<(), ShaderError> {
        self.clear_cache(device)?;
        if let Some(shared) = self.shared.take() {
            shared.release(device)?;
        }
        Ok(())
    }

    /// The cached shader with structural hash `hash`.
    pub fn shader(&self, hash: u64) -> Option<Arc<MaterialShader>> {
        self.cache.get(hash)
    }

    /// The number of distinct shaders built so far.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::test_support::CountingDevice;
    use crate::render_lane::techniques::{PbrTechnique, UnlitTechnique};
    use prism_core::renderer::{ResourceError, TextureViewId};
    use prism_data::{TextureSlot, VertexAttributes, VertexFormat};
    use std::sync::atomic::Ordering;

    fn format() -> VertexFormat {
        VertexFormat::new(VertexAttributes::POSITION | VertexAttributes::NORMAL, 1)
    }

    fn factory() -> MaterialShaderFactory {
        MaterialShaderFactory::new(
            ShaderAllocatorRegistry::with_builtin_techniques(),
            RenderSettings::default(),
        )
    }

    #[test]
    fn identical_requirements_share_one_shader() {
        let device = CountingDevice::default();
        let mut factory = factory();
        let red = Material::new("red", format()).with_metallic(0.1);
        let blue = Material::new("blue", format()).with_roughness(0.9);

        let a = factory.create_shader_for(&device, &red).unwrap();
        let again = factory.create_shader_for(&device, &red).unwrap();
        let b = factory.create_shader_for(&device, &blue).unwrap();

        assert!(Arc::ptr_eq(&a, &again));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(factory.cached_count(), 1);
        assert_eq!(device.shader_modules.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn different_textures_get_different_shaders() {
        let device = CountingDevice::default();
        let mut factory = factory();
        let plain = Material::new("plain", format());
        let mapped = Material::new("mapped", format()).with_texture(
            TextureSlot::Normal,
            TextureViewId(1),
            0,
        );

        let a = factory.create_shader_for(&device, &plain).unwrap();
        let b = factory.create_shader_for(&device, &mapped).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(factory.cached_count(), 2);
        assert!(Arc::ptr_eq(&factory.shader(b.hash()).unwrap(), &b));
    }

    #[test]
    fn missing_shader_id_uses_the_default() {
        let factory = factory();
        let material = Material::new("m", format());
        let key = factory.structural_key(&material).unwrap();
        assert_eq!(key, ShaderKey::for_material(&PbrTechnique, &material));
    }

    #[test]
    fn unknown_shader_id_is_reported() {
        let device = CountingDevice::default();
        let mut factory = factory();
        let material = Material::new("odd", format()).with_shader("toon");

        let err = factory.create_shader_for(&device, &material).unwrap_err();

        assert_eq!(
            err,
            ShaderError::UnknownShader {
                material: "odd".into(),
                shader_id: "toon".into(),
            }
        );
        assert_eq!(factory.cached_count(), 0);
    }

    #[test]
    fn clear_cache_releases_everything_but_shared_layouts() {
        let device = CountingDevice::default();
        let mut factory = factory();
        let shader = factory
            .create_shader_for(&device, &Material::new("m", format()))
            .unwrap();
        shader
            .create_material_bind_group(&device, &Material::new("m", format()))
            .unwrap();

        factory.clear_cache(&device).unwrap();

        assert!(shader.is_released());
        assert_eq!(factory.cached_count(), 0);
        // Scene and object layouts.
        assert_eq!(device.live(), 2);

        factory.release_all(&device).unwrap();
        assert_eq!(device.live(), 0);
    }

    #[test]
    fn colliding_hash_with_other_requirements_is_rejected() {
        let device = CountingDevice::default();
        let mut factory = factory();
        factory.settings.verify_shader_keys = true;
        let material = Material::new("m", format()).with_shader("unlit");
        let real = factory.structural_key(&material).unwrap();

        // Plant a shader whose key hashes identically but lists other strings.
        let mut fake = ShaderKey::from_parts("unlit", vec!["X".into()], vec![], vec![], vec![]);
        fake.hash = real.hash;
        let shared = factory.shared_layouts(&device).unwrap();
        let planted = MaterialShader::build(
            &device,
            &UnlitTechnique,
            fake,
            &material,
            shared,
        )
        .unwrap();
        factory.cache.insert(Arc::new(planted)).unwrap();

        let err = factory.create_shader_for(&device, &material).unwrap_err();
        assert!(matches!(err, ShaderError::HashCollision { hash, .. } if hash == real.hash));

        factory.settings.verify_shader_keys = false;
        assert!(factory.create_shader_for(&device, &material).is_ok());
    }

    #[test]
    fn failed_build_leaves_nothing_behind() {
        let device = CountingDevice::default();
        let mut factory = factory();
        device.fail_pipelines.store(true, Ordering::SeqCst);

        let err = factory
            .create_shader_for(&device, &Material::new("m", format()))
            .unwrap_err();

        assert!(matches!(err, ShaderError::Resource(ResourceError::Backend(_))));
        assert_eq!(factory.cached_count(), 0);
        // Only the scene and object layouts survive.
        assert_eq!(device.live(), 2);

        factory.release_all(&device).unwrap();
        assert_eq!(device.live(), 0);
    }

    #[test]
    fn failed_material_bind_group_frees_its_buffer() {
        let device = CountingDevice::default();
        let mut factory = factory();
        let material = Material::new("m", format());
        let shader = factory.create_shader_for(&device, &material).unwrap();
        let before = device.live();

        device.fail_bind_groups.store(true, Ordering::SeqCst);
        assert!(shader.create_material_bind_group(&device, &material).is_err());
        assert_eq!(device.live(), before);

        factory.release_all(&device).unwrap();
        assert_eq!(device.live(), 0);
    }
}
