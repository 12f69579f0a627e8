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

use ahash::AHashMap;

use super::techniques::{PbrTechnique, PhongTechnique, UnlitTechnique};
use super::ShadingTechnique;

/// Produces a fresh technique object for one shader id.
pub type ShaderAllocator = fn() -> Box<dyn ShadingTechnique>;

/// Maps shader ids to allocators.
///
/// Populated by the application before any material is resolved, then handed
/// to the [`MaterialShaderFactory`](super::MaterialShaderFactory). There is no
/// global registry.
#[derive(Debug, Default, Clone)]
pub struct ShaderAllocatorRegistry {
    allocators: AHashMap<String, ShaderAllocator>,
}

impl ShaderAllocatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `"pbr"`, `"phong"` and `"unlit"`.
    pub fn with_builtin_techniques() -> Self {
        let mut registry = Self::new();
        registry.register("pbr", || Box::new(PbrTechnique));
        registry.register("phong", || Box::new(PhongTechnique));
        registry.register("unlit", || Box::new(UnlitTechnique));
        registry
    }

    /// Registers `allocator` under `id`, returning the allocator it replaces.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        allocator: ShaderAllocator,
    ) -> Option<ShaderAllocator> {
        let id = id.into();
        let previous = self.allocators.insert(id.clone(), allocator);
        if previous.is_some() {
            log::warn!("Shader allocator '{}' was registered twice; keeping the last", id);
        }
        previous
    }

    /// Instantiates the technique registered under `id`.
    pub fn allocate(&self, id: &str) -> Option<Box<dyn ShadingTechnique>> {
        self.allocators.get(id).map(|allocate| allocate())
    }

    /// `true` if `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.allocators.contains_key(id)
    }

    /// The registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.allocators.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = ShaderAllocatorRegistry::with_builtin_techniques();
        assert_eq!(registry.ids(), vec!["pbr", "phong", "unlit"]);
        assert_eq!(registry.allocate("phong").unwrap().family(), "phong");
        assert!(registry.allocate("toon").is_none());
    }

    #[test]
    fn aliases_share_a_technique() {
        let mut registry = ShaderAllocatorRegistry::new();
        assert!(registry.register("standard", || Box::new(PbrTechnique)).is_none());
        assert!(registry.register("standard", || Box::new(PbrTechnique)).is_some());
        assert_eq!(registry.allocate("standard").unwrap().family(), "pbr");
    }
}
