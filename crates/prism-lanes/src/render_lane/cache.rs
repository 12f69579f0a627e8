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

use ahash::AHashMap;

use super::{MaterialShader, ShaderError};

/// Structural hash to compiled shader.
///
/// The cache is the sole owner of every [`MaterialShader`]; render graph nodes
/// hold weak references. A hash can be inserted once.
#[derive(Debug, Default)]
pub struct MaterialShaderCache {
    shaders: AHashMap<u64, Arc<MaterialShader>>,
}

impl MaterialShaderCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `shader` under its hash.
    ///
    /// ## Errors
    /// [`ShaderError::DuplicateHash`] if the hash is already present; the
    /// cached shader is left untouched.
    pub fn insert(
        &mut self,
        shader: Arc<MaterialShader>,
    ) -> Result<Arc<MaterialShader>, ShaderError> {
        let hash = shader.hash();
        if self.shaders.contains_key(&hash) {
            log::error!(
                "Refusing to insert shader '{}' twice under {:#018x}",
                shader.family(),
                hash
            );
            return Err(ShaderError::DuplicateHash {
                hash,
                family: shader.family().to_owned(),
            });
        }
        self.shaders.insert(hash, Arc::clone(&shader));
        Ok(shader)
    }

    /// The shader stored under `hash`.
    pub fn get(&self, hash: u64) -> Option<Arc<MaterialShader>> {
        self.shaders.get(&hash).cloned()
    }

    /// `true` if `hash` is cached.
    pub fn contains(&self, hash: u64) -> bool {
        self.shaders.contains_key(&hash)
    }

    /// The number of cached shaders.
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    /// `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// Removes and returns every shader.
    pub fn drain(&mut self) -> impl Iterator<Item = Arc<MaterialShader>> + '_ {
        self.shaders.drain().map(|(_, shader)| shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::test_support::{build_shader, key, CountingDevice};

    #[test]
    fn duplicate_hash_is_rejected() {
        let device = CountingDevice::default();
        let mut cache = MaterialShaderCache::new();

        let first = cache.insert(build_shader(&device, "pbr", &["A"])).unwrap();
        let err = cache
            .insert(build_shader(&device, "pbr", &["A"]))
            .unwrap_err();

        assert!(matches!(err, ShaderError::DuplicateHash { hash, .. } if hash == first.hash()));
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&cache.get(first.hash()).unwrap(), &first));
    }

    #[test]
    fn distinct_hashes_are_independent() {
        let device = CountingDevice::default();
        let mut cache = MaterialShaderCache::new();

        let a = cache.insert(build_shader(&device, "pbr", &["A"])).unwrap();
        let b = cache.insert(build_shader(&device, "pbr", &["B"])).unwrap();

        assert_ne!(a.hash(), b.hash());
        assert!(Arc::ptr_eq(&cache.get(a.hash()).unwrap(), &a));
        assert!(Arc::ptr_eq(&cache.get(b.hash()).unwrap(), &b));
        assert!(cache.get(key("pbr", &["C"]).hash).is_none());
    }

    #[test]
    fn drain_empties() {
        let device = CountingDevice::default();
        let mut cache = MaterialShaderCache::new();
        cache.insert(build_shader(&device, "unlit", &[])).unwrap();

        assert_eq!(cache.drain().count(), 1);
        assert!(cache.is_empty());
    }
}
