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

use prism_core::renderer::ResourceError;
use prism_data::SceneError;
use thiserror::Error;

/// A failure while resolving materials to shaders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    /// No allocator is registered for the shader id a material resolves to.
    #[error("material '{material}' uses shader '{shader_id}', which has no registered allocator")]
    UnknownShader {
        /// The material being resolved.
        material: String,
        /// The shader id it asked for (or the configured default).
        shader_id: String,
    },
    /// A shader with this structural hash is already cached.
    #[error("shader cache already holds hash {hash:#018x} ('{family}')")]
    DuplicateHash {
        /// The structural hash.
        hash: u64,
        /// The family of the rejected shader.
        family: String,
    },
    /// Two different sets of shading requirements produced the same hash.
    #[error(
        "structural hash {hash:#018x} of material '{material}' collides with cached shader '{family}'"
    )]
    HashCollision {
        /// The colliding hash.
        hash: u64,
        /// The material whose requirements differ.
        material: String,
        /// The family of the cached shader.
        family: String,
    },
    /// The model failed validation before shaders were resolved.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// The device failed to create a GPU object.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
