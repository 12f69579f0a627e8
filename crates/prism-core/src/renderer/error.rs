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

//! The hierarchy of error types for the rendering contracts.

use thiserror::Error;

/// A failure reported by a [`GraphicsDevice`](super::GraphicsDevice) while
/// creating a GPU object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// The shader source failed to compile.
    #[error("shader module '{label}' failed to compile: {details}")]
    ShaderCompilation {
        /// The label of the module.
        label: String,
        /// Compiler output.
        details: String,
    },
    /// The device ran out of memory.
    #[error("out of device memory while creating '{0}'")]
    OutOfMemory(String),
    /// A descriptor referenced a handle the device does not know.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
    /// Any other backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// A failure while recording a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// `record` was called before any model was added to the graph.
    #[error("render graph recorded before it was built")]
    GraphNotBuilt,
    /// `record` was called with no render target set.
    #[error("render graph has no render target")]
    NoRenderTarget,
    /// A shader referenced by the graph was released after construction.
    #[error("material shader '{family}' ({hash:#018x}) was released; rebuild the render graph")]
    ShaderReleased {
        /// The family of the released shader.
        family: String,
        /// Its structural hash.
        hash: u64,
    },
    /// A device-level failure.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_shader_message_names_family() {
        let err = RenderError::ShaderReleased {
            family: "pbr".to_owned(),
            hash: 0xabc,
        };
        let msg = err.to_string();
        assert!(msg.contains("'pbr'"));
        assert!(msg.contains("0x0000000000000abc"));
    }

    #[test]
    fn resource_errors_convert() {
        let err: RenderError = ResourceError::Backend("lost".into()).into();
        assert_eq!(err.to_string(), "backend error: lost");
    }
}
