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

//! Shader module handles and stage flags.

use std::borrow::Cow;

/// An opaque handle to a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderModuleId(pub usize);

crate::prism_bitflags! {
    /// The programmable stages a binding is visible to.
    pub struct ShaderStage: u32 {
        /// The vertex stage.
        const VERTEX = 1 << 0;
        /// The fragment stage.
        const FRAGMENT = 1 << 1;
    }
}

/// Describes a shader module to create.
///
/// The source is a GLSL program holding both stages. The backend compiles it
/// once with `VERTEX_STAGE` and once with `FRAGMENT_STAGE` defined, each time
/// prepending `defines` as `#define` lines in order.
#[derive(Debug, Clone)]
pub struct ShaderModuleDescriptor<'a> {
    /// A debug label.
    pub label: Option<Cow<'a, str>>,
    /// The program source.
    pub source: Cow<'a, str>,
    /// Preprocessor definitions such as `HAS_NORMALS` or `TEXCOORD_SETS 2`.
    pub defines: &'a [String],
}
