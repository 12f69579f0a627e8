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

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use prism_data::Material;

use super::ShadingTechnique;

const SEED: u64 = 17;
const MULTIPLIER: u64 = 31;

/// The shading requirements of a material, reduced to a 64-bit hash.
///
/// Materials whose keys have equal hashes share one compiled shader. The
/// string lists are kept next to the hash so a cache hit can be checked for
/// an accidental collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderKey {
    /// The structural hash.
    pub hash: u64,
    /// The shading family, e.g. `"pbr"`.
    pub family: String,
    /// Preprocessor defines.
    pub defines: Vec<String>,
    /// Vertex stage input declarations.
    pub vertex_inputs: Vec<String>,
    /// Vertex stage output declarations.
    pub vertex_outputs: Vec<String>,
    /// Fragment stage input declarations.
    pub fragment_inputs: Vec<String>,
}

impl ShaderKey {
    /// Computes the key of `material` when shaded with `technique`.
    pub fn for_material(technique: &dyn ShadingTechnique, material: &Material) -> Self {
        Self::from_parts(
            technique.family(),
            technique.shader_defines(material),
            technique.vertex_inputs(material),
            technique.vertex_outputs(material),
            technique.fragment_inputs(material),
        )
    }

    /// Builds a key from its parts and hashes them.
    pub fn from_parts(
        family: &str,
        defines: Vec<String>,
        vertex_inputs: Vec<String>,
        vertex_outputs: Vec<String>,
        fragment_inputs: Vec<String>,
    ) -> Self {
        let strings = std::iter::once(family)
            .chain(defines.iter().map(String::as_str))
            .chain(vertex_inputs.iter().map(String::as_str))
            .chain(vertex_outputs.iter().map(String::as_str))
            .chain(fragment_inputs.iter().map(String::as_str));
        Self {
            hash: combine(strings),
            family: family.to_owned(),
            defines,
            vertex_inputs,
            vertex_outputs,
            fragment_inputs,
        }
    }

    /// `true` if both keys list exactly the same requirements.
    pub fn same_requirements(&self, other: &ShaderKey) -> bool {
        self.family == other.family
            && self.defines == other.defines
            && self.vertex_inputs == other.vertex_inputs
            && self.vertex_outputs == other.vertex_outputs
            && self.fragment_inputs == other.fragment_inputs
    }
}

/// Polynomial combination of the per-string hashes: `h = h * 31 + hash(s)`,
/// starting from 17, with wrapping arithmetic.
fn combine<'a>(strings: impl Iterator<Item = &'a str>) -> u64 {
    strings.fold(SEED, |h, s| {
        h.wrapping_mul(MULTIPLIER).wrapping_add(string_hash(s))
    })
}

fn string_hash(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}
