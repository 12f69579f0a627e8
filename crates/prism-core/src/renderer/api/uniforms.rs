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

//! GPU layout of the per-material uniform block.

use crate::math::LinearRgba;

/// Material factors packed for a uniform buffer (std140 compatible).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniforms {
    /// Base color (linear RGBA).
    pub base_color: LinearRgba,
    /// Emissive color (rgb) and occlusion strength (a).
    pub emissive: LinearRgba,
    /// Specular color (rgb) and shininess (a).
    pub specular: LinearRgba,
    /// Metallic (x), roughness (y); z and w are padding.
    pub metallic_roughness: [f32; 4],
}

impl Default for MaterialUniforms {
    fn default() -> Self {
        Self {
            base_color: LinearRgba::WHITE,
            emissive: LinearRgba::new(0.0, 0.0, 0.0, 1.0),
            specular: LinearRgba::new(1.0, 1.0, 1.0, 32.0),
            metallic_roughness: [1.0, 1.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<MaterialUniforms>() % 16, 0);
        assert_eq!(bytemuck::bytes_of(&MaterialUniforms::default()).len(), 64);
    }
}
