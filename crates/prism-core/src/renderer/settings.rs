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

//! Renderer configuration.

use serde::{Deserialize, Serialize};

use super::{ScissorRect, Viewport};
use crate::math::LinearRgba;

/// Settings consumed by the material shader factory and the render graph.
///
/// Every field has a default, so a RON document only needs the fields it
/// overrides:
///
/// ```
/// use prism_core::renderer::RenderSettings;
///
/// let settings = RenderSettings::from_ron_str(r#"(default_shader_id: "phong")"#).unwrap();
/// assert_eq!(settings.default_shader_id, "phong");
/// assert_eq!(settings.clear_depth, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Shader id used for materials that name none.
    pub default_shader_id: String,
    /// Color the main pass clears to.
    pub clear_color: LinearRgba,
    /// Depth the main pass clears to.
    pub clear_depth: f32,
    /// The viewport, set once per frame.
    pub viewport: Viewport,
    /// The scissor rectangle; `None` covers the whole viewport.
    pub scissor: Option<ScissorRect>,
    /// Compare the full shading requirements on every shader cache hit.
    pub verify_shader_keys: bool,
}

impl RenderSettings {
    /// Parses settings from a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    /// Serializes the settings as pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// The scissor rectangle applied each frame.
    pub fn effective_scissor(&self) -> ScissorRect {
        self.scissor.unwrap_or_else(|| self.viewport.full_scissor())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            default_shader_id: "pbr".to_owned(),
            clear_color: LinearRgba::BLACK,
            clear_depth: 1.0,
            viewport: Viewport::default(),
            scissor: None,
            verify_shader_keys: cfg!(debug_assertions),
        }
    }
}
