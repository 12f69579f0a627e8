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

//! Built-in shader sources, embedded at compile time.
//!
//! Each file is a GLSL 450 program holding both stages behind
//! `VERTEX_STAGE`/`FRAGMENT_STAGE`. Variant selection happens through the
//! defines produced by the shading techniques.
//!
//! # Bindings
//!
//! | Set | Binding | Content |
//! |---|---|---|
//! | 0 | 0 | Camera uniforms |
//! | 0 | 1 | Light list (storage) |
//! | 1 | 0 | Variant parameters |
//! | 1 | 1 | Material factors |
//! | 1 | 2.. | Material textures, `<SLOT>_BINDING` |
//! | 2 | 0 | Object matrices |

/// Metallic-roughness PBR (Cook-Torrance, GGX distribution).
pub const PBR_GLSL: &str = include_str!("pbr.glsl");

/// Blinn-Phong with specular color and shininess.
pub const PHONG_GLSL: &str = include_str!("phong.glsl");

/// Base color, optional vertex color and base color map.
pub const UNLIT_GLSL: &str = include_str!("unlit.glsl");

/// Fullscreen gradient drawn behind the scene from a single triangle.
pub const BACKGROUND_GLSL: &str = include_str!("background.glsl");
