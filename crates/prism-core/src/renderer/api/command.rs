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

//! Render pass description, viewport and scissor state.

use serde::{Deserialize, Serialize};

use super::TextureViewId;
use crate::math::LinearRgba;

/// What happens to an attachment when a pass begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOp<V> {
    /// Keep the previous contents.
    Load,
    /// Clear to the given value.
    Clear(V),
}

/// What happens to an attachment when a pass ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreOp {
    /// Keep the results.
    #[default]
    Store,
    /// The results may be thrown away.
    Discard,
}

/// Load and store operations for one attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operations<V> {
    /// The load operation.
    pub load: LoadOp<V>,
    /// The store operation.
    pub store: StoreOp,
}

/// The surfaces a render pass draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    /// The color attachment.
    pub color: TextureViewId,
    /// The optional depth attachment.
    pub depth: Option<TextureViewId>,
}

/// A color attachment of a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPassColorAttachment {
    /// The view written to.
    pub view: TextureViewId,
    /// Load and store of the color values.
    pub ops: Operations<LinearRgba>,
}

/// A depth attachment of a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPassDepthAttachment {
    /// The view written to.
    pub view: TextureViewId,
    /// Load and store of the depth values.
    pub depth_ops: Operations<f32>,
}

/// Describes a render pass to begin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPassDescriptor<'a> {
    /// A debug label.
    pub label: Option<&'a str>,
    /// The color attachment.
    pub color_attachment: RenderPassColorAttachment,
    /// The depth attachment, if any.
    pub depth_attachment: Option<RenderPassDepthAttachment>,
}

impl<'a> RenderPassDescriptor<'a> {
    /// A pass clearing `target` to the given color and depth.
    pub fn clearing(
        label: Option<&'a str>,
        target: RenderTarget,
        clear_color: LinearRgba,
        clear_depth: f32,
    ) -> Self {
        Self {
            label,
            color_attachment: RenderPassColorAttachment {
                view: target.color,
                ops: Operations {
                    load: LoadOp::Clear(clear_color),
                    store: StoreOp::Store,
                },
            },
            depth_attachment: target.depth.map(|view| RenderPassDepthAttachment {
                view,
                depth_ops: Operations {
                    load: LoadOp::Clear(clear_depth),
                    store: StoreOp::Discard,
                },
            }),
        }
    }
}

/// The viewport transform of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Depth mapped to the near plane.
    pub min_depth: f32,
    /// Depth mapped to the far plane.
    pub max_depth: f32,
}

impl Viewport {
    /// A viewport covering `width` x `height` pixels with the full depth range.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    /// The scissor rectangle covering exactly this viewport.
    pub fn full_scissor(&self) -> ScissorRect {
        ScissorRect {
            x: self.x.max(0.0) as u32,
            y: self.y.max(0.0) as u32,
            width: self.width.max(0.0) as u32,
            height: self.height.max(0.0) as u32,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_size(1280, 720)
    }
}

/// A pixel rectangle outside of which fragments are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScissorRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}
