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

//! Handles and descriptors for buffers and textures.

use std::borrow::Cow;

/// An opaque handle to a GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// An opaque handle to a texture view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureViewId(pub usize);

crate::prism_bitflags! {
    /// How a buffer will be used by the GPU.
    pub struct BufferUsage: u32 {
        /// Bound as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Bound as an index buffer.
        const INDEX = 1 << 1;
        /// Bound as a uniform buffer.
        const UNIFORM = 1 << 2;
        /// Bound as a storage buffer.
        const STORAGE = 1 << 3;
        /// Destination of a copy or queue write.
        const COPY_DST = 1 << 4;
    }
}

/// Describes a buffer created with initial contents.
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// A debug label.
    pub label: Option<Cow<'a, str>>,
    /// The intended usage.
    pub usage: BufferUsage,
}
