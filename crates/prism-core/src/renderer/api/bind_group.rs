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

//! Bind groups (descriptor sets) and their layouts.

use std::borrow::Cow;

use super::{BufferId, ShaderStage, TextureViewId};

/// An opaque handle to a bind group layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupLayoutId(pub usize);

/// An opaque handle to a bind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindGroupId(pub usize);

/// The kind of resource a layout entry expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// A uniform buffer.
    UniformBuffer,
    /// A read-only storage buffer.
    StorageBuffer,
    /// A sampled 2D texture with its sampler.
    Texture,
}

/// One entry of a bind group layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupLayoutEntry {
    /// The binding index inside the group.
    pub binding: u32,
    /// Which stages can see the binding.
    pub visibility: ShaderStage,
    /// The resource kind.
    pub ty: BindingType,
}

impl BindGroupLayoutEntry {
    /// A uniform buffer entry.
    pub const fn uniform(binding: u32, visibility: ShaderStage) -> Self {
        Self {
            binding,
            visibility,
            ty: BindingType::UniformBuffer,
        }
    }

    /// A fragment-visible texture entry.
    pub const fn texture(binding: u32) -> Self {
        Self {
            binding,
            visibility: ShaderStage::FRAGMENT,
            ty: BindingType::Texture,
        }
    }
}

/// Describes a bind group layout.
#[derive(Debug, Clone)]
pub struct BindGroupLayoutDescriptor<'a> {
    /// A debug label.
    pub label: Option<Cow<'a, str>>,
    /// The entries, sorted by binding index.
    pub entries: &'a [BindGroupLayoutEntry],
}

/// A concrete resource bound at one binding index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingResource {
    /// A whole buffer.
    Buffer(BufferId),
    /// A texture view.
    TextureView(TextureViewId),
}

/// A resource paired with its binding index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindGroupEntry {
    /// The binding index.
    pub binding: u32,
    /// The bound resource.
    pub resource: BindingResource,
}

/// Describes a bind group to create against an existing layout.
#[derive(Debug, Clone)]
pub struct BindGroupDescriptor<'a> {
    /// A debug label.
    pub label: Option<Cow<'a, str>>,
    /// The layout this group conforms to.
    pub layout: BindGroupLayoutId,
    /// The bound resources.
    pub entries: &'a [BindGroupEntry],
}
