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

//! The demo scene: a courtyard of crates and lamps standing in for an
//! imported model.

use anyhow::{Context, Result};
use prism_core::math::{LinearRgba, Mat4, Quat, Vec3};
use prism_core::renderer::{
    BindGroupDescriptor, BindGroupEntry, BindGroupId, BindingResource, BufferDescriptor,
    BufferUsage, GraphicsDevice, IndexFormat, Light, TextureViewId,
};
use prism_data::{Material, Mesh, Model, NodeId, TextureSlot, VertexAttributes, VertexFormat};
use prism_lanes::render_lane::SharedLayouts;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

const fn vertex(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex {
        position,
        normal,
        uv,
    }
}

// One unit quad; every mesh of the demo indexes into it.
const VERTICES: [Vertex; 4] = [
    vertex([-0.5, 0.0, -0.5], [0.0, 1.0, 0.0], [0.0, 0.0]),
    vertex([0.5, 0.0, -0.5], [0.0, 1.0, 0.0], [1.0, 0.0]),
    vertex([0.5, 0.0, 0.5], [0.0, 1.0, 0.0], [1.0, 1.0]),
    vertex([-0.5, 0.0, 0.5], [0.0, 1.0, 0.0], [0.0, 1.0]),
];
const INDICES: [u16; 12] = [0, 1, 2, 0, 2, 3, 0, 2, 1, 0, 3, 2];

fn format() -> VertexFormat {
    VertexFormat::new(
        VertexAttributes::POSITION | VertexAttributes::NORMAL | VertexAttributes::TEXCOORD,
        1,
    )
}

/// Creates the per-object descriptor set holding `world`.
fn object_bind_group(
    device: &dyn GraphicsDevice,
    shared: &SharedLayouts,
    label: &str,
    world: Mat4,
) -> Result<BindGroupId> {
    let buffer = device.create_buffer_with_data(
        &BufferDescriptor {
            label: Some(format!("{label}_object").into()),
            usage: BufferUsage::UNIFORM,
        },
        bytemuck::bytes_of(&world),
    )?;
    let group = device.create_bind_group(&BindGroupDescriptor {
        label: Some(label.into()),
        layout: shared.object,
        entries: &[BindGroupEntry {
            binding: 0,
            resource: BindingResource::Buffer(buffer),
        }],
    })?;
    Ok(group)
}

/// Creates the scene descriptor set: a camera block and an empty light list.
pub fn scene_bind_group(
    device: &dyn GraphicsDevice,
    shared: &SharedLayouts,
) -> Result<BindGroupId> {
    let view_proj = Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 100.0)
        * Mat4::look_at_rh(Vec3::new(0.0, 6.0, 12.0), Vec3::ZERO, Vec3::Y);
    let camera = device.create_buffer_with_data(
        &BufferDescriptor {
            label: Some("camera".into()),
            usage: BufferUsage::UNIFORM,
        },
        bytemuck::bytes_of(&view_proj),
    )?;
    let lights = device.create_buffer_with_data(
        &BufferDescriptor {
            label: Some("lights".into()),
            usage: BufferUsage::STORAGE,
        },
        &[0; 16],
    )?;
    Ok(device.create_bind_group(&BindGroupDescriptor {
        label: Some("scene".into()),
        layout: shared.scene,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer(camera),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Buffer(lights),
            },
        ],
    })?)
}

/// Builds and compiles the courtyard with `crates` crates on a ring.
pub fn courtyard(
    device: &dyn GraphicsDevice,
    shared: &SharedLayouts,
    crates: usize,
) -> Result<Model> {
    let vertex_buffer = device.create_buffer_with_data(
        &BufferDescriptor {
            label: Some("courtyard_vertices".into()),
            usage: BufferUsage::VERTEX,
        },
        bytemuck::cast_slice(&VERTICES),
    )?;
    let index_buffer = device.create_buffer_with_data(
        &BufferDescriptor {
            label: Some("courtyard_indices".into()),
            usage: BufferUsage::INDEX,
        },
        bytemuck::cast_slice(&INDICES),
    )?;
    let mut model = Model::new("courtyard", vertex_buffer, index_buffer, IndexFormat::Uint16);

    let planks = model.add_material(
        Material::new("planks", format())
            .with_texture(TextureSlot::BaseColor, TextureViewId(1), 0)
            .with_roughness(0.8),
    );
    // Same requirements as the planks: shares their shader.
    let lid = model.add_material(
        Material::new("lid", format())
            .with_texture(TextureSlot::BaseColor, TextureViewId(2), 0)
            .with_roughness(0.4),
    );
    let brass = model.add_material(
        Material::new("brass", format())
            .with_shader("phong")
            .with_base_color(LinearRgba::rgb(0.9, 0.7, 0.3))
            .with_specular(Vec3::splat(0.8), 48.0),
    );
    let flame = model.add_material(
        Material::new("flame", format())
            .with_shader("unlit")
            .with_emissive(Vec3::new(4.0, 2.5, 0.8)),
    );
    // Imported with the scene but never drawn.
    model.add_material(Material::new("spare", format()).with_shader("unlit"));

    // Nodes first so their world transforms are known when uploading
    // object data.
    let root = model.root();
    let ring = model.add_node(root, Mat4::from_rotation_y(0.3))?;
    let mut crate_nodes: Vec<NodeId> = Vec::with_capacity(crates);
    for i in 0..crates {
        let angle = i as f32 / crates.max(1) as f32 * std::f32::consts::TAU;
        let local = Mat4::from_rotation_translation(
            Quat::from_rotation_y(angle),
            Vec3::new(angle.cos() * 5.0, 0.0, angle.sin() * 5.0),
        );
        crate_nodes.push(model.add_node(ring, local)?);
    }
    let lamp = model.add_node(root, Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)))?;
    let lamp_light = model.add_light(Light::point(12.0));
    model.attach_light(lamp, lamp_light)?;
    model.compile().context("first compile of the courtyard")?;

    for (i, &node) in crate_nodes.iter().enumerate() {
        let world = *model.nodes().world(node).context("crate node vanished")?;
        let group = object_bind_group(device, shared, &format!("crate_{i}"), world)?;
        let mesh = model.add_mesh(
            Mesh::new(format!("crate_{i}"), format(), group)
                .with_submesh(0, 6, planks)
                .with_submesh(6, 6, lid)
                .with_submesh(12, 0, lid),
        );
        model.attach_mesh(node, mesh)?;
    }
    let lamp_world = *model.nodes().world(lamp).context("lamp node vanished")?;
    let group = object_bind_group(device, shared, "lamp", lamp_world)?;
    let lamp_mesh = model.add_mesh(
        Mesh::new("lamp", format(), group)
            .with_submesh(0, 6, brass)
            .with_submesh(6, 6, flame),
    );
    model.attach_mesh(lamp, lamp_mesh)?;

    // Attaching meshes dropped the geometry cache.
    model.compile().context("second compile of the courtyard")?;
    log::info!(
        "Courtyard ready: {} meshes, {} materials, {} geometry nodes",
        model.meshes().len(),
        model.materials().len(),
        model.geometry_nodes()?.len()
    );
    Ok(model)
}
