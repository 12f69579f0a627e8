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

// Prism Sandbox
// Loads a demo scene, records a few frames and reloads it.

mod device;
mod recorder;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use prism_core::renderer::{RenderSettings, RenderTarget, TextureViewId};
use prism_lanes::render_lane::{
    BackgroundNode, MaterialShaderFactory, RenderGraph, ShaderAllocatorRegistry, ShaderAssignment,
};

use device::InMemoryDevice;
use recorder::LoggingRecorder;

#[derive(Debug, Parser)]
#[command(version, about = "Drives the draw-submission core against an in-memory device")]
struct Args {
    /// RON file with render settings.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Number of crates in the courtyard.
    #[arg(long, default_value_t = 64)]
    crates: usize,

    /// Frames recorded before and after the reload.
    #[arg(long, default_value_t = 3)]
    frames: usize,

    /// Skip the background pass.
    #[arg(long)]
    no_background: bool,
}

fn load_settings(path: Option<&PathBuf>) -> Result<RenderSettings> {
    let Some(path) = path else {
        return Ok(RenderSettings::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings = RenderSettings::from_ron_str(&source)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
    log::info!("Loaded render settings from {}", path.display());
    Ok(settings)
}

fn record_frames(graph: &RenderGraph, frames: usize) -> Result<()> {
    for frame in 0..frames {
        let mut recorder = LoggingRecorder::default();
        let stats = graph
            .record(&mut recorder)
            .with_context(|| format!("Failed to record frame {frame}"))?;
        log::info!(
            "Frame {}: {} commands, {} pipelines, {} materials, {} draws, {} triangles, {} empty skipped",
            frame,
            recorder.command_count(),
            stats.pipeline_binds,
            stats.material_binds,
            stats.draw_calls,
            stats.triangles(),
            stats.skipped_empty
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = load_settings(args.settings.as_ref())?;
    let device = InMemoryDevice::default();
    let mut factory = MaterialShaderFactory::new(
        ShaderAllocatorRegistry::with_builtin_techniques(),
        settings.clone(),
    );
    let shared = factory.shared_layouts(&device)?;
    let scene_group = scene::scene_bind_group(&device, &shared)?;

    let model = scene::courtyard(&device, &shared, args.crates)?;
    let assignment = ShaderAssignment::resolve(&model, &mut factory, &device)
        .context("Failed to resolve the courtyard materials")?;
    log::info!(
        "{} materials share {} shaders ({} modules compiled)",
        assignment.material_count(),
        assignment.group_count(),
        device.compiled_modules()
    );

    let mut graph = RenderGraph::new(settings);
    let background = BackgroundNode::build(&device, shared.scene, scene_group)?;
    let background_index = graph.add_auxiliary(Box::new(background));
    if args.no_background {
        if let Some(node) = graph.auxiliary_mut(background_index) {
            node.set_enabled(false);
        }
    }
    graph.add_model(&model, &assignment);
    graph.set_scene_bind_group(scene_group);
    graph.set_target(RenderTarget {
        color: TextureViewId(0),
        depth: Some(TextureViewId(1)),
    });
    record_frames(&graph, args.frames)?;

    // Reload: the old graph must not outlive the shaders it points to.
    factory.clear_cache(&device)?;
    if let Err(e) = graph.record(&mut LoggingRecorder::default()) {
        log::info!("Stale graph refused to record: {e}");
    }
    graph.clear();
    let assignment = ShaderAssignment::resolve(&model, &mut factory, &device)
        .context("Failed to resolve the courtyard materials after reload")?;
    graph.add_model(&model, &assignment);
    record_frames(&graph, args.frames)?;

    factory.release_all(&device)?;
    log::info!(
        "Done: {} bytes uploaded, {} device objects still alive",
        device.uploaded_bytes(),
        device.live_objects()
    );
    Ok(())
}
