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

// DXR Sandbox
// Records a few frames of draws and dispatches through a command-context
// state and reports what reached the command list.

mod command_list;
mod device;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use dxr_core::rhi::{
    ComputePipelineState, ConstantBufferView, ContextStateSettings, CpuDescriptorHandle,
    DepthStencilView, DescriptorHeapKind, GraphicsPipelineState, IndexBufferView, IndexFormat,
    PipelineStateHandle, PrimitiveTopology, RenderTargetView, RootSignature, RootSignatureDesc,
    RootSignatureHandle, SamplerState, ScissorRect, ShaderResourceCount, ShaderResourceView,
    ShaderStage, ShadingRate, UnorderedAccessView, VertexBufferView, Viewport,
};
use dxr_d3d12::CommandContextState;

use command_list::LoggingCommandList;
use device::SimulatedDevice;

const SETTINGS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/context_state.ron");
const FRAMES: u32 = 6;
const DRAWS_PER_FRAME: u32 = 4;
/// Frames after which the simulated GPU has caught up and the heaps can be rewound.
const FRAMES_IN_FLIGHT: u32 = 3;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameConstants {
    time: f32,
    frame: u32,
    resolution: [f32; 2],
}

struct Pipelines {
    opaque: Arc<GraphicsPipelineState>,
    overlay: Arc<GraphicsPipelineState>,
    cull: Arc<ComputePipelineState>,
}

fn load_settings(path: &Path) -> Result<ContextStateSettings> {
    if !path.exists() {
        log::warn!("{} not found, using default settings.", path.display());
        return Ok(ContextStateSettings::default());
    }
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let settings = ContextStateSettings::from_ron_str(&source)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(settings)
}

fn create_pipelines() -> Pipelines {
    let graphics_root = Arc::new(RootSignature::new(
        RootSignatureHandle(1),
        RootSignatureDesc::graphics_default(8, 4),
    ));
    let compute_root = Arc::new(RootSignature::new(
        RootSignatureHandle(2),
        RootSignatureDesc::compute_default(8, 4),
    ));

    let opaque = GraphicsPipelineState::new(
        PipelineStateHandle(100),
        Arc::clone(&graphics_root),
        PrimitiveTopology::TriangleList,
    )
    .with_shader(ShaderStage::Vertex, ShaderResourceCount::new(1, 0, 0, 0))
    .with_shader(ShaderStage::Pixel, ShaderResourceCount::new(1, 3, 0, 2));

    // Same root signature: switching to it only changes the pipeline.
    let overlay = GraphicsPipelineState::new(
        PipelineStateHandle(101),
        graphics_root,
        PrimitiveTopology::TriangleStrip,
    )
    .with_shader(ShaderStage::Vertex, ShaderResourceCount::new(1, 0, 0, 0))
    .with_shader(ShaderStage::Pixel, ShaderResourceCount::new(0, 1, 0, 1));

    let cull = ComputePipelineState::new(
        PipelineStateHandle(200),
        compute_root,
        ShaderResourceCount::new(1, 2, 1, 0),
    );

    Pipelines {
        opaque: Arc::new(opaque),
        overlay: Arc::new(overlay),
        cull: Arc::new(cull),
    }
}

fn record_frame(
    state: &mut CommandContextState,
    pipelines: &Pipelines,
    frame: u32,
) -> Result<usize> {
    let mut cmd = LoggingCommandList::new();
    state.reset_state_for_new_command_list();

    let (width, height) = (1280.0, 720.0);
    state.set_render_targets(&[Some(RenderTargetView(frame % 2))], Some(DepthStencilView(0)));
    state.set_viewports(&[Viewport::from_size(width, height)]);
    state.set_scissor_rects(&[ScissorRect {
        left: 0,
        top: 0,
        right: width as i32,
        bottom: height as i32,
    }]);
    state.set_shading_rate(if frame % 3 == 0 {
        ShadingRate::Rate2x2
    } else {
        ShadingRate::Rate1x1
    });
    state.set_shader_constants_pod(&FrameConstants {
        time: frame as f32 / 60.0,
        frame,
        resolution: [width, height],
    });

    // Culling dispatch.
    state.set_compute_pipeline_state(Some(&pipelines.cull));
    state.set_cbv(
        Some(ConstantBufferView::new(1, CpuDescriptorHandle(0x1000))),
        ShaderStage::Compute,
        0,
    );
    state.set_srv(
        Some(ShaderResourceView::new(2, CpuDescriptorHandle(0x2000))),
        ShaderStage::Compute,
        0,
    );
    state.set_uav(
        Some(UnorderedAccessView::new(3, CpuDescriptorHandle(0x3000))),
        ShaderStage::Compute,
        0,
    );
    state
        .bind_compute_state(&mut cmd)
        .context("binding the culling dispatch")?;

    // Opaque draws, one material each.
    state.set_graphics_pipeline_state(Some(&pipelines.opaque));
    state.set_vertex_buffer(
        Some(VertexBufferView {
            location: 0x10_0000,
            size_in_bytes: 64 * 1024,
            stride_in_bytes: 24,
        }),
        0,
    );
    state.set_index_buffer(Some(IndexBufferView {
        location: 0x20_0000,
        size_in_bytes: 16 * 1024,
        format: IndexFormat::Uint16,
    }));
    state.set_cbv(
        Some(ConstantBufferView::new(10, CpuDescriptorHandle(0x1100))),
        ShaderStage::Vertex,
        0,
    );
    state.set_sampler(
        Some(SamplerState::new(1, CpuDescriptorHandle(0x5000))),
        ShaderStage::Pixel,
        0,
    );
    for draw in 0..DRAWS_PER_FRAME {
        let material = 100 + draw;
        state.set_srv(
            Some(ShaderResourceView::new(
                material,
                CpuDescriptorHandle(0x4000 + u64::from(material) * 0x40),
            )),
            ShaderStage::Pixel,
            0,
        );
        state
            .bind_graphics_states(&mut cmd)
            .with_context(|| format!("binding opaque draw {draw}"))?;
    }

    // Overlay reuses the root signature and everything bound so far.
    state.set_graphics_pipeline_state(Some(&pipelines.overlay));
    state.set_blend_factor([0.5, 0.5, 0.5, 1.0]);
    state
        .bind_graphics_states(&mut cmd)
        .context("binding the overlay draw")?;

    Ok(cmd.recorded())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings(Path::new(SETTINGS_PATH))?;
    log::info!("Context state settings:\n{}", settings.to_ron_string()?);

    let device = Arc::new(SimulatedDevice::new());
    let mut state = CommandContextState::new(device.clone(), &settings)
        .context("creating the command context state")?;
    let pipelines = create_pipelines();

    for frame in 0..FRAMES {
        if frame % FRAMES_IN_FLIGHT == 0 {
            let cache = state.descriptor_cache_mut();
            cache.heap_mut(DescriptorHeapKind::Resource).reset();
            cache.heap_mut(DescriptorHeapKind::Sampler).reset();
        }

        let recorded = record_frame(&mut state, &pipelines, frame)?;
        let stats = state.stats();
        log::info!(
            "frame {frame}: {recorded} commands, {} passes, {} descriptors copied, {} rollovers",
            stats.bind_passes,
            stats.descriptors_copied,
            stats.total_rollovers()
        );
        state.reset_stats();
    }

    log::info!(
        "done: {} descriptors copied in total, {} heaps alive",
        device.copied_descriptors(),
        device.live_heaps()
    );
    drop(state);
    log::info!("heaps alive after teardown: {}", device.live_heaps());
    Ok(())
}
