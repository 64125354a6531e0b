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


use dxr_core::rhi::{
    CommandListSink, DepthStencilView, DescriptorHeapHandle, GpuDescriptorHandle,
    IndexBufferView, PipelineStateHandle, PrimitiveTopology, RenderTargetView,
    RootSignatureHandle, ScissorRect, ShadingRate, TextureId, VertexBufferView, Viewport,
};

/// A command list that only logs what it is asked to record.
#[derive(Debug, Default)]
pub struct LoggingCommandList {
    recorded: usize,
}

impl LoggingCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    fn record(&mut self, args: std::fmt::Arguments<'_>) {
        self.recorded += 1;
        log::debug!("cmd[{:03}] {args}", self.recorded);
    }
}

impl CommandListSink for LoggingCommandList {
    fn set_pipeline_state(&mut self, pipeline: PipelineStateHandle) {
        self.record(format_args!("SetPipelineState({})", pipeline.0));
    }

    fn set_graphics_root_signature(&mut self, root_signature: RootSignatureHandle) {
        self.record(format_args!("SetGraphicsRootSignature({})", root_signature.0));
    }

    fn set_compute_root_signature(&mut self, root_signature: RootSignatureHandle) {
        self.record(format_args!("SetComputeRootSignature({})", root_signature.0));
    }

    fn ia_set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.record(format_args!("IASetPrimitiveTopology({topology:?})"));
    }

    fn om_set_render_targets(
        &mut self,
        render_targets: &[Option<RenderTargetView>],
        depth_stencil: Option<DepthStencilView>,
    ) {
        self.record(format_args!(
            "OMSetRenderTargets({render_targets:?}, {depth_stencil:?})"
        ));
    }

    fn rs_set_viewports(&mut self, viewports: &[Viewport]) {
        self.record(format_args!("RSSetViewports(count = {})", viewports.len()));
    }

    fn rs_set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        self.record(format_args!("RSSetScissorRects(count = {})", rects.len()));
    }

    fn om_set_blend_factor(&mut self, factor: [f32; 4]) {
        self.record(format_args!("OMSetBlendFactor({factor:?})"));
    }

    fn rs_set_shading_rate(&mut self, rate: ShadingRate) {
        self.record(format_args!("RSSetShadingRate({rate:?})"));
    }

    fn rs_set_shading_rate_image(&mut self, image: Option<TextureId>) {
        self.record(format_args!("RSSetShadingRateImage({image:?})"));
    }

    fn ia_set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView]) {
        self.record(format_args!(
            "IASetVertexBuffers(start = {start_slot}, count = {})",
            views.len()
        ));
    }

    fn ia_set_index_buffer(&mut self, view: Option<IndexBufferView>) {
        self.record(format_args!("IASetIndexBuffer({view:?})"));
    }

    fn set_descriptor_heaps(
        &mut self,
        resource: DescriptorHeapHandle,
        sampler: DescriptorHeapHandle,
    ) {
        self.record(format_args!("SetDescriptorHeaps({}, {})", resource.0, sampler.0));
    }

    fn set_graphics_root_descriptor_table(
        &mut self,
        parameter_index: u32,
        base: GpuDescriptorHandle,
    ) {
        self.record(format_args!(
            "SetGraphicsRootDescriptorTable({parameter_index}, {:#x})",
            base.0
        ));
    }

    fn set_compute_root_descriptor_table(
        &mut self,
        parameter_index: u32,
        base: GpuDescriptorHandle,
    ) {
        self.record(format_args!(
            "SetComputeRootDescriptorTable({parameter_index}, {:#x})",
            base.0
        ));
    }

    fn set_graphics_root_32bit_constants(
        &mut self,
        parameter_index: u32,
        values: &[u32],
        dest_offset: u32,
    ) {
        self.record(format_args!(
            "SetGraphicsRoot32BitConstants({parameter_index}, {values:?}, {dest_offset})"
        ));
    }

    fn set_compute_root_32bit_constants(
        &mut self,
        parameter_index: u32,
        values: &[u32],
        dest_offset: u32,
    ) {
        self.record(format_args!(
            "SetComputeRoot32BitConstants({parameter_index}, {values:?}, {dest_offset})"
        ));
    }
}
