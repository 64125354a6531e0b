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

//! Shared fixtures for the integration tests: a command list that records
//! every call and a device whose heap behaviour can be scripted.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use dxr_core::rhi::{
    CommandListSink, ComputePipelineState, CpuDescriptorHandle, DefaultDescriptors,
    DepthStencilView, DescriptorDevice, DescriptorHeapError, DescriptorHeapHandle,
    DescriptorHeapKind, GpuDescriptorHandle, GraphicsPipelineState, IndexBufferView,
    NativeDescriptorHeap, PipelineStateHandle, PrimitiveTopology, RenderTargetView,
    RootSignature, RootSignatureDesc, RootSignatureHandle, ScissorRect, ShaderResourceCount,
    ShaderStage, ShadingRate, TextureId, VertexBufferView, Viewport,
};

// ───────────────────────────────────────────────────────────────────────────
// Recording command list
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetPipelineState(PipelineStateHandle),
    SetGraphicsRootSignature(RootSignatureHandle),
    SetComputeRootSignature(RootSignatureHandle),
    SetPrimitiveTopology(PrimitiveTopology),
    SetRenderTargets(Vec<Option<RenderTargetView>>, Option<DepthStencilView>),
    SetViewports(Vec<Viewport>),
    SetScissorRects(Vec<ScissorRect>),
    SetBlendFactor([f32; 4]),
    SetShadingRate(ShadingRate),
    SetShadingRateImage(Option<TextureId>),
    SetVertexBuffers(u32, Vec<VertexBufferView>),
    SetIndexBuffer(Option<IndexBufferView>),
    SetDescriptorHeaps(DescriptorHeapHandle, DescriptorHeapHandle),
    SetGraphicsTable(u32, GpuDescriptorHandle),
    SetComputeTable(u32, GpuDescriptorHandle),
    SetGraphicsConstants(u32, Vec<u32>),
    SetComputeConstants(u32, Vec<u32>),
}

#[derive(Debug, Default)]
pub struct RecordingCommandList {
    pub commands: Vec<Command>,
}

impl RecordingCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded commands and starts over.
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn graphics_tables(&self) -> Vec<(u32, GpuDescriptorHandle)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SetGraphicsTable(p, h) => Some((*p, *h)),
                _ => None,
            })
            .collect()
    }
}

impl CommandListSink for RecordingCommandList {
    fn set_pipeline_state(&mut self, pipeline: PipelineStateHandle) {
        self.commands.push(Command::SetPipelineState(pipeline));
    }

    fn set_graphics_root_signature(&mut self, root_signature: RootSignatureHandle) {
        self.commands
            .push(Command::SetGraphicsRootSignature(root_signature));
    }

    fn set_compute_root_signature(&mut self, root_signature: RootSignatureHandle) {
        self.commands
            .push(Command::SetComputeRootSignature(root_signature));
    }

    fn ia_set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.commands.push(Command::SetPrimitiveTopology(topology));
    }

    fn om_set_render_targets(
        &mut self,
        render_targets: &[Option<RenderTargetView>],
        depth_stencil: Option<DepthStencilView>,
    ) {
        self.commands
            .push(Command::SetRenderTargets(render_targets.to_vec(), depth_stencil));
    }

    fn rs_set_viewports(&mut self, viewports: &[Viewport]) {
        self.commands.push(Command::SetViewports(viewports.to_vec()));
    }

    fn rs_set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        self.commands.push(Command::SetScissorRects(rects.to_vec()));
    }

    fn om_set_blend_factor(&mut self, factor: [f32; 4]) {
        self.commands.push(Command::SetBlendFactor(factor));
    }

    fn rs_set_shading_rate(&mut self, rate: ShadingRate) {
        self.commands.push(Command::SetShadingRate(rate));
    }

    fn rs_set_shading_rate_image(&mut self, image: Option<TextureId>) {
        self.commands.push(Command::SetShadingRateImage(image));
    }

    fn ia_set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView]) {
        self.commands
            .push(Command::SetVertexBuffers(start_slot, views.to_vec()));
    }

    fn ia_set_index_buffer(&mut self, view: Option<IndexBufferView>) {
        self.commands.push(Command::SetIndexBuffer(view));
    }

    fn set_descriptor_heaps(
        &mut self,
        resource: DescriptorHeapHandle,
        sampler: DescriptorHeapHandle,
    ) {
        self.commands
            .push(Command::SetDescriptorHeaps(resource, sampler));
    }

    fn set_graphics_root_descriptor_table(
        &mut self,
        parameter_index: u32,
        base: GpuDescriptorHandle,
    ) {
        self.commands
            .push(Command::SetGraphicsTable(parameter_index, base));
    }

    fn set_compute_root_descriptor_table(
        &mut self,
        parameter_index: u32,
        base: GpuDescriptorHandle,
    ) {
        self.commands
            .push(Command::SetComputeTable(parameter_index, base));
    }

    fn set_graphics_root_32bit_constants(
        &mut self,
        parameter_index: u32,
        values: &[u32],
        _dest_offset: u32,
    ) {
        self.commands
            .push(Command::SetGraphicsConstants(parameter_index, values.to_vec()));
    }

    fn set_compute_root_32bit_constants(
        &mut self,
        parameter_index: u32,
        values: &[u32],
        _dest_offset: u32,
    ) {
        self.commands
            .push(Command::SetComputeConstants(parameter_index, values.to_vec()));
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Scriptable device
// ───────────────────────────────────────────────────────────────────────────

pub const INCREMENT: u32 = 32;

#[derive(Debug, Clone)]
pub struct CopyCall {
    pub kind: DescriptorHeapKind,
    pub dest: CpuDescriptorHandle,
    pub sources: Vec<CpuDescriptorHandle>,
}

#[derive(Debug, Default)]
struct DeviceLog {
    next_heap: u64,
    created: Vec<(DescriptorHeapKind, u32)>,
    released: Vec<DescriptorHeapHandle>,
    copies: Vec<CopyCall>,
}

/// A device that hands out fake heaps.
///
/// `limit` caps the size of any heap, `granted` forces heaps created after
/// construction to a fixed size whatever was asked (for the next
/// `granted_heaps` heaps when that is set), and `fail` makes heap creation
/// return an error.
pub struct MockDevice {
    pub limit: Mutex<u32>,
    pub granted: Mutex<Option<u32>>,
    pub granted_heaps: Mutex<Option<u32>>,
    pub fail: Mutex<bool>,
    log: Mutex<DeviceLog>,
}

impl MockDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            limit: Mutex::new(1 << 20),
            granted: Mutex::new(None),
            granted_heaps: Mutex::new(None),
            fail: Mutex::new(false),
            log: Mutex::new(DeviceLog::default()),
        })
    }

    pub fn set_limit(&self, limit: u32) {
        *self.limit.lock().unwrap() = limit;
    }

    pub fn grant_only(&self, capacity: u32) {
        *self.granted.lock().unwrap() = Some(capacity);
    }

    /// Like [`grant_only`](Self::grant_only) for the next `heaps` heaps only.
    pub fn grant_only_for(&self, capacity: u32, heaps: u32) {
        self.grant_only(capacity);
        *self.granted_heaps.lock().unwrap() = Some(heaps);
    }

    pub fn fail_allocations(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn created(&self) -> Vec<(DescriptorHeapKind, u32)> {
        self.log.lock().unwrap().created.clone()
    }

    pub fn released(&self) -> Vec<DescriptorHeapHandle> {
        self.log.lock().unwrap().released.clone()
    }

    pub fn copies(&self) -> Vec<CopyCall> {
        self.log.lock().unwrap().copies.clone()
    }

    pub fn copied_descriptor_count(&self) -> usize {
        self.copies().iter().map(|c| c.sources.len()).sum()
    }

    pub fn clear_copies(&self) {
        self.log.lock().unwrap().copies.clear();
    }

    pub fn null_descriptors() -> DefaultDescriptors {
        DefaultDescriptors {
            cbv: CpuDescriptorHandle(0xC0),
            srv: CpuDescriptorHandle(0x50),
            uav: CpuDescriptorHandle(0xA0),
            sampler: CpuDescriptorHandle(0x5A),
        }
    }
}

impl DescriptorDevice for MockDevice {
    fn create_online_descriptor_heap(
        &self,
        kind: DescriptorHeapKind,
        capacity: u32,
    ) -> Result<NativeDescriptorHeap, DescriptorHeapError> {
        if *self.fail.lock().unwrap() {
            return Err(DescriptorHeapError::AllocationFailed {
                kind,
                capacity,
                reason: "scripted failure".to_string(),
            });
        }

        let capacity = {
            let mut granted = self.granted.lock().unwrap();
            let mut remaining = self.granted_heaps.lock().unwrap();
            let capacity = granted.unwrap_or(capacity);
            if let Some(left) = remaining.as_mut() {
                *left -= 1;
                if *left == 0 {
                    *granted = None;
                    *remaining = None;
                }
            }
            capacity
        };
        let mut log = self.log.lock().unwrap();
        log.next_heap += 1;
        log.created.push((kind, capacity));
        let id = log.next_heap;
        Ok(NativeDescriptorHeap {
            handle: DescriptorHeapHandle(id),
            kind,
            cpu_start: CpuDescriptorHandle(id << 32),
            gpu_start: GpuDescriptorHandle((id << 32) | 0x8000_0000),
            increment: INCREMENT,
            capacity,
        })
    }

    fn release_descriptor_heap(&self, heap: DescriptorHeapHandle) {
        self.log.lock().unwrap().released.push(heap);
    }

    fn copy_descriptors(
        &self,
        kind: DescriptorHeapKind,
        dest: CpuDescriptorHandle,
        sources: &[CpuDescriptorHandle],
    ) {
        self.log.lock().unwrap().copies.push(CopyCall {
            kind,
            dest,
            sources: sources.to_vec(),
        });
    }

    fn max_descriptor_count(&self, _kind: DescriptorHeapKind) -> u32 {
        *self.limit.lock().unwrap()
    }

    fn default_descriptors(&self) -> DefaultDescriptors {
        Self::null_descriptors()
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Pipelines
// ───────────────────────────────────────────────────────────────────────────

pub fn graphics_root(handle: u64) -> Arc<RootSignature> {
    Arc::new(RootSignature::new(
        RootSignatureHandle(handle),
        RootSignatureDesc::graphics_default(16, 16),
    ))
}

pub fn compute_root(handle: u64) -> Arc<RootSignature> {
    Arc::new(RootSignature::new(
        RootSignatureHandle(handle),
        RootSignatureDesc::compute_default(16, 16),
    ))
}

/// A graphics pipeline whose vertex and pixel shaders use the given ranges.
pub fn graphics_pipeline(
    handle: u64,
    root_signature: &Arc<RootSignature>,
    vertex: ShaderResourceCount,
    pixel: ShaderResourceCount,
) -> Arc<GraphicsPipelineState> {
    Arc::new(
        GraphicsPipelineState::new(
            PipelineStateHandle(handle),
            Arc::clone(root_signature),
            PrimitiveTopology::TriangleList,
        )
        .with_shader(ShaderStage::Vertex, vertex)
        .with_shader(ShaderStage::Pixel, pixel),
    )
}

pub fn compute_pipeline(
    handle: u64,
    root_signature: &Arc<RootSignature>,
    shader: ShaderResourceCount,
) -> Arc<ComputePipelineState> {
    Arc::new(ComputePipelineState::new(
        PipelineStateHandle(handle),
        Arc::clone(root_signature),
        shader,
    ))
}
