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

//! In-memory stand-ins for the device and command list, used by unit tests.

use std::sync::Mutex;

use dxr_core::rhi::{
    CommandListSink, CpuDescriptorHandle, DefaultDescriptors, DepthStencilView, DescriptorDevice,
    DescriptorHeapError, DescriptorHeapHandle, DescriptorHeapKind, GpuDescriptorHandle,
    IndexBufferView, NativeDescriptorHeap, PipelineStateHandle, PrimitiveTopology,
    RenderTargetView, RootSignatureHandle, ScissorRect, ShadingRate, TextureId, VertexBufferView,
    Viewport,
};

#[derive(Debug, Default)]
struct Inner {
    next_heap: u64,
    released: Vec<DescriptorHeapHandle>,
    copies: Vec<(DescriptorHeapKind, CpuDescriptorHandle, Vec<CpuDescriptorHandle>)>,
}

pub(crate) struct FakeDevice {
    limit: u32,
    inner: Mutex<Inner>,
}

impl FakeDevice {
    pub const INCREMENT: u32 = 32;

    pub fn new() -> Self {
        Self::with_limit(1_000_000)
    }

    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn released(&self) -> Vec<DescriptorHeapHandle> {
        self.inner.lock().unwrap().released.clone()
    }

    pub fn copies(
        &self,
    ) -> Vec<(DescriptorHeapKind, CpuDescriptorHandle, Vec<CpuDescriptorHandle>)> {
        self.inner.lock().unwrap().copies.clone()
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

impl DescriptorDevice for FakeDevice {
    fn create_online_descriptor_heap(
        &self,
        kind: DescriptorHeapKind,
        capacity: u32,
    ) -> Result<NativeDescriptorHeap, DescriptorHeapError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_heap += 1;
        let id = inner.next_heap;
        Ok(NativeDescriptorHeap {
            handle: DescriptorHeapHandle(id),
            kind,
            cpu_start: CpuDescriptorHandle(id << 32),
            gpu_start: GpuDescriptorHandle((id << 32) | 0x8000_0000),
            increment: Self::INCREMENT,
            capacity,
        })
    }

    fn release_descriptor_heap(&self, heap: DescriptorHeapHandle) {
        self.inner.lock().unwrap().released.push(heap);
    }

    fn copy_descriptors(
        &self,
        kind: DescriptorHeapKind,
        dest: CpuDescriptorHandle,
        sources: &[CpuDescriptorHandle],
    ) {
        self.inner
            .lock()
            .unwrap()
            .copies
            .push((kind, dest, sources.to_vec()));
    }

    fn max_descriptor_count(&self, _kind: DescriptorHeapKind) -> u32 {
        self.limit
    }

    fn default_descriptors(&self) -> DefaultDescriptors {
        Self::null_descriptors()
    }
}

/// The descriptor-related commands the unit tests look at. Fixed-function
/// and pipeline calls are dropped; the integration tests cover those.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Recorded {
    Heaps(DescriptorHeapHandle, DescriptorHeapHandle),
    GraphicsTable(u32, GpuDescriptorHandle),
    ComputeTable(u32, GpuDescriptorHandle),
    ComputeConstants(u32, Vec<u32>),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingList {
    pub commands: Vec<Recorded>,
}

impl CommandListSink for RecordingList {
    fn set_pipeline_state(&mut self, _: PipelineStateHandle) {}
    fn set_graphics_root_signature(&mut self, _: RootSignatureHandle) {}
    fn set_compute_root_signature(&mut self, _: RootSignatureHandle) {}
    fn ia_set_primitive_topology(&mut self, _: PrimitiveTopology) {}
    fn om_set_render_targets(
        &mut self,
        _: &[Option<RenderTargetView>],
        _: Option<DepthStencilView>,
    ) {
    }
    fn rs_set_viewports(&mut self, _: &[Viewport]) {}
    fn rs_set_scissor_rects(&mut self, _: &[ScissorRect]) {}
    fn om_set_blend_factor(&mut self, _: [f32; 4]) {}
    fn rs_set_shading_rate(&mut self, _: ShadingRate) {}
    fn rs_set_shading_rate_image(&mut self, _: Option<TextureId>) {}
    fn ia_set_vertex_buffers(&mut self, _: u32, _: &[VertexBufferView]) {}
    fn ia_set_index_buffer(&mut self, _: Option<IndexBufferView>) {}
    fn set_graphics_root_32bit_constants(&mut self, _: u32, _: &[u32], _: u32) {}

    fn set_descriptor_heaps(
        &mut self,
        resource: DescriptorHeapHandle,
        sampler: DescriptorHeapHandle,
    ) {
        self.commands.push(Recorded::Heaps(resource, sampler));
    }

    fn set_graphics_root_descriptor_table(
        &mut self,
        parameter_index: u32,
        base: GpuDescriptorHandle,
    ) {
        self.commands.push(Recorded::GraphicsTable(parameter_index, base));
    }

    fn set_compute_root_descriptor_table(
        &mut self,
        parameter_index: u32,
        base: GpuDescriptorHandle,
    ) {
        self.commands.push(Recorded::ComputeTable(parameter_index, base));
    }

    fn set_compute_root_32bit_constants(&mut self, parameter_index: u32, values: &[u32], _: u32) {
        self.commands
            .push(Recorded::ComputeConstants(parameter_index, values.to_vec()));
    }
}
