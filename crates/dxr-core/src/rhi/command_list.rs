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

//! The traits through which the binding cache talks to the graphics API.

use super::error::DescriptorHeapError;
use super::pipeline::{PipelineStateHandle, PrimitiveTopology, RootSignatureHandle};
use super::resource::{
    CpuDescriptorHandle, DefaultDescriptors, DescriptorHeapHandle, DescriptorHeapKind,
    GpuDescriptorHandle,
};
use super::views::{
    DepthStencilView, IndexBufferView, RenderTargetView, ScissorRect, ShadingRate, TextureId,
    VertexBufferView, Viewport,
};

/// A command list that state changes are recorded into.
///
/// Every method maps to exactly one native command. Implementations do no
/// filtering of their own: redundant-state elimination is the caller's job.
pub trait CommandListSink {
    /// Sets the pipeline-state object.
    fn set_pipeline_state(&mut self, pipeline: PipelineStateHandle);

    /// Sets the root signature used by draws.
    fn set_graphics_root_signature(&mut self, root_signature: RootSignatureHandle);

    /// Sets the root signature used by dispatches.
    fn set_compute_root_signature(&mut self, root_signature: RootSignatureHandle);

    /// Sets the input-assembler primitive topology.
    fn ia_set_primitive_topology(&mut self, topology: PrimitiveTopology);

    /// Binds render targets and an optional depth-stencil target.
    fn om_set_render_targets(
        &mut self,
        render_targets: &[Option<RenderTargetView>],
        depth_stencil: Option<DepthStencilView>,
    );

    /// Sets the viewports.
    fn rs_set_viewports(&mut self, viewports: &[Viewport]);

    /// Sets the scissor rectangles.
    fn rs_set_scissor_rects(&mut self, rects: &[ScissorRect]);

    /// Sets the blend constant.
    fn om_set_blend_factor(&mut self, factor: [f32; 4]);

    /// Sets the coarse shading rate.
    fn rs_set_shading_rate(&mut self, rate: ShadingRate);

    /// Sets (or clears) the screen-space shading-rate image.
    fn rs_set_shading_rate_image(&mut self, image: Option<TextureId>);

    /// Binds vertex buffers starting at `start_slot`. Default views unbind a slot.
    fn ia_set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView]);

    /// Binds (or clears) the index buffer.
    fn ia_set_index_buffer(&mut self, view: Option<IndexBufferView>);

    /// Sets the shader-visible descriptor heaps.
    fn set_descriptor_heaps(
        &mut self,
        resource: DescriptorHeapHandle,
        sampler: DescriptorHeapHandle,
    );

    /// Binds a descriptor table for draws.
    fn set_graphics_root_descriptor_table(
        &mut self,
        parameter_index: u32,
        base: GpuDescriptorHandle,
    );

    /// Binds a descriptor table for dispatches.
    fn set_compute_root_descriptor_table(
        &mut self,
        parameter_index: u32,
        base: GpuDescriptorHandle,
    );

    /// Writes inline 32-bit constants for draws.
    fn set_graphics_root_32bit_constants(
        &mut self,
        parameter_index: u32,
        values: &[u32],
        dest_offset: u32,
    );

    /// Writes inline 32-bit constants for dispatches.
    fn set_compute_root_32bit_constants(
        &mut self,
        parameter_index: u32,
        values: &[u32],
        dest_offset: u32,
    );
}

/// A shader-visible descriptor heap created by a [`DescriptorDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeDescriptorHeap {
    /// The native heap object.
    pub handle: DescriptorHeapHandle,
    /// The kind of descriptors the heap stores.
    pub kind: DescriptorHeapKind,
    /// CPU address of the first descriptor.
    pub cpu_start: CpuDescriptorHandle,
    /// GPU address of the first descriptor.
    pub gpu_start: GpuDescriptorHandle,
    /// Byte distance between two consecutive descriptors.
    pub increment: u32,
    /// Number of descriptors the heap can hold.
    pub capacity: u32,
}

/// The device-side services the binding cache needs.
///
/// Shared by every command context created from the same device, hence the
/// `Send + Sync` bound.
pub trait DescriptorDevice: Send + Sync {
    /// Creates a shader-visible heap able to hold `capacity` descriptors of `kind`.
    ///
    /// The returned heap may be smaller than requested; its `capacity` field is
    /// what callers must trust.
    fn create_online_descriptor_heap(
        &self,
        kind: DescriptorHeapKind,
        capacity: u32,
    ) -> Result<NativeDescriptorHeap, DescriptorHeapError>;

    /// Releases a heap created by [`Self::create_online_descriptor_heap`].
    fn release_descriptor_heap(&self, heap: DescriptorHeapHandle);

    /// Copies `sources` into consecutive descriptors starting at `dest`.
    fn copy_descriptors(
        &self,
        kind: DescriptorHeapKind,
        dest: CpuDescriptorHandle,
        sources: &[CpuDescriptorHandle],
    );

    /// The largest shader-visible heap of `kind` the device supports.
    fn max_descriptor_count(&self, kind: DescriptorHeapKind) -> u32;

    /// Null descriptors written into slots that have nothing bound.
    fn default_descriptors(&self) -> DefaultDescriptors;
}
