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

//! Cached fixed-function and pipeline state for graphics and compute passes.
//!
//! Every cache here compares incoming values against what it already holds
//! and reports whether anything changed. The owning
//! [`CommandContextState`](crate::CommandContextState) turns a change into a
//! dirty flag and flushes dirty state on the next bind.

use std::sync::{Arc, Weak};

use dxr_core::dxr_bitflags;
use dxr_core::rhi::{
    BindingCapabilities, ComputePipelineState, DepthStencilView, GraphicsPipelineState,
    IndexBufferView, PrimitiveTopology, RenderTargetView, RootSignature, ScissorRect, ShadingRate,
    TextureId, VertexBufferView, Viewport,
};

use crate::constants::{
    MAX_RENDER_TARGETS, MAX_ROOT_CONSTANTS, MAX_VERTEX_BUFFER_SLOTS,
    MAX_VIEWPORTS_AND_SCISSOR_RECTS,
};

dxr_bitflags! {
    /// Graphics state that must be re-sent before the next draw.
    pub struct GraphicsDirty: u16 {
        /// The pipeline-state object.
        const PIPELINE_STATE = 1 << 0;
        /// The input-assembler topology.
        const PRIMITIVE_TOPOLOGY = 1 << 1;
        /// The graphics root signature.
        const ROOT_SIGNATURE = 1 << 2;
        /// Render targets and depth-stencil.
        const RENDER_TARGETS = 1 << 3;
        /// Coarse shading rate.
        const SHADING_RATE = 1 << 4;
        /// Shading-rate image.
        const SHADING_RATE_IMAGE = 1 << 5;
        /// Vertex buffers.
        const VERTEX_BUFFERS = 1 << 6;
        /// Index buffer.
        const INDEX_BUFFER = 1 << 7;
        /// Viewports.
        const VIEWPORTS = 1 << 8;
        /// Scissor rectangles.
        const SCISSOR_RECTS = 1 << 9;
        /// Blend factor.
        const BLEND_FACTOR = 1 << 10;
        /// Root 32-bit constants.
        const SHADER_CONSTANTS = 1 << 11;
        /// Everything above.
        const ALL = 0x0FFF;
    }
}

dxr_bitflags! {
    /// Compute state that must be re-sent before the next dispatch.
    pub struct ComputeDirty: u8 {
        /// The pipeline-state object.
        const PIPELINE_STATE = 1 << 0;
        /// The compute root signature.
        const ROOT_SIGNATURE = 1 << 1;
        /// Root 32-bit constants.
        const SHADER_CONSTANTS = 1 << 2;
        /// Everything above.
        const ALL = 0b111;
    }
}

impl GraphicsDirty {
    /// Every flag the device can act on.
    pub fn all_supported(capabilities: &BindingCapabilities) -> Self {
        let mut flags = Self::ALL;
        flags.set(Self::SHADING_RATE, capabilities.supports_shading_rate);
        flags.set(
            Self::SHADING_RATE_IMAGE,
            capabilities.supports_shading_rate_image,
        );
        flags
    }
}

/// A pipeline the context refers to without keeping it alive.
#[derive(Debug)]
pub struct BoundPipeline<P> {
    state: Weak<P>,
    root_signature: Arc<RootSignature>,
}

impl<P> BoundPipeline<P> {
    /// Remembers `state` and the root signature it was built with.
    pub fn new(state: &Arc<P>, root_signature: Arc<RootSignature>) -> Self {
        Self {
            state: Arc::downgrade(state),
            root_signature,
        }
    }

    /// Whether `other` is the pipeline already bound.
    pub fn is(&self, other: &Arc<P>) -> bool {
        std::ptr::eq(self.state.as_ptr(), Arc::as_ptr(other))
    }

    /// The pipeline, unless it has been dropped by its owner.
    pub fn upgrade(&self) -> Option<Arc<P>> {
        self.state.upgrade()
    }

    /// The root signature captured when the pipeline was bound.
    pub fn root_signature(&self) -> &Arc<RootSignature> {
        &self.root_signature
    }
}

/// Bound render targets and depth-stencil view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderTargetCache {
    views: [Option<RenderTargetView>; MAX_RENDER_TARGETS],
    count: usize,
    depth_stencil: Option<DepthStencilView>,
}

impl RenderTargetCache {
    /// Stores the targets. Returns whether anything changed.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_RENDER_TARGETS`] targets are given.
    pub fn set(
        &mut self,
        render_targets: &[Option<RenderTargetView>],
        depth_stencil: Option<DepthStencilView>,
    ) -> bool {
        assert!(
            render_targets.len() <= MAX_RENDER_TARGETS,
            "{} render targets exceed the limit of {MAX_RENDER_TARGETS}",
            render_targets.len()
        );

        if self.views() == render_targets && self.depth_stencil == depth_stencil {
            return false;
        }

        self.views = [None; MAX_RENDER_TARGETS];
        self.views[..render_targets.len()].copy_from_slice(render_targets);
        self.count = render_targets.len();
        self.depth_stencil = depth_stencil;
        true
    }

    /// The bound render targets.
    pub fn views(&self) -> &[Option<RenderTargetView>] {
        &self.views[..self.count]
    }

    /// The bound depth-stencil view.
    pub fn depth_stencil(&self) -> Option<DepthStencilView> {
        self.depth_stencil
    }
}

/// Vertex-buffer views per input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferCache {
    views: [VertexBufferView; MAX_VERTEX_BUFFER_SLOTS],
    count: usize,
}

impl Default for VertexBufferCache {
    fn default() -> Self {
        Self {
            views: [VertexBufferView::default(); MAX_VERTEX_BUFFER_SLOTS],
            count: 0,
        }
    }
}

impl VertexBufferCache {
    /// Stores `view` at `slot`; `None` stores an empty view. Returns whether anything changed.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a valid input slot.
    pub fn set(&mut self, slot: usize, view: Option<VertexBufferView>) -> bool {
        assert!(
            slot < MAX_VERTEX_BUFFER_SLOTS,
            "vertex buffer slot {slot} out of range (limit {MAX_VERTEX_BUFFER_SLOTS})"
        );

        let view = view.unwrap_or_default();
        if self.views[slot] == view {
            return false;
        }
        self.views[slot] = view;
        self.count = self.count.max(slot + 1);
        true
    }

    /// Views from slot zero up to the highest slot written.
    pub fn views(&self) -> &[VertexBufferView] {
        &self.views[..self.count]
    }
}

/// A fixed-capacity list of rasterizer rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectList<T> {
    items: [T; MAX_VIEWPORTS_AND_SCISSOR_RECTS],
    count: usize,
}

impl<T: Copy + Default + PartialEq> Default for RectList<T> {
    fn default() -> Self {
        Self {
            items: [T::default(); MAX_VIEWPORTS_AND_SCISSOR_RECTS],
            count: 0,
        }
    }
}

impl<T: Copy + Default + PartialEq> RectList<T> {
    /// Replaces the list. Returns whether anything changed.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_VIEWPORTS_AND_SCISSOR_RECTS`] items are given.
    pub fn set(&mut self, items: &[T]) -> bool {
        assert!(
            items.len() <= MAX_VIEWPORTS_AND_SCISSOR_RECTS,
            "{} rectangles exceed the limit of {MAX_VIEWPORTS_AND_SCISSOR_RECTS}",
            items.len()
        );
        if self.as_slice() == items {
            return false;
        }
        self.items[..items.len()].copy_from_slice(items);
        self.count = items.len();
        true
    }

    /// The current items.
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.count]
    }
}

/// Root 32-bit constants shared by the graphics and compute pipelines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShaderConstantsCache {
    values: [u32; MAX_ROOT_CONSTANTS],
    count: usize,
}

impl ShaderConstantsCache {
    /// Replaces the constants. Returns whether anything changed.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_ROOT_CONSTANTS`] values are given.
    pub fn set(&mut self, values: &[u32]) -> bool {
        assert!(
            values.len() <= MAX_ROOT_CONSTANTS,
            "{} root constants exceed the limit of {MAX_ROOT_CONSTANTS}",
            values.len()
        );
        if self.values() == values {
            return false;
        }
        self.values[..values.len()].copy_from_slice(values);
        self.count = values.len();
        true
    }

    /// The current constants.
    pub fn values(&self) -> &[u32] {
        &self.values[..self.count]
    }

    /// Drops every constant.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything a draw needs besides descriptors.
#[derive(Debug)]
pub struct GraphicsState {
    pub(crate) pipeline: Option<BoundPipeline<GraphicsPipelineState>>,
    pub(crate) topology: PrimitiveTopology,
    pub(crate) render_targets: RenderTargetCache,
    pub(crate) vertex_buffers: VertexBufferCache,
    pub(crate) index_buffer: Option<IndexBufferView>,
    pub(crate) viewports: RectList<Viewport>,
    pub(crate) scissor_rects: RectList<ScissorRect>,
    pub(crate) blend_factor: [f32; 4],
    pub(crate) shading_rate: ShadingRate,
    pub(crate) shading_rate_image: Option<TextureId>,
    pub(crate) dirty: GraphicsDirty,
}

impl GraphicsState {
    /// Empty state with every supported flag dirty.
    pub fn new(capabilities: &BindingCapabilities) -> Self {
        Self {
            pipeline: None,
            topology: PrimitiveTopology::Undefined,
            render_targets: RenderTargetCache::default(),
            vertex_buffers: VertexBufferCache::default(),
            index_buffer: None,
            viewports: RectList::default(),
            scissor_rects: RectList::default(),
            blend_factor: [0.0; 4],
            shading_rate: ShadingRate::Rate1x1,
            shading_rate_image: None,
            dirty: GraphicsDirty::all_supported(capabilities),
        }
    }

    /// Marks every supported flag dirty, keeping cached values.
    pub fn dirty_all(&mut self, capabilities: &BindingCapabilities) {
        self.dirty = GraphicsDirty::all_supported(capabilities);
    }

    /// Flags still waiting to be sent.
    pub fn dirty(&self) -> GraphicsDirty {
        self.dirty
    }
}

/// Everything a dispatch needs besides descriptors.
#[derive(Debug)]
pub struct ComputeState {
    pub(crate) pipeline: Option<BoundPipeline<ComputePipelineState>>,
    pub(crate) dirty: ComputeDirty,
}

impl Default for ComputeState {
    fn default() -> Self {
        Self {
            pipeline: None,
            dirty: ComputeDirty::ALL,
        }
    }
}

impl ComputeState {
    /// Marks every flag dirty, keeping the bound pipeline.
    pub fn dirty_all(&mut self) {
        self.dirty = ComputeDirty::ALL;
    }

    /// Flags still waiting to be sent.
    pub fn dirty(&self) -> ComputeDirty {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_shading_flags_are_masked_out() {
        let caps = BindingCapabilities::default();
        let flags = GraphicsDirty::all_supported(&caps);
        assert!(!flags.intersects(GraphicsDirty::SHADING_RATE | GraphicsDirty::SHADING_RATE_IMAGE));
        assert!(flags.contains(GraphicsDirty::PIPELINE_STATE | GraphicsDirty::BLEND_FACTOR));

        let caps = BindingCapabilities {
            supports_shading_rate: true,
            supports_shading_rate_image: true,
            ..Default::default()
        };
        assert_eq!(GraphicsDirty::all_supported(&caps), GraphicsDirty::ALL);
    }

    #[test]
    fn render_target_cache_detects_count_and_depth_changes() {
        let mut cache = RenderTargetCache::default();
        let rts = [Some(RenderTargetView(1)), Some(RenderTargetView(2))];
        assert!(cache.set(&rts, None));
        assert!(!cache.set(&rts, None));
        assert!(cache.set(&rts[..1], None));
        assert!(cache.set(&rts[..1], Some(DepthStencilView(9))));
        assert_eq!(cache.views(), &rts[..1]);
        assert_eq!(cache.depth_stencil(), Some(DepthStencilView(9)));
    }

    #[test]
    #[should_panic(expected = "render targets exceed")]
    fn too_many_render_targets_panics() {
        let mut cache = RenderTargetCache::default();
        cache.set(&[None; MAX_RENDER_TARGETS + 1], None);
    }

    #[test]
    fn vertex_buffer_cache_tracks_highest_slot() {
        let mut cache = VertexBufferCache::default();
        let view = VertexBufferView {
            location: 0x1000,
            size_in_bytes: 256,
            stride_in_bytes: 16,
        };
        assert!(cache.set(2, Some(view)));
        assert!(!cache.set(2, Some(view)));
        assert_eq!(cache.views().len(), 3);
        assert_eq!(cache.views()[0], VertexBufferView::default());

        assert!(cache.set(2, None));
        assert!(!cache.set(5, None));
        assert_eq!(cache.views().len(), 3);
    }

    #[test]
    fn rect_list_compares_contents() {
        let mut viewports = RectList::<Viewport>::default();
        let full = Viewport::from_size(1920.0, 1080.0);
        assert!(viewports.set(&[full]));
        assert!(!viewports.set(&[full]));
        assert!(viewports.set(&[full, full]));
        assert!(viewports.set(&[]));
        assert!(viewports.as_slice().is_empty());
    }

    #[test]
    fn shader_constants_compare_length_and_values() {
        let mut constants = ShaderConstantsCache::default();
        assert!(!constants.set(&[]));
        assert!(constants.set(&[1, 2, 3]));
        assert!(!constants.set(&[1, 2, 3]));
        assert!(constants.set(&[1, 2]));
        assert_eq!(constants.values(), &[1, 2]);
        constants.clear();
        assert!(constants.values().is_empty());
    }

    #[test]
    fn bound_pipeline_identity_survives_release() {
        use dxr_core::rhi::{
            PipelineStateHandle, RootSignatureDesc, RootSignatureHandle, ShaderResourceCount,
        };

        let root = Arc::new(RootSignature::new(
            RootSignatureHandle(1),
            RootSignatureDesc::compute_default(4, 0),
        ));
        let pipeline = Arc::new(ComputePipelineState::new(
            PipelineStateHandle(7),
            root.clone(),
            ShaderResourceCount::default(),
        ));
        let other = Arc::new(ComputePipelineState::new(
            PipelineStateHandle(8),
            root.clone(),
            ShaderResourceCount::default(),
        ));

        let bound = BoundPipeline::new(&pipeline, root);
        assert!(bound.is(&pipeline));
        assert!(!bound.is(&other));

        drop(pipeline);
        assert!(bound.upgrade().is_none());
        assert_eq!(bound.root_signature().handle(), RootSignatureHandle(1));
    }
}
