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

//! The per-command-context binding state machine.

use std::sync::Arc;

use bytemuck::Pod;
use dxr_core::rhi::{
    BindingCapabilities, BindingError, BindingStats, CommandListSink, ComputePipelineState,
    ConstantBufferView, ContextStateSettings, DepthStencilView, DescriptorDevice,
    DescriptorHeapError, DescriptorHeapKind, GraphicsPipelineState, IndexBufferView,
    PrimitiveTopology, RenderTargetView, ResourceCategory, RootSignature, SamplerState,
    ScissorRect, ShaderResourceView, ShaderStage, ShadingRate, TextureId, UnorderedAccessView,
    VertexBufferView, Viewport,
};

use crate::constants::{MAX_BIND_ATTEMPTS, MAX_ROOT_CONSTANTS};
use crate::descriptor_cache::DescriptorCache;
use crate::resource_counts::StageResourceCounts;
use crate::state_cache::{
    BoundPipeline, ComputeDirty, ComputeState, GraphicsDirty, GraphicsState,
    ShaderConstantsCache,
};

const RESOURCE_CATEGORIES: [ResourceCategory; 3] = [
    ResourceCategory::ConstantBuffer,
    ResourceCategory::ShaderResourceView,
    ResourceCategory::UnorderedAccessView,
];
const SAMPLER_CATEGORIES: [ResourceCategory; 1] = [ResourceCategory::Sampler];

/// Tracks what a command list has bound and what the caller wants bound.
///
/// Setters only record state. [`bind_graphics_states`](Self::bind_graphics_states)
/// and [`bind_compute_state`](Self::bind_compute_state) must be called right
/// before each draw or dispatch; they send whatever changed since the previous
/// call and copy dirty descriptor tables into the online heaps.
///
/// A state belongs to a single command context and is never shared between
/// threads, though it can be moved to another one.
#[derive(Debug)]
pub struct CommandContextState {
    capabilities: BindingCapabilities,
    descriptor_cache: DescriptorCache,
    resource_counts: StageResourceCounts,
    shader_constants: ShaderConstantsCache,
    graphics: GraphicsState,
    compute: ComputeState,
    stats: BindingStats,
}

impl CommandContextState {
    /// Creates the state and its online heaps, with everything dirty.
    pub fn new(
        device: Arc<dyn DescriptorDevice>,
        settings: &ContextStateSettings,
    ) -> Result<Self, DescriptorHeapError> {
        let descriptor_cache = DescriptorCache::new(device, settings)?;
        let capabilities = settings.capabilities;
        log::debug!(
            "Command context state created: {} resource / {} sampler descriptors, {:?}.",
            settings.resource_heap_capacity,
            settings.sampler_heap_capacity,
            capabilities
        );

        let mut state = Self {
            capabilities,
            descriptor_cache,
            resource_counts: StageResourceCounts::new(),
            shader_constants: ShaderConstantsCache::default(),
            graphics: GraphicsState::new(&capabilities),
            compute: ComputeState::default(),
            stats: BindingStats::default(),
        };
        state.reset_state();
        Ok(state)
    }

    /// The capabilities the state was created with.
    pub fn capabilities(&self) -> &BindingCapabilities {
        &self.capabilities
    }

    // ─────────────────────────────────────────────────────────────────────
    // Binding
    // ─────────────────────────────────────────────────────────────────────

    /// Sends all dirty graphics state to `cmd`. Call before every draw.
    pub fn bind_graphics_states(
        &mut self,
        cmd: &mut dyn CommandListSink,
    ) -> Result<(), BindingError> {
        let Some(bound) = self.graphics.pipeline.as_ref() else {
            log::warn!("bind_graphics_states: no graphics pipeline state is set.");
            return Err(BindingError::NoPipelineState);
        };
        let Some(pipeline) = bound.upgrade() else {
            log::warn!("bind_graphics_states: the graphics pipeline state was released.");
            return Err(BindingError::PipelineStateReleased);
        };
        let root_signature = Arc::clone(bound.root_signature());

        let dirty = &mut self.graphics.dirty;
        if dirty.take(GraphicsDirty::PIPELINE_STATE) {
            cmd.set_pipeline_state(pipeline.handle());
        }
        if dirty.take(GraphicsDirty::PRIMITIVE_TOPOLOGY) {
            cmd.ia_set_primitive_topology(self.graphics.topology);
        }

        let root_signature_was_reset = self.set_root_signature(cmd, &root_signature, false);

        let graphics = &mut self.graphics;
        if graphics.dirty.take(GraphicsDirty::RENDER_TARGETS) {
            cmd.om_set_render_targets(
                graphics.render_targets.views(),
                graphics.render_targets.depth_stencil(),
            );
        }
        if graphics.dirty.take(GraphicsDirty::SHADING_RATE_IMAGE)
            && self.capabilities.supports_shading_rate_image
        {
            cmd.rs_set_shading_rate_image(graphics.shading_rate_image);
        }
        if graphics.dirty.take(GraphicsDirty::SHADING_RATE)
            && self.capabilities.supports_shading_rate
        {
            cmd.rs_set_shading_rate(graphics.shading_rate);
        }
        if graphics.dirty.take(GraphicsDirty::VERTEX_BUFFERS) {
            cmd.ia_set_vertex_buffers(0, graphics.vertex_buffers.views());
        }
        if graphics.dirty.take(GraphicsDirty::INDEX_BUFFER) {
            cmd.ia_set_index_buffer(graphics.index_buffer);
        }
        if graphics.dirty.take(GraphicsDirty::VIEWPORTS) {
            cmd.rs_set_viewports(graphics.viewports.as_slice());
        }
        if graphics.dirty.take(GraphicsDirty::SCISSOR_RECTS) {
            cmd.rs_set_scissor_rects(graphics.scissor_rects.as_slice());
        }
        if graphics.dirty.take(GraphicsDirty::BLEND_FACTOR) {
            cmd.om_set_blend_factor(graphics.blend_factor);
        }

        self.bind_resources(
            cmd,
            &root_signature,
            ShaderStage::GRAPHICS_FIRST,
            ShaderStage::GRAPHICS_LAST,
            root_signature_was_reset,
        )?;
        self.bind_samplers(
            cmd,
            &root_signature,
            ShaderStage::GRAPHICS_FIRST,
            ShaderStage::GRAPHICS_LAST,
            root_signature_was_reset,
        )?;

        if self.graphics.dirty.take(GraphicsDirty::SHADER_CONSTANTS) {
            self.bind_shader_constants(cmd, &root_signature, false);
        }

        self.stats.bind_passes += 1;
        log::trace!("Graphics state bound for pipeline {:?}.", pipeline.handle());
        Ok(())
    }

    /// Sends all dirty compute state to `cmd`. Call before every dispatch.
    pub fn bind_compute_state(
        &mut self,
        cmd: &mut dyn CommandListSink,
    ) -> Result<(), BindingError> {
        let Some(bound) = self.compute.pipeline.as_ref() else {
            log::warn!("bind_compute_state: no compute pipeline state is set.");
            return Err(BindingError::NoPipelineState);
        };
        let Some(pipeline) = bound.upgrade() else {
            log::warn!("bind_compute_state: the compute pipeline state was released.");
            return Err(BindingError::PipelineStateReleased);
        };
        let root_signature = Arc::clone(bound.root_signature());

        if self.compute.dirty.take(ComputeDirty::PIPELINE_STATE) {
            cmd.set_pipeline_state(pipeline.handle());
        }

        let root_signature_was_reset = self.set_root_signature(cmd, &root_signature, true);

        self.bind_resources(
            cmd,
            &root_signature,
            ShaderStage::Compute,
            ShaderStage::Compute,
            root_signature_was_reset,
        )?;
        self.bind_samplers(
            cmd,
            &root_signature,
            ShaderStage::Compute,
            ShaderStage::Compute,
            root_signature_was_reset,
        )?;

        if self.compute.dirty.take(ComputeDirty::SHADER_CONSTANTS) {
            self.bind_shader_constants(cmd, &root_signature, true);
        }

        self.stats.bind_passes += 1;
        log::trace!("Compute state bound for pipeline {:?}.", pipeline.handle());
        Ok(())
    }

    /// Copies and binds the CBV, SRV and UAV tables of `start..=end`.
    ///
    /// Stages are rebound when `force` is set, when their table is dirty, or
    /// when the capabilities ask for unconditional binding. If the resource
    /// heap is too small it is grown, which re-dirties every resource table,
    /// and the descriptor count is computed again.
    pub fn bind_resources(
        &mut self,
        cmd: &mut dyn CommandListSink,
        root_signature: &RootSignature,
        start: ShaderStage,
        end: ShaderStage,
        force: bool,
    ) -> Result<(), BindingError> {
        self.bind_tables(
            cmd,
            root_signature,
            DescriptorHeapKind::Resource,
            &RESOURCE_CATEGORIES,
            start,
            end,
            force,
        )
    }

    /// Copies and binds the sampler tables of `start..=end`.
    ///
    /// See [`bind_resources`](Self::bind_resources).
    pub fn bind_samplers(
        &mut self,
        cmd: &mut dyn CommandListSink,
        root_signature: &RootSignature,
        start: ShaderStage,
        end: ShaderStage,
        force: bool,
    ) -> Result<(), BindingError> {
        self.bind_tables(
            cmd,
            root_signature,
            DescriptorHeapKind::Sampler,
            &SAMPLER_CATEGORIES,
            start,
            end,
            force,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn bind_tables<const C: usize>(
        &mut self,
        cmd: &mut dyn CommandListSink,
        root_signature: &RootSignature,
        kind: DescriptorHeapKind,
        categories: &[ResourceCategory; C],
        start: ShaderStage,
        end: ShaderStage,
        force: bool,
    ) -> Result<(), BindingError> {
        let tier = self.capabilities.resource_binding_tier;
        let mut counts = [[0u32; C]; ShaderStage::COUNT];
        let mut reallocs = 0;

        // A roll-over re-dirties the tables, so the counts are taken again after each one.
        let total = loop {
            let mut total = 0;
            for stage in ShaderStage::range(start, end) {
                for (slot, &category) in categories.iter().enumerate() {
                    let count = self
                        .resource_counts
                        .count(stage, category, root_signature, tier);
                    counts[stage.index()][slot] = count;
                    total += count;
                }
            }

            if self.descriptor_cache.heap(kind).has_space(total) {
                break total;
            }
            if reallocs == MAX_BIND_ATTEMPTS {
                log::error!(
                    "The {kind} descriptor heap still cannot hold {total} descriptors after {MAX_BIND_ATTEMPTS} attempts."
                );
                return Err(BindingError::HeapExhausted {
                    kind,
                    requested: total,
                    attempts: MAX_BIND_ATTEMPTS,
                });
            }

            if let Err(e) = self.descriptor_cache.realloc_heap(kind, total) {
                log::error!(
                    "Could not grow the {kind} descriptor heap for {total} descriptors: {e}"
                );
                return Err(e.into());
            }
            reallocs += 1;
            self.on_heap_rollover(kind);
        };

        log::trace!("{kind} pass over {start:?}..={end:?}: {total} descriptors reserved.");
        self.descriptor_cache.set_descriptor_heaps(cmd);

        let start_offset = self.descriptor_cache.heap_mut(kind).allocate_handles(total);
        let mut offset = start_offset;
        for (slot, &category) in categories.iter().enumerate() {
            for stage in ShaderStage::range(start, end) {
                if force
                    || self.capabilities.force_binding
                    || self.descriptor_cache.is_dirty(category, stage)
                {
                    let copied = self.descriptor_cache.bind_table(
                        cmd,
                        category,
                        root_signature,
                        stage,
                        counts[stage.index()][slot],
                        &mut offset,
                    );
                    if copied > 0 {
                        self.stats.descriptors_copied += u64::from(copied);
                        self.stats.descriptor_tables_bound += 1;
                    }
                    assert!(
                        offset <= start_offset + total,
                        "descriptor table overran its allocation ({offset} > {start_offset} + {total})"
                    );
                }
            }
        }

        self.descriptor_cache.heap_mut(kind).set_current_handle(offset);
        Ok(())
    }

    fn on_heap_rollover(&mut self, kind: DescriptorHeapKind) {
        match kind {
            DescriptorHeapKind::Resource => {
                self.stats.resource_heap_rollovers += 1;
                self.reset_state_resources();
            }
            DescriptorHeapKind::Sampler => {
                self.stats.sampler_heap_rollovers += 1;
                self.descriptor_cache.dirty_descriptor_heaps();
                self.descriptor_cache.dirty_sampler_table();
            }
        }
    }

    fn set_root_signature(
        &mut self,
        cmd: &mut dyn CommandListSink,
        root_signature: &RootSignature,
        compute: bool,
    ) -> bool {
        if compute {
            if !self.compute.dirty.take(ComputeDirty::ROOT_SIGNATURE) {
                return false;
            }
            cmd.set_compute_root_signature(root_signature.handle());
        } else {
            if !self.graphics.dirty.take(GraphicsDirty::ROOT_SIGNATURE) {
                return false;
            }
            cmd.set_graphics_root_signature(root_signature.handle());
        }
        true
    }

    fn bind_shader_constants(
        &mut self,
        cmd: &mut dyn CommandListSink,
        root_signature: &RootSignature,
        compute: bool,
    ) {
        let Some(constants) = root_signature.constants() else {
            return;
        };

        let mut values = self.shader_constants.values();
        if values.is_empty() {
            return;
        }
        let capacity = constants.num_32bit_values as usize;
        if values.len() > capacity {
            log::warn!(
                "{} root constants set but the root signature only holds {capacity}; truncating.",
                values.len()
            );
            values = &values[..capacity];
        }

        if compute {
            cmd.set_compute_root_32bit_constants(constants.parameter_index, values, 0);
        } else {
            cmd.set_graphics_root_32bit_constants(constants.parameter_index, values, 0);
        }
        self.stats.root_constant_pushes += 1;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Resets
    // ─────────────────────────────────────────────────────────────────────

    /// Forgets everything: bound views, pipelines, constants and fixed-function
    /// state. Every flag the device supports is marked dirty.
    pub fn reset_state(&mut self) {
        self.resource_counts.clear();
        self.descriptor_cache.clear();
        self.shader_constants.clear();
        self.graphics = GraphicsState::new(&self.capabilities);
        self.compute = ComputeState::default();
    }

    /// Marks everything dirty for a fresh command list while keeping the cached values.
    pub fn reset_state_for_new_command_list(&mut self) {
        self.descriptor_cache.dirty_descriptor_heaps();
        self.descriptor_cache.dirty_resource_tables();
        self.descriptor_cache.dirty_sampler_table();
        self.graphics.dirty_all(&self.capabilities);
        self.compute.dirty_all();
    }

    /// Re-dirties the descriptor heaps and the CBV, SRV and UAV tables.
    pub fn reset_state_resources(&mut self) {
        self.descriptor_cache.dirty_descriptor_heaps();
        self.descriptor_cache.dirty_resource_tables();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pipeline state
    // ─────────────────────────────────────────────────────────────────────

    /// Sets the graphics pipeline. The state keeps only a weak reference.
    pub fn set_graphics_pipeline_state(&mut self, pipeline: Option<&Arc<GraphicsPipelineState>>) {
        let current = self.graphics.pipeline.as_ref();
        let unchanged = match (current, pipeline) {
            (Some(bound), Some(pipeline)) => bound.is(pipeline),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        let current_root = current.map(|bound| bound.root_signature());
        let new_root = pipeline.map(|pipeline| pipeline.root_signature());
        if !same_root_signature(current_root, new_root) {
            self.graphics.dirty.insert(GraphicsDirty::ROOT_SIGNATURE);
        }

        let topology = pipeline.map_or(PrimitiveTopology::Undefined, |p| p.topology());
        if self.graphics.topology != topology {
            self.graphics.topology = topology;
            self.graphics.dirty.insert(GraphicsDirty::PRIMITIVE_TOPOLOGY);
        }

        if let Some(pipeline) = pipeline {
            for stage in ShaderStage::graphics() {
                let ranges = pipeline
                    .shader(stage)
                    .map(|shader| shader.ranges)
                    .unwrap_or_default();
                self.resource_counts.set(stage, ranges);
            }
        }

        self.graphics.pipeline =
            pipeline.map(|p| BoundPipeline::new(p, Arc::clone(p.root_signature())));
        self.graphics.dirty.insert(GraphicsDirty::PIPELINE_STATE);
    }

    /// Sets the compute pipeline. The state keeps only a weak reference.
    pub fn set_compute_pipeline_state(&mut self, pipeline: Option<&Arc<ComputePipelineState>>) {
        let current = self.compute.pipeline.as_ref();
        let unchanged = match (current, pipeline) {
            (Some(bound), Some(pipeline)) => bound.is(pipeline),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        let current_root = current.map(|bound| bound.root_signature());
        let new_root = pipeline.map(|pipeline| pipeline.root_signature());
        if !same_root_signature(current_root, new_root) {
            self.compute.dirty.insert(ComputeDirty::ROOT_SIGNATURE);
        }

        if let Some(pipeline) = pipeline {
            self.resource_counts
                .set(ShaderStage::Compute, pipeline.shader().ranges);
        }

        self.compute.pipeline =
            pipeline.map(|p| BoundPipeline::new(p, Arc::clone(p.root_signature())));
        self.compute.dirty.insert(ComputeDirty::PIPELINE_STATE);
    }

    /// The bound graphics pipeline, if it is still alive.
    pub fn graphics_pipeline_state(&self) -> Option<Arc<GraphicsPipelineState>> {
        self.graphics.pipeline.as_ref().and_then(BoundPipeline::upgrade)
    }

    /// The bound compute pipeline, if it is still alive.
    pub fn compute_pipeline_state(&self) -> Option<Arc<ComputePipelineState>> {
        self.compute.pipeline.as_ref().and_then(BoundPipeline::upgrade)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Fixed-function state
    // ─────────────────────────────────────────────────────────────────────

    /// Sets the render targets and depth-stencil view.
    pub fn set_render_targets(
        &mut self,
        render_targets: &[Option<RenderTargetView>],
        depth_stencil: Option<DepthStencilView>,
    ) {
        if self.graphics.render_targets.set(render_targets, depth_stencil) {
            self.graphics.dirty.insert(GraphicsDirty::RENDER_TARGETS);
        }
    }

    /// Sets the coarse shading rate. Ignored by the bind pass if unsupported.
    pub fn set_shading_rate(&mut self, rate: ShadingRate) {
        if self.graphics.shading_rate != rate {
            self.graphics.shading_rate = rate;
            self.graphics.dirty.set(
                GraphicsDirty::SHADING_RATE,
                self.capabilities.supports_shading_rate,
            );
        }
    }

    /// Sets the shading-rate image. Ignored by the bind pass if unsupported.
    pub fn set_shading_rate_image(&mut self, image: Option<TextureId>) {
        if self.graphics.shading_rate_image != image {
            self.graphics.shading_rate_image = image;
            self.graphics.dirty.set(
                GraphicsDirty::SHADING_RATE_IMAGE,
                self.capabilities.supports_shading_rate_image,
            );
        }
    }

    /// Sets the viewports.
    pub fn set_viewports(&mut self, viewports: &[Viewport]) {
        if self.graphics.viewports.set(viewports) {
            self.graphics.dirty.insert(GraphicsDirty::VIEWPORTS);
        }
    }

    /// Sets the scissor rectangles.
    pub fn set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        if self.graphics.scissor_rects.set(rects) {
            self.graphics.dirty.insert(GraphicsDirty::SCISSOR_RECTS);
        }
    }

    /// Sets the blend constant.
    pub fn set_blend_factor(&mut self, factor: [f32; 4]) {
        if self.graphics.blend_factor != factor {
            self.graphics.blend_factor = factor;
            self.graphics.dirty.insert(GraphicsDirty::BLEND_FACTOR);
        }
    }

    /// Binds a vertex buffer to `slot`; `None` unbinds it.
    pub fn set_vertex_buffer(&mut self, view: Option<VertexBufferView>, slot: u32) {
        if self.graphics.vertex_buffers.set(slot as usize, view) {
            self.graphics.dirty.insert(GraphicsDirty::VERTEX_BUFFERS);
        }
    }

    /// Binds the index buffer; `None` unbinds it.
    pub fn set_index_buffer(&mut self, view: Option<IndexBufferView>) {
        if self.graphics.index_buffer != view {
            self.graphics.index_buffer = view;
            self.graphics.dirty.insert(GraphicsDirty::INDEX_BUFFER);
        }
    }

    /// The bound render targets.
    pub fn render_targets(&self) -> &[Option<RenderTargetView>] {
        self.graphics.render_targets.views()
    }

    /// The bound depth-stencil view.
    pub fn depth_stencil(&self) -> Option<DepthStencilView> {
        self.graphics.render_targets.depth_stencil()
    }

    /// The current viewports.
    pub fn viewports(&self) -> &[Viewport] {
        self.graphics.viewports.as_slice()
    }

    /// The current scissor rectangles.
    pub fn scissor_rects(&self) -> &[ScissorRect] {
        self.graphics.scissor_rects.as_slice()
    }

    /// The current blend constant.
    pub fn blend_factor(&self) -> [f32; 4] {
        self.graphics.blend_factor
    }

    /// The current coarse shading rate.
    pub fn shading_rate(&self) -> ShadingRate {
        self.graphics.shading_rate
    }

    /// The current shading-rate image.
    pub fn shading_rate_image(&self) -> Option<TextureId> {
        self.graphics.shading_rate_image
    }

    /// Vertex buffers from slot zero to the highest slot set.
    pub fn vertex_buffers(&self) -> &[VertexBufferView] {
        self.graphics.vertex_buffers.views()
    }

    /// The bound index buffer.
    pub fn index_buffer(&self) -> Option<IndexBufferView> {
        self.graphics.index_buffer
    }

    /// Graphics state waiting for the next bind.
    pub fn graphics_dirty(&self) -> GraphicsDirty {
        self.graphics.dirty()
    }

    /// Compute state waiting for the next bind.
    pub fn compute_dirty(&self) -> ComputeDirty {
        self.compute.dirty()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Descriptors and constants
    // ─────────────────────────────────────────────────────────────────────

    /// Binds a shader-resource view at `slot` of `stage`.
    pub fn set_srv(&mut self, view: Option<ShaderResourceView>, stage: ShaderStage, slot: u32) {
        self.descriptor_cache
            .shader_resources_mut()
            .set(stage, slot as usize, view);
    }

    /// Binds an unordered-access view at `slot` of `stage`.
    pub fn set_uav(&mut self, view: Option<UnorderedAccessView>, stage: ShaderStage, slot: u32) {
        self.descriptor_cache
            .unordered_access_mut()
            .set(stage, slot as usize, view);
    }

    /// Binds a constant-buffer view at `slot` of `stage`.
    pub fn set_cbv(&mut self, view: Option<ConstantBufferView>, stage: ShaderStage, slot: u32) {
        self.descriptor_cache
            .constant_buffers_mut()
            .set(stage, slot as usize, view);
    }

    /// Binds a sampler at `slot` of `stage`.
    pub fn set_sampler(&mut self, sampler: Option<SamplerState>, stage: ShaderStage, slot: u32) {
        self.descriptor_cache
            .samplers_mut()
            .set(stage, slot as usize, sampler);
    }

    /// Sets the root 32-bit constants used by both graphics and compute.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_ROOT_CONSTANTS`] values are given.
    pub fn set_shader_constants(&mut self, values: &[u32]) {
        if self.shader_constants.set(values) {
            self.graphics.dirty.insert(GraphicsDirty::SHADER_CONSTANTS);
            self.compute.dirty.insert(ComputeDirty::SHADER_CONSTANTS);
        }
    }

    /// Sets the root constants from a plain-old-data value.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not a whole number of 32-bit words or does not fit in
    /// [`MAX_ROOT_CONSTANTS`] words.
    pub fn set_shader_constants_pod<T: Pod>(&mut self, value: &T) {
        let bytes = bytemuck::bytes_of(value);
        assert!(
            bytes.len() % 4 == 0,
            "root constants must be a whole number of 32-bit values ({} bytes)",
            bytes.len()
        );
        let count = bytes.len() / 4;
        assert!(
            count <= MAX_ROOT_CONSTANTS,
            "{count} root constants exceed the limit of {MAX_ROOT_CONSTANTS}"
        );

        let mut words = [0u32; MAX_ROOT_CONSTANTS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = bytemuck::pod_read_unaligned(chunk);
        }
        self.set_shader_constants(&words[..count]);
    }

    /// The current root constants.
    pub fn shader_constants(&self) -> &[u32] {
        self.shader_constants.values()
    }

    /// The per-stage resource counts taken from the bound pipelines.
    pub fn resource_counts(&self) -> &StageResourceCounts {
        &self.resource_counts
    }

    /// The descriptor tables and online heaps.
    pub fn descriptor_cache(&self) -> &DescriptorCache {
        &self.descriptor_cache
    }

    /// Mutable access to the descriptor tables and online heaps.
    pub fn descriptor_cache_mut(&mut self) -> &mut DescriptorCache {
        &mut self.descriptor_cache
    }

    /// Counters accumulated since creation or the last [`reset_stats`](Self::reset_stats).
    pub fn stats(&self) -> &BindingStats {
        &self.stats
    }

    /// Zeroes the counters.
    pub fn reset_stats(&mut self) {
        self.stats = BindingStats::default();
    }
}

fn same_root_signature(a: Option<&Arc<RootSignature>>, b: Option<&Arc<RootSignature>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
