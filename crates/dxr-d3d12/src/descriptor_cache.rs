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

//! Bound descriptor tables and the shader-visible heaps they are copied into.

use std::sync::Arc;

use dxr_core::rhi::{
    CommandListSink, ConstantBufferView, ContextStateSettings, CpuDescriptorHandle,
    DefaultDescriptors, DescriptorDevice, DescriptorHeapError, DescriptorHeapHandle,
    DescriptorHeapKind, DescriptorSource, ResourceCategory, RootSignature, SamplerState,
    ShaderResourceView, ShaderStage, UnorderedAccessView,
};

use crate::constants::{
    MAX_CONSTANT_BUFFERS_PER_STAGE, MAX_SAMPLERS_PER_STAGE, MAX_SHADER_RESOURCE_VIEWS_PER_STAGE,
    MAX_UNORDERED_ACCESS_VIEWS_PER_STAGE,
};
use crate::descriptor_heap::OnlineDescriptorHeap;
use crate::slot_table::BindingSlotTable;

/// Constant-buffer views bound per stage.
pub type ConstantBufferTable = BindingSlotTable<ConstantBufferView, MAX_CONSTANT_BUFFERS_PER_STAGE>;
/// Shader-resource views bound per stage.
pub type ShaderResourceTable =
    BindingSlotTable<ShaderResourceView, MAX_SHADER_RESOURCE_VIEWS_PER_STAGE>;
/// Unordered-access views bound per stage.
pub type UnorderedAccessTable =
    BindingSlotTable<UnorderedAccessView, MAX_UNORDERED_ACCESS_VIEWS_PER_STAGE>;
/// Samplers bound per stage.
pub type SamplerTable = BindingSlotTable<SamplerState, MAX_SAMPLERS_PER_STAGE>;

/// Owns the four resource tables, the two online heaps, and the null
/// descriptors used to pad tables.
pub struct DescriptorCache {
    device: Arc<dyn DescriptorDevice>,
    defaults: DefaultDescriptors,
    resource_heap: OnlineDescriptorHeap,
    sampler_heap: OnlineDescriptorHeap,
    bound_heaps: Option<(DescriptorHeapHandle, DescriptorHeapHandle)>,
    constant_buffers: ConstantBufferTable,
    shader_resources: ShaderResourceTable,
    unordered_access: UnorderedAccessTable,
    samplers: SamplerTable,
}

impl std::fmt::Debug for DescriptorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorCache")
            .field("resource_heap", &self.resource_heap)
            .field("sampler_heap", &self.sampler_heap)
            .field("bound_heaps", &self.bound_heaps)
            .finish_non_exhaustive()
    }
}

impl DescriptorCache {
    /// Creates both online heaps at the capacities given in `settings`.
    pub fn new(
        device: Arc<dyn DescriptorDevice>,
        settings: &ContextStateSettings,
    ) -> Result<Self, DescriptorHeapError> {
        let resource_heap = OnlineDescriptorHeap::new(
            &*device,
            DescriptorHeapKind::Resource,
            settings.resource_heap_capacity,
        )?;
        let sampler_heap = match OnlineDescriptorHeap::new(
            &*device,
            DescriptorHeapKind::Sampler,
            settings.sampler_heap_capacity,
        ) {
            Ok(heap) => heap,
            Err(e) => {
                device.release_descriptor_heap(resource_heap.native_handle());
                return Err(e);
            }
        };

        Ok(Self {
            defaults: device.default_descriptors(),
            device,
            resource_heap,
            sampler_heap,
            bound_heaps: None,
            constant_buffers: ConstantBufferTable::new(),
            shader_resources: ShaderResourceTable::new(),
            unordered_access: UnorderedAccessTable::new(),
            samplers: SamplerTable::new(),
        })
    }

    /// The device the heaps were created on.
    pub fn device(&self) -> &Arc<dyn DescriptorDevice> {
        &self.device
    }

    /// The CBV/SRV/UAV heap.
    pub fn resource_heap(&self) -> &OnlineDescriptorHeap {
        &self.resource_heap
    }

    /// The sampler heap.
    pub fn sampler_heap(&self) -> &OnlineDescriptorHeap {
        &self.sampler_heap
    }

    /// The heap that stores descriptors of `kind`.
    pub fn heap(&self, kind: DescriptorHeapKind) -> &OnlineDescriptorHeap {
        match kind {
            DescriptorHeapKind::Resource => &self.resource_heap,
            DescriptorHeapKind::Sampler => &self.sampler_heap,
        }
    }

    /// Mutable access to the heap that stores descriptors of `kind`.
    pub fn heap_mut(&mut self, kind: DescriptorHeapKind) -> &mut OnlineDescriptorHeap {
        match kind {
            DescriptorHeapKind::Resource => &mut self.resource_heap,
            DescriptorHeapKind::Sampler => &mut self.sampler_heap,
        }
    }

    /// Grows the heap of `kind` so that `requested` descriptors fit.
    pub fn realloc_heap(
        &mut self,
        kind: DescriptorHeapKind,
        requested: u32,
    ) -> Result<(), DescriptorHeapError> {
        let device = Arc::clone(&self.device);
        self.heap_mut(kind).realloc(&*device, requested)
    }

    /// Bound constant buffers.
    pub fn constant_buffers(&self) -> &ConstantBufferTable {
        &self.constant_buffers
    }

    /// Bound constant buffers, mutably.
    pub fn constant_buffers_mut(&mut self) -> &mut ConstantBufferTable {
        &mut self.constant_buffers
    }

    /// Bound shader-resource views.
    pub fn shader_resources(&self) -> &ShaderResourceTable {
        &self.shader_resources
    }

    /// Bound shader-resource views, mutably.
    pub fn shader_resources_mut(&mut self) -> &mut ShaderResourceTable {
        &mut self.shader_resources
    }

    /// Bound unordered-access views.
    pub fn unordered_access(&self) -> &UnorderedAccessTable {
        &self.unordered_access
    }

    /// Bound unordered-access views, mutably.
    pub fn unordered_access_mut(&mut self) -> &mut UnorderedAccessTable {
        &mut self.unordered_access
    }

    /// Bound samplers.
    pub fn samplers(&self) -> &SamplerTable {
        &self.samplers
    }

    /// Bound samplers, mutably.
    pub fn samplers_mut(&mut self) -> &mut SamplerTable {
        &mut self.samplers
    }

    /// Whether `stage` of the `category` table changed since it was last bound.
    pub fn is_dirty(&self, category: ResourceCategory, stage: ShaderStage) -> bool {
        match category {
            ResourceCategory::ConstantBuffer => self.constant_buffers.is_dirty(stage),
            ResourceCategory::ShaderResourceView => self.shader_resources.is_dirty(stage),
            ResourceCategory::UnorderedAccessView => self.unordered_access.is_dirty(stage),
            ResourceCategory::Sampler => self.samplers.is_dirty(stage),
        }
    }

    /// Forgets which heaps the command list has, so the next bind re-sends them.
    pub fn dirty_descriptor_heaps(&mut self) {
        self.bound_heaps = None;
    }

    /// Marks every stage of the CBV, SRV and UAV tables dirty.
    pub fn dirty_resource_tables(&mut self) {
        self.constant_buffers.dirty_all();
        self.shader_resources.dirty_all();
        self.unordered_access.dirty_all();
    }

    /// Marks every stage of the sampler table dirty.
    pub fn dirty_sampler_table(&mut self) {
        self.samplers.dirty_all();
    }

    /// Empties all four tables and forgets the bound heaps.
    pub fn clear(&mut self) {
        self.constant_buffers.clear();
        self.shader_resources.clear();
        self.unordered_access.clear();
        self.samplers.clear();
        self.bound_heaps = None;
    }

    /// Sends the current heaps to `cmd` unless they are already set.
    ///
    /// Returns whether a command was recorded.
    pub fn set_descriptor_heaps(&mut self, cmd: &mut dyn CommandListSink) -> bool {
        let heaps = (
            self.resource_heap.native_handle(),
            self.sampler_heap.native_handle(),
        );
        if self.bound_heaps == Some(heaps) {
            return false;
        }
        cmd.set_descriptor_heaps(heaps.0, heaps.1);
        self.bound_heaps = Some(heaps);
        true
    }

    /// Copies `count` descriptors of `stage` for `category` into the heap at
    /// `*offset`, binds the resulting table and clears the stage's dirty bit.
    ///
    /// Slots with nothing bound are filled with the null descriptor. Returns
    /// the number of descriptors written; zero means no table was bound.
    pub fn bind_table(
        &mut self,
        cmd: &mut dyn CommandListSink,
        category: ResourceCategory,
        root_signature: &RootSignature,
        stage: ShaderStage,
        count: u32,
        offset: &mut u32,
    ) -> u32 {
        let target = TableTarget {
            device: &*self.device,
            null: self.defaults.for_category(category),
            parameter: root_signature.root_parameter_index(stage, category),
            stage,
            count,
        };
        match category {
            ResourceCategory::ConstantBuffer => {
                target.bind(cmd, &self.resource_heap, &mut self.constant_buffers, offset)
            }
            ResourceCategory::ShaderResourceView => {
                target.bind(cmd, &self.resource_heap, &mut self.shader_resources, offset)
            }
            ResourceCategory::UnorderedAccessView => {
                target.bind(cmd, &self.resource_heap, &mut self.unordered_access, offset)
            }
            ResourceCategory::Sampler => {
                target.bind(cmd, &self.sampler_heap, &mut self.samplers, offset)
            }
        }
    }
}

impl Drop for DescriptorCache {
    fn drop(&mut self) {
        self.device
            .release_descriptor_heap(self.resource_heap.native_handle());
        self.device
            .release_descriptor_heap(self.sampler_heap.native_handle());
    }
}

struct TableTarget<'a> {
    device: &'a dyn DescriptorDevice,
    null: CpuDescriptorHandle,
    parameter: Option<u32>,
    stage: ShaderStage,
    count: u32,
}

impl TableTarget<'_> {
    fn bind<V: DescriptorSource, const N: usize>(
        &self,
        cmd: &mut dyn CommandListSink,
        heap: &OnlineDescriptorHeap,
        table: &mut BindingSlotTable<V, N>,
        offset: &mut u32,
    ) -> u32 {
        table.clear_dirty(self.stage);

        let Some(parameter) = self.parameter else {
            log::trace!(
                "No {:?} table for {:?} in the root signature, skipping.",
                V::CATEGORY,
                self.stage
            );
            return 0;
        };
        if self.count == 0 {
            return 0;
        }

        let sources: Vec<CpuDescriptorHandle> = (0..self.count as usize)
            .map(|slot| {
                table
                    .get(self.stage, slot)
                    .map_or(self.null, |view| view.descriptor())
            })
            .collect();

        self.device
            .copy_descriptors(heap.kind(), heap.cpu_handle(*offset), &sources);

        let base = heap.gpu_handle(*offset);
        if self.stage == ShaderStage::Compute {
            cmd.set_compute_root_descriptor_table(parameter, base);
        } else {
            cmd.set_graphics_root_descriptor_table(parameter, base);
        }

        *offset += self.count;
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeDevice, Recorded, RecordingList};
    use dxr_core::rhi::{RootSignatureDesc, RootSignatureHandle};

    fn cache() -> (Arc<FakeDevice>, DescriptorCache) {
        let device = Arc::new(FakeDevice::new());
        let settings = ContextStateSettings {
            resource_heap_capacity: 64,
            sampler_heap_capacity: 16,
            ..Default::default()
        };
        let cache = DescriptorCache::new(device.clone(), &settings).unwrap();
        (device, cache)
    }

    fn graphics_root() -> RootSignature {
        RootSignature::new(
            RootSignatureHandle(1),
            RootSignatureDesc::graphics_default(8, 0),
        )
    }

    #[test]
    fn heaps_are_set_once_until_dirtied() {
        let (_device, mut cache) = cache();
        let mut cmd = RecordingList::default();

        assert!(cache.set_descriptor_heaps(&mut cmd));
        assert!(!cache.set_descriptor_heaps(&mut cmd));
        cache.dirty_descriptor_heaps();
        assert!(cache.set_descriptor_heaps(&mut cmd));
        assert_eq!(cmd.commands.len(), 2);
    }

    #[test]
    fn heaps_are_reset_after_realloc() {
        let (_device, mut cache) = cache();
        let mut cmd = RecordingList::default();
        cache.set_descriptor_heaps(&mut cmd);

        cache.realloc_heap(DescriptorHeapKind::Sampler, 32).unwrap();
        assert!(cache.set_descriptor_heaps(&mut cmd));
        assert_eq!(
            cmd.commands.last(),
            Some(&Recorded::Heaps(
                cache.resource_heap().native_handle(),
                cache.sampler_heap().native_handle()
            ))
        );
    }

    #[test]
    fn bind_table_pads_with_null_descriptors() {
        let (device, mut cache) = cache();
        let mut cmd = RecordingList::default();
        let root = graphics_root();
        let srv = ShaderResourceView::new(3, CpuDescriptorHandle(0x3000));
        cache.shader_resources_mut().set(ShaderStage::Pixel, 1, Some(srv));

        let mut offset = 4;
        let written = cache.bind_table(
            &mut cmd,
            ResourceCategory::ShaderResourceView,
            &root,
            ShaderStage::Pixel,
            3,
            &mut offset,
        );

        assert_eq!(written, 3);
        assert_eq!(offset, 7);
        assert!(!cache.shader_resources().is_dirty(ShaderStage::Pixel));

        let null = FakeDevice::null_descriptors().srv;
        let copies = device.copies();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].0, DescriptorHeapKind::Resource);
        assert_eq!(copies[0].1, cache.resource_heap().cpu_handle(4));
        assert_eq!(copies[0].2, vec![null, CpuDescriptorHandle(0x3000), null]);

        let parameter = root
            .root_parameter_index(ShaderStage::Pixel, ResourceCategory::ShaderResourceView)
            .unwrap();
        assert_eq!(
            cmd.commands,
            vec![Recorded::GraphicsTable(
                parameter,
                cache.resource_heap().gpu_handle(4)
            )]
        );
    }

    #[test]
    fn empty_or_missing_tables_only_clear_dirty() {
        let (device, mut cache) = cache();
        let mut cmd = RecordingList::default();
        let root = graphics_root();

        let mut offset = 0;
        let written = cache.bind_table(
            &mut cmd,
            ResourceCategory::ConstantBuffer,
            &root,
            ShaderStage::Vertex,
            0,
            &mut offset,
        );
        assert_eq!(written, 0);
        assert!(!cache.constant_buffers().is_dirty(ShaderStage::Vertex));

        let written = cache.bind_table(
            &mut cmd,
            ResourceCategory::Sampler,
            &root,
            ShaderStage::Compute,
            2,
            &mut offset,
        );
        assert_eq!(written, 0);
        assert!(!cache.samplers().is_dirty(ShaderStage::Compute));

        assert_eq!(offset, 0);
        assert!(cmd.commands.is_empty());
        assert!(device.copies().is_empty());
    }

    #[test]
    fn compute_stage_binds_compute_tables() {
        let (_device, mut cache) = cache();
        let mut cmd = RecordingList::default();
        let root = RootSignature::new(
            RootSignatureHandle(2),
            RootSignatureDesc::compute_default(4, 0),
        );
        let mut offset = 0;
        cache.bind_table(
            &mut cmd,
            ResourceCategory::UnorderedAccessView,
            &root,
            ShaderStage::Compute,
            1,
            &mut offset,
        );
        assert!(matches!(cmd.commands[0], Recorded::ComputeTable(3, _)));
    }

    #[test]
    fn dropping_the_cache_releases_both_heaps() {
        let (device, cache) = cache();
        let heaps = vec![
            cache.resource_heap().native_handle(),
            cache.sampler_heap().native_handle(),
        ];
        drop(cache);
        assert_eq!(device.released(), heaps);
    }
}
