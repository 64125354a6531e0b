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


//! An in-process stand-in for a D3D12 device.

use std::sync::atomic::{AtomicU64, Ordering};

use dxr_core::rhi::{
    CpuDescriptorHandle, DefaultDescriptors, DescriptorDevice, DescriptorHeapError,
    DescriptorHeapHandle, DescriptorHeapKind, GpuDescriptorHandle, NativeDescriptorHeap,
};

const DESCRIPTOR_INCREMENT: u32 = 32;
const MAX_RESOURCE_DESCRIPTORS: u32 = 1_000_000;
const MAX_SAMPLER_DESCRIPTORS: u32 = 2048;

/// Hands out fake heap addresses and counts the descriptor traffic.
#[derive(Debug, Default)]
pub struct SimulatedDevice {
    next_heap: AtomicU64,
    live_heaps: AtomicU64,
    copied: AtomicU64,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heaps created and not yet released.
    pub fn live_heaps(&self) -> u64 {
        self.live_heaps.load(Ordering::Relaxed)
    }

    /// Descriptors copied since creation.
    pub fn copied_descriptors(&self) -> u64 {
        self.copied.load(Ordering::Relaxed)
    }
}

impl DescriptorDevice for SimulatedDevice {
    fn create_online_descriptor_heap(
        &self,
        kind: DescriptorHeapKind,
        capacity: u32,
    ) -> Result<NativeDescriptorHeap, DescriptorHeapError> {
        let limit = self.max_descriptor_count(kind);
        if capacity > limit {
            return Err(DescriptorHeapError::DeviceLimitReached {
                kind,
                requested: capacity,
                limit,
            });
        }

        let id = self.next_heap.fetch_add(1, Ordering::Relaxed) + 1;
        self.live_heaps.fetch_add(1, Ordering::Relaxed);
        log::debug!("device: created {kind} heap #{id} ({capacity} descriptors)");
        Ok(NativeDescriptorHeap {
            handle: DescriptorHeapHandle(id),
            kind,
            cpu_start: CpuDescriptorHandle(id << 32),
            gpu_start: GpuDescriptorHandle(0xFFFF_0000_0000_0000 | (id << 32)),
            increment: DESCRIPTOR_INCREMENT,
            capacity,
        })
    }

    fn release_descriptor_heap(&self, heap: DescriptorHeapHandle) {
        self.live_heaps.fetch_sub(1, Ordering::Relaxed);
        log::debug!("device: released heap #{}", heap.0);
    }

    fn copy_descriptors(
        &self,
        kind: DescriptorHeapKind,
        dest: CpuDescriptorHandle,
        sources: &[CpuDescriptorHandle],
    ) {
        self.copied.fetch_add(sources.len() as u64, Ordering::Relaxed);
        log::trace!("device: {} {kind} descriptors -> {:#x}", sources.len(), dest.0);
    }

    fn max_descriptor_count(&self, kind: DescriptorHeapKind) -> u32 {
        match kind {
            DescriptorHeapKind::Resource => MAX_RESOURCE_DESCRIPTORS,
            DescriptorHeapKind::Sampler => MAX_SAMPLER_DESCRIPTORS,
        }
    }

    fn default_descriptors(&self) -> DefaultDescriptors {
        DefaultDescriptors {
            cbv: CpuDescriptorHandle(0x10),
            srv: CpuDescriptorHandle(0x20),
            uav: CpuDescriptorHandle(0x30),
            sampler: CpuDescriptorHandle(0x40),
        }
    }
}
