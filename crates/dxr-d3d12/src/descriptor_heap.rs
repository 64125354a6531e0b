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

//! Shader-visible descriptor heaps that grow on demand.

use dxr_core::rhi::{
    CpuDescriptorHandle, DescriptorDevice, DescriptorHeapError, DescriptorHeapHandle,
    DescriptorHeapKind, GpuDescriptorHandle, NativeDescriptorHeap,
};

use crate::constants::HEAP_GROWTH_SLACK;

/// A linear allocator over one shader-visible descriptor heap.
///
/// Descriptors are handed out front to back. When a pass no longer fits, the
/// owner calls [`realloc`](Self::realloc), which swaps in a larger heap and
/// starts over at offset zero. Tables bound from the previous heap stay valid
/// for commands already recorded; the device defers destruction of the old
/// heap until the GPU is done with it.
#[derive(Debug)]
pub struct OnlineDescriptorHeap {
    native: NativeDescriptorHeap,
    current_offset: u32,
    generation: u64,
}

impl OnlineDescriptorHeap {
    /// Creates a heap of `capacity` descriptors of `kind`.
    pub fn new(
        device: &dyn DescriptorDevice,
        kind: DescriptorHeapKind,
        capacity: u32,
    ) -> Result<Self, DescriptorHeapError> {
        let native = device.create_online_descriptor_heap(kind, capacity)?;
        log::debug!(
            "Created online {kind} descriptor heap {:?} with {} descriptors.",
            native.handle,
            native.capacity
        );
        Ok(Self {
            native,
            current_offset: 0,
            generation: 0,
        })
    }

    /// The kind of descriptors stored.
    pub fn kind(&self) -> DescriptorHeapKind {
        self.native.kind
    }

    /// The native heap, as passed to `SetDescriptorHeaps`.
    pub fn native_handle(&self) -> DescriptorHeapHandle {
        self.native.handle
    }

    /// Number of descriptors the current heap holds.
    pub fn capacity(&self) -> u32 {
        self.native.capacity
    }

    /// Offset of the next free descriptor.
    pub fn current_offset(&self) -> u32 {
        self.current_offset
    }

    /// Bumped every time the underlying heap is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `count` more descriptors fit after the current offset.
    pub fn has_space(&self, count: u32) -> bool {
        self.current_offset
            .checked_add(count)
            .is_some_and(|end| end <= self.native.capacity)
    }

    /// Reserves `count` consecutive descriptors and returns the first offset.
    ///
    /// # Panics
    ///
    /// Panics if the heap does not have room; check [`has_space`](Self::has_space) first.
    pub fn allocate_handles(&mut self, count: u32) -> u32 {
        assert!(
            self.has_space(count),
            "{} descriptor heap overflow: {} + {count} > {}",
            self.native.kind,
            self.current_offset,
            self.native.capacity
        );
        let start = self.current_offset;
        self.current_offset += count;
        start
    }

    /// Moves the cursor back to `offset`, returning trailing handles of the last allocation.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the heap.
    pub fn set_current_handle(&mut self, offset: u32) {
        assert!(
            offset <= self.native.capacity,
            "descriptor offset {offset} past heap capacity {}",
            self.native.capacity
        );
        self.current_offset = offset;
    }

    /// CPU address of descriptor `index`.
    pub fn cpu_handle(&self, index: u32) -> CpuDescriptorHandle {
        self.native.cpu_start.offset(index, self.native.increment)
    }

    /// GPU address of descriptor `index`.
    pub fn gpu_handle(&self, index: u32) -> GpuDescriptorHandle {
        self.native.gpu_start.offset(index, self.native.increment)
    }

    /// Replaces the heap with one able to hold at least `requested` descriptors.
    ///
    /// The new size is twice the current capacity or `requested` plus some
    /// slack, whichever is larger, clamped to the device limit. On error the
    /// current heap is left untouched.
    pub fn realloc(
        &mut self,
        device: &dyn DescriptorDevice,
        requested: u32,
    ) -> Result<(), DescriptorHeapError> {
        let kind = self.native.kind;
        let limit = device.max_descriptor_count(kind);
        let capacity = self
            .native
            .capacity
            .saturating_mul(2)
            .max(requested.saturating_add(HEAP_GROWTH_SLACK))
            .min(limit);

        if capacity < requested {
            return Err(DescriptorHeapError::DeviceLimitReached {
                kind,
                requested,
                limit,
            });
        }

        let native = device.create_online_descriptor_heap(kind, capacity)?;
        device.release_descriptor_heap(self.native.handle);

        log::info!(
            "{kind} descriptor heap rolled over: {} -> {} descriptors (generation {}).",
            self.native.capacity,
            native.capacity,
            self.generation + 1
        );

        self.native = native;
        self.current_offset = 0;
        self.generation += 1;
        Ok(())
    }

    /// Rewinds the cursor once the GPU has consumed everything allocated so far.
    pub fn reset(&mut self) {
        self.current_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeDevice;

    fn heap(device: &FakeDevice, capacity: u32) -> OnlineDescriptorHeap {
        OnlineDescriptorHeap::new(device, DescriptorHeapKind::Resource, capacity).unwrap()
    }

    #[test]
    fn has_space_accepts_exact_fit() {
        let device = FakeDevice::new();
        let mut heap = heap(&device, 16);
        heap.allocate_handles(10);
        assert!(heap.has_space(6));
        assert!(!heap.has_space(7));
        assert!(!heap.has_space(u32::MAX));
    }

    #[test]
    fn allocation_advances_and_set_current_handle_returns_tail() {
        let device = FakeDevice::new();
        let mut heap = heap(&device, 32);
        assert_eq!(heap.allocate_handles(8), 0);
        assert_eq!(heap.allocate_handles(4), 8);
        heap.set_current_handle(10);
        assert_eq!(heap.current_offset(), 10);
        assert_eq!(heap.allocate_handles(1), 10);
    }

    #[test]
    #[should_panic(expected = "descriptor heap overflow")]
    fn allocating_past_capacity_panics() {
        let device = FakeDevice::new();
        let mut heap = heap(&device, 4);
        heap.allocate_handles(5);
    }

    #[test]
    fn handles_are_offset_by_increment() {
        let device = FakeDevice::new();
        let heap = heap(&device, 4);
        let base = heap.cpu_handle(0);
        assert_eq!(heap.cpu_handle(3).0, base.0 + 3 * u64::from(FakeDevice::INCREMENT));
        assert_eq!(
            heap.gpu_handle(2).0,
            heap.gpu_handle(0).0 + 2 * u64::from(FakeDevice::INCREMENT)
        );
    }

    #[test]
    fn realloc_grows_and_rewinds() {
        let device = FakeDevice::new();
        let mut heap = heap(&device, 16);
        let old = heap.native_handle();
        heap.allocate_handles(15);

        heap.realloc(&device, 10).unwrap();

        assert_eq!(heap.capacity(), 10 + HEAP_GROWTH_SLACK);
        assert_eq!(heap.current_offset(), 0);
        assert_eq!(heap.generation(), 1);
        assert_ne!(heap.native_handle(), old);
        assert_eq!(device.released(), vec![old]);
    }

    #[test]
    fn realloc_doubles_large_heaps() {
        let device = FakeDevice::new();
        let mut heap = heap(&device, 512);
        heap.realloc(&device, 4).unwrap();
        assert_eq!(heap.capacity(), 1024);
    }

    #[test]
    fn realloc_is_clamped_to_device_limit() {
        let device = FakeDevice::with_limit(100);
        let mut heap = heap(&device, 80);
        heap.realloc(&device, 90).unwrap();
        assert_eq!(heap.capacity(), 100);

        let err = heap.realloc(&device, 101).unwrap_err();
        assert_eq!(
            err,
            DescriptorHeapError::DeviceLimitReached {
                kind: DescriptorHeapKind::Resource,
                requested: 101,
                limit: 100,
            }
        );
        assert_eq!(heap.generation(), 1);
    }

    #[test]
    fn reset_rewinds_without_new_heap() {
        let device = FakeDevice::new();
        let mut heap = heap(&device, 8);
        heap.allocate_handles(8);
        heap.reset();
        assert!(heap.has_space(8));
        assert_eq!(heap.generation(), 0);
    }
}
