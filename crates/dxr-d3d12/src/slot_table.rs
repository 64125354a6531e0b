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

//! Per-stage binding slots with dirty tracking.

use dxr_core::rhi::{ShaderStage, StageMask};

/// Holds up to `N` bound handles per shader stage for one resource category.
///
/// Writing a different handle marks the stage dirty and raises its occupied
/// count; writing the same handle again does nothing. The bind pass clears a
/// stage's dirty bit once the stage has been copied into a descriptor heap.
#[derive(Debug, Clone)]
pub struct BindingSlotTable<H, const N: usize> {
    slots: [[Option<H>; N]; ShaderStage::COUNT],
    occupied: [usize; ShaderStage::COUNT],
    dirty: StageMask,
}

impl<H: Copy + PartialEq, const N: usize> BindingSlotTable<H, N> {
    /// Creates an empty table with every stage dirty.
    pub fn new() -> Self {
        Self {
            slots: [[None; N]; ShaderStage::COUNT],
            occupied: [0; ShaderStage::COUNT],
            dirty: StageMask::ALL,
        }
    }

    /// Stores `handle` at `slot` of `stage`. Returns whether the table changed.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= N`.
    pub fn set(&mut self, stage: ShaderStage, slot: usize, handle: Option<H>) -> bool {
        assert!(slot < N, "slot {slot} out of range for {stage:?} (capacity {N})");

        let current = &mut self.slots[stage.index()][slot];
        if *current == handle {
            return false;
        }

        *current = handle;
        self.occupied[stage.index()] = self.occupied[stage.index()].max(slot + 1);
        self.dirty.insert(StageMask::from_stage(stage));
        true
    }

    /// The handle at `slot` of `stage`, if any. Out-of-range slots read as empty.
    pub fn get(&self, stage: ShaderStage, slot: usize) -> Option<H> {
        self.slots[stage.index()].get(slot).copied().flatten()
    }

    /// All slots of `stage`.
    pub fn slots(&self, stage: ShaderStage) -> &[Option<H>; N] {
        &self.slots[stage.index()]
    }

    /// One past the highest slot ever written for `stage` since the last [`clear`](Self::clear).
    pub fn occupied_count(&self, stage: ShaderStage) -> usize {
        self.occupied[stage.index()]
    }

    /// Whether `stage` changed since it was last bound.
    pub fn is_dirty(&self, stage: ShaderStage) -> bool {
        self.dirty.has_stage(stage)
    }

    /// Marks `stage` as bound.
    pub fn clear_dirty(&mut self, stage: ShaderStage) {
        self.dirty.remove(StageMask::from_stage(stage));
    }

    /// Marks every stage dirty without touching the stored handles.
    pub fn dirty_all(&mut self) {
        self.dirty = StageMask::ALL;
    }

    /// The set of dirty stages.
    pub fn dirty_stages(&self) -> StageMask {
        self.dirty
    }

    /// Empties every slot and marks every stage dirty.
    pub fn clear(&mut self) {
        self.slots = [[None; N]; ShaderStage::COUNT];
        self.occupied = [0; ShaderStage::COUNT];
        self.dirty = StageMask::ALL;
    }
}

impl<H: Copy + PartialEq, const N: usize> Default for BindingSlotTable<H, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Table = BindingSlotTable<u32, 4>;

    fn settled() -> Table {
        let mut table = Table::new();
        for stage in ShaderStage::range(ShaderStage::ALL, ShaderStage::Pixel) {
            table.clear_dirty(stage);
        }
        table
    }

    #[test]
    fn new_table_is_empty_and_fully_dirty() {
        let table = Table::new();
        assert_eq!(table.dirty_stages(), StageMask::ALL);
        assert_eq!(table.occupied_count(ShaderStage::Pixel), 0);
        assert_eq!(table.get(ShaderStage::Pixel, 0), None);
    }

    #[test]
    fn setting_same_handle_is_a_no_op() {
        let mut table = settled();
        assert!(table.set(ShaderStage::Vertex, 1, Some(7)));
        table.clear_dirty(ShaderStage::Vertex);

        assert!(!table.set(ShaderStage::Vertex, 1, Some(7)));
        assert!(!table.is_dirty(ShaderStage::Vertex));
    }

    #[test]
    fn change_dirties_only_its_stage() {
        let mut table = settled();
        table.set(ShaderStage::Pixel, 0, Some(3));
        assert!(table.is_dirty(ShaderStage::Pixel));
        assert!(!table.is_dirty(ShaderStage::Vertex));
        assert_eq!(table.dirty_stages(), StageMask::PIXEL);
    }

    #[test]
    fn occupied_count_never_shrinks() {
        let mut table = settled();
        table.set(ShaderStage::Hull, 2, Some(1));
        assert_eq!(table.occupied_count(ShaderStage::Hull), 3);

        table.set(ShaderStage::Hull, 0, Some(2));
        table.set(ShaderStage::Hull, 2, None);
        assert_eq!(table.occupied_count(ShaderStage::Hull), 3);
        assert_eq!(table.get(ShaderStage::Hull, 2), None);
    }

    #[test]
    fn clear_resets_slots_and_dirties() {
        let mut table = settled();
        table.set(ShaderStage::Domain, 3, Some(9));
        table.clear_dirty(ShaderStage::Domain);

        table.clear();
        assert_eq!(table.occupied_count(ShaderStage::Domain), 0);
        assert_eq!(table.get(ShaderStage::Domain, 3), None);
        assert_eq!(table.dirty_stages(), StageMask::ALL);
    }

    #[test]
    fn dirty_all_keeps_handles() {
        let mut table = settled();
        table.set(ShaderStage::Geometry, 0, Some(5));
        table.clear_dirty(ShaderStage::Geometry);

        table.dirty_all();
        assert_eq!(table.dirty_stages(), StageMask::ALL);
        assert_eq!(table.get(ShaderStage::Geometry, 0), Some(5));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn slot_past_capacity_panics() {
        let mut table = Table::new();
        table.set(ShaderStage::Vertex, 4, Some(1));
    }
}
