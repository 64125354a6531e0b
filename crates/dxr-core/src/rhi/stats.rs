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

//! Counters reported by the binding cache.

/// Work done by a command-context state since the counters were last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindingStats {
    /// Successful `bind_graphics_states` / `bind_compute_state` calls.
    pub bind_passes: u64,
    /// Descriptors copied into shader-visible heaps.
    pub descriptors_copied: u64,
    /// Descriptor tables set on the command list.
    pub descriptor_tables_bound: u64,
    /// Root 32-bit constant uploads.
    pub root_constant_pushes: u64,
    /// Times the CBV/SRV/UAV heap was replaced by a larger one.
    pub resource_heap_rollovers: u64,
    /// Times the sampler heap was replaced by a larger one.
    pub sampler_heap_rollovers: u64,
}

impl BindingStats {
    /// Total heap replacements across both heaps.
    pub fn total_rollovers(&self) -> u64 {
        self.resource_heap_rollovers + self.sampler_heap_rollovers
    }
}
