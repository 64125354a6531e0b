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

//! # DXR D3D12
//!
//! Redundant-state elimination and descriptor binding for a D3D12 command
//! context.
//!
//! A [`CommandContextState`] sits between the renderer and a command list.
//! Setters record what the caller wants bound and mark it dirty; the
//! `bind_*` entry points flush only what changed into a
//! [`CommandListSink`](dxr_core::CommandListSink), copying live descriptors
//! into shader-visible heaps and growing those heaps when they run out.

#![warn(missing_docs)]

pub mod constants;
pub mod context_state;
pub mod descriptor_cache;
pub mod descriptor_heap;
pub mod resource_counts;
pub mod slot_table;
pub mod state_cache;

#[cfg(test)]
mod test_support;

pub use context_state::CommandContextState;
pub use descriptor_cache::DescriptorCache;
pub use descriptor_heap::OnlineDescriptorHeap;
pub use resource_counts::StageResourceCounts;
pub use slot_table::BindingSlotTable;
