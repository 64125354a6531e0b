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

//! Hardware limits and tuning constants used by the binding cache.

/// Constant-buffer slots tracked per shader stage.
pub const MAX_CONSTANT_BUFFERS_PER_STAGE: usize = 16;
/// Shader-resource-view slots tracked per shader stage.
pub const MAX_SHADER_RESOURCE_VIEWS_PER_STAGE: usize = 16;
/// Unordered-access-view slots tracked per shader stage.
pub const MAX_UNORDERED_ACCESS_VIEWS_PER_STAGE: usize = 16;
/// Sampler slots tracked per shader stage.
pub const MAX_SAMPLERS_PER_STAGE: usize = 16;

/// `D3D12_SIMULTANEOUS_RENDER_TARGET_COUNT`.
pub const MAX_RENDER_TARGETS: usize = 8;
/// `D3D12_IA_VERTEX_INPUT_RESOURCE_SLOT_COUNT`.
pub const MAX_VERTEX_BUFFER_SLOTS: usize = 32;
/// `D3D12_VIEWPORT_AND_SCISSORRECT_OBJECT_COUNT_PER_PIPELINE`.
pub const MAX_VIEWPORTS_AND_SCISSOR_RECTS: usize = 16;
/// Root 32-bit constants cached per context.
pub const MAX_ROOT_CONSTANTS: usize = 32;

/// How many times a bind pass may grow a heap before giving up.
pub const MAX_BIND_ATTEMPTS: u32 = 4;
/// Extra descriptors added on top of a request when a heap has to grow.
pub const HEAP_GROWTH_SLACK: u32 = 64;
