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

//! Backend-agnostic render hardware interface contracts.
//!
//! This module defines the vocabulary the binding cache speaks: which shader
//! stages exist, which resource categories can be bound to them, the handles
//! used to refer to views and pipeline objects, and the traits through which
//! a back end submits work to a graphics API.
//!
//! - **[`stage`]**: shader stages and per-stage masks.
//! - **[`resource`]**: resource categories, descriptor handles, and resource views.
//! - **[`views`]**: fixed-function state (render targets, viewports, vertex/index buffers).
//! - **[`pipeline`]**: root signatures and pipeline-state objects.
//! - **[`command_list`]**: the submission shim ([`CommandListSink`], [`DescriptorDevice`]).
//! - **[`settings`]**: capabilities and tunables for a command-context state.
//! - **[`stats`]**: counters reported by the binding cache.
//! - **[`error`]**: the error hierarchy.

pub mod command_list;
pub mod error;
pub mod pipeline;
pub mod resource;
pub mod settings;
pub mod stage;
pub mod stats;
pub mod views;

pub use self::command_list::{CommandListSink, DescriptorDevice, NativeDescriptorHeap};
pub use self::error::{BindingError, DescriptorHeapError, SettingsError};
pub use self::pipeline::{
    ComputePipelineState, GraphicsPipelineState, PipelineStateHandle, PrimitiveTopology,
    RootConstants, RootSignature, RootSignatureDesc, RootSignatureHandle,
};
pub use self::resource::{
    ConstantBufferView, CpuDescriptorHandle, DefaultDescriptors, DescriptorHeapHandle,
    DescriptorHeapKind, DescriptorSource, GpuDescriptorHandle, ResourceCategory, SamplerState,
    ShaderResourceCount, ShaderResourceRange, ShaderResourceView, UnorderedAccessView,
};
pub use self::settings::{BindingCapabilities, ContextStateSettings, ResourceBindingTier};
pub use self::stage::{ShaderStage, StageMask};
pub use self::stats::BindingStats;
pub use self::views::{
    DepthStencilView, IndexBufferView, IndexFormat, RenderTargetView, ScissorRect, ShadingRate,
    TextureId, VertexBufferView, Viewport,
};
