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

//! Defines the hierarchy of error types for descriptor binding.

use thiserror::Error;

use super::resource::DescriptorHeapKind;

/// An error raised while creating or growing a shader-visible descriptor heap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorHeapError {
    /// The device refused to create the heap.
    #[error("failed to allocate a {kind} descriptor heap of {capacity} descriptors: {reason}")]
    AllocationFailed {
        /// The heap kind that was requested.
        kind: DescriptorHeapKind,
        /// The capacity that was requested.
        capacity: u32,
        /// Backend-provided description of the failure.
        reason: String,
    },
    /// Even the largest heap the device supports cannot hold the request.
    #[error("{requested} {kind} descriptors exceed the device limit of {limit}")]
    DeviceLimitReached {
        /// The heap kind that was requested.
        kind: DescriptorHeapKind,
        /// The number of descriptors that had to fit.
        requested: u32,
        /// The device's maximum heap size for `kind`.
        limit: u32,
    },
}

/// An error returned by the bind entry points of a command-context state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// A draw or dispatch was recorded with no pipeline state set.
    #[error("no pipeline state is bound")]
    NoPipelineState,
    /// The bound pipeline state was destroyed before it was used.
    #[error("the bound pipeline state has been released")]
    PipelineStateReleased,
    /// A descriptor heap had to grow and could not.
    #[error("descriptor heap reallocation failed: {0}")]
    HeapReallocFailed(#[from] DescriptorHeapError),
    /// A descriptor heap never had room for the pass, even after reallocating.
    #[error("{kind} descriptor heap has no room for {requested} descriptors after {attempts} attempts")]
    HeapExhausted {
        /// The heap that ran out of space.
        kind: DescriptorHeapKind,
        /// The descriptors needed by the pass.
        requested: u32,
        /// How many times space was checked.
        attempts: u32,
    },
}

/// An error raised while loading or saving [`ContextStateSettings`](super::ContextStateSettings).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The document is not valid RON for the settings schema.
    #[error("failed to parse context-state settings: {0}")]
    Parse(String),
    /// The document parsed but holds unusable values.
    #[error("invalid context-state settings: {0}")]
    Invalid(String),
    /// The settings could not be written out as RON.
    #[error("failed to serialize context-state settings: {0}")]
    Serialize(String),
}
