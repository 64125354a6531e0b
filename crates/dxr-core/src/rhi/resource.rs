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

//! Resource categories, descriptor handles, and the shader-visible resource views.

use serde::{Deserialize, Serialize};

/// A category of shader resource with its own binding tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceCategory {
    /// Constant buffer views (CBV).
    ConstantBuffer,
    /// Shader resource views (SRV).
    ShaderResourceView,
    /// Unordered access views (UAV).
    UnorderedAccessView,
    /// Sampler states.
    Sampler,
}

impl ResourceCategory {
    /// Number of categories.
    pub const COUNT: usize = 4;

    /// Every category, in the order descriptor ranges are laid out.
    pub const ALL: [Self; Self::COUNT] = [
        Self::ConstantBuffer,
        Self::ShaderResourceView,
        Self::UnorderedAccessView,
        Self::Sampler,
    ];

    /// Returns the table index of this category.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the descriptor heap this category allocates from.
    pub const fn heap_kind(self) -> DescriptorHeapKind {
        match self {
            Self::Sampler => DescriptorHeapKind::Sampler,
            _ => DescriptorHeapKind::Resource,
        }
    }
}

/// The kind of GPU-visible descriptor heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptorHeapKind {
    /// Heap holding constant buffer, shader resource, and unordered access views.
    Resource,
    /// Heap holding samplers.
    Sampler,
}

impl std::fmt::Display for DescriptorHeapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorHeapKind::Resource => write!(f, "resource"),
            DescriptorHeapKind::Sampler => write!(f, "sampler"),
        }
    }
}

/// An opaque handle to a native descriptor heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorHeapHandle(pub u64);

/// The CPU address of a descriptor.
///
/// Offline descriptors (the ones stored in views) live in CPU-only heaps and are
/// copied into a shader-visible heap before a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CpuDescriptorHandle(pub u64);

impl CpuDescriptorHandle {
    /// Returns the handle `index` descriptors past this one.
    pub const fn offset(self, index: u32, increment: u32) -> Self {
        Self(self.0 + index as u64 * increment as u64)
    }
}

/// The GPU address of a descriptor in a shader-visible heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GpuDescriptorHandle(pub u64);

impl GpuDescriptorHandle {
    /// Returns the handle `index` descriptors past this one.
    pub const fn offset(self, index: u32, increment: u32) -> Self {
        Self(self.0 + index as u64 * increment as u64)
    }
}

/// Anything that can be bound through a descriptor table.
pub trait DescriptorSource: Copy + PartialEq {
    /// The category of tables this view is bound into.
    const CATEGORY: ResourceCategory;

    /// The offline descriptor copied into the shader-visible heap.
    fn descriptor(&self) -> CpuDescriptorHandle;
}

macro_rules! resource_view {
    ($(#[$attr:meta])* $name:ident => $category:expr) => {
        $(#[$attr])*
        ///
        /// A view is a non-owning handle: the binding cache stores and compares it
        /// but never keeps the underlying resource alive.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            /// Identifier of the view, unique within its kind.
            pub id: u32,
            /// The offline descriptor describing the view.
            pub descriptor: CpuDescriptorHandle,
        }

        impl $name {
            /// Creates a view handle.
            pub const fn new(id: u32, descriptor: CpuDescriptorHandle) -> Self {
                Self { id, descriptor }
            }
        }

        impl DescriptorSource for $name {
            const CATEGORY: ResourceCategory = $category;

            fn descriptor(&self) -> CpuDescriptorHandle {
                self.descriptor
            }
        }
    };
}

resource_view!(
    /// A constant buffer view.
    ConstantBufferView => ResourceCategory::ConstantBuffer
);
resource_view!(
    /// A shader resource (read-only) view.
    ShaderResourceView => ResourceCategory::ShaderResourceView
);
resource_view!(
    /// An unordered access (read/write) view.
    UnorderedAccessView => ResourceCategory::UnorderedAccessView
);
resource_view!(
    /// A sampler state.
    SamplerState => ResourceCategory::Sampler
);

/// Null descriptors copied into slots that have nothing bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultDescriptors {
    /// Null constant buffer view.
    pub cbv: CpuDescriptorHandle,
    /// Null shader resource view.
    pub srv: CpuDescriptorHandle,
    /// Null unordered access view.
    pub uav: CpuDescriptorHandle,
    /// Default sampler.
    pub sampler: CpuDescriptorHandle,
}

impl DefaultDescriptors {
    /// Returns the null descriptor for `category`.
    pub const fn for_category(&self, category: ResourceCategory) -> CpuDescriptorHandle {
        match category {
            ResourceCategory::ConstantBuffer => self.cbv,
            ResourceCategory::ShaderResourceView => self.srv,
            ResourceCategory::UnorderedAccessView => self.uav,
            ResourceCategory::Sampler => self.sampler,
        }
    }
}

/// The number of resources of each category a shader declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderResourceRange {
    /// Constant buffers.
    pub num_cbvs: u32,
    /// Shader resource views.
    pub num_srvs: u32,
    /// Unordered access views.
    pub num_uavs: u32,
    /// Samplers.
    pub num_samplers: u32,
}

impl ShaderResourceRange {
    /// Returns the count for `category`.
    pub const fn count(&self, category: ResourceCategory) -> u32 {
        match category {
            ResourceCategory::ConstantBuffer => self.num_cbvs,
            ResourceCategory::ShaderResourceView => self.num_srvs,
            ResourceCategory::UnorderedAccessView => self.num_uavs,
            ResourceCategory::Sampler => self.num_samplers,
        }
    }

    /// Returns the sum of the resource-heap categories (CBV + SRV + UAV).
    pub const fn resource_descriptors(&self) -> u32 {
        self.num_cbvs + self.num_srvs + self.num_uavs
    }
}

/// Reflection summary of one compiled shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderResourceCount {
    /// Descriptor counts per category.
    pub ranges: ShaderResourceRange,
    /// Number of inline 32-bit root constants.
    pub num_32bit_constants: u32,
}

impl ShaderResourceCount {
    /// Builds a count from the four descriptor categories.
    pub const fn new(num_cbvs: u32, num_srvs: u32, num_uavs: u32, num_samplers: u32) -> Self {
        Self {
            ranges: ShaderResourceRange {
                num_cbvs,
                num_srvs,
                num_uavs,
                num_samplers,
            },
            num_32bit_constants: 0,
        }
    }

    /// Sets the number of root constants.
    #[must_use]
    pub const fn with_constants(mut self, num_32bit_constants: u32) -> Self {
        self.num_32bit_constants = num_32bit_constants;
        self
    }
}
