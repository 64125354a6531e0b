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

//! Root signatures and pipeline-state objects.
//!
//! Pipeline states are immutable once built. Whoever creates them (usually a
//! pipeline cache) owns them through an [`Arc`]; the binding cache only keeps
//! a weak reference plus the data it derives at bind time.

use std::sync::Arc;

use super::resource::{ResourceCategory, ShaderResourceCount, ShaderResourceRange};
use super::stage::ShaderStage;

/// An opaque handle to a native pipeline-state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineStateHandle(pub u64);

/// An opaque handle to a native root signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootSignatureHandle(pub u64);

/// How the input assembler interprets the vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// No topology has been set.
    #[default]
    Undefined,
    /// A list of points.
    PointList,
    /// A list of lines.
    LineList,
    /// A strip of connected lines.
    LineStrip,
    /// A list of triangles.
    TriangleList,
    /// A strip of connected triangles.
    TriangleStrip,
}

/// The root-constant parameter of a root signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootConstants {
    /// Root parameter index of the constants.
    pub parameter_index: u32,
    /// Number of 32-bit values reserved.
    pub num_32bit_values: u32,
}

/// Describes the layout of a root signature: one optional descriptor table per
/// (stage, category) pair and an optional block of inline constants.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RootSignatureDesc {
    parameter_indices: [[Option<u32>; ResourceCategory::COUNT]; ShaderStage::COUNT],
    max_resource_counts: [ShaderResourceRange; ShaderStage::COUNT],
    constants: Option<RootConstants>,
}

impl RootSignatureDesc {
    /// An empty layout with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a descriptor table for `(stage, category)` holding up to `max_count` descriptors.
    #[must_use]
    pub fn with_table(
        mut self,
        stage: ShaderStage,
        category: ResourceCategory,
        parameter_index: u32,
        max_count: u32,
    ) -> Self {
        self.parameter_indices[stage.index()][category.index()] = Some(parameter_index);
        let range = &mut self.max_resource_counts[stage.index()];
        match category {
            ResourceCategory::ConstantBuffer => range.num_cbvs = max_count,
            ResourceCategory::ShaderResourceView => range.num_srvs = max_count,
            ResourceCategory::UnorderedAccessView => range.num_uavs = max_count,
            ResourceCategory::Sampler => range.num_samplers = max_count,
        }
        self
    }

    /// Declares the inline 32-bit constants parameter.
    #[must_use]
    pub fn with_constants(mut self, parameter_index: u32, num_32bit_values: u32) -> Self {
        self.constants = Some(RootConstants {
            parameter_index,
            num_32bit_values,
        });
        self
    }

    /// The layout used for graphics pipelines: root constants at parameter 0,
    /// then a CBV, SRV, UAV and sampler table for every graphics stage.
    pub fn graphics_default(descriptors_per_table: u32, num_32bit_constants: u32) -> Self {
        Self::standard_layout(
            ShaderStage::graphics(),
            descriptors_per_table,
            num_32bit_constants,
        )
    }

    /// The layout used for compute pipelines: root constants at parameter 0,
    /// then one table per category with "all" visibility.
    pub fn compute_default(descriptors_per_table: u32, num_32bit_constants: u32) -> Self {
        Self::standard_layout(
            ShaderStage::range(ShaderStage::ALL, ShaderStage::ALL),
            descriptors_per_table,
            num_32bit_constants,
        )
    }

    fn standard_layout(
        stages: impl Iterator<Item = ShaderStage>,
        descriptors_per_table: u32,
        num_32bit_constants: u32,
    ) -> Self {
        let mut desc = Self::new().with_constants(0, num_32bit_constants);
        let mut parameter_index = 1;
        for stage in stages {
            for category in ResourceCategory::ALL {
                desc = desc.with_table(stage, category, parameter_index, descriptors_per_table);
                parameter_index += 1;
            }
        }
        desc
    }
}

/// A compiled root signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSignature {
    handle: RootSignatureHandle,
    desc: RootSignatureDesc,
}

impl RootSignature {
    /// Wraps a native root signature with its layout.
    pub fn new(handle: RootSignatureHandle, desc: RootSignatureDesc) -> Self {
        Self { handle, desc }
    }

    /// The native handle passed to the command list.
    pub fn handle(&self) -> RootSignatureHandle {
        self.handle
    }

    /// The root parameter index of the table for `(stage, category)`, if declared.
    pub fn root_parameter_index(
        &self,
        stage: ShaderStage,
        category: ResourceCategory,
    ) -> Option<u32> {
        self.desc.parameter_indices[stage.index()][category.index()]
    }

    /// The maximum number of descriptors the table for `(stage, category)` can address.
    pub fn max_resource_count(&self, stage: ShaderStage, category: ResourceCategory) -> u32 {
        self.desc.max_resource_counts[stage.index()].count(category)
    }

    /// The inline constants parameter, if declared.
    pub fn constants(&self) -> Option<RootConstants> {
        self.desc.constants
    }
}

/// A graphics pipeline-state object and the reflection data of its shaders.
#[derive(Debug)]
pub struct GraphicsPipelineState {
    handle: PipelineStateHandle,
    root_signature: Arc<RootSignature>,
    topology: PrimitiveTopology,
    shaders: [Option<ShaderResourceCount>; ShaderStage::COUNT],
}

impl GraphicsPipelineState {
    /// Creates a pipeline with no shader stages attached yet.
    pub fn new(
        handle: PipelineStateHandle,
        root_signature: Arc<RootSignature>,
        topology: PrimitiveTopology,
    ) -> Self {
        Self {
            handle,
            root_signature,
            topology,
            shaders: [None; ShaderStage::COUNT],
        }
    }

    /// Attaches the reflection data of the shader bound to `stage`.
    ///
    /// # Panics
    ///
    /// Panics if `stage` is not a graphics stage.
    #[must_use]
    pub fn with_shader(mut self, stage: ShaderStage, resources: ShaderResourceCount) -> Self {
        assert!(
            stage.is_graphics(),
            "{stage:?} is not a graphics shader stage"
        );
        self.shaders[stage.index()] = Some(resources);
        self
    }

    /// The native pipeline handle.
    pub fn handle(&self) -> PipelineStateHandle {
        self.handle
    }

    /// The root signature the pipeline was compiled against.
    pub fn root_signature(&self) -> &Arc<RootSignature> {
        &self.root_signature
    }

    /// The primitive topology used by draws with this pipeline.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Reflection data of the shader bound to `stage`, if there is one.
    pub fn shader(&self, stage: ShaderStage) -> Option<&ShaderResourceCount> {
        self.shaders[stage.index()].as_ref()
    }
}

/// A compute pipeline-state object and the reflection data of its shader.
#[derive(Debug)]
pub struct ComputePipelineState {
    handle: PipelineStateHandle,
    root_signature: Arc<RootSignature>,
    shader: ShaderResourceCount,
}

impl ComputePipelineState {
    /// Creates a compute pipeline.
    pub fn new(
        handle: PipelineStateHandle,
        root_signature: Arc<RootSignature>,
        shader: ShaderResourceCount,
    ) -> Self {
        Self {
            handle,
            root_signature,
            shader,
        }
    }

    /// The native pipeline handle.
    pub fn handle(&self) -> PipelineStateHandle {
        self.handle
    }

    /// The root signature the pipeline was compiled against.
    pub fn root_signature(&self) -> &Arc<RootSignature> {
        &self.root_signature
    }

    /// Reflection data of the compute shader.
    pub fn shader(&self) -> &ShaderResourceCount {
        &self.shader
    }
}
