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

//! How many descriptors each shader stage needs.

use dxr_core::rhi::{
    ResourceBindingTier, ResourceCategory, RootSignature, ShaderResourceRange, ShaderStage,
};

/// The resource ranges reflected from the shaders of the bound pipelines.
///
/// Graphics stages are written when a graphics pipeline is set and the compute
/// stage when a compute pipeline is set, so both kinds of pipeline can be
/// bound at the same time without clobbering each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageResourceCounts {
    ranges: [ShaderResourceRange; ShaderStage::COUNT],
}

impl StageResourceCounts {
    /// All stages empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the ranges used by the shader bound to `stage`.
    pub fn set(&mut self, stage: ShaderStage, range: ShaderResourceRange) {
        self.ranges[stage.index()] = range;
    }

    /// The ranges recorded for `stage`.
    pub fn get(&self, stage: ShaderStage) -> ShaderResourceRange {
        self.ranges[stage.index()]
    }

    /// Zeroes every stage.
    pub fn clear(&mut self) {
        self.ranges = [ShaderResourceRange::default(); ShaderStage::COUNT];
    }

    /// Number of descriptors to copy for `(stage, category)`.
    ///
    /// Tier 1 hardware reads every descriptor a root-signature table declares,
    /// so the table is filled to its full size there. Higher tiers only need
    /// what the shader uses.
    pub fn count(
        &self,
        stage: ShaderStage,
        category: ResourceCategory,
        root_signature: &RootSignature,
        tier: ResourceBindingTier,
    ) -> u32 {
        match tier {
            ResourceBindingTier::Tier1 => root_signature.max_resource_count(stage, category),
            ResourceBindingTier::Tier2 | ResourceBindingTier::Tier3 => {
                self.ranges[stage.index()].count(category)
            }
        }
    }
}
