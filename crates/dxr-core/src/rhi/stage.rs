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

//! Shader stages that can have resources bound to them.

use crate::dxr_bitflags;

/// A pipeline stage with its own resource binding tables.
///
/// The discriminants are contiguous so a stage range can be walked by
/// incrementing the index. [`ShaderStage::Compute`] comes first and doubles as
/// the "all stages" visibility used by compute root signatures, followed by the
/// graphics stages in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ShaderStage {
    /// The compute stage (root signature visibility "all").
    Compute = 0,
    /// The vertex shader stage.
    Vertex = 1,
    /// The hull (tessellation control) stage.
    Hull = 2,
    /// The domain (tessellation evaluation) stage.
    Domain = 3,
    /// The geometry shader stage.
    Geometry = 4,
    /// The pixel shader stage.
    Pixel = 5,
}

impl ShaderStage {
    /// Alias of [`ShaderStage::Compute`] for tables visible to every stage.
    pub const ALL: Self = Self::Compute;
    /// Number of stages with their own binding tables.
    pub const COUNT: usize = 6;
    /// First stage of the graphics range.
    pub const GRAPHICS_FIRST: Self = Self::Vertex;
    /// Last stage of the graphics range.
    pub const GRAPHICS_LAST: Self = Self::Pixel;

    const STAGES: [Self; Self::COUNT] = [
        Self::Compute,
        Self::Vertex,
        Self::Hull,
        Self::Domain,
        Self::Geometry,
        Self::Pixel,
    ];

    /// Returns the table index of this stage.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the stage stored at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::STAGES.get(index).copied()
    }

    /// Iterates the contiguous, inclusive range `start..=end`.
    ///
    /// An inverted range yields nothing.
    pub fn range(start: Self, end: Self) -> impl Iterator<Item = Self> + Clone {
        Self::STAGES[start.index()..]
            .iter()
            .copied()
            .take_while(move |stage| *stage <= end)
    }

    /// Iterates every graphics stage from vertex to pixel.
    pub fn graphics() -> impl Iterator<Item = Self> + Clone {
        Self::range(Self::GRAPHICS_FIRST, Self::GRAPHICS_LAST)
    }

    /// Returns `true` for stages that belong to the graphics pipeline.
    pub const fn is_graphics(self) -> bool {
        !matches!(self, Self::Compute)
    }
}

dxr_bitflags! {
    /// A set of shader stages, one bit per [`ShaderStage`].
    pub struct StageMask: u8 {
        /// The compute stage.
        const COMPUTE = 1 << 0;
        /// The vertex stage.
        const VERTEX = 1 << 1;
        /// The hull stage.
        const HULL = 1 << 2;
        /// The domain stage.
        const DOMAIN = 1 << 3;
        /// The geometry stage.
        const GEOMETRY = 1 << 4;
        /// The pixel stage.
        const PIXEL = 1 << 5;
        /// Every graphics stage.
        const GRAPHICS = 0b0011_1110;
        /// Every stage.
        const ALL = 0b0011_1111;
    }
}

impl StageMask {
    /// Returns the mask containing only `stage`.
    pub const fn from_stage(stage: ShaderStage) -> Self {
        Self::from_bits_retain(1 << stage as u8)
    }

    /// Returns `true` if `stage` is part of the mask.
    pub const fn has_stage(&self, stage: ShaderStage) -> bool {
        self.contains(Self::from_stage(stage))
    }

    /// Iterates the stages contained in the mask, in index order.
    pub fn stages(self) -> impl Iterator<Item = ShaderStage> {
        ShaderStage::range(ShaderStage::Compute, ShaderStage::Pixel)
            .filter(move |stage| self.has_stage(*stage))
    }
}

impl From<ShaderStage> for StageMask {
    fn from(stage: ShaderStage) -> Self {
        Self::from_stage(stage)
    }
}
