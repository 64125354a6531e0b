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

//! Fixed-function state: render targets, rasterizer rectangles, and input buffers.

use bytemuck::{Pod, Zeroable};

/// An opaque handle to a render target view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetView(pub u32);

/// An opaque handle to a depth-stencil view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilView(pub u32);

/// An opaque handle to a texture, used for the shading-rate image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A rasterizer viewport. Laid out like `D3D12_VIEWPORT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Minimum depth of the viewport.
    pub min_depth: f32,
    /// Maximum depth of the viewport.
    pub max_depth: f32,
}

impl Viewport {
    /// A viewport covering `width` x `height` with the full depth range.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// A scissor rectangle in pixels. Laid out like `D3D12_RECT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct ScissorRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    #[default]
    Uint32,
}

/// A vertex buffer as seen by the input assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexBufferView {
    /// GPU virtual address of the first byte.
    pub location: u64,
    /// Size of the bound range in bytes.
    pub size_in_bytes: u32,
    /// Distance between consecutive vertices.
    pub stride_in_bytes: u32,
}

/// An index buffer as seen by the input assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexBufferView {
    /// GPU virtual address of the first byte.
    pub location: u64,
    /// Size of the bound range in bytes.
    pub size_in_bytes: u32,
    /// Index element type.
    pub format: IndexFormat,
}

/// Coarse pixel shading rate for variable-rate shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShadingRate {
    /// One invocation per pixel.
    #[default]
    Rate1x1,
    /// One invocation per 1x2 pixels.
    Rate1x2,
    /// One invocation per 2x1 pixels.
    Rate2x1,
    /// One invocation per 2x2 pixels.
    Rate2x2,
    /// One invocation per 2x4 pixels.
    Rate2x4,
    /// One invocation per 4x2 pixels.
    Rate4x2,
    /// One invocation per 4x4 pixels.
    Rate4x4,
}
