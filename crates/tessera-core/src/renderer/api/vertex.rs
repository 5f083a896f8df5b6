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

//! Vertex-array handles, attribute locations and vertex formats.

use serde::{Deserialize, Serialize};

/// An opaque handle to a native vertex-array object (binding-state object).
///
/// Only devices reporting
/// [`DeviceCapabilities::native_binding_state`](super::DeviceCapabilities::native_binding_state)
/// hand these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexArrayId(pub usize);

/// The index of a vertex attribute slot in a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeLocation(pub u32);

/// The in-memory format of a single vertex attribute element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float32x2,
    /// Three 32-bit floats.
    Float32x3,
    /// Three unsigned bytes, normalized to `[0.0, 1.0]` when read by the shader.
    Unorm8x3,
}

impl VertexFormat {
    /// Number of components per element.
    pub fn components(&self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 2,
            VertexFormat::Float32x3 | VertexFormat::Unorm8x3 => 3,
        }
    }

    /// Size in bytes of one component.
    pub fn component_size(&self) -> u32 {
        match self {
            VertexFormat::Float32x2 | VertexFormat::Float32x3 => 4,
            VertexFormat::Unorm8x3 => 1,
        }
    }

    /// Size in bytes of one element.
    pub fn size(&self) -> u32 {
        self.components() * self.component_size()
    }

    /// Whether integer components are normalized to `[0, 1]` when fetched.
    pub fn is_normalized(&self) -> bool {
        matches!(self, VertexFormat::Unorm8x3)
    }
}

/// Describes how a vertex attribute reads from the currently bound array buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeDescriptor {
    /// Element format.
    pub format: VertexFormat,
    /// Byte distance between consecutive elements; `0` means tightly packed.
    pub stride: u32,
    /// Byte offset of the first element in the buffer.
    pub offset: u64,
}

impl VertexAttributeDescriptor {
    /// A tightly packed attribute starting at the beginning of the buffer.
    pub fn packed(format: VertexFormat) -> Self {
        Self {
            format,
            stride: 0,
            offset: 0,
        }
    }

    /// The effective stride, resolving `0` to the element size.
    pub fn effective_stride(&self) -> u32 {
        if self.stride == 0 {
            self.format.size()
        } else {
            self.stride
        }
    }
}
