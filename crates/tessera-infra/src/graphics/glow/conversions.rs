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

use tessera_core::renderer::{
    BufferTarget, BufferUsage, IndexFormat, PrimitiveTopology, ResourceError, VertexFormat,
};

/// A local extension trait to convert Tessera's types into GL enums.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_gl()` syntax.
pub trait IntoGl<T> {
    /// Consumes self and converts it into a GL-compatible value.
    fn into_gl(self) -> T;
}

impl IntoGl<u32> for BufferTarget {
    fn into_gl(self) -> u32 {
        match self {
            BufferTarget::Array => glow::ARRAY_BUFFER,
            BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

impl IntoGl<u32> for BufferUsage {
    fn into_gl(self) -> u32 {
        match self {
            BufferUsage::StaticDraw => glow::STATIC_DRAW,
            BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
            BufferUsage::StreamDraw => glow::STREAM_DRAW,
        }
    }
}

impl IntoGl<u32> for PrimitiveTopology {
    fn into_gl(self) -> u32 {
        match self {
            PrimitiveTopology::PointList => glow::POINTS,
            PrimitiveTopology::LineList => glow::LINES,
            PrimitiveTopology::LineStrip => glow::LINE_STRIP,
            PrimitiveTopology::TriangleList => glow::TRIANGLES,
            PrimitiveTopology::TriangleStrip => glow::TRIANGLE_STRIP,
        }
    }
}

impl IntoGl<u32> for IndexFormat {
    fn into_gl(self) -> u32 {
        match self {
            IndexFormat::Uint16 => glow::UNSIGNED_SHORT,
            IndexFormat::Uint32 => glow::UNSIGNED_INT,
        }
    }
}

/// The `(size, type, normalized)` triple of `glVertexAttribPointer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlAttributeFormat {
    pub size: i32,
    pub data_type: u32,
    pub normalized: bool,
}

impl IntoGl<GlAttributeFormat> for VertexFormat {
    fn into_gl(self) -> GlAttributeFormat {
        let data_type = match self {
            VertexFormat::Float32x2 | VertexFormat::Float32x3 => glow::FLOAT,
            VertexFormat::Unorm8x3 => glow::UNSIGNED_BYTE,
        };
        GlAttributeFormat {
            size: self.components() as i32,
            data_type,
            normalized: self.is_normalized(),
        }
    }
}

/// Maps a `glGetError` code to a resource error; `None` for `GL_NO_ERROR`.
pub fn resource_error_from_gl(code: u32) -> Option<ResourceError> {
    match code {
        glow::NO_ERROR => None,
        glow::OUT_OF_MEMORY => Some(ResourceError::OutOfMemory),
        glow::CONTEXT_LOST => Some(ResourceError::ContextLost),
        other => Some(ResourceError::BackendError(format!("GL error 0x{other:04X}"))),
    }
}
