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

//! Defines data structures related to GPU buffer resources.

/// The binding point a buffer is attached to.
///
/// Uploads and attribute pointers always act on the buffer currently bound to
/// one of these targets, so callers bind before they upload or describe data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Array,
    /// Index data. While a vertex array is bound, this binding is recorded in it.
    ElementArray,
}

/// A hint describing how often the contents of a buffer will change.
///
/// The driver uses it to place the buffer in the most suitable memory. Mesh
/// buffers in Tessera are written exactly once and use [`BufferUsage::StaticDraw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    #[default]
    StaticDraw,
    /// Rewritten occasionally, drawn many times.
    DynamicDraw,
    /// Written once, drawn a handful of times.
    StreamDraw,
}

/// An opaque handle to a GPU buffer resource.
///
/// This ID is returned by [`GraphicsDevice::create_buffer`] and is used to reference
/// the buffer in all subsequent operations.
///
/// [`GraphicsDevice::create_buffer`]: crate::renderer::GraphicsDevice::create_buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);
