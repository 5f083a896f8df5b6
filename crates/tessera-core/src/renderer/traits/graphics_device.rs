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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The device-context interface meshes are built on.
///
/// The contract follows a bind-then-operate model: buffer data and attribute
/// pointers act on whatever is currently bound to the relevant target, and an
/// element-array binding made while a vertex array is bound is captured by that
/// vertex array. Implementations keep their state behind interior mutability;
/// a device is only ever driven from the thread that owns its context.
pub trait GraphicsDevice: Debug {
    /// Reports which optional features this context supports.
    fn capabilities(&self) -> DeviceCapabilities;

    /// Creates a new buffer object.
    /// ## Returns
    /// The handle of the new buffer. It holds no storage until
    /// [`buffer_data`](Self::buffer_data) is called on it.
    /// ## Errors
    /// * `ResourceError` - If the context cannot allocate a buffer object.
    fn create_buffer(&self) -> Result<BufferId, ResourceError>;

    /// Binds `buffer` to `target`, or unbinds the target when `buffer` is `None`.
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>);

    /// Replaces the storage of the buffer bound to `target` with a copy of `data`.
    /// ## Errors
    /// * `ResourceError::NotFound` - If nothing is bound to `target`.
    /// * `ResourceError::ContextLost` or `OutOfMemory` - If the context rejects the upload.
    fn buffer_data(
        &self,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError>;

    /// Whether `buffer` still names a live buffer object in this context.
    fn is_buffer(&self, buffer: BufferId) -> bool;

    /// Deletes a buffer object. Deleting an unknown handle is a no-op.
    fn delete_buffer(&self, buffer: BufferId);

    /// Creates a new vertex-array object.
    /// ## Errors
    /// * `ResourceError::FeatureNotSupported` - If the context has no native vertex arrays.
    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError>;

    /// Binds `vertex_array`, or restores the default vertex-array state when `None`.
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>);

    /// Whether `vertex_array` still names a live vertex-array object.
    fn is_vertex_array(&self, vertex_array: VertexArrayId) -> bool;

    /// Deletes a vertex-array object. Deleting an unknown handle is a no-op.
    fn delete_vertex_array(&self, vertex_array: VertexArrayId);

    /// Enables fetching for the attribute at `location`.
    fn enable_vertex_attribute(&self, location: AttributeLocation);

    /// Disables fetching for the attribute at `location`.
    fn disable_vertex_attribute(&self, location: AttributeLocation);

    /// Points the attribute at `location` into the buffer currently bound to
    /// [`BufferTarget::Array`], using the given layout.
    fn vertex_attribute_pointer(
        &self,
        location: AttributeLocation,
        descriptor: &VertexAttributeDescriptor,
    );

    /// Draws `count` indices from the bound element buffer.
    /// ## Arguments
    /// * `topology` - How vertices are assembled into primitives.
    /// * `count` - The number of indices to read.
    /// * `format` - The type of each index.
    /// * `offset` - Byte offset into the element buffer.
    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u64,
    );

    /// Draws `count` consecutive vertices starting at `first`.
    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32);
}
