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

//! Recorded device activity.

use std::collections::BTreeMap;

use tessera_core::renderer::{
    AttributeLocation, BufferId, BufferTarget, BufferUsage, IndexFormat, PrimitiveTopology,
    VertexArrayId, VertexAttributeDescriptor,
};

/// One call made on a [`HeadlessDevice`](super::HeadlessDevice), in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    CreateBuffer(BufferId),
    BindBuffer(BufferTarget, Option<BufferId>),
    BufferData {
        target: BufferTarget,
        len: usize,
        usage: BufferUsage,
    },
    IsBuffer(BufferId),
    DeleteBuffer(BufferId),
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    IsVertexArray(VertexArrayId),
    DeleteVertexArray(VertexArrayId),
    EnableVertexAttribute(AttributeLocation),
    DisableVertexAttribute(AttributeLocation),
    VertexAttributePointer(AttributeLocation, VertexAttributeDescriptor),
    DrawElements {
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u64,
    },
    DrawArrays {
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    },
}

impl DeviceCall {
    /// Whether the call creates or destroys a resource.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            DeviceCall::CreateBuffer(_)
                | DeviceCall::DeleteBuffer(_)
                | DeviceCall::CreateVertexArray(_)
                | DeviceCall::DeleteVertexArray(_)
        )
    }
}

/// The kind of draw that produced a [`DrawRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// An indexed draw.
    Elements {
        /// Primitive assembly mode.
        topology: PrimitiveTopology,
        /// Number of indices read.
        count: u32,
        /// Index type.
        format: IndexFormat,
    },
    /// A non-indexed draw.
    Arrays {
        /// Primitive assembly mode.
        topology: PrimitiveTopology,
        /// First vertex.
        first: u32,
        /// Number of vertices.
        count: u32,
    },
}

/// An enabled attribute as seen by a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundAttribute {
    /// The attribute slot.
    pub location: AttributeLocation,
    /// The buffer the attribute reads from.
    pub buffer: BufferId,
    /// How the attribute reads it.
    pub descriptor: VertexAttributeDescriptor,
}

/// Everything a draw consumed, captured at the moment it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// The draw call itself.
    pub kind: DrawKind,
    /// The vertex array bound during the draw; `None` for the default state.
    pub vertex_array: Option<VertexArrayId>,
    /// Enabled attributes, ordered by location.
    pub attributes: Vec<BoundAttribute>,
    /// The element buffer in effect, for indexed draws.
    pub element_buffer: Option<BufferId>,
    /// The vertex indices fetched, in draw order.
    pub fetched: Vec<u32>,
    /// Values fed to each attribute slot, concatenated over all fetched
    /// vertices. Normalized formats are already converted to `[0, 1]`.
    pub assembled: BTreeMap<AttributeLocation, Vec<f32>>,
    /// Why the draw could not be fully assembled, if it could not.
    pub fault: Option<String>,
}

impl DrawRecord {
    /// The values delivered to `location`, if that slot was enabled.
    pub fn values(&self, location: u32) -> Option<&[f32]> {
        self.assembled
            .get(&AttributeLocation(location))
            .map(Vec::as_slice)
    }
}

/// Binding state that must be untouched between mesh operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientState {
    /// The buffer bound to the array target.
    pub array_buffer: Option<BufferId>,
    /// The bound vertex array.
    pub vertex_array: Option<VertexArrayId>,
    /// The element buffer of the default vertex-array state.
    pub element_buffer: Option<BufferId>,
    /// Attributes enabled in the default vertex-array state.
    pub enabled_attributes: Vec<AttributeLocation>,
}

impl AmbientState {
    /// Whether nothing is bound or enabled.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}
