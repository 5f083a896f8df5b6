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

//! Defines data structures for CPU-side mesh representation.
//!
//! A mesh is stored as one [`AttributeStream`] per [`Channel`] (struct-of-arrays)
//! plus an optional face list of [`CompositeIndex`] values. Each composite index
//! references one vertex per channel independently, the way OBJ faces reference
//! positions, texture coordinates and normals through separate indices.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::renderer::api::vertex::VertexFormat;

/// A semantic vertex attribute category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Vertex position, three floats.
    Position,
    /// Vertex color, three bytes normalized to `[0, 1]`.
    Color,
    /// Texture coordinates, two floats.
    TexCoord,
    /// Vertex normal, three floats.
    Normal,
    /// Tangent, three floats.
    Tangent,
    /// Bitangent, three floats.
    Bitangent,
}

impl Channel {
    /// Number of channels.
    pub const COUNT: usize = 6;

    /// Every channel, in buffer order.
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Position,
        Channel::Color,
        Channel::TexCoord,
        Channel::Normal,
        Channel::Tangent,
        Channel::Bitangent,
    ];

    /// A dense index in `0..COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of scalar components per vertex.
    pub fn arity(self) -> usize {
        self.vertex_format().components() as usize
    }

    /// The GPU format of one element of this channel.
    pub fn vertex_format(self) -> VertexFormat {
        match self {
            Channel::Color => VertexFormat::Unorm8x3,
            Channel::TexCoord => VertexFormat::Float32x2,
            Channel::Position | Channel::Normal | Channel::Tangent | Channel::Bitangent => {
                VertexFormat::Float32x3
            }
        }
    }

    /// A short lowercase name, used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Position => "position",
            Channel::Color => "color",
            Channel::TexCoord => "tex_coord",
            Channel::Normal => "normal",
            Channel::Tangent => "tangent",
            Channel::Bitangent => "bitangent",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered sequence of scalar components for one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeStream {
    /// 32-bit float components.
    F32(Vec<f32>),
    /// Unsigned byte components.
    U8(Vec<u8>),
}

impl AttributeStream {
    /// Number of scalar components.
    pub fn len(&self) -> usize {
        match self {
            AttributeStream::F32(data) => data.len(),
            AttributeStream::U8(data) => data.len(),
        }
    }

    /// Whether the stream holds no components.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AttributeStream::F32(data) => bytemuck::cast_slice(data),
            AttributeStream::U8(data) => data,
        }
    }

    /// Builds a new stream by copying, for each entry of `vertices`, the
    /// `arity`-wide tuple at that vertex.
    ///
    /// Every vertex must be in range; callers validate before gathering.
    pub fn gather(&self, arity: usize, vertices: &[u32]) -> AttributeStream {
        fn gather_slice<T: Copy>(data: &[T], arity: usize, vertices: &[u32]) -> Vec<T> {
            let mut out = Vec::with_capacity(vertices.len() * arity);
            for &vertex in vertices {
                let start = vertex as usize * arity;
                out.extend_from_slice(&data[start..start + arity]);
            }
            out
        }

        match self {
            AttributeStream::F32(data) => {
                AttributeStream::F32(gather_slice(data, arity, vertices))
            }
            AttributeStream::U8(data) => AttributeStream::U8(gather_slice(data, arity, vertices)),
        }
    }

    fn matches(&self, format: VertexFormat) -> bool {
        match self {
            AttributeStream::F32(_) => format.component_size() == 4,
            AttributeStream::U8(_) => format.component_size() == 1,
        }
    }
}

/// A face-corner reference: one optional 0-based vertex per channel.
///
/// The external 1-based, `/`-delimited form is parsed once by the loaders;
/// the resolver only ever sees this fixed-arity struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CompositeIndex {
    components: [Option<u32>; Channel::COUNT],
}

impl CompositeIndex {
    /// A composite index referencing nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 0-based vertex referenced for `channel`.
    pub fn with(mut self, channel: Channel, vertex: u32) -> Self {
        self.components[channel.index()] = Some(vertex);
        self
    }

    /// Sets or clears the component of `channel`.
    pub fn set(&mut self, channel: Channel, vertex: Option<u32>) {
        self.components[channel.index()] = vertex;
    }

    /// The 0-based vertex referenced for `channel`.
    pub fn get(&self, channel: Channel) -> Option<u32> {
        self.components[channel.index()]
    }

    /// Keeps only the components of the given channels.
    ///
    /// Components for channels a mesh does not carry must not split vertices.
    pub fn restricted_to(&self, channels: impl IntoIterator<Item = Channel>) -> Self {
        let mut restricted = Self::new();
        for channel in channels {
            restricted.set(channel, self.get(channel));
        }
        restricted
    }
}

/// Errors raised while assembling a [`MeshData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshDataError {
    /// The stream's component type does not match the channel's format.
    WrongComponentType {
        /// The offending channel.
        channel: Channel,
    },
    /// The stream length is not a multiple of the channel arity.
    RaggedStream {
        /// The offending channel.
        channel: Channel,
        /// Number of components supplied.
        len: usize,
    },
}

impl fmt::Display for MeshDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshDataError::WrongComponentType { channel } => {
                write!(f, "Stream for channel '{channel}' has the wrong component type")
            }
            MeshDataError::RaggedStream { channel, len } => write!(
                f,
                "Stream for channel '{channel}' has {len} components, not a multiple of {}",
                channel.arity()
            ),
        }
    }
}

impl std::error::Error for MeshDataError {}

/// Raw attribute streams plus an optional composite-index face list.
///
/// The position stream is mandatory; every other channel is optional. Without
/// faces the streams are drawn as a plain triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    label: Option<String>,
    streams: BTreeMap<Channel, AttributeStream>,
    faces: Vec<CompositeIndex>,
}

impl MeshData {
    /// Creates mesh data from a position stream (three floats per vertex).
    pub fn new(positions: Vec<f32>) -> Result<Self, MeshDataError> {
        Self {
            label: None,
            streams: BTreeMap::new(),
            faces: Vec::new(),
        }
        .with_stream(Channel::Position, AttributeStream::F32(positions))
    }

    /// Adds or replaces the stream of `channel`.
    pub fn with_stream(
        mut self,
        channel: Channel,
        stream: AttributeStream,
    ) -> Result<Self, MeshDataError> {
        if !stream.matches(channel.vertex_format()) {
            return Err(MeshDataError::WrongComponentType { channel });
        }
        if stream.len() % channel.arity() != 0 {
            return Err(MeshDataError::RaggedStream {
                channel,
                len: stream.len(),
            });
        }
        self.streams.insert(channel, stream);
        Ok(self)
    }

    /// Adds a color stream (three bytes per vertex).
    pub fn with_colors(self, colors: Vec<u8>) -> Result<Self, MeshDataError> {
        self.with_stream(Channel::Color, AttributeStream::U8(colors))
    }

    /// Adds a texture-coordinate stream (two floats per vertex).
    pub fn with_tex_coords(self, tex_coords: Vec<f32>) -> Result<Self, MeshDataError> {
        self.with_stream(Channel::TexCoord, AttributeStream::F32(tex_coords))
    }

    /// Adds a normal stream (three floats per vertex).
    pub fn with_normals(self, normals: Vec<f32>) -> Result<Self, MeshDataError> {
        self.with_stream(Channel::Normal, AttributeStream::F32(normals))
    }

    /// Adds a tangent stream (three floats per vertex).
    pub fn with_tangents(self, tangents: Vec<f32>) -> Result<Self, MeshDataError> {
        self.with_stream(Channel::Tangent, AttributeStream::F32(tangents))
    }

    /// Adds a bitangent stream (three floats per vertex).
    pub fn with_bitangents(self, bitangents: Vec<f32>) -> Result<Self, MeshDataError> {
        self.with_stream(Channel::Bitangent, AttributeStream::F32(bitangents))
    }

    /// Sets the face list.
    pub fn with_faces(mut self, faces: Vec<CompositeIndex>) -> Self {
        self.faces = faces;
        self
    }

    /// Sets a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The debug label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The stream of `channel`, if present.
    pub fn stream(&self, channel: Channel) -> Option<&AttributeStream> {
        self.streams.get(&channel)
    }

    /// All present streams, in channel order.
    pub fn streams(&self) -> &BTreeMap<Channel, AttributeStream> {
        &self.streams
    }

    /// The channels this mesh carries, in channel order.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.streams.keys().copied()
    }

    /// Number of raw vertices in the stream of `channel` (0 when absent).
    pub fn vertex_count(&self, channel: Channel) -> usize {
        self.stream(channel)
            .map_or(0, |stream| stream.len() / channel.arity())
    }

    /// The face list; empty for non-indexed meshes.
    pub fn faces(&self) -> &[CompositeIndex] {
        &self.faces
    }

    /// Whether the mesh is drawn through an index buffer.
    pub fn is_indexed(&self) -> bool {
        !self.faces.is_empty()
    }
}
