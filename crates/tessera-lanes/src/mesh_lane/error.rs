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

use thiserror::Error;

use tessera_core::renderer::Channel;

/// Errors raised while parsing or resolving composite-index input.
///
/// All of them are fatal to a mesh upload; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputFormatError {
    /// A corner string was empty.
    #[error("empty composite index")]
    EmptyCorner,

    /// A component was not a decimal integer.
    #[error("composite index '{corner}' has a non-numeric component '{component}'")]
    InvalidComponent {
        /// The offending corner string.
        corner: String,
        /// The offending component.
        component: String,
    },

    /// A component was zero, but external indices start at one.
    #[error("composite index '{corner}' contains 0, indices are 1-based")]
    ZeroIndex {
        /// The offending corner string.
        corner: String,
    },

    /// A composite layout named the same channel twice.
    #[error("composite layout lists channel '{0}' more than once")]
    DuplicateChannel(Channel),

    /// A face corner has no component for a channel the mesh carries.
    #[error("face corner {corner} has no {channel} component")]
    MissingComponent {
        /// Position of the corner in the face list.
        corner: usize,
        /// The channel without a component.
        channel: Channel,
    },

    /// A face corner references a vertex past the end of a stream.
    #[error(
        "face corner {corner} references {channel} vertex {vertex} (0-based) but the stream holds {available}"
    )]
    OutOfRange {
        /// Position of the corner in the face list.
        corner: usize,
        /// The channel whose stream is too short.
        channel: Channel,
        /// The referenced 0-based vertex.
        vertex: u32,
        /// Number of vertices in the stream.
        available: usize,
    },

    /// A non-indexed mesh carries a stream whose vertex count differs from
    /// the position stream's.
    #[error("{channel} stream holds {vertices} vertices but the position stream holds {expected}")]
    StreamLengthMismatch {
        /// The channel whose stream has the wrong length.
        channel: Channel,
        /// Number of vertices in that stream.
        vertices: usize,
        /// Number of vertices in the position stream.
        expected: usize,
    },
}
