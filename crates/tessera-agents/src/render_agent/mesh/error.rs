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

//! Error types of the mesh component.

use std::fmt;

use tessera_core::renderer::{Channel, ProgramId, ResourceError};
use tessera_lanes::mesh_lane::InputFormatError;
use thiserror::Error;

/// The lifecycle state of a [`GpuMesh`](super::GpuMesh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshState {
    /// Buffer objects exist but hold no data.
    Constructed,
    /// An upload has started; it either completes or leaves the mesh here.
    Uploading,
    /// Data is on the device; binding states can be created and draws issued.
    Ready,
    /// Every device resource has been deleted.
    Released,
}

impl fmt::Display for MeshState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MeshState::Constructed => "constructed",
            MeshState::Uploading => "uploading",
            MeshState::Ready => "ready",
            MeshState::Released => "released",
        })
    }
}

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The mesh is not in a state that allows the operation.
    WrongState(MeshState),
    /// A binding state already exists for this program.
    AlreadyBound(ProgramId),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::WrongState(state) => write!(f, "the mesh is {state}"),
            Violation::AlreadyBound(program) => {
                write!(f, "program {} already has a binding state", program.0)
            }
        }
    }
}

/// Failures of the GPU buffer set.
#[derive(Debug, Error)]
pub enum UploadError {
    /// More vertices than a 16-bit index can address.
    #[error("{vertex_count} vertices exceed the 16-bit index range (at most 65535)")]
    IndexOverflow {
        /// Number of resolved vertices.
        vertex_count: usize,
    },

    /// The device refused to create or fill the buffer of a channel.
    #[error("device rejected the {channel} buffer: {source}")]
    Device {
        /// The channel whose buffer failed.
        channel: Channel,
        /// The device error.
        #[source]
        source: ResourceError,
    },

    /// The device refused to create or fill the index buffer.
    #[error("device rejected the index buffer: {0}")]
    IndexBufferRejected(#[source] ResourceError),
}

/// Failures of the attribute binding state.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The device could not create a vertex-array object.
    #[error("device could not create a vertex array: {0}")]
    VertexArray(#[source] ResourceError),
}

/// Errors surfaced by [`GpuMesh`](super::GpuMesh) operations.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The face list could not be resolved.
    #[error("composite index resolver: {0}")]
    InputFormat(#[from] InputFormatError),

    /// Buffer creation or upload failed.
    #[error("gpu buffer set: {0}")]
    Upload(#[from] UploadError),

    /// A binding state could not be created.
    #[error("attribute binding state: {0}")]
    Binding(#[from] BindingError),

    /// The operation is not valid right now.
    #[error("{operation} refused: {reason}")]
    PreconditionViolation {
        /// The refused operation.
        operation: &'static str,
        /// Why it was refused.
        reason: Violation,
    },
}

impl MeshError {
    pub(crate) fn wrong_state(operation: &'static str, state: MeshState) -> Self {
        MeshError::PreconditionViolation {
            operation,
            reason: Violation::WrongState(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_component() {
        let err = MeshError::from(InputFormatError::EmptyCorner);
        assert_eq!(err.to_string(), "composite index resolver: empty composite index");

        let err = MeshError::from(UploadError::IndexOverflow {
            vertex_count: 65536,
        });
        assert!(err.to_string().starts_with("gpu buffer set: 65536 vertices"));

        let err = MeshError::wrong_state("draw", MeshState::Released);
        assert_eq!(err.to_string(), "draw refused: the mesh is released");
    }
}
