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

//! Backend-agnostic rendering API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`buffer`]**: Buffer handles, bind targets and usage hints.
//! - **[`vertex`]**: Vertex-array handles, attribute locations and vertex formats.
//! - **[`program`]**: Shader-program identity and per-channel attribute slots.
//! - **[`capabilities`]**: The capability descriptor of a device context.
//! - **[`scene`]**: CPU-side mesh data (channels, streams, composite indices).
//! - **[`util`]**: Generic rendering enums.

pub mod buffer;
pub mod capabilities;
pub mod program;
pub mod scene;
pub mod util;
pub mod vertex;

pub use self::buffer::{BufferId, BufferTarget, BufferUsage};
pub use self::capabilities::DeviceCapabilities;
pub use self::program::{AttributeNames, AttributeSlots, ProgramId};
pub use self::scene::{AttributeStream, Channel, CompositeIndex, MeshData, MeshDataError};
pub use self::util::{IndexFormat, PrimitiveTopology};
pub use self::vertex::{AttributeLocation, VertexArrayId, VertexAttributeDescriptor, VertexFormat};
