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

//! The mesh component.
//!
//! - [`GpuBufferSet`]: the device buffers of one mesh and their one-time upload.
//! - [`BindingStates`]: per-program attribute setup, native or immediate.
//! - [`GpuMesh`]: the facade composing both with the composite-index resolver.

mod binding_state;
mod buffer_set;
mod error;
mod gpu_mesh;

pub use binding_state::{BindingState, BindingStates};
pub use buffer_set::{GpuBufferSet, MAX_VERTICES};
pub use error::{BindingError, MeshError, MeshState, UploadError, Violation};
pub use gpu_mesh::GpuMesh;
