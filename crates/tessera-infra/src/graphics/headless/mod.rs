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

//! A device context without a GPU.
//!
//! [`HeadlessDevice`] keeps the same binding state an OpenGL context would
//! (array buffer, per-vertex-array element buffer and attribute pointers), so
//! it reacts to a call sequence the way a driver does. Every call is recorded,
//! and every draw is assembled on the CPU into a [`DrawRecord`].

mod device;
mod program;
mod trace;

pub use device::HeadlessDevice;
pub use program::StaticProgram;
pub use trace::*;
