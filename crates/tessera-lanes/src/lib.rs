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

//! # Tessera Lanes
//!
//! Hot-path CPU work for the mesh pipeline, kept free of any device access:
//!
//! - [`mesh_lane`]: parsing of composite index strings and the composite-index
//!   resolver that turns a face list into deduplicated vertex streams.
//! - [`asset_lane`]: loaders turning model files (JSON/RON model documents and
//!   Wavefront OBJ) into [`MeshData`](tessera_core::renderer::MeshData).

#![warn(missing_docs)]

pub mod asset_lane;
pub mod mesh_lane;
