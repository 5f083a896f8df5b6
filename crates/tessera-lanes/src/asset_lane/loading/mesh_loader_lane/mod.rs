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

//! Defines lanes for loading mesh data.

mod model_loader_lane;
mod obj_loader_lane;

pub use model_loader_lane::*;
pub use obj_loader_lane::*;

use crate::asset_lane::AssetLoaderLane;
use tessera_core::renderer::MeshData;

/// Common trait for all mesh loaders
pub trait MeshLoaderLane: AssetLoaderLane<MeshData> + Send + Sync + 'static {}

// Implement the trait for all types that implement AssetLoaderLane<MeshData>
impl<T> MeshLoaderLane for T where T: AssetLoaderLane<MeshData> + Send + Sync + 'static {}

/// Picks a loader from a file extension (`obj`, `json` or `ron`).
pub fn loader_for_extension(extension: &str) -> Option<Box<dyn MeshLoaderLane>> {
    match extension.to_ascii_lowercase().as_str() {
        "obj" => Some(Box::new(ObjLoaderLane)),
        "json" | "ron" => Some(Box::new(ModelLoaderLane::default())),
        _ => None,
    }
}
