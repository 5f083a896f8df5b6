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

//! Defines a lane for loading OBJ mesh assets.

use ahash::AHashMap;
use anyhow::Context;
use std::error::Error;
use tessera_core::renderer::{Channel, CompositeIndex, MeshData};

use crate::asset_lane::AssetLoaderLane;

/// Lane for loading Wavefront OBJ meshes.
///
/// Per-attribute indices are kept apart (`v/vt/vn`), so the composite-index
/// resolver performs the vertex deduplication at upload time. Vertex colors
/// (`v x y z r g b`) share the position index.
#[derive(Debug, Clone, Default)]
pub struct ObjLoaderLane;

fn color_to_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl AssetLoaderLane<MeshData> for ObjLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<MeshData, Box<dyn Error + Send + Sync>> {
        let obj_text = std::str::from_utf8(bytes).context("OBJ file is not valid UTF-8")?;

        let (models, _materials) = tobj::load_obj_buf(
            &mut std::io::Cursor::new(obj_text),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: false,
                ..Default::default()
            },
            |_| Ok((Vec::new(), AHashMap::new())),
        )
        .context("Failed to parse OBJ file")?;

        if models.is_empty() {
            return Err("No models found in OBJ file".into());
        }
        if models.len() > 1 {
            log::warn!(
                "ObjLoaderLane: file holds {} models, only '{}' is loaded",
                models.len(),
                models[0].name
            );
        }

        let model = &models[0];
        let mesh = &model.mesh;
        if mesh.positions.is_empty() {
            return Err(format!("OBJ model '{}' has no vertices", model.name).into());
        }
        let has_tex_coords = !mesh.texcoords.is_empty() && !mesh.texcoord_indices.is_empty();
        let has_normals = !mesh.normals.is_empty() && !mesh.normal_indices.is_empty();
        let has_colors = !mesh.vertex_color.is_empty();

        let faces = mesh
            .indices
            .iter()
            .enumerate()
            .map(|(corner, &position)| {
                let mut index = CompositeIndex::new().with(Channel::Position, position);
                if has_tex_coords {
                    index.set(Channel::TexCoord, mesh.texcoord_indices.get(corner).copied());
                }
                if has_normals {
                    index.set(Channel::Normal, mesh.normal_indices.get(corner).copied());
                }
                if has_colors {
                    index.set(Channel::Color, Some(position));
                }
                index
            })
            .collect();

        let mut data = MeshData::new(mesh.positions.clone())?.with_label(model.name.clone());
        if has_tex_coords {
            data = data.with_tex_coords(mesh.texcoords.clone())?;
        }
        if has_normals {
            data = data.with_normals(mesh.normals.clone())?;
        }
        if has_colors {
            data = data.with_colors(mesh.vertex_color.iter().copied().map(color_to_unorm8).collect())?;
        }
        let data = data.with_faces(faces);

        log::debug!(
            "ObjLoaderLane: loaded '{}' with {} positions and {} face corners",
            model.name,
            data.vertex_count(Channel::Position),
            data.faces().len()
        );
        Ok(data)
    }
}
