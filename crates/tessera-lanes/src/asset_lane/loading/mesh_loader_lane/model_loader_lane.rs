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

//! Defines a lane for loading model documents.
//!
//! A model document lists flat attribute arrays and the face list as composite
//! index strings:
//!
//! ```json
//! {
//!   "positions": [0, 0, 0,  1, 0, 0,  0, 1, 0],
//!   "texCoords": [0, 0,  1, 1],
//!   "indices": ["1/1", "2/2", "3/1"]
//! }
//! ```
//!
//! The same structure is accepted in RON.

use anyhow::Context;
use serde::Deserialize;
use std::error::Error;
use tessera_core::renderer::{Channel, MeshData};

use crate::asset_lane::AssetLoaderLane;
use crate::mesh_lane::CompositeLayout;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelDocument {
    #[serde(default)]
    label: Option<String>,
    /// Overrides the loader's composite layout for this document.
    #[serde(default)]
    layout: Option<Vec<Channel>>,
    positions: Vec<f32>,
    #[serde(default)]
    colors: Option<Vec<u8>>,
    #[serde(default)]
    tex_coords: Option<Vec<f32>>,
    #[serde(default)]
    normals: Option<Vec<f32>>,
    #[serde(default)]
    tangents: Option<Vec<f32>>,
    #[serde(default)]
    bitangents: Option<Vec<f32>>,
    #[serde(default)]
    indices: Vec<String>,
}

/// Lane for loading JSON or RON model documents.
#[derive(Debug, Clone, Default)]
pub struct ModelLoaderLane {
    layout: CompositeLayout,
}

impl ModelLoaderLane {
    /// Creates a loader parsing composite indices with `layout`.
    pub fn new(layout: CompositeLayout) -> Self {
        Self { layout }
    }

    fn parse_document(bytes: &[u8]) -> anyhow::Result<ModelDocument> {
        let text = std::str::from_utf8(bytes).context("Model document is not valid UTF-8")?;
        if text.trim_start().starts_with('{') {
            serde_json::from_str(text).context("Failed to parse JSON model document")
        } else {
            ron::from_str(text).context("Failed to parse RON model document")
        }
    }
}

impl AssetLoaderLane<MeshData> for ModelLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<MeshData, Box<dyn Error + Send + Sync>> {
        let document = Self::parse_document(bytes)?;

        let layout = match document.layout {
            Some(channels) => CompositeLayout::new(channels)?,
            None => self.layout.clone(),
        };
        let faces = layout.parse_faces(&document.indices)?;

        let mut mesh = MeshData::new(document.positions)?;
        if let Some(colors) = document.colors {
            mesh = mesh.with_colors(colors)?;
        }
        if let Some(tex_coords) = document.tex_coords {
            mesh = mesh.with_tex_coords(tex_coords)?;
        }
        if let Some(normals) = document.normals {
            mesh = mesh.with_normals(normals)?;
        }
        if let Some(tangents) = document.tangents {
            mesh = mesh.with_tangents(tangents)?;
        }
        if let Some(bitangents) = document.bitangents {
            mesh = mesh.with_bitangents(bitangents)?;
        }
        mesh = mesh.with_faces(faces);
        if let Some(label) = document.label {
            mesh = mesh.with_label(label);
        }

        log::debug!(
            "ModelLoaderLane: loaded {} vertices, {} face corners",
            mesh.vertex_count(Channel::Position),
            mesh.faces().len()
        );
        Ok(mesh)
    }
}
