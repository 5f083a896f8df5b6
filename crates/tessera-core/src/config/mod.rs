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

//! Renderer configuration.
//!
//! Settings are plain serde structs. They can be written in RON (the format
//! used for engine data files) or JSON; [`RendererConfig::from_file`] picks the
//! format from the file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::renderer::api::{AttributeNames, Channel};

/// The default meaning of each `/`-separated component of a composite index.
pub const DEFAULT_COMPOSITE_LAYOUT: [Channel; Channel::COUNT] = [
    Channel::Position,
    Channel::TexCoord,
    Channel::Color,
    Channel::Normal,
    Channel::Tangent,
    Channel::Bitangent,
];

/// Settings shared by the mesh loaders and the mesh facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Shader attribute names looked up for each channel.
    pub attribute_names: AttributeNames,
    /// Which channel each component of a composite index string refers to.
    pub composite_layout: Vec<Channel>,
    /// Never use native binding states, even when the context supports them.
    pub force_immediate_bindings: bool,
    /// Log mesh labels on upload and release.
    pub label_meshes: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            attribute_names: AttributeNames::default(),
            composite_layout: DEFAULT_COMPOSITE_LAYOUT.to_vec(),
            force_immediate_bindings: false,
            label_meshes: true,
        }
    }
}

impl RendererConfig {
    /// Loads a configuration from a RON string.
    pub fn from_ron(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    /// Loads a configuration from a JSON string.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything else as RON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_ron(&content)?,
        };
        log::debug!("RendererConfig: loaded from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty)
    }
}
