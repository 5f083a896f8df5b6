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

use std::collections::HashMap;

use tessera_core::renderer::{AttributeLocation, ProgramId, ShaderProgram};

/// A [`ShaderProgram`] with a fixed attribute table, for devices that do not
/// compile shaders.
#[derive(Debug, Clone)]
pub struct StaticProgram {
    id: ProgramId,
    locations: HashMap<String, AttributeLocation>,
}

impl StaticProgram {
    /// Creates a program exposing the given `(name, location)` attributes.
    pub fn new(id: ProgramId, attributes: &[(&str, u32)]) -> Self {
        Self {
            id,
            locations: attributes
                .iter()
                .map(|&(name, location)| (name.to_string(), AttributeLocation(location)))
                .collect(),
        }
    }
}

impl ShaderProgram for StaticProgram {
    fn id(&self) -> ProgramId {
        self.id
    }

    fn attribute_location(&self, name: &str) -> Option<AttributeLocation> {
        self.locations.get(name).copied()
    }
}
