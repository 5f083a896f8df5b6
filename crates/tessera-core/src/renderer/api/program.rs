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

//! Shader-program identity and the mapping from mesh channels to attribute slots.

use serde::{Deserialize, Serialize};

use super::scene::Channel;
use super::vertex::AttributeLocation;
use crate::renderer::traits::ShaderProgram;

/// A stable identity for a linked shader program.
///
/// Meshes key their per-program binding states by this value, so two distinct
/// programs must never share an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub usize);

/// Shader attribute names looked up for each channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    /// Name of the position attribute.
    pub position: String,
    /// Name of the texture-coordinate attribute.
    pub tex_coord: String,
    /// Name of the normal attribute.
    pub normal: String,
    /// Name of the color attribute.
    pub color: String,
    /// Name of the tangent attribute.
    pub tangent: String,
    /// Name of the bitangent attribute.
    pub bitangent: String,
}

impl AttributeNames {
    /// The attribute name used for `channel`.
    pub fn name(&self, channel: Channel) -> &str {
        match channel {
            Channel::Position => &self.position,
            Channel::TexCoord => &self.tex_coord,
            Channel::Normal => &self.normal,
            Channel::Color => &self.color,
            Channel::Tangent => &self.tangent,
            Channel::Bitangent => &self.bitangent,
        }
    }
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            position: "vPosition".to_string(),
            tex_coord: "vTexCoord".to_string(),
            normal: "vNormal".to_string(),
            color: "vColor".to_string(),
            tangent: "vTangent".to_string(),
            bitangent: "vBitangent".to_string(),
        }
    }
}

/// The attribute slot each channel feeds in one shader program.
///
/// An absent slot means the program does not consume that channel; the mesh
/// then skips it even if it carries the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttributeSlots {
    slots: [Option<AttributeLocation>; Channel::COUNT],
}

impl AttributeSlots {
    /// Creates an assignment with every channel absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `channel` to `location`.
    pub fn with(mut self, channel: Channel, location: u32) -> Self {
        self.set(channel, Some(AttributeLocation(location)));
        self
    }

    /// Sets or clears the slot of `channel`.
    pub fn set(&mut self, channel: Channel, location: Option<AttributeLocation>) {
        self.slots[channel.index()] = location;
    }

    /// The slot of `channel`, if the program consumes it.
    pub fn get(&self, channel: Channel) -> Option<AttributeLocation> {
        self.slots[channel.index()]
    }

    /// Iterates over the channels that have a slot, in channel order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, AttributeLocation)> + '_ {
        Channel::ALL
            .iter()
            .filter_map(|&channel| self.get(channel).map(|location| (channel, location)))
    }

    /// Resolves every channel by querying `program` for the configured attribute names.
    ///
    /// Names the program does not know resolve to an absent slot.
    pub fn from_program(program: &dyn ShaderProgram, names: &AttributeNames) -> Self {
        let mut slots = Self::new();
        for channel in Channel::ALL {
            let location = program.attribute_location(names.name(channel));
            if location.is_none() {
                log::trace!(
                    "AttributeSlots: program {:?} has no attribute '{}'",
                    program.id(),
                    names.name(channel)
                );
            }
            slots.set(channel, location);
        }
        slots
    }
}
