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

//! Parsing of the external composite-index form.
//!
//! Model files write a face corner as `/`-separated, 1-based indices, one per
//! channel (`"3/1/2"`). An empty component means "not given" (`"3//2"`). The
//! positional meaning of each component is set by a [`CompositeLayout`].

use tessera_core::config::{RendererConfig, DEFAULT_COMPOSITE_LAYOUT};
use tessera_core::renderer::{Channel, CompositeIndex};

use super::InputFormatError;

/// The channel each component of a composite index string refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeLayout {
    channels: Vec<Channel>,
}

impl Default for CompositeLayout {
    fn default() -> Self {
        Self {
            channels: DEFAULT_COMPOSITE_LAYOUT.to_vec(),
        }
    }
}

impl CompositeLayout {
    /// Creates a layout from an ordered channel list.
    pub fn new(channels: Vec<Channel>) -> Result<Self, InputFormatError> {
        for (i, channel) in channels.iter().enumerate() {
            if channels[..i].contains(channel) {
                return Err(InputFormatError::DuplicateChannel(*channel));
            }
        }
        Ok(Self { channels })
    }

    /// The Wavefront OBJ order, `v/vt/vn`.
    pub fn obj() -> Self {
        Self {
            channels: vec![Channel::Position, Channel::TexCoord, Channel::Normal],
        }
    }

    /// The layout configured in `config`.
    pub fn from_config(config: &RendererConfig) -> Result<Self, InputFormatError> {
        Self::new(config.composite_layout.clone())
    }

    /// The channels in component order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Parses one corner string.
    ///
    /// Components past the end of the layout are ignored.
    pub fn parse_corner(&self, corner: &str) -> Result<CompositeIndex, InputFormatError> {
        let trimmed = corner.trim();
        if trimmed.is_empty() {
            return Err(InputFormatError::EmptyCorner);
        }

        let mut index = CompositeIndex::new();
        for (component, &channel) in trimmed.split('/').zip(&self.channels) {
            if component.is_empty() {
                continue;
            }
            let value: u32 = component
                .parse()
                .map_err(|_| InputFormatError::InvalidComponent {
                    corner: trimmed.to_string(),
                    component: component.to_string(),
                })?;
            if value == 0 {
                return Err(InputFormatError::ZeroIndex {
                    corner: trimmed.to_string(),
                });
            }
            index.set(channel, Some(value - 1));
        }
        Ok(index)
    }

    /// Parses a whole face list, one corner string per entry.
    pub fn parse_faces<S: AsRef<str>>(
        &self,
        corners: &[S],
    ) -> Result<Vec<CompositeIndex>, InputFormatError> {
        corners
            .iter()
            .map(|corner| self.parse_corner(corner.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_parses_position_texcoord_color() {
        let layout = CompositeLayout::default();
        let index = layout.parse_corner("3/1/2").unwrap();
        assert_eq!(index.get(Channel::Position), Some(2));
        assert_eq!(index.get(Channel::TexCoord), Some(0));
        assert_eq!(index.get(Channel::Color), Some(1));
        assert_eq!(index.get(Channel::Normal), None);
    }

    #[test]
    fn test_obj_layout_skips_empty_components() {
        let index = CompositeLayout::obj().parse_corner("4//7").unwrap();
        assert_eq!(
            index,
            CompositeIndex::new()
                .with(Channel::Position, 3)
                .with(Channel::Normal, 6)
        );
    }

    #[test]
    fn test_rejects_malformed_corners() {
        let layout = CompositeLayout::default();
        assert_eq!(layout.parse_corner("  "), Err(InputFormatError::EmptyCorner));
        assert_eq!(
            layout.parse_corner("1/x"),
            Err(InputFormatError::InvalidComponent {
                corner: "1/x".to_string(),
                component: "x".to_string(),
            })
        );
        assert_eq!(
            layout.parse_corner("0/1"),
            Err(InputFormatError::ZeroIndex {
                corner: "0/1".to_string()
            })
        );
    }

    #[test]
    fn test_extra_components_are_ignored() {
        let layout = CompositeLayout::new(vec![Channel::Position]).unwrap();
        let index = layout.parse_corner("2/9/9").unwrap();
        assert_eq!(index, CompositeIndex::new().with(Channel::Position, 1));
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        assert_eq!(
            CompositeLayout::new(vec![Channel::Position, Channel::Normal, Channel::Position]),
            Err(InputFormatError::DuplicateChannel(Channel::Position))
        );
    }

    #[test]
    fn test_parse_faces_keeps_order() {
        let faces = CompositeLayout::default()
            .parse_faces(&["1", "2", "3", "1"])
            .unwrap();
        let positions: Vec<_> = faces.iter().map(|f| f.get(Channel::Position)).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(2), Some(0)]);
    }
}
