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

//! The composite-index resolver.

use std::collections::hash_map::Entry;
use std::collections::BTreeMap;

use ahash::AHashMap;
use tessera_core::renderer::{AttributeStream, Channel, CompositeIndex, MeshData};

use super::InputFormatError;

/// Vertex streams ready for upload, plus the compact index array when the
/// source mesh was indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMesh {
    /// One stream per channel the mesh carries, one tuple per output vertex.
    pub streams: BTreeMap<Channel, AttributeStream>,
    /// One 0-based output vertex per face corner, in face order.
    pub indices: Option<Vec<u32>>,
    /// Number of output vertices.
    pub vertex_count: usize,
}

impl ResolvedMesh {
    /// The stream of `channel`, if the mesh carries it.
    pub fn stream(&self, channel: Channel) -> Option<&AttributeStream> {
        self.streams.get(&channel)
    }

    /// Number of indices, or 0 for a non-indexed mesh.
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }
}

/// Converts the face list of `mesh` into deduplicated per-channel streams.
///
/// Each distinct composite index becomes one output vertex, numbered in order
/// of first appearance, and every face corner is replaced by the number of its
/// vertex. Only the channels the mesh carries take part in the comparison.
/// A mesh without faces passes through unchanged, provided every stream holds
/// as many vertices as the position stream.
pub fn resolve(mesh: &MeshData) -> Result<ResolvedMesh, InputFormatError> {
    if !mesh.is_indexed() {
        let expected = mesh.vertex_count(Channel::Position);
        for channel in mesh.channels() {
            let vertices = mesh.vertex_count(channel);
            if vertices != expected {
                return Err(InputFormatError::StreamLengthMismatch {
                    channel,
                    vertices,
                    expected,
                });
            }
        }
        return Ok(ResolvedMesh {
            streams: mesh.streams().clone(),
            indices: None,
            vertex_count: expected,
        });
    }

    let faces = mesh.faces();
    let channels: Vec<Channel> = mesh.channels().collect();
    let mut slots: AHashMap<CompositeIndex, u32> = AHashMap::with_capacity(faces.len());
    // Source vertex of every output vertex, per channel, in slot order.
    let mut sources: Vec<Vec<u32>> = vec![Vec::new(); channels.len()];
    let mut indices = Vec::with_capacity(faces.len());
    let mut next_slot: u32 = 0;

    for (corner, face) in faces.iter().enumerate() {
        let key = face.restricted_to(channels.iter().copied());
        let slot = match slots.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                for (channel, source) in channels.iter().zip(sources.iter_mut()) {
                    source.push(checked_vertex(mesh, &key, *channel, corner)?);
                }
                let slot = next_slot;
                next_slot += 1;
                *entry.insert(slot)
            }
        };
        indices.push(slot);
    }

    let vertex_count = next_slot as usize;
    let streams = channels
        .iter()
        .zip(&sources)
        .filter_map(|(&channel, source)| {
            mesh.stream(channel)
                .map(|stream| (channel, stream.gather(channel.arity(), source)))
        })
        .collect();

    log::trace!(
        "resolve: {} face corners -> {} vertices",
        faces.len(),
        vertex_count
    );

    Ok(ResolvedMesh {
        streams,
        indices: Some(indices),
        vertex_count,
    })
}

fn checked_vertex(
    mesh: &MeshData,
    key: &CompositeIndex,
    channel: Channel,
    corner: usize,
) -> Result<u32, InputFormatError> {
    let vertex = key
        .get(channel)
        .ok_or(InputFormatError::MissingComponent { corner, channel })?;
    let available = mesh.vertex_count(channel);
    if vertex as usize >= available {
        return Err(InputFormatError::OutOfRange {
            corner,
            channel,
            vertex,
            available,
        });
    }
    Ok(vertex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_lane::CompositeLayout;
    use std::collections::HashMap;

    fn square(faces: &[&str]) -> MeshData {
        let positions = vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ];
        MeshData::new(positions)
            .unwrap()
            .with_faces(CompositeLayout::default().parse_faces(faces).unwrap())
    }

    fn floats(stream: Option<&AttributeStream>) -> Vec<f32> {
        match stream {
            Some(AttributeStream::F32(data)) => data.clone(),
            other => panic!("expected a float stream, got {other:?}"),
        }
    }

    #[test]
    fn test_shared_corners_collapse() {
        let resolved = resolve(&square(&["1", "2", "3", "1", "3", "4"])).unwrap();
        assert_eq!(resolved.indices, Some(vec![0, 1, 2, 0, 2, 3]));
        assert_eq!(resolved.vertex_count, 4);
        assert_eq!(
            floats(resolved.stream(Channel::Position)),
            floats(square(&[]).stream(Channel::Position))
        );
    }

    #[test]
    fn test_texcoord_splits_shared_position() {
        let mesh = MeshData::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .unwrap()
            .with_tex_coords(vec![0.0, 0.0, 1.0, 1.0])
            .unwrap()
            .with_faces(
                CompositeLayout::default()
                    .parse_faces(&["1/1", "2/2", "3/1"])
                    .unwrap(),
            );
        let resolved = resolve(&mesh).unwrap();
        assert_eq!(resolved.indices, Some(vec![0, 1, 2]));
        assert_eq!(
            floats(resolved.stream(Channel::TexCoord)),
            vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]
        );
        assert_eq!(
            floats(resolved.stream(Channel::Position)),
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_same_position_different_texcoord_is_two_vertices() {
        let mesh = MeshData::new(vec![0.0; 3])
            .unwrap()
            .with_tex_coords(vec![0.0, 0.0, 1.0, 1.0])
            .unwrap()
            .with_faces(
                CompositeLayout::default()
                    .parse_faces(&["1/1", "1/2", "1/1"])
                    .unwrap(),
            );
        let resolved = resolve(&mesh).unwrap();
        assert_eq!(resolved.indices, Some(vec![0, 1, 0]));
        assert_eq!(resolved.vertex_count, 2);
    }

    #[test]
    fn test_empty_faces_pass_through() {
        let mesh = square(&[]);
        let resolved = resolve(&mesh).unwrap();
        assert_eq!(resolved.indices, None);
        assert_eq!(resolved.vertex_count, 4);
        assert_eq!(&resolved.streams, mesh.streams());
    }

    #[test]
    fn test_pass_through_rejects_short_stream() {
        let mesh = MeshData::new(vec![0.0; 9])
            .unwrap()
            .with_colors(vec![255, 0, 0])
            .unwrap();
        assert_eq!(
            resolve(&mesh),
            Err(InputFormatError::StreamLengthMismatch {
                channel: Channel::Color,
                vertices: 1,
                expected: 3
            })
        );
    }

    #[test]
    fn test_components_of_absent_channels_do_not_split() {
        // The second component names a texture coordinate the mesh lacks.
        let resolved = resolve(&square(&["1/1", "1/2", "2/1"])).unwrap();
        assert_eq!(resolved.indices, Some(vec![0, 0, 1]));
        assert_eq!(resolved.index_count(), 3);
    }

    #[test]
    fn test_every_slot_matches_its_corner() {
        let corners = ["4", "1", "4", "2", "2", "3", "1"];
        let mesh = square(&corners);
        let resolved = resolve(&mesh).unwrap();
        let indices = resolved.indices.clone().unwrap();
        let positions = floats(resolved.stream(Channel::Position));
        let source = floats(mesh.stream(Channel::Position));

        assert_eq!(indices.len(), corners.len());
        let mut seen: HashMap<u32, usize> = HashMap::new();
        for (corner, &slot) in mesh.faces().iter().zip(&indices) {
            let vertex = corner.get(Channel::Position).unwrap() as usize;
            let slot = slot as usize;
            assert_eq!(positions[slot * 3..slot * 3 + 3], source[vertex * 3..vertex * 3 + 3]);
            *seen.entry(slot as u32).or_default() += 1;
        }
        // Every output vertex is referenced, numbered by first appearance.
        assert_eq!(seen.len(), resolved.vertex_count);
        assert_eq!(indices[..2], [0, 1]);
    }

    #[test]
    fn test_missing_and_out_of_range_components() {
        let mesh = MeshData::new(vec![0.0; 6])
            .unwrap()
            .with_normals(vec![0.0; 3])
            .unwrap()
            .with_faces(CompositeLayout::obj().parse_faces(&["1//1", "2"]).unwrap());
        assert_eq!(
            resolve(&mesh),
            Err(InputFormatError::MissingComponent {
                corner: 1,
                channel: Channel::Normal
            })
        );

        let mesh = square(&["1", "5"]);
        assert_eq!(
            resolve(&mesh),
            Err(InputFormatError::OutOfRange {
                corner: 1,
                channel: Channel::Position,
                vertex: 4,
                available: 4
            })
        );
    }

    #[test]
    fn test_colors_follow_their_own_component() {
        let mesh = MeshData::new(vec![0.0; 6])
            .unwrap()
            .with_colors(vec![255, 0, 0, 0, 255, 0])
            .unwrap()
            .with_faces(
                CompositeLayout::default()
                    .parse_faces(&["1//2", "2//1"])
                    .unwrap(),
            );
        let resolved = resolve(&mesh).unwrap();
        assert_eq!(
            resolved.stream(Channel::Color),
            Some(&AttributeStream::U8(vec![0, 255, 0, 255, 0, 0]))
        );
    }
}
