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

//! The device buffers backing one mesh.

use std::collections::BTreeMap;

use tessera_core::renderer::{
    BufferId, BufferTarget, BufferUsage, Channel, GraphicsDevice, MeshData,
};
use tessera_lanes::mesh_lane::ResolvedMesh;

use super::error::UploadError;

/// The largest vertex count addressable by a 16-bit index.
pub const MAX_VERTICES: usize = u16::MAX as usize;

/// One buffer per channel the mesh carries, plus an index buffer for indexed
/// meshes.
///
/// Buffer objects are created with the set; their storage is filled once by
/// [`upload`](Self::upload) and never updated.
#[derive(Debug)]
pub struct GpuBufferSet {
    channels: BTreeMap<Channel, BufferId>,
    index_buffer: Option<BufferId>,
    vertex_count: usize,
    index_count: u32,
}

impl GpuBufferSet {
    /// Creates the buffer objects for every stream of `mesh`.
    ///
    /// On failure the buffers created so far are deleted again.
    pub fn new(device: &dyn GraphicsDevice, mesh: &MeshData) -> Result<Self, UploadError> {
        let mut set = Self {
            channels: BTreeMap::new(),
            index_buffer: None,
            vertex_count: 0,
            index_count: 0,
        };

        for channel in mesh.channels() {
            match device.create_buffer() {
                Ok(buffer) => {
                    set.channels.insert(channel, buffer);
                }
                Err(source) => {
                    set.release(device);
                    return Err(UploadError::Device { channel, source });
                }
            }
        }
        if mesh.is_indexed() {
            match device.create_buffer() {
                Ok(buffer) => set.index_buffer = Some(buffer),
                Err(source) => {
                    set.release(device);
                    return Err(UploadError::IndexBufferRejected(source));
                }
            }
        }
        Ok(set)
    }

    /// Fills the buffers from resolved streams.
    ///
    /// The vertex count is checked against the 16-bit index range before any
    /// device call. Every buffer is unbound again afterwards, also on failure.
    pub fn upload(
        &mut self,
        device: &dyn GraphicsDevice,
        resolved: &ResolvedMesh,
    ) -> Result<(), UploadError> {
        if self.index_buffer.is_some() && resolved.vertex_count > MAX_VERTICES {
            return Err(UploadError::IndexOverflow {
                vertex_count: resolved.vertex_count,
            });
        }

        for (&channel, &buffer) in &self.channels {
            let Some(stream) = resolved.stream(channel) else {
                continue;
            };
            device.bind_buffer(BufferTarget::Array, Some(buffer));
            let result =
                device.buffer_data(BufferTarget::Array, stream.as_bytes(), BufferUsage::StaticDraw);
            device.bind_buffer(BufferTarget::Array, None);
            result.map_err(|source| UploadError::Device { channel, source })?;
        }

        if let (Some(buffer), Some(indices)) = (self.index_buffer, &resolved.indices) {
            // Cannot truncate: the vertex count was checked above.
            let narrowed: Vec<u16> = indices.iter().map(|&index| index as u16).collect();
            device.bind_buffer(BufferTarget::ElementArray, Some(buffer));
            let result = device.buffer_data(
                BufferTarget::ElementArray,
                bytemuck::cast_slice(&narrowed),
                BufferUsage::StaticDraw,
            );
            device.bind_buffer(BufferTarget::ElementArray, None);
            result.map_err(UploadError::IndexBufferRejected)?;
            self.index_count = narrowed.len() as u32;
        }

        self.vertex_count = resolved.vertex_count;
        Ok(())
    }

    /// The buffer of `channel`, if the mesh carries it.
    pub fn channel_buffer(&self, channel: Channel) -> Option<BufferId> {
        self.channels.get(&channel).copied()
    }

    /// Every channel buffer, in channel order.
    pub fn channels(&self) -> impl Iterator<Item = (Channel, BufferId)> + '_ {
        self.channels
            .iter()
            .map(|(&channel, &buffer)| (channel, buffer))
    }

    /// The index buffer of an indexed mesh.
    pub fn index_buffer(&self) -> Option<BufferId> {
        self.index_buffer
    }

    /// Number of uploaded indices.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Number of uploaded vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Deletes every buffer the device still knows. Safe to call repeatedly.
    pub fn release(&mut self, device: &dyn GraphicsDevice) {
        let buffers = std::mem::take(&mut self.channels)
            .into_values()
            .chain(self.index_buffer.take());
        for buffer in buffers {
            if device.is_buffer(buffer) {
                device.delete_buffer(buffer);
            } else {
                log::trace!("GpuBufferSet: {buffer:?} already gone, skipping");
            }
        }
    }
}
