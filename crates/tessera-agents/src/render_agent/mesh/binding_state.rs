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

//! Per-program attribute binding states.

use std::collections::HashMap;

use tessera_core::renderer::{
    AttributeSlots, BufferTarget, DeviceCapabilities, GraphicsDevice, ProgramId, VertexArrayId,
    VertexAttributeDescriptor,
};

use super::buffer_set::GpuBufferSet;
use super::error::BindingError;

/// How a mesh feeds one shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingState {
    /// A vertex array holding the attribute setup and the element buffer.
    Native(VertexArrayId),
    /// No device object; the setup is issued around every draw.
    Immediate,
}

/// The binding states of one mesh, keyed by program.
#[derive(Debug, Default)]
pub struct BindingStates {
    states: HashMap<ProgramId, BindingState>,
}

impl BindingStates {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The state recorded for `program`.
    pub fn get(&self, program: ProgramId) -> Option<BindingState> {
        self.states.get(&program).copied()
    }

    /// Whether `program` has a recorded state.
    pub fn contains(&self, program: ProgramId) -> bool {
        self.states.contains_key(&program)
    }

    /// Number of recorded states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state is recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Records the binding state for `program`.
    ///
    /// With native binding states, a vertex array is created and captures the
    /// attribute setup and the element buffer. Otherwise the program is only
    /// marked as drawn immediately.
    pub fn create(
        &mut self,
        device: &dyn GraphicsDevice,
        capabilities: DeviceCapabilities,
        program: ProgramId,
        slots: &AttributeSlots,
        buffers: &GpuBufferSet,
    ) -> Result<BindingState, BindingError> {
        let state = if capabilities.native_binding_state {
            let vertex_array = device
                .create_vertex_array()
                .map_err(BindingError::VertexArray)?;
            device.bind_vertex_array(Some(vertex_array));
            configure_attributes(device, slots, buffers);
            // Recorded by the bound vertex array; must stay bound when it is unbound.
            if let Some(index_buffer) = buffers.index_buffer() {
                device.bind_buffer(BufferTarget::ElementArray, Some(index_buffer));
            }
            device.bind_vertex_array(None);
            BindingState::Native(vertex_array)
        } else {
            BindingState::Immediate
        };

        log::debug!("BindingStates: program {} -> {state:?}", program.0);
        self.states.insert(program, state);
        Ok(state)
    }

    /// Establishes the bindings for `program`, runs `draw`, then restores the
    /// ambient state.
    ///
    /// Programs without a recorded state are drawn immediately with `slots`.
    pub fn draw_with(
        &self,
        device: &dyn GraphicsDevice,
        program: ProgramId,
        slots: &AttributeSlots,
        buffers: &GpuBufferSet,
        draw: impl FnOnce(&dyn GraphicsDevice),
    ) {
        match self.get(program) {
            Some(BindingState::Native(vertex_array)) => {
                device.bind_vertex_array(Some(vertex_array));
                draw(device);
                device.bind_vertex_array(None);
            }
            state => {
                if state.is_none() {
                    log::trace!(
                        "BindingStates: program {} has no binding state, drawing immediately",
                        program.0
                    );
                }
                configure_attributes(device, slots, buffers);
                if let Some(index_buffer) = buffers.index_buffer() {
                    device.bind_buffer(BufferTarget::ElementArray, Some(index_buffer));
                }
                draw(device);
                if buffers.index_buffer().is_some() {
                    device.bind_buffer(BufferTarget::ElementArray, None);
                }
                for (channel, _) in buffers.channels() {
                    if let Some(location) = slots.get(channel) {
                        device.disable_vertex_attribute(location);
                    }
                }
            }
        }
    }

    /// Deletes every vertex array the device still knows. Safe to call repeatedly.
    pub fn release(&mut self, device: &dyn GraphicsDevice) {
        for (program, state) in self.states.drain() {
            let BindingState::Native(vertex_array) = state else {
                continue;
            };
            if device.is_vertex_array(vertex_array) {
                device.delete_vertex_array(vertex_array);
            } else {
                log::trace!(
                    "BindingStates: {vertex_array:?} of program {} already gone, skipping",
                    program.0
                );
            }
        }
    }
}

/// Points every slot the program consumes at its channel buffer, leaving the
/// array target unbound.
fn configure_attributes(device: &dyn GraphicsDevice, slots: &AttributeSlots, buffers: &GpuBufferSet) {
    for (channel, buffer) in buffers.channels() {
        let Some(location) = slots.get(channel) else {
            continue;
        };
        device.bind_buffer(BufferTarget::Array, Some(buffer));
        device.enable_vertex_attribute(location);
        device.vertex_attribute_pointer(
            location,
            &VertexAttributeDescriptor::packed(channel.vertex_format()),
        );
    }
    device.bind_buffer(BufferTarget::Array, None);
}
