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

//! The GPU mesh facade.

use std::rc::Rc;

use tessera_core::config::RendererConfig;
use tessera_core::renderer::{
    AttributeNames, AttributeSlots, Channel, DeviceCapabilities, GraphicsDevice, IndexFormat,
    MeshData, PrimitiveTopology, ProgramId, ShaderProgram,
};
use tessera_core::task::next_turn;
use tessera_lanes::mesh_lane::resolve;

use super::binding_state::{BindingState, BindingStates};
use super::buffer_set::GpuBufferSet;
use super::error::{MeshError, MeshState, Violation};

/// A mesh living on a device context.
///
/// The lifecycle is `new` → [`upload`](Self::upload) once →
/// [`create_binding_state`](Self::create_binding_state) once per program →
/// [`draw`](Self::draw) any number of times → [`release`](Self::release).
/// Calls outside that order return [`MeshError::PreconditionViolation`].
///
/// A mesh that is dropped without being released releases itself and logs a
/// warning.
pub struct GpuMesh {
    device: Rc<dyn GraphicsDevice>,
    capabilities: DeviceCapabilities,
    label: Option<String>,
    data: Option<MeshData>,
    buffers: GpuBufferSet,
    bindings: BindingStates,
    state: MeshState,
}

impl std::fmt::Debug for GpuMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuMesh")
            .field("label", &self.label)
            .field("state", &self.state)
            .field("capabilities", &self.capabilities)
            .field("buffers", &self.buffers)
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl GpuMesh {
    /// Creates the buffer objects for `data` on `device`.
    pub fn new(device: Rc<dyn GraphicsDevice>, data: MeshData) -> Result<Self, MeshError> {
        let capabilities = device.capabilities();
        Self::build(device, data, capabilities, true)
    }

    /// Like [`new`](Self::new), with device capabilities restricted by `config`.
    pub fn with_config(
        device: Rc<dyn GraphicsDevice>,
        data: MeshData,
        config: &RendererConfig,
    ) -> Result<Self, MeshError> {
        let capabilities = device.capabilities().restricted_by(config);
        Self::build(device, data, capabilities, config.label_meshes)
    }

    fn build(
        device: Rc<dyn GraphicsDevice>,
        data: MeshData,
        capabilities: DeviceCapabilities,
        keep_label: bool,
    ) -> Result<Self, MeshError> {
        let buffers = GpuBufferSet::new(device.as_ref(), &data)?;
        let label = data.label().filter(|_| keep_label).map(str::to_string);
        let mesh = Self {
            device,
            capabilities,
            label,
            data: Some(data),
            buffers,
            bindings: BindingStates::new(),
            state: MeshState::Constructed,
        };
        log::debug!("{}: created {:?}", mesh.name(), mesh.buffers);
        Ok(mesh)
    }

    fn name(&self) -> String {
        match &self.label {
            Some(label) => format!("GpuMesh '{label}'"),
            None => "GpuMesh".to_string(),
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> MeshState {
        self.state
    }

    /// The capabilities this mesh branches on.
    pub fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    /// The binding state recorded for `program`.
    pub fn binding_state(&self, program: ProgramId) -> Option<BindingState> {
        self.bindings.get(program)
    }

    /// Number of vertices on the device (0 before upload).
    pub fn vertex_count(&self) -> usize {
        self.buffers.vertex_count()
    }

    /// Number of indices on the device (0 for non-indexed meshes).
    pub fn index_count(&self) -> u32 {
        self.buffers.index_count()
    }

    /// Resolves the face list and uploads every stream.
    ///
    /// Nothing happens before the caller's current turn ends: the first action
    /// is a yield to the executor. A failed upload leaves the mesh in
    /// [`MeshState::Uploading`], where it cannot be drawn.
    pub async fn upload(&mut self) -> Result<(), MeshError> {
        next_turn().await;

        if self.state != MeshState::Constructed {
            return Err(MeshError::wrong_state("upload", self.state));
        }
        self.state = MeshState::Uploading;
        let data = self
            .data
            .take()
            .ok_or(MeshError::wrong_state("upload", self.state))?;

        let resolved = resolve(&data)?;
        self.buffers.upload(self.device.as_ref(), &resolved)?;
        self.state = MeshState::Ready;

        log::info!(
            "{}: uploaded {} vertices, {} indices",
            self.name(),
            self.buffers.vertex_count(),
            self.buffers.index_count()
        );
        Ok(())
    }

    /// Records how this mesh feeds `program`.
    ///
    /// Each program gets exactly one binding state; asking again is refused.
    pub fn create_binding_state(
        &mut self,
        program: ProgramId,
        slots: &AttributeSlots,
    ) -> Result<(), MeshError> {
        if self.state != MeshState::Ready {
            return Err(MeshError::wrong_state("create_binding_state", self.state));
        }
        if self.bindings.contains(program) {
            return Err(MeshError::PreconditionViolation {
                operation: "create_binding_state",
                reason: Violation::AlreadyBound(program),
            });
        }
        self.bindings.create(
            self.device.as_ref(),
            self.capabilities,
            program,
            slots,
            &self.buffers,
        )?;
        Ok(())
    }

    /// Resolves the slots of `program` by attribute name, then records its
    /// binding state. Returns the slots for later draws.
    pub fn create_binding_state_for(
        &mut self,
        program: &dyn ShaderProgram,
        names: &AttributeNames,
    ) -> Result<AttributeSlots, MeshError> {
        let slots = AttributeSlots::from_program(program, names);
        self.create_binding_state(program.id(), &slots)?;
        Ok(slots)
    }

    /// Draws the whole mesh as a triangle list with `program`'s bindings.
    ///
    /// Binding state touched by the draw is restored afterwards.
    pub fn draw(&self, program: ProgramId, slots: &AttributeSlots) -> Result<(), MeshError> {
        if self.state != MeshState::Ready {
            return Err(MeshError::wrong_state("draw", self.state));
        }

        let index_count = self.buffers.index_count();
        let indexed = self.buffers.index_buffer().is_some();
        let vertex_count = self.buffers.vertex_count() as u32;
        self.bindings.draw_with(
            self.device.as_ref(),
            program,
            slots,
            &self.buffers,
            |device| {
                if indexed {
                    device.draw_elements(
                        PrimitiveTopology::TriangleList,
                        index_count,
                        IndexFormat::Uint16,
                        0,
                    );
                } else {
                    device.draw_arrays(PrimitiveTopology::TriangleList, 0, vertex_count);
                }
            },
        );
        log::trace!("{}: drew with program {}", self.name(), program.0);
        Ok(())
    }

    /// Deletes every device resource of this mesh.
    ///
    /// Valid in any state and idempotent; objects the device no longer knows
    /// are skipped.
    pub fn release(&mut self) {
        if self.state == MeshState::Released {
            log::trace!("{}: already released", self.name());
            return;
        }
        self.bindings.release(self.device.as_ref());
        self.buffers.release(self.device.as_ref());
        self.data = None;
        self.state = MeshState::Released;
        log::debug!("{}: released", self.name());
    }

    /// Whether the mesh carries `channel`.
    pub fn has_channel(&self, channel: Channel) -> bool {
        self.buffers.channel_buffer(channel).is_some()
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        if self.state != MeshState::Released {
            log::warn!("{}: dropped while {}, releasing", self.name(), self.state);
            self.release();
        }
    }
}
