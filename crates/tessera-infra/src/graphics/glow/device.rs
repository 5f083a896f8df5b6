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

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glow::HasContext;
use tessera_core::renderer::{
    AttributeLocation, BufferId, BufferTarget, BufferUsage, DeviceCapabilities, GraphicsDevice,
    IndexFormat, PrimitiveTopology, ResourceError, VertexArrayId, VertexAttributeDescriptor,
};

use super::context::detect_capabilities;
use super::conversions::{resource_error_from_gl, GlAttributeFormat, IntoGl};
use super::registry::Registry;

/// A [`GraphicsDevice`] backed by an OpenGL, OpenGL ES or WebGL context.
///
/// Handles given out to callers are registry keys, not driver names, so
/// existence checks and double deletions are answered without a driver round
/// trip. The context must be current on the calling thread for every call.
pub struct GlowDevice {
    gl: Rc<glow::Context>,
    capabilities: DeviceCapabilities,
    buffers: RefCell<Registry<BufferId, glow::Buffer>>,
    vertex_arrays: RefCell<Registry<VertexArrayId, glow::VertexArray>>,
    // Needed to attribute `buffer_data` sizes to a registry entry.
    bound_array_buffer: Cell<Option<BufferId>>,
    bound_element_buffer: Cell<Option<BufferId>>,
}

impl std::fmt::Debug for GlowDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowDevice")
            .field("capabilities", &self.capabilities)
            .field("buffers", &self.buffers.borrow().len())
            .field("vertex_arrays", &self.vertex_arrays.borrow().len())
            .field("allocated_bytes", &self.allocated_bytes())
            .finish()
    }
}

impl GlowDevice {
    /// Wraps a context, detecting its capabilities once.
    pub fn new(gl: Rc<glow::Context>) -> Self {
        let version = gl.version();
        let capabilities =
            detect_capabilities(version.major, version.is_embedded, gl.supported_extensions());
        Self::with_capabilities(gl, capabilities)
    }

    /// Wraps a context with explicitly chosen capabilities.
    ///
    /// Used to restrict a context (see
    /// [`DeviceCapabilities::restricted_by`]); claiming a feature the context
    /// lacks leads to driver errors.
    pub fn with_capabilities(gl: Rc<glow::Context>, capabilities: DeviceCapabilities) -> Self {
        Self {
            gl,
            capabilities,
            buffers: RefCell::new(Registry::new()),
            vertex_arrays: RefCell::new(Registry::new()),
            bound_array_buffer: Cell::new(None),
            bound_element_buffer: Cell::new(None),
        }
    }

    /// The wrapped context.
    pub fn context(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    /// Bytes currently held by buffers created through this device.
    pub fn allocated_bytes(&self) -> usize {
        self.buffers.borrow().allocated_bytes()
    }

    fn take_error(&self) -> Result<(), ResourceError> {
        // SAFETY: the context is current on this thread, as required by `GlowDevice`.
        let code = unsafe { self.gl.get_error() };
        resource_error_from_gl(code).map_or(Ok(()), Err)
    }

    fn bound_slot(&self, target: BufferTarget) -> &Cell<Option<BufferId>> {
        match target {
            BufferTarget::Array => &self.bound_array_buffer,
            BufferTarget::ElementArray => &self.bound_element_buffer,
        }
    }
}

impl GraphicsDevice for GlowDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn create_buffer(&self) -> Result<BufferId, ResourceError> {
        // SAFETY: the context is current on this thread.
        let buffer = unsafe { self.gl.create_buffer() }.map_err(ResourceError::BackendError)?;
        let id = self.buffers.borrow_mut().insert(buffer);

        log::debug!("GlowDevice: Created buffer with ID: {id:?}");
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        let native = match buffer {
            Some(id) => match self.buffers.borrow().get(id) {
                Some(native) => Some(native),
                None => {
                    log::warn!("GlowDevice: Ignoring bind of unknown buffer {id:?}");
                    return;
                }
            },
            None => None,
        };
        // SAFETY: the context is current on this thread and `native` is a live buffer.
        unsafe { self.gl.bind_buffer(target.into_gl(), native) };
        self.bound_slot(target).set(buffer);
    }

    fn buffer_data(
        &self,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        let id = self.bound_slot(target).get().ok_or(ResourceError::NotFound)?;
        // SAFETY: the context is current on this thread and a buffer is bound to `target`.
        unsafe {
            self.gl
                .buffer_data_u8_slice(target.into_gl(), data, usage.into_gl())
        };
        self.take_error()?;

        self.buffers.borrow_mut().set_size(id, data.len());
        log::trace!("GlowDevice: Uploaded {} bytes to {id:?}", data.len());
        Ok(())
    }

    fn is_buffer(&self, buffer: BufferId) -> bool {
        self.buffers.borrow().contains(buffer)
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let Some(native) = self.buffers.borrow_mut().remove(buffer) else {
            return;
        };
        // SAFETY: the context is current on this thread and the buffer was created by it.
        unsafe { self.gl.delete_buffer(native) };
        for target in [BufferTarget::Array, BufferTarget::ElementArray] {
            if self.bound_slot(target).get() == Some(buffer) {
                self.bound_slot(target).set(None);
            }
        }
        log::debug!("GlowDevice: Destroyed buffer with ID: {buffer:?}");
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError> {
        if !self.capabilities.native_binding_state {
            return Err(ResourceError::FeatureNotSupported(
                "vertex array objects".to_string(),
            ));
        }
        // SAFETY: the context is current on this thread and supports vertex arrays.
        let vertex_array =
            unsafe { self.gl.create_vertex_array() }.map_err(ResourceError::BackendError)?;
        let id = self.vertex_arrays.borrow_mut().insert(vertex_array);

        log::debug!("GlowDevice: Created vertex array with ID: {id:?}");
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        if !self.capabilities.native_binding_state {
            return;
        }
        let native = match vertex_array {
            Some(id) => match self.vertex_arrays.borrow().get(id) {
                Some(native) => Some(native),
                None => {
                    log::warn!("GlowDevice: Ignoring bind of unknown vertex array {id:?}");
                    return;
                }
            },
            None => None,
        };
        // SAFETY: the context is current on this thread and supports vertex arrays.
        unsafe { self.gl.bind_vertex_array(native) };
        // The element binding belongs to the vertex array now in effect.
        self.bound_element_buffer.set(None);
    }

    fn is_vertex_array(&self, vertex_array: VertexArrayId) -> bool {
        self.vertex_arrays.borrow().contains(vertex_array)
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) {
        let Some(native) = self.vertex_arrays.borrow_mut().remove(vertex_array) else {
            return;
        };
        // SAFETY: the context is current on this thread and the vertex array was created by it.
        unsafe { self.gl.delete_vertex_array(native) };
        log::debug!("GlowDevice: Destroyed vertex array with ID: {vertex_array:?}");
    }

    fn enable_vertex_attribute(&self, location: AttributeLocation) {
        // SAFETY: the context is current on this thread.
        unsafe { self.gl.enable_vertex_attrib_array(location.0) };
    }

    fn disable_vertex_attribute(&self, location: AttributeLocation) {
        // SAFETY: the context is current on this thread.
        unsafe { self.gl.disable_vertex_attrib_array(location.0) };
    }

    fn vertex_attribute_pointer(
        &self,
        location: AttributeLocation,
        descriptor: &VertexAttributeDescriptor,
    ) {
        let GlAttributeFormat {
            size,
            data_type,
            normalized,
        } = descriptor.format.into_gl();
        // SAFETY: the context is current on this thread and an array buffer is bound.
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location.0,
                size,
                data_type,
                normalized,
                descriptor.stride as i32,
                descriptor.offset as i32,
            )
        };
    }

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u64,
    ) {
        // SAFETY: the context is current on this thread and an element buffer is bound.
        unsafe {
            self.gl.draw_elements(
                topology.into_gl(),
                count as i32,
                format.into_gl(),
                offset as i32,
            )
        };
    }

    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32) {
        // SAFETY: the context is current on this thread.
        unsafe {
            self.gl
                .draw_arrays(topology.into_gl(), first as i32, count as i32)
        };
    }
}

impl Drop for GlowDevice {
    fn drop(&mut self) {
        let buffers = self.buffers.get_mut().len();
        let vertex_arrays = self.vertex_arrays.get_mut().len();
        if buffers + vertex_arrays > 0 {
            log::warn!(
                "GlowDevice: Dropped with {buffers} buffers and {vertex_arrays} vertex arrays still alive"
            );
        }
    }
}
