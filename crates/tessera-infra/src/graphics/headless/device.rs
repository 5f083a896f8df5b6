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

use std::cell::{Cell, Ref, RefCell};
use std::collections::{BTreeMap, HashMap};

use tessera_core::renderer::{
    AttributeLocation, BufferId, BufferTarget, BufferUsage, DeviceCapabilities, GraphicsDevice,
    IndexFormat, PrimitiveTopology, ResourceError, VertexArrayId, VertexAttributeDescriptor,
    VertexFormat,
};

use super::trace::{AmbientState, BoundAttribute, DeviceCall, DrawKind, DrawRecord};

#[derive(Debug, Clone, Copy)]
struct AttributePointer {
    buffer: BufferId,
    descriptor: VertexAttributeDescriptor,
}

#[derive(Debug, Clone, Copy, Default)]
struct AttributeState {
    enabled: bool,
    pointer: Option<AttributePointer>,
}

/// The state a vertex-array object captures.
#[derive(Debug, Clone, Default)]
struct VertexArrayState {
    element_buffer: Option<BufferId>,
    attributes: BTreeMap<AttributeLocation, AttributeState>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    buffers: HashMap<BufferId, Vec<u8>>,
    vertex_arrays: HashMap<VertexArrayId, VertexArrayState>,
    default_vertex_array: VertexArrayState,
    bound_vertex_array: Option<VertexArrayId>,
    array_buffer: Option<BufferId>,
    next_buffer_id: usize,
    next_vertex_array_id: usize,
    allocated_bytes: usize,
    peak_bytes: usize,
}

impl HeadlessState {
    fn current_vertex_array(&self) -> &VertexArrayState {
        self.bound_vertex_array
            .and_then(|id| self.vertex_arrays.get(&id))
            .unwrap_or(&self.default_vertex_array)
    }

    fn current_vertex_array_mut(&mut self) -> &mut VertexArrayState {
        match self.bound_vertex_array {
            Some(id) if self.vertex_arrays.contains_key(&id) => self
                .vertex_arrays
                .entry(id)
                .or_default(),
            _ => &mut self.default_vertex_array,
        }
    }

    fn bound_buffer(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => self.current_vertex_array().element_buffer,
        }
    }
}

/// A recording device context that emulates OpenGL binding semantics.
///
/// The capability flags are chosen at construction, so the same device type
/// stands in for both a modern context and a baseline one. On a baseline
/// device [`create_vertex_array`](GraphicsDevice::create_vertex_array) fails
/// the way it would without the extension.
#[derive(Debug)]
pub struct HeadlessDevice {
    capabilities: DeviceCapabilities,
    state: RefCell<HeadlessState>,
    calls: RefCell<Vec<DeviceCall>>,
    draws: RefCell<Vec<DrawRecord>>,
    context_lost: Cell<bool>,
}

impl HeadlessDevice {
    /// Creates a device reporting `capabilities`.
    pub fn new(capabilities: DeviceCapabilities) -> Self {
        log::info!("HeadlessDevice: Created with {capabilities:?}");
        Self {
            capabilities,
            state: RefCell::new(HeadlessState::default()),
            calls: RefCell::new(Vec::new()),
            draws: RefCell::new(Vec::new()),
            context_lost: Cell::new(false),
        }
    }

    /// A device standing in for a modern context.
    pub fn full() -> Self {
        Self::new(DeviceCapabilities::FULL)
    }

    /// A device standing in for a baseline context without extensions.
    pub fn baseline() -> Self {
        Self::new(DeviceCapabilities::BASELINE)
    }

    /// Simulates a lost context: creation and uploads fail from now on and
    /// existing objects stop being reported as live.
    pub fn lose_context(&self) {
        log::warn!("HeadlessDevice: Context lost");
        self.context_lost.set(true);
    }

    /// Every call made so far, in issue order.
    pub fn calls(&self) -> Ref<'_, [DeviceCall]> {
        Ref::map(self.calls.borrow(), Vec::as_slice)
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Forgets recorded calls and draws; device state is kept.
    pub fn clear_trace(&self) {
        self.calls.borrow_mut().clear();
        self.draws.borrow_mut().clear();
    }

    /// Every draw made so far.
    pub fn draws(&self) -> Ref<'_, [DrawRecord]> {
        Ref::map(self.draws.borrow(), Vec::as_slice)
    }

    /// Bytes currently held by live buffers.
    pub fn allocated_bytes(&self) -> usize {
        self.state.borrow().allocated_bytes
    }

    /// The highest value [`allocated_bytes`](Self::allocated_bytes) has reached.
    pub fn peak_bytes(&self) -> usize {
        self.state.borrow().peak_bytes
    }

    /// Number of live buffer objects.
    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    /// Number of live vertex-array objects.
    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    /// A copy of the storage of `buffer`.
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }

    /// The binding state outside any vertex-array object.
    pub fn ambient_state(&self) -> AmbientState {
        let state = self.state.borrow();
        AmbientState {
            array_buffer: state.array_buffer,
            vertex_array: state.bound_vertex_array,
            element_buffer: state.default_vertex_array.element_buffer,
            enabled_attributes: state
                .default_vertex_array
                .attributes
                .iter()
                .filter(|(_, attribute)| attribute.enabled)
                .map(|(&location, _)| location)
                .collect(),
        }
    }

    fn record(&self, call: DeviceCall) {
        log::trace!("HeadlessDevice: {call:?}");
        self.calls.borrow_mut().push(call);
    }

    fn check_context(&self) -> Result<(), ResourceError> {
        if self.context_lost.get() {
            Err(ResourceError::ContextLost)
        } else {
            Ok(())
        }
    }

    fn record_draw(&self, kind: DrawKind, vertices: Result<Vec<u32>, String>) {
        let state = self.state.borrow();
        let vertex_array = state.current_vertex_array();
        let mut record = DrawRecord {
            kind,
            vertex_array: state.bound_vertex_array,
            attributes: Vec::new(),
            element_buffer: vertex_array.element_buffer,
            fetched: Vec::new(),
            assembled: BTreeMap::new(),
            fault: None,
        };

        let result = vertices.and_then(|fetched| {
            for (&location, attribute) in &vertex_array.attributes {
                if !attribute.enabled {
                    continue;
                }
                let pointer = attribute
                    .pointer
                    .ok_or_else(|| format!("attribute {} enabled without a pointer", location.0))?;
                record.attributes.push(BoundAttribute {
                    location,
                    buffer: pointer.buffer,
                    descriptor: pointer.descriptor,
                });
                let data = state
                    .buffers
                    .get(&pointer.buffer)
                    .ok_or_else(|| format!("attribute {} reads a deleted buffer", location.0))?;
                let values = fetch_attribute(data, &pointer.descriptor, &fetched)
                    .ok_or_else(|| format!("attribute {} reads past its buffer", location.0))?;
                record.assembled.insert(location, values);
            }
            record.fetched = fetched;
            Ok(())
        });

        if let Err(fault) = result {
            log::warn!("HeadlessDevice: Draw fault: {fault}");
            record.fault = Some(fault);
        }
        drop(state);
        self.draws.borrow_mut().push(record);
    }
}

/// Reads the elements of one attribute for each fetched vertex.
fn fetch_attribute(
    data: &[u8],
    descriptor: &VertexAttributeDescriptor,
    vertices: &[u32],
) -> Option<Vec<f32>> {
    let format = descriptor.format;
    let stride = descriptor.effective_stride() as usize;
    let component_size = format.component_size() as usize;
    let mut values = Vec::with_capacity(vertices.len() * format.components() as usize);

    for &vertex in vertices {
        let start = descriptor.offset as usize + vertex as usize * stride;
        let element = data.get(start..start + format.size() as usize)?;
        for component in element.chunks_exact(component_size) {
            values.push(match format {
                VertexFormat::Unorm8x3 => component[0] as f32 / 255.0,
                VertexFormat::Float32x2 | VertexFormat::Float32x3 => {
                    bytemuck::pod_read_unaligned::<f32>(component)
                }
            });
        }
    }
    Some(values)
}

/// Reads `count` indices of `format` starting at byte `offset`.
fn fetch_indices(data: &[u8], count: u32, format: IndexFormat, offset: u64) -> Option<Vec<u32>> {
    let size = format.size() as usize;
    let start = offset as usize;
    let bytes = data.get(start..start + count as usize * size)?;
    Some(
        bytes
            .chunks_exact(size)
            .map(|chunk| match format {
                IndexFormat::Uint16 => bytemuck::pod_read_unaligned::<u16>(chunk) as u32,
                IndexFormat::Uint32 => bytemuck::pod_read_unaligned::<u32>(chunk),
            })
            .collect(),
    )
}

impl GraphicsDevice for HeadlessDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn create_buffer(&self) -> Result<BufferId, ResourceError> {
        self.check_context()?;
        let mut state = self.state.borrow_mut();
        let id = BufferId(state.next_buffer_id);
        state.next_buffer_id += 1;
        state.buffers.insert(id, Vec::new());
        drop(state);

        self.record(DeviceCall::CreateBuffer(id));
        log::debug!("HeadlessDevice: Created buffer with ID: {id:?}");
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        self.record(DeviceCall::BindBuffer(target, buffer));
        let mut state = self.state.borrow_mut();
        if let Some(id) = buffer {
            if !state.buffers.contains_key(&id) {
                log::warn!("HeadlessDevice: Ignoring bind of unknown buffer {id:?}");
                return;
            }
        }
        match target {
            BufferTarget::Array => state.array_buffer = buffer,
            BufferTarget::ElementArray => state.current_vertex_array_mut().element_buffer = buffer,
        }
    }

    fn buffer_data(
        &self,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), ResourceError> {
        self.record(DeviceCall::BufferData {
            target,
            len: data.len(),
            usage,
        });
        self.check_context()?;

        let mut state = self.state.borrow_mut();
        let id = state.bound_buffer(target).ok_or(ResourceError::NotFound)?;
        let storage = state.buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let previous = std::mem::replace(storage, data.to_vec()).len();
        state.allocated_bytes = state.allocated_bytes - previous + data.len();
        state.peak_bytes = state.peak_bytes.max(state.allocated_bytes);
        Ok(())
    }

    fn is_buffer(&self, buffer: BufferId) -> bool {
        self.record(DeviceCall::IsBuffer(buffer));
        !self.context_lost.get() && self.state.borrow().buffers.contains_key(&buffer)
    }

    fn delete_buffer(&self, buffer: BufferId) {
        self.record(DeviceCall::DeleteBuffer(buffer));
        let mut state = self.state.borrow_mut();
        let Some(storage) = state.buffers.remove(&buffer) else {
            return;
        };
        state.allocated_bytes -= storage.len();
        if state.array_buffer == Some(buffer) {
            state.array_buffer = None;
        }
        let vertex_array = state.current_vertex_array_mut();
        if vertex_array.element_buffer == Some(buffer) {
            vertex_array.element_buffer = None;
        }
        log::debug!("HeadlessDevice: Destroyed buffer with ID: {buffer:?}");
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError> {
        self.check_context()?;
        if !self.capabilities.native_binding_state {
            return Err(ResourceError::FeatureNotSupported(
                "vertex array objects".to_string(),
            ));
        }
        let mut state = self.state.borrow_mut();
        let id = VertexArrayId(state.next_vertex_array_id);
        state.next_vertex_array_id += 1;
        state.vertex_arrays.insert(id, VertexArrayState::default());
        drop(state);

        self.record(DeviceCall::CreateVertexArray(id));
        log::debug!("HeadlessDevice: Created vertex array with ID: {id:?}");
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        self.record(DeviceCall::BindVertexArray(vertex_array));
        let mut state = self.state.borrow_mut();
        if let Some(id) = vertex_array {
            if !state.vertex_arrays.contains_key(&id) {
                log::warn!("HeadlessDevice: Ignoring bind of unknown vertex array {id:?}");
                return;
            }
        }
        state.bound_vertex_array = vertex_array;
    }

    fn is_vertex_array(&self, vertex_array: VertexArrayId) -> bool {
        self.record(DeviceCall::IsVertexArray(vertex_array));
        !self.context_lost.get() && self.state.borrow().vertex_arrays.contains_key(&vertex_array)
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) {
        self.record(DeviceCall::DeleteVertexArray(vertex_array));
        let mut state = self.state.borrow_mut();
        if state.vertex_arrays.remove(&vertex_array).is_none() {
            return;
        }
        if state.bound_vertex_array == Some(vertex_array) {
            state.bound_vertex_array = None;
        }
        log::debug!("HeadlessDevice: Destroyed vertex array with ID: {vertex_array:?}");
    }

    fn enable_vertex_attribute(&self, location: AttributeLocation) {
        self.record(DeviceCall::EnableVertexAttribute(location));
        let mut state = self.state.borrow_mut();
        state
            .current_vertex_array_mut()
            .attributes
            .entry(location)
            .or_default()
            .enabled = true;
    }

    fn disable_vertex_attribute(&self, location: AttributeLocation) {
        self.record(DeviceCall::DisableVertexAttribute(location));
        let mut state = self.state.borrow_mut();
        if let Some(attribute) = state.current_vertex_array_mut().attributes.get_mut(&location) {
            attribute.enabled = false;
        }
    }

    fn vertex_attribute_pointer(
        &self,
        location: AttributeLocation,
        descriptor: &VertexAttributeDescriptor,
    ) {
        self.record(DeviceCall::VertexAttributePointer(location, *descriptor));
        let mut state = self.state.borrow_mut();
        let Some(buffer) = state.array_buffer else {
            log::warn!(
                "HeadlessDevice: Attribute {} pointer set with no array buffer bound",
                location.0
            );
            return;
        };
        state
            .current_vertex_array_mut()
            .attributes
            .entry(location)
            .or_default()
            .pointer = Some(AttributePointer {
            buffer,
            descriptor: *descriptor,
        });
    }

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u64,
    ) {
        self.record(DeviceCall::DrawElements {
            topology,
            count,
            format,
            offset,
        });
        if self.context_lost.get() {
            return;
        }
        let indices = {
            let state = self.state.borrow();
            state
                .current_vertex_array()
                .element_buffer
                .ok_or_else(|| "no element buffer bound".to_string())
                .and_then(|id| {
                    state
                        .buffers
                        .get(&id)
                        .and_then(|data| fetch_indices(data, count, format, offset))
                        .ok_or_else(|| "indices read past the element buffer".to_string())
                })
        };
        self.record_draw(
            DrawKind::Elements {
                topology,
                count,
                format,
            },
            indices,
        );
    }

    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32) {
        self.record(DeviceCall::DrawArrays {
            topology,
            first,
            count,
        });
        if self.context_lost.get() {
            return;
        }
        self.record_draw(
            DrawKind::Arrays {
                topology,
                first,
                count,
            },
            Ok((first..first + count).collect()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(device: &HeadlessDevice, target: BufferTarget, data: &[u8]) -> BufferId {
        let id = device.create_buffer().unwrap();
        device.bind_buffer(target, Some(id));
        device
            .buffer_data(target, data, BufferUsage::StaticDraw)
            .unwrap();
        device.bind_buffer(target, None);
        id
    }

    #[test]
    fn test_buffer_data_tracks_bytes() {
        let device = HeadlessDevice::full();
        let id = upload(&device, BufferTarget::Array, &[0u8; 12]);
        assert_eq!(device.allocated_bytes(), 12);
        assert!(device.is_buffer(id));

        device.delete_buffer(id);
        assert_eq!(device.allocated_bytes(), 0);
        assert_eq!(device.peak_bytes(), 12);
        assert!(!device.is_buffer(id));
        // Deleting twice is a no-op.
        device.delete_buffer(id);
    }

    #[test]
    fn test_buffer_data_without_binding_fails() {
        let device = HeadlessDevice::full();
        assert_eq!(
            device.buffer_data(BufferTarget::Array, &[1, 2, 3], BufferUsage::StaticDraw),
            Err(ResourceError::NotFound)
        );
    }

    #[test]
    fn test_vertex_array_captures_element_buffer() {
        let device = HeadlessDevice::full();
        let indices = upload(&device, BufferTarget::ElementArray, bytemuck::cast_slice(&[0u16, 1, 2]));
        let vao = device.create_vertex_array().unwrap();

        device.bind_vertex_array(Some(vao));
        device.bind_buffer(BufferTarget::ElementArray, Some(indices));
        device.bind_vertex_array(None);
        assert!(device.ambient_state().is_clean());

        device.bind_vertex_array(Some(vao));
        device.draw_elements(PrimitiveTopology::TriangleList, 3, IndexFormat::Uint16, 0);
        device.bind_vertex_array(None);

        let draws = device.draws();
        assert_eq!(draws[0].element_buffer, Some(indices));
        assert_eq!(draws[0].fetched, vec![0, 1, 2]);
        assert_eq!(draws[0].fault, None);
    }

    #[test]
    fn test_draw_assembles_normalized_and_float_attributes() {
        let device = HeadlessDevice::baseline();
        let positions: [f32; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let position_buffer = upload(&device, BufferTarget::Array, bytemuck::cast_slice(&positions));
        let color_buffer = upload(&device, BufferTarget::Array, &[255, 0, 51, 0, 255, 0]);

        device.bind_buffer(BufferTarget::Array, Some(position_buffer));
        device.enable_vertex_attribute(AttributeLocation(0));
        device.vertex_attribute_pointer(
            AttributeLocation(0),
            &VertexAttributeDescriptor::packed(VertexFormat::Float32x3),
        );
        device.bind_buffer(BufferTarget::Array, Some(color_buffer));
        device.enable_vertex_attribute(AttributeLocation(1));
        device.vertex_attribute_pointer(
            AttributeLocation(1),
            &VertexAttributeDescriptor::packed(VertexFormat::Unorm8x3),
        );
        device.draw_arrays(PrimitiveTopology::TriangleList, 1, 1);

        let draws = device.draws();
        assert_eq!(draws[0].values(0), Some(&[3.0, 4.0, 5.0][..]));
        assert_eq!(draws[0].values(1), Some(&[0.0, 1.0, 0.0][..]));
        assert_eq!(
            device.ambient_state().enabled_attributes,
            vec![AttributeLocation(0), AttributeLocation(1)]
        );
    }

    #[test]
    fn test_baseline_has_no_vertex_arrays() {
        let device = HeadlessDevice::baseline();
        assert!(matches!(
            device.create_vertex_array(),
            Err(ResourceError::FeatureNotSupported(_))
        ));
    }

    #[test]
    fn test_lost_context_rejects_work() {
        let device = HeadlessDevice::full();
        let id = device.create_buffer().unwrap();
        device.lose_context();
        assert_eq!(device.create_buffer(), Err(ResourceError::ContextLost));
        device.bind_buffer(BufferTarget::Array, Some(id));
        assert_eq!(
            device.buffer_data(BufferTarget::Array, &[0; 4], BufferUsage::StaticDraw),
            Err(ResourceError::ContextLost)
        );
        assert!(!device.is_buffer(id));
    }
}
