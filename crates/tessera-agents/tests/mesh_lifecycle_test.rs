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

//! Lifecycle of `GpuMesh` against the headless device: resolution through
//! upload, state transitions and release.

use std::rc::Rc;

use anyhow::Result;
use tessera_agents::render_agent::{MeshError, MeshState, Violation};
use tessera_agents::GpuMesh;
use tessera_core::renderer::{AttributeSlots, Channel, MeshData, ProgramId};
use tessera_infra::graphics::headless::{DeviceCall, HeadlessDevice};
use tessera_lanes::mesh_lane::CompositeLayout;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn square(faces: &[&str]) -> MeshData {
    MeshData::new(vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 1.0, 0.0, //
        0.0, 1.0, 0.0,
    ])
    .unwrap()
    .with_faces(CompositeLayout::default().parse_faces(faces).unwrap())
    .with_label("square")
}

fn index_buffer_contents(device: &HeadlessDevice) -> Vec<u16> {
    // The index buffer is created last.
    let id = device
        .calls()
        .iter()
        .filter_map(|call| match call {
            DeviceCall::CreateBuffer(id) => Some(*id),
            _ => None,
        })
        .last()
        .unwrap();
    let bytes = device.buffer_contents(id).unwrap();
    bytes
        .chunks_exact(2)
        .map(bytemuck::pod_read_unaligned::<u16>)
        .collect()
}

fn is_wrong_state(err: &MeshError, expected: MeshState) -> bool {
    matches!(
        err,
        MeshError::PreconditionViolation {
            reason: Violation::WrongState(state),
            ..
        } if *state == expected
    )
}

#[test]
fn test_shared_corners_upload_compact_indices() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = GpuMesh::new(device.clone(), square(&["1", "2", "3", "1", "3", "4"]))?;

    pollster::block_on(mesh.upload())?;

    assert_eq!(mesh.state(), MeshState::Ready);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_count(), 6);
    assert_eq!(index_buffer_contents(&device), vec![0, 1, 2, 0, 2, 3]);
    mesh.release();
    Ok(())
}

#[test]
fn test_texcoords_split_vertices_on_upload() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let data = MeshData::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])?
        .with_tex_coords(vec![0.0, 0.0, 1.0, 1.0])?
        .with_faces(CompositeLayout::default().parse_faces(&["1/1", "2/2", "3/1"])?);
    let mut mesh = GpuMesh::new(device.clone(), data)?;

    pollster::block_on(mesh.upload())?;

    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(index_buffer_contents(&device), vec![0, 1, 2]);
    // Buffers are created in channel order: position, then texture coordinates.
    let tex_coords = device
        .buffer_contents(tessera_core::renderer::BufferId(1))
        .unwrap();
    let tex_coords: Vec<f32> = tex_coords
        .chunks_exact(4)
        .map(bytemuck::pod_read_unaligned::<f32>)
        .collect();
    assert_eq!(tex_coords, vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    mesh.release();
    Ok(())
}

#[test]
fn test_upload_yields_before_touching_the_device() {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = GpuMesh::new(device.clone(), square(&["1", "2", "3"])).unwrap();
    let calls_after_construction = device.call_count();

    {
        let future = mesh.upload();
        // Creating the future does no work.
        assert_eq!(device.call_count(), calls_after_construction);
        pollster::block_on(future).unwrap();
    }
    assert!(device.call_count() > calls_after_construction);
    mesh.release();
}

#[test]
fn test_operations_before_upload_are_refused() {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = GpuMesh::new(device.clone(), square(&["1", "2", "3"])).unwrap();
    let slots = AttributeSlots::new().with(Channel::Position, 0);

    let err = mesh.draw(ProgramId(1), &slots).unwrap_err();
    assert!(is_wrong_state(&err, MeshState::Constructed));
    let err = mesh.create_binding_state(ProgramId(1), &slots).unwrap_err();
    assert!(is_wrong_state(&err, MeshState::Constructed));
    assert!(device.draws().is_empty());
    mesh.release();
}

#[test]
fn test_second_upload_is_refused() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = GpuMesh::new(device.clone(), square(&["1", "2", "3"]))?;
    pollster::block_on(mesh.upload())?;

    let err = pollster::block_on(mesh.upload()).unwrap_err();
    assert!(is_wrong_state(&err, MeshState::Ready));
    assert_eq!(mesh.state(), MeshState::Ready);
    mesh.release();
    Ok(())
}

#[test]
fn test_bad_face_list_fails_upload_and_blocks_drawing() {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = GpuMesh::new(device.clone(), square(&["1", "2", "9"])).unwrap();

    let err = pollster::block_on(mesh.upload()).unwrap_err();
    assert!(matches!(err, MeshError::InputFormat(_)));
    assert!(err.to_string().starts_with("composite index resolver:"));
    assert_eq!(mesh.state(), MeshState::Uploading);

    let slots = AttributeSlots::new().with(Channel::Position, 0);
    let err = mesh.draw(ProgramId(0), &slots).unwrap_err();
    assert!(is_wrong_state(&err, MeshState::Uploading));
    let err = pollster::block_on(mesh.upload()).unwrap_err();
    assert!(is_wrong_state(&err, MeshState::Uploading));
    mesh.release();
}

#[test]
fn test_release_is_idempotent_and_final() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = GpuMesh::new(device.clone(), square(&["1", "2", "3", "1", "3", "4"]))?;
    pollster::block_on(mesh.upload())?;
    let slots = AttributeSlots::new().with(Channel::Position, 0);
    mesh.create_binding_state(ProgramId(3), &slots)?;
    assert_eq!(device.live_vertex_arrays(), 1);

    mesh.release();
    assert_eq!(mesh.state(), MeshState::Released);
    assert_eq!(device.live_buffers(), 0);
    assert_eq!(device.live_vertex_arrays(), 0);
    assert_eq!(device.allocated_bytes(), 0);

    let calls = device.call_count();
    mesh.release();
    assert_eq!(device.call_count(), calls);

    let err = mesh.draw(ProgramId(3), &slots).unwrap_err();
    assert!(is_wrong_state(&err, MeshState::Released));
    let err = mesh.create_binding_state(ProgramId(4), &slots).unwrap_err();
    assert!(is_wrong_state(&err, MeshState::Released));
    Ok(())
}

#[test]
fn test_release_skips_objects_the_device_no_longer_has() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = GpuMesh::new(device.clone(), square(&["1", "2", "3"]))?;
    pollster::block_on(mesh.upload())?;

    device.lose_context();
    device.clear_trace();
    mesh.release();

    assert!(device
        .calls()
        .iter()
        .all(|call| matches!(call, DeviceCall::IsBuffer(_) | DeviceCall::IsVertexArray(_))));
    assert_eq!(mesh.state(), MeshState::Released);
    Ok(())
}

#[test]
fn test_release_from_constructed_state() {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = GpuMesh::new(device.clone(), square(&[])).unwrap();
    assert_eq!(device.live_buffers(), 1);
    mesh.release();
    assert_eq!(device.live_buffers(), 0);
}

#[test]
fn test_drop_releases_forgotten_mesh() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    {
        let mut mesh = GpuMesh::new(device.clone(), square(&["1", "2", "3"]))?;
        pollster::block_on(mesh.upload())?;
        assert_eq!(device.live_buffers(), 2);
    }
    assert_eq!(device.live_buffers(), 0);
    Ok(())
}
