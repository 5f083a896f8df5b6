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

//! Binding states on native-capable and baseline devices.

use std::rc::Rc;

use anyhow::Result;
use tessera_agents::render_agent::{BindingState, MeshError, Violation};
use tessera_agents::GpuMesh;
use tessera_core::config::RendererConfig;
use tessera_core::renderer::{
    AttributeLocation, AttributeNames, AttributeSlots, BufferTarget, Channel, DeviceCapabilities,
    GraphicsDevice, MeshData, ProgramId, VertexArrayId,
};
use tessera_infra::graphics::headless::{DeviceCall, DrawRecord, HeadlessDevice, StaticProgram};
use tessera_lanes::mesh_lane::CompositeLayout;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn colored_quad() -> MeshData {
    MeshData::new(vec![
        -1.0, -1.0, 0.0, //
        1.0, -1.0, 0.0, //
        1.0, 1.0, 0.0, //
        -1.0, 1.0, 0.0,
    ])
    .unwrap()
    .with_colors(vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255])
    .unwrap()
    .with_faces(
        CompositeLayout::default()
            .parse_faces(&["1//1", "2//2", "3//3", "1//1", "3//3", "4//4"])
            .unwrap(),
    )
    .with_label("quad")
}

fn slots() -> AttributeSlots {
    AttributeSlots::new()
        .with(Channel::Position, 0)
        .with(Channel::Color, 1)
}

fn uploaded(device: &Rc<HeadlessDevice>, data: MeshData) -> Result<GpuMesh> {
    let mut mesh = GpuMesh::new(device.clone(), data)?;
    pollster::block_on(mesh.upload())?;
    Ok(mesh)
}

/// A draw record with the vertex array cleared, for comparing paths.
fn as_seen_by_shader(record: &DrawRecord) -> DrawRecord {
    DrawRecord {
        vertex_array: None,
        ..record.clone()
    }
}

#[test]
fn test_native_binding_state_is_created_once_and_reused() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = uploaded(&device, colored_quad())?;
    let program = ProgramId(1);

    device.clear_trace();
    mesh.create_binding_state(program, &slots())?;
    assert_eq!(
        mesh.binding_state(program),
        Some(BindingState::Native(VertexArrayId(0)))
    );
    assert!(device.ambient_state().is_clean());

    // The element buffer is bound while the vertex array is, and never unbound inside it.
    let calls = device.calls().to_vec();
    let element_binds: Vec<_> = calls
        .iter()
        .filter(|call| matches!(call, DeviceCall::BindBuffer(BufferTarget::ElementArray, _)))
        .collect();
    assert_eq!(element_binds.len(), 1);
    assert!(matches!(
        calls.last(),
        Some(DeviceCall::BindVertexArray(None))
    ));

    device.clear_trace();
    mesh.draw(program, &slots())?;
    mesh.draw(program, &slots())?;
    assert!(!device.calls().iter().any(DeviceCall::is_lifecycle));
    assert!(!device
        .calls()
        .iter()
        .any(|call| matches!(call, DeviceCall::EnableVertexAttribute(_))));

    let draws = device.draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0], draws[1]);
    assert_eq!(draws[0].vertex_array, Some(VertexArrayId(0)));
    assert_eq!(draws[0].fault, None);
    drop(draws);
    assert!(device.ambient_state().is_clean());

    mesh.release();
    Ok(())
}

#[test]
fn test_fallback_binding_state_reissues_setup_every_draw() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::baseline());
    let mut mesh = uploaded(&device, colored_quad())?;
    let program = ProgramId(1);

    mesh.create_binding_state(program, &slots())?;
    assert_eq!(mesh.binding_state(program), Some(BindingState::Immediate));
    assert_eq!(device.live_vertex_arrays(), 0);

    device.clear_trace();
    mesh.draw(program, &slots())?;
    let enables = device
        .calls()
        .iter()
        .filter(|call| matches!(call, DeviceCall::EnableVertexAttribute(_)))
        .count();
    let disables = device
        .calls()
        .iter()
        .filter(|call| matches!(call, DeviceCall::DisableVertexAttribute(_)))
        .count();
    assert_eq!((enables, disables), (2, 2));
    assert!(device.ambient_state().is_clean());

    mesh.draw(program, &slots())?;
    let draws = device.draws();
    assert_eq!(draws[0], draws[1]);
    drop(draws);

    mesh.release();
    Ok(())
}

#[test]
fn test_native_and_fallback_feed_identical_vertices() -> Result<()> {
    init_logger();
    let native_device = Rc::new(HeadlessDevice::full());
    let fallback_device = Rc::new(HeadlessDevice::baseline());
    let mut native = uploaded(&native_device, colored_quad())?;
    let mut fallback = uploaded(&fallback_device, colored_quad())?;
    let program = ProgramId(9);

    native.create_binding_state(program, &slots())?;
    fallback.create_binding_state(program, &slots())?;
    native.draw(program, &slots())?;
    fallback.draw(program, &slots())?;

    let native_draw = as_seen_by_shader(&native_device.draws()[0]);
    let fallback_draw = as_seen_by_shader(&fallback_device.draws()[0]);
    assert_eq!(native_draw, fallback_draw);
    assert_eq!(native_draw.fetched, vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(
        native_draw.values(1).map(|colors| colors[..3].to_vec()),
        Some(vec![1.0, 0.0, 0.0])
    );
    assert_eq!(native_draw.values(0).map(<[f32]>::len), Some(18));

    native.release();
    fallback.release();
    Ok(())
}

#[test]
fn test_draw_without_binding_state_matches_recorded_one() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = uploaded(&device, colored_quad())?;

    mesh.create_binding_state(ProgramId(1), &slots())?;
    mesh.draw(ProgramId(1), &slots())?;
    // Program 2 never got a binding state.
    mesh.draw(ProgramId(2), &slots())?;

    let draws = device.draws();
    assert_eq!(draws[1].vertex_array, None);
    assert_eq!(as_seen_by_shader(&draws[0]), as_seen_by_shader(&draws[1]));
    drop(draws);
    assert!(device.ambient_state().is_clean());

    mesh.release();
    Ok(())
}

#[test]
fn test_duplicate_binding_state_is_refused() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = uploaded(&device, colored_quad())?;
    mesh.create_binding_state(ProgramId(5), &slots())?;

    let err = mesh
        .create_binding_state(ProgramId(5), &AttributeSlots::new().with(Channel::Position, 3))
        .unwrap_err();
    assert!(matches!(
        err,
        MeshError::PreconditionViolation {
            reason: Violation::AlreadyBound(ProgramId(5)),
            ..
        }
    ));
    assert_eq!(device.live_vertex_arrays(), 1);

    mesh.release();
    Ok(())
}

#[test]
fn test_one_binding_state_per_program() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = uploaded(&device, colored_quad())?;
    mesh.create_binding_state(ProgramId(1), &slots())?;
    mesh.create_binding_state(
        ProgramId(2),
        &AttributeSlots::new().with(Channel::Position, 4),
    )?;
    assert_eq!(device.live_vertex_arrays(), 2);

    mesh.draw(ProgramId(2), &AttributeSlots::new())?;
    let draws = device.draws();
    assert_eq!(draws[0].attributes.len(), 1);
    assert_eq!(draws[0].attributes[0].location, AttributeLocation(4));
    drop(draws);

    mesh.release();
    assert_eq!(device.live_vertex_arrays(), 0);
    Ok(())
}

#[test]
fn test_slots_resolved_from_program_names() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let mut mesh = uploaded(&device, colored_quad())?;
    // The program does not consume colors.
    let program = StaticProgram::new(ProgramId(7), &[("vPosition", 2), ("vNormal", 5)]);

    let slots = mesh.create_binding_state_for(&program, &AttributeNames::default())?;
    assert_eq!(slots.get(Channel::Position), Some(AttributeLocation(2)));
    assert_eq!(slots.get(Channel::Color), None);

    mesh.draw(ProgramId(7), &slots)?;
    let draws = device.draws();
    let locations: Vec<_> = draws[0].attributes.iter().map(|a| a.location).collect();
    assert_eq!(locations, vec![AttributeLocation(2)]);
    drop(draws);

    mesh.release();
    Ok(())
}

#[test]
fn test_config_can_force_immediate_bindings() -> Result<()> {
    init_logger();
    let device = Rc::new(HeadlessDevice::full());
    let config = RendererConfig {
        force_immediate_bindings: true,
        ..Default::default()
    };
    let mut mesh = GpuMesh::with_config(device.clone(), colored_quad(), &config)?;
    pollster::block_on(mesh.upload())?;
    assert_eq!(
        mesh.capabilities(),
        DeviceCapabilities {
            native_binding_state: false,
            multi_draw_targets: true
        }
    );
    assert!(device.capabilities().native_binding_state);

    mesh.create_binding_state(ProgramId(1), &slots())?;
    assert_eq!(mesh.binding_state(ProgramId(1)), Some(BindingState::Immediate));
    assert_eq!(device.live_vertex_arrays(), 0);

    mesh.release();
    Ok(())
}
