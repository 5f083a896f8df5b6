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

// Tessera Sandbox
// Loads a model and runs the full mesh lifecycle on both flavors of the
// headless device. The glow backend needs a host-provided GL context and is
// not driven from here.
//
// Usage: sandbox [MODEL.{json,ron,obj}] [--config RENDERER.ron]

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use tessera_agents::GpuMesh;
use tessera_core::config::RendererConfig;
use tessera_core::renderer::{DeviceCapabilities, MeshData, ProgramId};
use tessera_infra::graphics::headless::{DrawRecord, HeadlessDevice, StaticProgram};
use tessera_lanes::asset_lane::{loader_for_extension, AssetLoaderLane, ModelLoaderLane};
use tessera_lanes::mesh_lane::CompositeLayout;

const BUILTIN_QUAD: &str = include_str!("../assets/models/quad.json");

struct Args {
    model: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        model: None,
        config: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            _ if args.model.is_none() => args.model = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{arg}'"),
        }
    }
    Ok(args)
}

fn load_model(path: Option<&Path>, config: &RendererConfig) -> Result<MeshData> {
    let layout = CompositeLayout::from_config(config)?;
    let Some(path) = path else {
        log::info!("Sandbox: no model given, using the built-in quad");
        return ModelLoaderLane::new(layout)
            .load(BUILTIN_QUAD.as_bytes())
            .map_err(|e| anyhow::anyhow!(e));
    };

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let mesh = match extension {
        "json" | "ron" => ModelLoaderLane::new(layout).load(&bytes),
        other => loader_for_extension(other)
            .with_context(|| format!("no loader for '.{other}' files"))?
            .load(&bytes),
    }
    .map_err(|e| anyhow::anyhow!(e))
    .with_context(|| format!("loading {}", path.display()))?;
    Ok(mesh)
}

/// Uploads, binds and draws the model on one device; returns the draw records.
fn run_on(
    capabilities: DeviceCapabilities,
    data: MeshData,
    config: &RendererConfig,
) -> Result<Vec<DrawRecord>> {
    let device = Rc::new(HeadlessDevice::new(capabilities));
    let program = StaticProgram::new(
        ProgramId(0),
        &[("vPosition", 0), ("vColor", 1), ("vTexCoord", 2), ("vNormal", 3)],
    );

    let mut mesh = GpuMesh::with_config(device.clone(), data, config)?;
    pollster::block_on(mesh.upload())?;
    let slots = mesh.create_binding_state_for(&program, &config.attribute_names)?;
    mesh.draw(ProgramId(0), &slots)?;
    mesh.draw(ProgramId(0), &slots)?;

    log::info!(
        "Sandbox: {:?} -> {} vertices, {} indices, {} bytes on device, {} device calls",
        mesh.binding_state(ProgramId(0)),
        mesh.vertex_count(),
        mesh.index_count(),
        device.allocated_bytes(),
        device.call_count()
    );
    mesh.release();

    let draws = device.draws().to_vec();
    if let Some(fault) = draws.iter().find_map(|draw| draw.fault.clone()) {
        bail!("draw fault: {fault}");
    }
    if !device.ambient_state().is_clean() {
        bail!("binding state leaked: {:?}", device.ambient_state());
    }
    Ok(draws)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => RendererConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("loading {}", path.display()))?,
        None => RendererConfig::default(),
    };
    let data = load_model(args.model.as_deref(), &config)?;

    let native = run_on(DeviceCapabilities::FULL, data.clone(), &config)?;
    let fallback = run_on(DeviceCapabilities::BASELINE, data, &config)?;

    let same = native
        .iter()
        .zip(&fallback)
        .all(|(a, b)| a.assembled == b.assembled && a.fetched == b.fetched);
    if !same {
        bail!("native and fallback bindings fed different vertices");
    }
    log::info!(
        "Sandbox: {} draws on each device, native and fallback agree",
        native.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";

    #[test]
    fn test_builtin_quad_agrees_on_both_devices() -> Result<()> {
        let config = RendererConfig::default();
        let data = load_model(None, &config)?;

        let native = run_on(DeviceCapabilities::FULL, data.clone(), &config)?;
        let fallback = run_on(DeviceCapabilities::BASELINE, data, &config)?;

        assert_eq!(native.len(), 2);
        assert_eq!(native.len(), fallback.len());
        for (a, b) in native.iter().zip(&fallback) {
            assert_eq!(a.assembled, b.assembled);
        }
        Ok(())
    }

    #[test]
    fn test_obj_file_loads_through_extension_lookup() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile()?;
        file.write_all(TRIANGLE_OBJ.as_bytes())?;

        let data = load_model(Some(file.path()), &RendererConfig::default())?;
        assert!(!data.faces().is_empty());
        Ok(())
    }

    #[test]
    fn test_malformed_model_reports_its_path() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
        file.write_all(b"{ not json")?;

        let err = load_model(Some(file.path()), &RendererConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("loading "));
        Ok(())
    }
}
