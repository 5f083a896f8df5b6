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

use std::collections::HashSet;

use tessera_core::renderer::DeviceCapabilities;

const VERTEX_ARRAY_EXTENSIONS: [&str; 3] = [
    "OES_vertex_array_object",
    "GL_OES_vertex_array_object",
    "GL_ARB_vertex_array_object",
];

const DRAW_BUFFERS_EXTENSIONS: [&str; 3] = [
    "WEBGL_draw_buffers",
    "GL_EXT_draw_buffers",
    "GL_ARB_draw_buffers",
];

/// Derives the capability descriptor of a context from its version and
/// extension list.
///
/// Desktop GL 3+ and GLES 3+ (which covers WebGL 2) have both features in core;
/// older contexts need the matching extensions.
pub fn detect_capabilities(
    major_version: u32,
    is_embedded: bool,
    extensions: &HashSet<String>,
) -> DeviceCapabilities {
    let core = major_version >= 3;
    let has_any = |names: &[&str]| names.iter().any(|name| extensions.contains(*name));

    let capabilities = DeviceCapabilities {
        native_binding_state: core || has_any(&VERTEX_ARRAY_EXTENSIONS),
        multi_draw_targets: core || has_any(&DRAW_BUFFERS_EXTENSIONS),
    };
    log::info!(
        "GlowDevice: {} {} context, {:?}",
        if is_embedded { "GLES" } else { "GL" },
        major_version,
        capabilities
    );
    capabilities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_modern_contexts_have_everything() {
        assert_eq!(
            detect_capabilities(3, true, &HashSet::new()),
            DeviceCapabilities::FULL
        );
        assert_eq!(
            detect_capabilities(4, false, &HashSet::new()),
            DeviceCapabilities::FULL
        );
    }

    #[test]
    fn test_baseline_context_relies_on_extensions() {
        assert_eq!(
            detect_capabilities(2, true, &HashSet::new()),
            DeviceCapabilities::BASELINE
        );
        let caps = detect_capabilities(2, true, &extensions(&["OES_vertex_array_object"]));
        assert!(caps.native_binding_state);
        assert!(!caps.multi_draw_targets);
        let caps = detect_capabilities(2, true, &extensions(&["WEBGL_draw_buffers"]));
        assert!(!caps.native_binding_state);
        assert!(caps.multi_draw_targets);
    }
}
