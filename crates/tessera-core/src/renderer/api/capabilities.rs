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

//! The capability descriptor of a device context.

use crate::config::RendererConfig;

/// Optional features of a device context, resolved once when the context is created.
///
/// The two backend flavors Tessera targets differ only in these flags: a
/// baseline context (OpenGL ES 2 / WebGL 1 without extensions) has neither,
/// a modern one (OpenGL 3+, OpenGL ES 3, WebGL 2) has both. Consumers branch on
/// these flags instead of inspecting the concrete context type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceCapabilities {
    /// Reusable vertex-array objects that capture attribute bindings.
    pub native_binding_state: bool,
    /// Drawing into several color attachments at once.
    pub multi_draw_targets: bool,
}

impl DeviceCapabilities {
    /// Capabilities of a modern context.
    pub const FULL: Self = Self {
        native_binding_state: true,
        multi_draw_targets: true,
    };

    /// Capabilities of a baseline context without extensions.
    pub const BASELINE: Self = Self {
        native_binding_state: false,
        multi_draw_targets: false,
    };

    /// Applies the downgrades requested by the configuration.
    ///
    /// Configuration can only remove capabilities, never add them.
    pub fn restricted_by(self, config: &RendererConfig) -> Self {
        let restricted = Self {
            native_binding_state: self.native_binding_state && !config.force_immediate_bindings,
            multi_draw_targets: self.multi_draw_targets,
        };
        if restricted != self {
            log::warn!(
                "DeviceCapabilities: configuration downgraded {:?} to {:?}",
                self,
                restricted
            );
        }
        restricted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restriction_only_removes() {
        let config = RendererConfig {
            force_immediate_bindings: true,
            ..Default::default()
        };
        let caps = DeviceCapabilities::FULL.restricted_by(&config);
        assert!(!caps.native_binding_state);
        assert!(caps.multi_draw_targets);

        let caps = DeviceCapabilities::BASELINE.restricted_by(&RendererConfig::default());
        assert_eq!(caps, DeviceCapabilities::BASELINE);
    }
}
