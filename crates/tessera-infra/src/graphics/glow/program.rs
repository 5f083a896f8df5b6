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

use std::rc::Rc;

use glow::HasContext;
use tessera_core::renderer::{AttributeLocation, ProgramId, ShaderProgram};

/// A linked GL program object.
///
/// Compiling and linking happen elsewhere; this type only carries the
/// identity meshes key their binding states by.
pub struct GlowProgram {
    id: ProgramId,
    gl: Rc<glow::Context>,
    program: glow::Program,
}

impl std::fmt::Debug for GlowProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowProgram")
            .field("id", &self.id)
            .field("program", &self.program)
            .finish()
    }
}

impl GlowProgram {
    /// Wraps a linked program.
    pub fn new(id: ProgramId, gl: Rc<glow::Context>, program: glow::Program) -> Self {
        Self { id, gl, program }
    }

    /// The native program object.
    pub fn native(&self) -> glow::Program {
        self.program
    }
}

impl ShaderProgram for GlowProgram {
    fn id(&self) -> ProgramId {
        self.id
    }

    fn attribute_location(&self, name: &str) -> Option<AttributeLocation> {
        // SAFETY: the context is current on this thread and the program is linked.
        unsafe { self.gl.get_attrib_location(self.program, name) }.map(AttributeLocation)
    }
}
