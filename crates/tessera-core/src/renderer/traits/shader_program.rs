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

use crate::renderer::api::{AttributeLocation, ProgramId};

/// A linked shader program.
///
/// Meshes only need a stable identity to key their binding states and a way
/// to look up attribute slots by name.
pub trait ShaderProgram {
    /// The program's stable identity.
    fn id(&self) -> ProgramId;

    /// The slot bound to the attribute called `name`, or `None` when the
    /// program has no active attribute with that name.
    fn attribute_location(&self, name: &str) -> Option<AttributeLocation>;
}
