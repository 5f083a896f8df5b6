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

//! Composite-index parsing and resolution.
//!
//! A face list references each channel through its own index, so one position
//! can be paired with several texture coordinates. GPUs consume a single index
//! per vertex; the resolver bridges the two by giving every distinct
//! combination its own output vertex.

mod composite;
mod error;
mod resolver;

pub use composite::*;
pub use error::InputFormatError;
pub use resolver::*;
