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

//! Bookkeeping for driver objects behind the opaque ids handed to callers.

use std::collections::HashMap;
use std::hash::Hash;

use tessera_core::renderer::{BufferId, VertexArrayId};

/// An opaque handle minted by a [`Registry`].
pub(crate) trait RegistryKey: Copy + Eq + Hash {
    fn from_index(index: usize) -> Self;
}

impl RegistryKey for BufferId {
    fn from_index(index: usize) -> Self {
        BufferId(index)
    }
}

impl RegistryKey for VertexArrayId {
    fn from_index(index: usize) -> Self {
        VertexArrayId(index)
    }
}

#[derive(Debug)]
struct Entry<N> {
    native: N,
    size: usize, // To track allocated bytes accurately on destruction
}

/// Maps handles to live driver objects and tracks the bytes they hold.
///
/// Handles are never reused, so a stale handle stays unknown after its
/// object is removed.
#[derive(Debug)]
pub(crate) struct Registry<K, N> {
    entries: HashMap<K, Entry<N>>,
    next_index: usize,
    allocated_bytes: usize,
}

impl<K: RegistryKey, N: Copy> Registry<K, N> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_index: 0,
            allocated_bytes: 0,
        }
    }

    /// Registers `native` and returns its new handle.
    pub fn insert(&mut self, native: N) -> K {
        let key = K::from_index(self.next_index);
        self.next_index += 1;
        self.entries.insert(key, Entry { native, size: 0 });
        key
    }

    pub fn get(&self, key: K) -> Option<N> {
        self.entries.get(&key).map(|entry| entry.native)
    }

    pub fn contains(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    /// Records that the object behind `key` now holds `size` bytes.
    ///
    /// Returns `false` for an unknown handle.
    pub fn set_size(&mut self, key: K, size: usize) -> bool {
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };
        self.allocated_bytes = self.allocated_bytes - entry.size + size;
        entry.size = size;
        true
    }

    /// Unregisters `key`, returning its driver object if it was live.
    pub fn remove(&mut self, key: K) -> Option<N> {
        let entry = self.entries.remove(&key)?;
        self.allocated_bytes -= entry.size;
        Some(entry.native)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn allocated_bytes(&self) -> usize {
        self.allocated_bytes
    }
}
