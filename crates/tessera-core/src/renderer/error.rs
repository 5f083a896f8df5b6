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

//! Defines the error type reported by device contexts.

use std::fmt;

/// An error related to the creation or use of a GPU resource (buffers, vertex arrays).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A generic resource could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// The device context was lost; every subsequent call on it fails.
    ContextLost,
    /// The device could not allocate storage for the resource.
    OutOfMemory,
    /// The device lacks an optional capability the call depends on.
    FeatureNotSupported(String),
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::ContextLost => write!(f, "The graphics device context was lost."),
            ResourceError::OutOfMemory => write!(f, "Out of GPU memory."),
            ResourceError::FeatureNotSupported(msg) => {
                write!(f, "Feature not supported: {msg}")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ResourceError::ContextLost.to_string(),
            "The graphics device context was lost."
        );
        assert_eq!(
            ResourceError::FeatureNotSupported("vertex arrays".to_string()).to_string(),
            "Feature not supported: vertex arrays"
        );
    }
}
