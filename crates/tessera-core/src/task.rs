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

//! A minimal cooperative-yield primitive.
//!
//! Mesh uploads are asynchronous so the caller's event loop gets a turn before
//! the upload touches the device. Tessera does not own an executor; any
//! executor (or `pollster::block_on`) can drive these futures.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that is pending on its first poll and ready on the second.
#[derive(Debug, Default)]
#[must_use = "futures do nothing unless awaited"]
pub struct NextTurn {
    yielded: bool,
}

impl Future for NextTurn {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Yields control back to the executor once.
pub fn next_turn() -> NextTurn {
    NextTurn::default()
}
