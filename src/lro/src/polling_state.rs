// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// The state of a polling loop.
///
/// Polling policies use this to decide how long to wait before the next
/// attempt and whether the loop may continue.
#[derive(Clone, Debug, PartialEq)]
pub struct PollingState {
    /// When the polling loop started.
    pub loop_start: tokio::time::Instant,

    /// The number of status queries issued so far.
    ///
    /// The initial RPC that starts the operation is not counted, so this is
    /// zero before the first status query and always non-zero in the policies.
    pub attempt_count: u32,
}

impl PollingState {
    /// Creates a new instance, starting the loop now.
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the loop start time.
    pub fn with_loop_start(mut self, v: tokio::time::Instant) -> Self {
        self.loop_start = v;
        self
    }

    /// Changes the attempt count.
    pub fn with_attempt_count(mut self, v: u32) -> Self {
        self.attempt_count = v;
        self
    }

    /// The time elapsed since the loop started.
    pub fn elapsed(&self) -> std::time::Duration {
        self.loop_start.elapsed()
    }
}

impl Default for PollingState {
    fn default() -> Self {
        Self {
            loop_start: tokio::time::Instant::now(),
            attempt_count: 0,
        }
    }
}
