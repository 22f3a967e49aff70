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

use crate::polling_backoff_policy::{FixedDelay, PollingBackoffPolicy};
use crate::polling_error_policy::{FailFast, PollingErrorPolicy};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Configures a polling loop.
///
/// There is no default configuration. Callers must choose between a bounded
/// loop, with [PollingOptions::with_timeout], and an unbounded loop, with
/// [PollingOptions::unbounded].
///
/// # Example
/// ```
/// # use cookbook_lro::PollingOptions;
/// # use cookbook_lro::polling_backoff_policy::FixedDelay;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// let token = CancellationToken::new();
/// let options = PollingOptions::with_timeout(Duration::from_secs(30 * 60))
///     .set_backoff_policy(FixedDelay::new(Duration::from_secs(10)))
///     .set_cancellation(token.clone());
/// assert_eq!(options.timeout(), Some(Duration::from_secs(30 * 60)));
/// ```
#[derive(Clone, Debug)]
pub struct PollingOptions {
    pub(crate) error_policy: Arc<dyn PollingErrorPolicy>,
    pub(crate) backoff_policy: Arc<dyn PollingBackoffPolicy>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl PollingOptions {
    /// Polls until the operation completes or `timeout` elapses.
    ///
    /// The timeout covers the whole loop: the initial RPC, all the status
    /// queries, and the backoff between them.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Some(timeout))
    }

    /// Polls until the operation completes, for as long as it takes.
    ///
    /// Use this only when the caller has some other mechanism to stop the
    /// loop, such as a [CancellationToken].
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    fn new(timeout: Option<Duration>) -> Self {
        Self {
            error_policy: Arc::new(FailFast),
            backoff_policy: Arc::new(FixedDelay::default()),
            timeout,
            cancellation: None,
        }
    }

    /// Changes the polling error policy.
    pub fn set_error_policy<P: PollingErrorPolicy + 'static>(mut self, v: P) -> Self {
        self.error_policy = Arc::new(v);
        self
    }

    /// Changes the polling backoff policy.
    pub fn set_backoff_policy<P: PollingBackoffPolicy + 'static>(mut self, v: P) -> Self {
        self.backoff_policy = Arc::new(v);
        self
    }

    /// Stops the polling loop when `token` is cancelled.
    pub fn set_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The maximum duration of the polling loop, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
