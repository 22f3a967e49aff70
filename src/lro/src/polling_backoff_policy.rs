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

//! Defines the trait for polling backoff policies and common implementations.
//!
//! The poller waits between status queries to avoid overloading the service.
//! Polling backoff policies should not use jitter, the delay only depends on
//! the state of the polling loop.
//!
//! The snippets use a fixed delay, typically between 5 and 30 seconds.
//! Callers needing a different schedule implement the trait directly.
//!
//! # Example
//! ```
//! # use cookbook_lro::PollingState;
//! # use cookbook_lro::polling_backoff_policy::*;
//! use std::time::Duration;
//!
//! /// Waits a little longer after each status query.
//! #[derive(Debug)]
//! struct Linear(Duration);
//! impl PollingBackoffPolicy for Linear {
//!     fn wait_period(&self, state: &PollingState) -> Duration {
//!         self.0 * state.attempt_count
//!     }
//! }
//!
//! let policy = Linear(Duration::from_secs(2));
//! let state = PollingState::new().with_attempt_count(3);
//! assert_eq!(policy.wait_period(&state), Duration::from_secs(6));
//! ```

use crate::polling_state::PollingState;
use std::time::Duration;

/// The shortest wait between two status queries.
///
/// The poller never issues two status queries without waiting at least this
/// long, whatever the backoff policy returns.
pub const MINIMUM_DELAY: Duration = Duration::from_millis(1);

/// Defines the trait implemented by all backoff strategies.
pub trait PollingBackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns the time to wait before the next status query.
    ///
    /// # Parameters
    /// * `state` - the loop start time and the number of status queries. This
    ///   method is always called after the operation starts.
    fn wait_period(&self, state: &PollingState) -> Duration;
}

/// Waits the same amount of time between all status queries.
///
/// # Example
/// ```
/// # use cookbook_lro::PollingState;
/// # use cookbook_lro::polling_backoff_policy::*;
/// use std::time::Duration;
/// let policy = FixedDelay::new(Duration::from_secs(5));
/// let state = PollingState::new().with_attempt_count(7);
/// assert_eq!(policy.wait_period(&state), Duration::from_secs(5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Creates a new policy.
    ///
    /// Delays shorter than [MINIMUM_DELAY] are clamped.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.max(MINIMUM_DELAY),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl PollingBackoffPolicy for FixedDelay {
    fn wait_period(&self, _state: &PollingState) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Duration::ZERO, MINIMUM_DELAY; "zero is clamped")]
    #[test_case(Duration::from_nanos(10), MINIMUM_DELAY; "below minimum is clamped")]
    #[test_case(Duration::from_secs(30), Duration::from_secs(30); "unchanged")]
    fn fixed_delay(input: Duration, want: Duration) {
        let policy = FixedDelay::new(input);
        assert_eq!(policy.delay(), want);
        for count in [1, 2, 10, 100] {
            let state = PollingState::new().with_attempt_count(count);
            assert_eq!(policy.wait_period(&state), want);
        }
    }

    #[test]
    fn fixed_delay_default() {
        let policy = FixedDelay::default();
        assert_eq!(policy.delay(), Duration::from_secs(5));
    }
}
