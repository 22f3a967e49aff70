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

//! Defines the types for polling error policies.
//!
//! # Example
//! ```
//! # use cookbook_lro::polling_error_policy::*;
//! use std::time::Duration;
//! // Tolerate polling errors for at most 15 minutes or at most 50 attempts:
//! // whichever limit is reached first stops the polling loop.
//! let policy = AlwaysContinue
//!     .with_time_limit(Duration::from_secs(15 * 60))
//!     .with_attempt_limit(50);
//! ```
//!
//! The poller issues one RPC per polling attempt. These RPCs may fail, and the
//! poller needs to (1) distinguish between transient and permanent errors, and
//! (2) provide a mechanism to limit the polling loop duration.
//!
//! The snippets follow a "fail fast, fail whole" contract, so the default
//! policy, [FailFast], treats every error as permanent. Applications that can
//! classify transient errors use [ContinueIf], or implement the trait.

use crate::loop_state::LoopState;
use crate::polling_state::PollingState;
use crate::Error;

/// Determines how errors are handled in the polling loop.
///
/// Implementations of this trait determine if polling errors may resolve in
/// future attempts, and for how long the polling loop may continue.
pub trait PollingErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Query the polling policy after an error.
    ///
    /// # Parameters
    /// * `state` - the loop start time and the number of status queries. This
    ///   method is called after the operation starts, so the attempt count is
    ///   always non-zero.
    /// * `error` - the last error when attempting the request.
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState;

    /// Called when the operation is successfully polled, but is still in
    /// progress.
    fn on_in_progress(&self, _state: &PollingState, _operation_name: &str) -> Option<Error> {
        None
    }
}

/// Extension trait for [PollingErrorPolicy]
pub trait PollingErrorPolicyExt: PollingErrorPolicy + Sized {
    /// Decorate a [PollingErrorPolicy] to limit the total elapsed time in the
    /// polling loop.
    ///
    /// While the time spent in the polling loop (including time in backoff) is
    /// less than the prescribed duration the `on_error()` method returns the
    /// results of the inner policy. After that time it returns
    /// [Exhausted][LoopState::Exhausted] if the inner policy returns
    /// [Continue][LoopState::Continue].
    ///
    /// # Example
    /// ```
    /// # use cookbook_lro::*;
    /// use polling_error_policy::*;
    /// use std::time::Duration;
    /// let policy = AlwaysContinue.with_time_limit(Duration::from_secs(10)).with_attempt_limit(3);
    /// let state = PollingState::new().with_attempt_count(4);
    /// assert!(policy.on_error(&state, Error::rpc("unavailable")).is_exhausted());
    /// ```
    fn with_time_limit(self, maximum_duration: std::time::Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Decorate a [PollingErrorPolicy] to limit the number of poll attempts.
    ///
    /// This policy decorates an inner policy and limits the total number of
    /// attempts. Note that `on_error()` is called only after a polling attempt.
    /// Therefore, setting the maximum number of attempts to 0 or 1 results in
    /// no polling after the operation starts.
    ///
    /// # Example
    /// ```
    /// # use cookbook_lro::*;
    /// use polling_error_policy::*;
    /// let policy = AlwaysContinue.with_attempt_limit(3);
    /// let state = PollingState::new();
    /// assert!(policy.on_error(&state.clone().with_attempt_count(2), Error::rpc("unavailable")).is_continue());
    /// assert!(policy.on_error(&state.with_attempt_count(3), Error::rpc("unavailable")).is_exhausted());
    /// ```
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: PollingErrorPolicy> PollingErrorPolicyExt for T {}

/// A polling policy that stops on the first error.
///
/// This is the default policy. Any error querying the operation status stops
/// the polling loop, and is returned to the caller unchanged.
///
/// # Example
/// ```
/// # use cookbook_lro::*;
/// # use cookbook_lro::polling_error_policy::*;
/// let policy = FailFast;
/// let state = PollingState::new().with_attempt_count(1);
/// assert!(policy.on_error(&state, Error::rpc("unavailable")).is_permanent());
/// ```
#[derive(Clone, Debug)]
pub struct FailFast;

impl PollingErrorPolicy for FailFast {
    fn on_error(&self, _state: &PollingState, error: Error) -> LoopState {
        LoopState::Permanent(error)
    }
}

/// A polling policy that continues on any error.
///
/// This policy must be decorated to limit the number of polling attempts or the
/// duration of the polling loop, or used with a deadline.
///
/// # Example
/// ```
/// # use cookbook_lro::*;
/// # use cookbook_lro::polling_error_policy::*;
/// let policy = AlwaysContinue;
/// let state = PollingState::new().with_attempt_count(1);
/// assert!(policy.on_error(&state, Error::rpc("permission denied")).is_continue());
/// ```
#[derive(Clone, Debug)]
pub struct AlwaysContinue;

impl PollingErrorPolicy for AlwaysContinue {
    fn on_error(&self, _state: &PollingState, error: Error) -> LoopState {
        LoopState::Continue(error)
    }
}

/// A polling policy that continues on errors accepted by a predicate.
///
/// The predicate typically downcasts the RPC error with
/// [Error::rpc_error] and examines the status code.
///
/// # Example
/// ```
/// # use cookbook_lro::*;
/// # use cookbook_lro::polling_error_policy::*;
/// use std::error::Error as _;
/// let policy = ContinueIf::new(|e: &Error| {
///     e.source().is_some_and(|s| s.to_string().contains("unavailable"))
/// });
/// let state = PollingState::new().with_attempt_count(1);
/// assert!(policy.on_error(&state, Error::rpc("unavailable")).is_continue());
/// assert!(policy.on_error(&state, Error::rpc("not found")).is_permanent());
/// ```
pub struct ContinueIf<F> {
    predicate: F,
}

impl<F> ContinueIf<F>
where
    F: Fn(&Error) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> std::fmt::Debug for ContinueIf<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinueIf").finish_non_exhaustive()
    }
}

impl<F> PollingErrorPolicy for ContinueIf<F>
where
    F: Fn(&Error) -> bool + Send + Sync,
{
    fn on_error(&self, _state: &PollingState, error: Error) -> LoopState {
        if (self.predicate)(&error) {
            LoopState::Continue(error)
        } else {
            LoopState::Permanent(error)
        }
    }
}

/// A polling policy decorator that limits the total time in the polling loop.
///
/// This policy decorates an inner policy and limits the duration of polling
/// loops. While the time spent in the polling loop (including time in backoff)
/// is less than the prescribed duration the `on_error()` method returns the
/// results of the inner policy. After that time it returns
/// [Exhausted][LoopState::Exhausted] if the inner policy returns
/// [Continue][LoopState::Continue]. The policy also stops the loop when the
/// operation is still in progress after the prescribed duration.
///
/// # Parameters
/// * `P` - the inner polling policy, defaults to [FailFast].
#[derive(Debug)]
pub struct LimitedElapsedTime<P = FailFast>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_duration: std::time::Duration,
}

impl LimitedElapsedTime {
    /// Creates a new instance, with the default inner policy.
    pub fn new(maximum_duration: std::time::Duration) -> Self {
        Self {
            inner: FailFast,
            maximum_duration,
        }
    }
}

impl<P> LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_duration: std::time::Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }

    fn in_progress_impl(&self, state: &PollingState, operation_name: &str) -> Option<Error> {
        let elapsed = state.elapsed();
        if elapsed < self.maximum_duration {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            operation_name,
            "elapsed time",
            format!("{elapsed:?}"),
            format!("{:?}", self.maximum_duration),
        )))
    }
}

impl<P> PollingErrorPolicy for LimitedElapsedTime<P>
where
    P: PollingErrorPolicy + 'static,
{
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState {
        match self.inner.on_error(state, error) {
            LoopState::Permanent(e) => LoopState::Permanent(e),
            LoopState::Exhausted(e) => LoopState::Exhausted(e),
            LoopState::Continue(e) => {
                if state.elapsed() >= self.maximum_duration {
                    LoopState::Exhausted(e)
                } else {
                    LoopState::Continue(e)
                }
            }
        }
    }

    fn on_in_progress(&self, state: &PollingState, operation_name: &str) -> Option<Error> {
        self.inner
            .on_in_progress(state, operation_name)
            .or_else(|| self.in_progress_impl(state, operation_name))
    }
}

/// A polling policy decorator that limits the number of attempts.
///
/// The policy passes through the results from the inner policy as long as
/// `attempt_count < maximum_attempts`. However, once the maximum number of
/// attempts is reached, the policy replaces any [Continue][LoopState::Continue]
/// result with [Exhausted][LoopState::Exhausted], and stops the loop if the
/// operation is still in progress.
///
/// # Parameters
/// * `P` - the inner polling policy.
#[derive(Debug)]
pub struct LimitedAttemptCount<P = FailFast>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    /// Creates a new instance, with the default inner policy.
    pub fn new(maximum_attempts: u32) -> Self {
        Self {
            inner: FailFast,
            maximum_attempts,
        }
    }
}

impl<P> LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }

    fn in_progress_impl(&self, count: u32, operation_name: &str) -> Option<Error> {
        if count < self.maximum_attempts {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            operation_name,
            "attempt count",
            count.to_string(),
            self.maximum_attempts.to_string(),
        )))
    }
}

impl<P> PollingErrorPolicy for LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState {
        match self.inner.on_error(state, error) {
            LoopState::Permanent(e) => LoopState::Permanent(e),
            LoopState::Exhausted(e) => LoopState::Exhausted(e),
            LoopState::Continue(e) => {
                if state.attempt_count >= self.maximum_attempts {
                    LoopState::Exhausted(e)
                } else {
                    LoopState::Continue(e)
                }
            }
        }
    }

    fn on_in_progress(&self, state: &PollingState, operation_name: &str) -> Option<Error> {
        self.inner
            .on_in_progress(state, operation_name)
            .or_else(|| self.in_progress_impl(state.attempt_count, operation_name))
    }
}

/// Indicates that a polling loop has been exhausted.
#[derive(thiserror::Error, Debug)]
#[error(
    "polling loop for {operation_name} exhausted, {limit_name} value ({value}) exceeds limit ({limit})"
)]
pub struct Exhausted {
    operation_name: String,
    limit_name: &'static str,
    value: String,
    limit: String,
}

impl Exhausted {
    pub fn new(
        operation_name: &str,
        limit_name: &'static str,
        value: String,
        limit: String,
    ) -> Self {
        Self {
            operation_name: operation_name.to_string(),
            limit_name,
            value,
            limit,
        }
    }
}
