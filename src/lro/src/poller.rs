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

//! Implements the polling loop on top of two closures.
//!
//! The first closure starts the operation, or returns an operation that was
//! already started. The second closure queries the status of the operation
//! given its name. The poller uses the [Operation] trait to interpret the
//! results.

use crate::error::BoxError;
use crate::loop_state::LoopState;
use crate::polling_backoff_policy::MINIMUM_DELAY;
use crate::polling_error_policy::PollingErrorPolicy;
use crate::polling_state::PollingState;
use crate::{Error, Operation, OperationState, Poller, PollingOptions, PollingResult, Result};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Creates a poller from closures to start and query an operation.
///
/// # Parameters
/// * `options` - the error policy, backoff policy, deadline and cancellation
///   token for the polling loop.
/// * `start` - starts the operation. It should capture any client and request
///   it needs.
/// * `query` - queries the status of the operation created by `start`. It
///   receives the name of the operation as its only input parameter.
///
/// # Example
/// ```
/// # use cookbook_lro::*;
/// # struct Job { name: String, state: OperationState }
/// # impl Operation for Job {
/// #     type Response = String;
/// #     type Error = std::fmt::Error;
/// #     fn name(&self) -> Option<&str> { Some(&self.name) }
/// #     fn state(&self) -> OperationState { self.state }
/// #     fn into_result(self) -> std::result::Result<Option<String>, std::fmt::Error> { Ok(Some(self.name)) }
/// # }
/// # async fn start_job() -> std::result::Result<Job, std::io::Error> { todo!() }
/// # async fn get_job(name: String) -> std::result::Result<Job, std::io::Error> { todo!() }
/// async fn sample() -> anyhow::Result<()> {
///     use std::time::Duration;
///     let options = PollingOptions::with_timeout(Duration::from_secs(30 * 60));
///     let response = new_poller(options, start_job, get_job).until_done().await?;
///     println!("job completed: {response}");
///     Ok(())
/// }
/// ```
pub fn new_poller<O, S, SF, Q, QF, E>(
    options: PollingOptions,
    start: S,
    query: Q,
) -> impl Poller<O::Response, O>
where
    O: Operation + Send,
    O::Response: Send,
    S: FnOnce() -> SF + Send,
    SF: Future<Output = std::result::Result<O, E>> + Send,
    Q: FnMut(String) -> QF + Send,
    QF: Future<Output = std::result::Result<O, E>> + Send,
    E: Into<BoxError>,
{
    PollerImpl::new(options, start, query)
}

/// Creates a poller for an operation that has already started.
///
/// Snippets that call the initiating RPC themselves, and print the operation
/// name before waiting, use this function to poll the returned handle.
pub fn new_poller_from_operation<O, Q, QF, E>(
    options: PollingOptions,
    operation: O,
    query: Q,
) -> impl Poller<O::Response, O>
where
    O: Operation + Send,
    O::Response: Send,
    Q: FnMut(String) -> QF + Send,
    QF: Future<Output = std::result::Result<O, E>> + Send,
    E: Into<BoxError> + Send,
{
    let start = move || std::future::ready(Ok::<O, E>(operation));
    PollerImpl::new(options, start, query)
}

struct PollerImpl<O, S, Q> {
    options: PollingOptions,
    start: Option<S>,
    query: Q,
    operation: Option<String>,
    state: PollingState,
    _operation: PhantomData<fn() -> O>,
}

impl<O, S, Q> PollerImpl<O, S, Q> {
    fn new(options: PollingOptions, start: S, query: Q) -> Self {
        Self {
            options,
            start: Some(start),
            query,
            operation: None,
            state: PollingState::default(),
            _operation: PhantomData,
        }
    }
}

impl<O, S, Q> crate::sealed::Poller for PollerImpl<O, S, Q> {}

impl<O, S, SF, Q, QF, E> Poller<O::Response, O> for PollerImpl<O, S, Q>
where
    O: Operation + Send,
    O::Response: Send,
    S: FnOnce() -> SF + Send,
    SF: Future<Output = std::result::Result<O, E>> + Send,
    Q: FnMut(String) -> QF + Send,
    QF: Future<Output = std::result::Result<O, E>> + Send,
    E: Into<BoxError>,
{
    async fn poll(&mut self) -> Option<PollingResult<O::Response, O>> {
        if let Some(start) = self.start.take() {
            let result = start().await;
            let (op, poll) = self::handle_start(result);
            self.operation = op;
            return Some(poll);
        }
        if let Some(name) = self.operation.take() {
            self.state.attempt_count += 1;
            tracing::debug!(operation = %name, attempt = self.state.attempt_count, "querying operation status");
            let result = (self.query)(name.clone()).await;
            let (op, poll) =
                self::handle_poll(self.options.error_policy.clone(), &self.state, name, result);
            self.operation = op;
            return Some(poll);
        }
        None
    }

    async fn until_done(mut self) -> Result<O::Response> {
        let timeout = self.options.timeout;
        let deadline = timeout.and_then(|t| self.state.loop_start.checked_add(t));
        let cancellation = self.options.cancellation.clone();
        let polling = async move {
            while let Some(p) = self.poll().await {
                match p {
                    // Return, the operation completed or the polling policy is
                    // exhausted.
                    PollingResult::Completed(r) => return r,
                    // Continue, the operation was successfully polled and the
                    // polling policy was queried.
                    PollingResult::InProgress(_) => (),
                    // Continue, the polling policy was queried and decided the
                    // error is recoverable.
                    PollingResult::PollingError(e) => {
                        tracing::debug!("recoverable error polling the operation: {e}");
                    }
                }
                let wait = self
                    .options
                    .backoff_policy
                    .wait_period(&self.state)
                    .max(MINIMUM_DELAY);
                tokio::time::sleep(wait).await;
            }
            // We can only get here if `poll()` returns `None`, but it only returns
            // `None` after it returned `PollingResult::Completed` and therefore
            // this is never reached.
            unreachable!("loop should exit via the `Completed` branch vs. this line");
        };
        let bounded = async move {
            match (deadline, timeout) {
                (Some(d), Some(t)) => tokio::time::timeout_at(d, polling)
                    .await
                    .unwrap_or_else(|_| Err(Error::deadline_exceeded(t))),
                _ => polling.await,
            }
        };
        match cancellation {
            None => bounded.await,
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(Error::cancelled()),
                r = bounded => r,
            },
        }
    }

    #[cfg(feature = "unstable-stream")]
    fn into_stream(
        self,
    ) -> impl futures::Stream<Item = PollingResult<O::Response, O>> + Unpin + Send {
        use futures::stream::unfold;
        Box::pin(unfold(Some(self), move |state| async move {
            if let Some(mut poller) = state {
                if let Some(pr) = poller.poll().await {
                    return Some((pr, Some(poller)));
                }
            };
            None
        }))
    }
}

fn handle_start<O, E>(
    result: std::result::Result<O, E>,
) -> (Option<String>, PollingResult<O::Response, O>)
where
    O: Operation,
    E: Into<BoxError>,
{
    match result {
        Err(e) => (None, PollingResult::Completed(Err(Error::rpc(e)))),
        Ok(o) => handle_common(o),
    }
}

fn handle_poll<O, E>(
    error_policy: Arc<dyn PollingErrorPolicy>,
    state: &PollingState,
    operation_name: String,
    result: std::result::Result<O, E>,
) -> (Option<String>, PollingResult<O::Response, O>)
where
    O: Operation,
    E: Into<BoxError>,
{
    match result {
        Err(e) => {
            let flow = error_policy.on_error(state, Error::rpc(e));
            self::handle_polling_error(flow, operation_name)
        }
        Ok(o) => {
            let (name, result) = handle_common(o);
            match &result {
                PollingResult::InProgress(_) => {
                    match error_policy.on_in_progress(state, &operation_name) {
                        None => (name, result),
                        Some(e) => (None, PollingResult::Completed(Err(e))),
                    }
                }
                PollingResult::Completed(_) => (name, result),
                PollingResult::PollingError(_) => {
                    unreachable!("handle_common never returns PollingResult::PollingError")
                }
            }
        }
    }
}

fn handle_polling_error<R, M>(
    flow: LoopState,
    operation_name: String,
) -> (Option<String>, PollingResult<R, M>) {
    match flow {
        LoopState::Continue(e) => (Some(operation_name), PollingResult::PollingError(e)),
        LoopState::Exhausted(e) | LoopState::Permanent(e) => {
            (None, PollingResult::Completed(Err(e)))
        }
    }
}

fn handle_common<O>(o: O) -> (Option<String>, PollingResult<O::Response, O>)
where
    O: Operation,
{
    let state = o.state();
    if state.is_terminal() {
        tracing::debug!(operation = ?o.name(), %state, "operation reached a terminal state");
        return (None, PollingResult::Completed(as_result(state, o)));
    }
    match o.name().map(str::to_string) {
        Some(name) => (Some(name), PollingResult::InProgress(Some(o))),
        None => (
            None,
            PollingResult::Completed(Err(Error::malformed(format!(
                "the operation is {state} but has no name to poll"
            )))),
        ),
    }
}

fn as_result<O>(state: OperationState, o: O) -> Result<O::Response>
where
    O: Operation,
{
    match (state, o.into_result()) {
        // The operation reported success but carries an error.
        (OperationState::Succeeded, Err(e)) => Err(Error::operation(OperationState::Failed, e)),
        (_, Err(e)) => Err(Error::operation(state, e)),
        (OperationState::Succeeded, Ok(Some(response))) => Ok(response),
        (OperationState::Succeeded, Ok(None)) => Err(Error::malformed(
            "the operation succeeded without a response",
        )),
        (_, Ok(_)) => Err(Error::terminal_state(state)),
    }
}
