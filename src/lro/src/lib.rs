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

//! Types and functions to wait for long-running operations (LROs).
//!
//! Many of the snippets start an operation in the service and then wait for
//! it to complete. Each service reports progress with a different vocabulary,
//! see [OperationState] for the mapping. This crate implements the polling
//! loop once:
//!
//! * the loop stops on terminal states, and only on terminal states, unless
//!   the deadline, the cancellation token, or the error policy stop it first,
//! * the loop always waits between two status queries,
//! * on success the loop returns the payload of the operation unchanged,
//! * on failure the loop returns the error embedded in the operation.
//!
//! # Example
//! ```
//! # use cookbook_lro::*;
//! # struct Job { name: String, state: OperationState }
//! # impl Operation for Job {
//! #     type Response = String;
//! #     type Error = std::fmt::Error;
//! #     fn name(&self) -> Option<&str> { Some(&self.name) }
//! #     fn state(&self) -> OperationState { self.state }
//! #     fn into_result(self) -> std::result::Result<Option<String>, std::fmt::Error> { Ok(Some(self.name)) }
//! # }
//! # async fn get_job(name: String) -> std::result::Result<Job, std::io::Error> { todo!() }
//! async fn sample(job: Job) -> anyhow::Result<()> {
//!     use std::time::Duration;
//!     let options = PollingOptions::with_timeout(Duration::from_secs(600));
//!     let response = new_poller_from_operation(options, job, get_job)
//!         .until_done()
//!         .await?;
//!     println!("job completed: {response}");
//!     Ok(())
//! }
//! ```

pub mod loop_state;
pub mod polling_backoff_policy;
pub mod polling_error_policy;
pub mod polling_state;

mod error;
mod options;
mod poller;
mod state;

pub use error::Error;
pub use options::PollingOptions;
pub use poller::{new_poller, new_poller_from_operation};
pub use polling_state::PollingState;
pub use state::{Operation, OperationState, UnknownState};

/// The result type for the polling loop.
pub type Result<T> = std::result::Result<T, Error>;

/// The result of polling a long-running operation.
///
/// # Parameters
/// * `R` - the response type. This is the type returned when the operation
///   completes successfully.
/// * `M` - the metadata type. While operations are in progress the poller
///   returns values of this type.
#[derive(Debug)]
pub enum PollingResult<R, M> {
    /// The operation is still in progress.
    InProgress(Option<M>),
    /// The operation completed. This includes the result.
    Completed(Result<R>),
    /// An error trying to poll the operation.
    ///
    /// Not all errors indicate that the operation failed. For example, this
    /// may fail because it was not possible to connect to Google Cloud. Such
    /// transient errors may disappear in the next polling attempt. The
    /// [polling error policy][polling_error_policy::PollingErrorPolicy]
    /// decides which errors are returned this way, all other errors complete
    /// the poller.
    PollingError(Error),
}

/// The trait implemented by pollers.
///
/// # Parameters
/// * `R` - the response type, that is, the type of response included when the
///   long-running operation completes successfully.
/// * `M` - the metadata type, that is, the type returned by the service when
///   the long-running operation is still in progress.
pub trait Poller<R, M>: Send + sealed::Poller {
    /// Query the current status of the long-running operation.
    ///
    /// The first call starts the operation. Each following call issues one
    /// status query. Returns `None` once the poller has returned
    /// [PollingResult::Completed].
    fn poll(&mut self) -> impl Future<Output = Option<PollingResult<R, M>>> + Send;

    /// Poll the long-running operation until it completes.
    ///
    /// Waits between status queries as prescribed by the backoff policy, and
    /// stops at the deadline or when the cancellation token is cancelled.
    fn until_done(self) -> impl Future<Output = Result<R>> + Send;

    /// Convert a poller to a [Stream][futures::Stream].
    ///
    /// The stream does not wait between items, the consumer controls the
    /// pace.
    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = PollingResult<R, M>> + Unpin + Send;
}

pub(crate) mod sealed {
    pub trait Poller {}
}
