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

//! The lifecycle of a long-running operation.
//!
//! Each service reports the progress of its operations using a different
//! vocabulary. Compute Engine uses `PENDING`, `RUNNING`, and `DONE`. Vertex AI
//! jobs use `JOB_STATE_*` values. Services implementing [AIP-151] use a boolean
//! `done` field. The types in this module map all of them to the same state
//! machine:
//!
//! ```text
//! PENDING -> RUNNING -> { SUCCEEDED | FAILED | CANCELLED | PAUSED }
//! ```
//!
//! [AIP-151]: https://google.aip.dev/151

use std::str::FromStr;

/// The state of a long-running operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationState {
    /// The operation was accepted, but has not started.
    Pending,
    /// The operation is running.
    Running,
    /// The operation completed successfully.
    Succeeded,
    /// The operation completed with an error.
    Failed,
    /// The operation was cancelled before it completed.
    Cancelled,
    /// The operation was paused. It makes no progress until resumed.
    Paused,
}

impl OperationState {
    /// Returns true if the operation will not make further progress.
    ///
    /// The polling loop stops on terminal states, and only on terminal states.
    ///
    /// # Example
    /// ```
    /// # use cookbook_lro::OperationState;
    /// assert!(OperationState::Succeeded.is_terminal());
    /// assert!(OperationState::Paused.is_terminal());
    /// assert!(!OperationState::Running.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Pending | Self::Running => false,
            Self::Succeeded | Self::Failed | Self::Cancelled | Self::Paused => true,
        }
    }

    /// Maps the boolean `done` field used by [AIP-151] operations.
    ///
    /// [AIP-151]: https://google.aip.dev/151
    pub fn from_done(done: bool, has_error: bool) -> Self {
        match (done, has_error) {
            (false, _) => Self::Running,
            (true, true) => Self::Failed,
            (true, false) => Self::Succeeded,
        }
    }

    /// The canonical name for this state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Paused => "PAUSED",
        }
    }
}

impl std::fmt::Display for OperationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The error returned when parsing an unknown state name.
#[derive(thiserror::Error, Debug, PartialEq)]
#[error("unknown operation state: {0}")]
pub struct UnknownState(String);

impl FromStr for OperationState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("JOB_STATE_").unwrap_or(&upper);
        let state = match bare {
            "PENDING" | "QUEUED" | "SCHEDULED" => Self::Pending,
            "RUNNING"
            | "IN_PROGRESS"
            | "CANCELLING"
            | "CANCELLATION_IN_PROGRESS"
            | "UPDATING"
            | "DELETION_IN_PROGRESS" => Self::Running,
            "DONE" | "SUCCEEDED" | "SUCCESS" | "PARTIALLY_SUCCEEDED" => Self::Succeeded,
            "FAILED" | "EXPIRED" | "ABORTED" => Self::Failed,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            "PAUSED" => Self::Paused,
            _ => return Err(UnknownState(s.to_string())),
        };
        Ok(state)
    }
}

/// Defines how the poller interprets a service-specific operation type.
///
/// Each service returns a different type to represent its long-running
/// operations. Snippets wrap these types in a newtype and implement this trait
/// to tell the poller how to name the operation in status queries, how to map
/// its status to [OperationState], and how to unwrap its final result.
///
/// # Example
/// ```
/// # use cookbook_lro::{Operation, OperationState};
/// struct Job { name: String, state: String, output: Option<String> }
///
/// impl Operation for Job {
///     type Response = String;
///     type Error = std::fmt::Error;
///     fn name(&self) -> Option<&str> { Some(&self.name) }
///     fn state(&self) -> OperationState {
///         self.state.parse().unwrap_or(OperationState::Pending)
///     }
///     fn into_result(self) -> Result<Option<String>, std::fmt::Error> {
///         Ok(self.output)
///     }
/// }
/// ```
pub trait Operation {
    /// The payload of a successful operation.
    type Response;

    /// The error embedded in a failed operation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The name used to query the status of the operation.
    ///
    /// It may be `None`, in which case the polling loop stops if the operation
    /// has not reached a terminal state.
    fn name(&self) -> Option<&str>;

    /// The current state of the operation.
    fn state(&self) -> OperationState;

    /// Consumes the operation and returns its final result.
    ///
    /// The poller calls this function exactly once, after it observes a
    /// terminal state. If the operation carries an error this must return it
    /// unchanged, without attempting to read the response.
    fn into_result(self) -> Result<Option<Self::Response>, Self::Error>;
}
