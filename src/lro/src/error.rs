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

use crate::OperationState;
use std::error::Error as StdError;
use std::time::Duration;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// The error returned by the polling loop.
///
/// The polling loop reports errors from multiple sources. The RPC to start or
/// query the operation may fail, the operation may reach a terminal state other
/// than success, the loop may run past its deadline, or the caller may cancel
/// it.
///
/// Most snippets just return the error. Tests and some applications need to
/// interrogate the error details. This type offers predicates to determine the
/// error kind, and accessors to recover the error reported by the service.
///
/// # Example
/// ```
/// use cookbook_lro::{Error, OperationState};
/// match example_function() {
///     Err(e) if e.is_operation() => {
///         println!("the operation finished in {:?}: {e}", e.state());
///     },
///     Err(e) if e.is_deadline_exceeded() => { println!("not enough time {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # Err(Error::terminal_state(OperationState::Cancelled))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error representing a failed RPC.
    ///
    /// The poller wraps any error returned by the start or query functions with
    /// this constructor.
    ///
    /// # Example
    /// ```
    /// use cookbook_lro::Error;
    /// let error = Error::rpc("connection reset");
    /// assert!(error.is_rpc());
    /// ```
    pub fn rpc<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Rpc,
            source: Some(source.into()),
        }
    }

    /// The RPC to start or query the operation failed.
    pub fn is_rpc(&self) -> bool {
        matches!(self.kind, ErrorKind::Rpc)
    }

    /// Creates an error for an operation that completed with an embedded error.
    ///
    /// # Example
    /// ```
    /// use cookbook_lro::{Error, OperationState};
    /// let error = Error::operation(OperationState::Failed, "quota exceeded");
    /// assert!(error.is_operation());
    /// assert_eq!(error.state(), Some(OperationState::Failed));
    /// ```
    pub fn operation<T: Into<BoxError>>(state: OperationState, source: T) -> Self {
        Self {
            kind: ErrorKind::Operation(state),
            source: Some(source.into()),
        }
    }

    /// Creates an error for an operation that reached a terminal state other
    /// than [Succeeded][OperationState::Succeeded] without any error details.
    pub fn terminal_state(state: OperationState) -> Self {
        Self {
            kind: ErrorKind::Operation(state),
            source: None,
        }
    }

    /// The operation reached a terminal state, but did not succeed.
    ///
    /// Use [state()][Error::state] to find the terminal state, and
    /// [operation_error()][Error::operation_error] to recover the error
    /// details reported by the service, if any.
    pub fn is_operation(&self) -> bool {
        matches!(self.kind, ErrorKind::Operation(_))
    }

    /// The terminal state of a failed operation.
    pub fn state(&self) -> Option<OperationState> {
        match &self.kind {
            ErrorKind::Operation(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the error embedded in a completed operation.
    ///
    /// The value is exactly the error returned by
    /// [Operation::into_result][crate::Operation::into_result].
    ///
    /// # Example
    /// ```
    /// use cookbook_lro::{Error, OperationState};
    /// let error = Error::operation(OperationState::Failed, std::fmt::Error);
    /// assert!(error.operation_error::<std::fmt::Error>().is_some());
    /// ```
    pub fn operation_error<T: StdError + 'static>(&self) -> Option<&T> {
        match &self.kind {
            ErrorKind::Operation(_) => self.source.as_ref().and_then(|e| e.downcast_ref::<T>()),
            _ => None,
        }
    }

    /// Returns the error returned by the start or query functions.
    pub fn rpc_error<T: StdError + 'static>(&self) -> Option<&T> {
        match &self.kind {
            ErrorKind::Rpc => self.source.as_ref().and_then(|e| e.downcast_ref::<T>()),
            _ => None,
        }
    }

    /// Creates an error for an operation that does not follow the protocol.
    ///
    /// For example, an operation that is in progress but has no name, or one
    /// that succeeded without a response.
    pub fn malformed<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Malformed,
            source: Some(source.into()),
        }
    }

    /// The operation returned by the service cannot be polled or unwrapped.
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ErrorKind::Malformed)
    }

    /// Creates an error representing an exhausted polling policy.
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Exhausted,
            source: Some(source.into()),
        }
    }

    /// The polling error policy stopped the loop.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted)
    }

    /// Creates an error for a polling loop that ran past its deadline.
    pub fn deadline_exceeded(timeout: Duration) -> Self {
        Self {
            kind: ErrorKind::DeadlineExceeded(timeout),
            source: None,
        }
    }

    /// The polling loop did not observe a terminal state before its deadline.
    ///
    /// The operation may still be running in the service. Consider cancelling
    /// it, or resume polling with a longer deadline.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self.kind, ErrorKind::DeadlineExceeded(_))
    }

    /// Creates an error for a polling loop stopped by its cancellation token.
    pub fn cancelled() -> Self {
        Self {
            kind: ErrorKind::Cancelled,
            source: None,
        }
    }

    /// The polling loop was cancelled by the caller.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The cause is reported by `source()`, and only by `source()`.
        match (&self.kind, &self.source) {
            (ErrorKind::Rpc, _) => write!(f, "cannot start or query the operation"),
            (ErrorKind::Operation(s), Some(_)) => {
                write!(f, "the operation finished in state {s} with an error")
            }
            (ErrorKind::Operation(s), None) => write!(f, "the operation finished in state {s}"),
            (ErrorKind::Malformed, _) => write!(f, "malformed operation"),
            (ErrorKind::Exhausted, _) => write!(f, "the polling error policy stopped the loop"),
            (ErrorKind::DeadlineExceeded(t), _) => {
                write!(f, "the polling loop exceeded its deadline ({t:?})")
            }
            (ErrorKind::Cancelled, _) => write!(f, "the polling loop was cancelled"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError))
    }
}

#[derive(Debug)]
enum ErrorKind {
    Rpc,
    Operation(OperationState),
    Malformed,
    Exhausted,
    DeadlineExceeded(Duration),
    Cancelled,
}
