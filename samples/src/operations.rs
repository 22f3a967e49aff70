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

//! Adapt the operation types of each service to [cookbook_lro::Operation].
//!
//! The services report progress with four different vocabularies:
//! * Compute Engine operations have a `status` field: `PENDING`, `RUNNING`,
//!   or `DONE`.
//! * [AIP-151] operations have a `done` flag, and a `result` which is either
//!   an error or a response packed in a `google.protobuf.Any`.
//! * Vertex AI jobs have a `state` field with `JOB_STATE_*` values.
//! * Cloud Batch jobs have a `status.state` field with bare values, such as
//!   `QUEUED`, `SCHEDULED`, or `SUCCEEDED`.
//!
//! [AIP-151]: https://google.aip.dev/151

use cookbook_lro::{Operation, OperationState};
use google_cloud_aiplatform_v1::model::BatchPredictionJob;
use google_cloud_batch_v1::model::Job as BatchJob;
use google_cloud_compute_v1::errors::OperationError as ComputeError;
use google_cloud_compute_v1::model::Operation as ComputeModel;
use google_cloud_compute_v1::model::operation::Status;
use google_cloud_longrunning::model::Operation as LongRunningModel;
use google_cloud_longrunning::model::operation::Result as LongRunningResult;
use google_cloud_rpc::model::Status as RpcStatus;
use google_cloud_wkt::message::Message;
use std::marker::PhantomData;

/// The error embedded in a failed operation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum OperationFailed {
    /// The service reported an error status.
    #[error("the operation failed with code {}: {}", .0.code, .0.message)]
    Status(RpcStatus),
    /// The operation completed, but the response has an unexpected type.
    #[error("cannot decode the operation response: {0}")]
    Decode(String),
    /// The job failed, with the description of its last status event.
    #[error("the job failed: {0}")]
    JobFailed(String),
    /// The operation completed with a result this code does not recognize.
    #[error("unexpected operation result {0}")]
    Unexpected(String),
}

impl OperationFailed {
    /// The status embedded in the operation, if any.
    pub fn status(&self) -> Option<&RpcStatus> {
        match self {
            Self::Status(s) => Some(s),
            _ => None,
        }
    }
}

/// A Compute Engine operation.
#[derive(Clone, Debug)]
pub struct ComputeOperation(pub ComputeModel);

impl From<ComputeModel> for ComputeOperation {
    fn from(value: ComputeModel) -> Self {
        Self(value)
    }
}

impl Operation for ComputeOperation {
    type Response = ComputeModel;
    type Error = ComputeError;

    fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    fn state(&self) -> OperationState {
        match &self.0.status {
            Some(Status::Done) if has_compute_error(&self.0) => OperationState::Failed,
            Some(Status::Done) => OperationState::Succeeded,
            Some(Status::Pending) => OperationState::Pending,
            _ => OperationState::Running,
        }
    }

    fn into_result(self) -> Result<Option<Self::Response>, Self::Error> {
        self.0.to_result().map(Some)
    }
}

fn has_compute_error(op: &ComputeModel) -> bool {
    op.error.is_some() || op.http_error_status_code.is_some() || op.http_error_message.is_some()
}

/// A `google.longrunning.Operation` with a response of type `R`.
#[derive(Clone, Debug)]
pub struct LongRunning<R> {
    operation: LongRunningModel,
    _response: PhantomData<fn() -> R>,
}

impl<R> LongRunning<R> {
    pub fn new(operation: LongRunningModel) -> Self {
        Self {
            operation,
            _response: PhantomData,
        }
    }

    pub fn operation(&self) -> &LongRunningModel {
        &self.operation
    }
}

impl<R> From<LongRunningModel> for LongRunning<R> {
    fn from(value: LongRunningModel) -> Self {
        Self::new(value)
    }
}

impl<R: Message> Operation for LongRunning<R> {
    type Response = R;
    type Error = OperationFailed;

    fn name(&self) -> Option<&str> {
        Some(self.operation.name.as_str()).filter(|n| !n.is_empty())
    }

    fn state(&self) -> OperationState {
        let has_error = matches!(self.operation.result, Some(LongRunningResult::Error(_)));
        OperationState::from_done(self.operation.done, has_error)
    }

    fn into_result(self) -> Result<Option<R>, OperationFailed> {
        match self.operation.result {
            None => Ok(None),
            Some(LongRunningResult::Response(any)) => any
                .to_msg::<R>()
                .map(Some)
                .map_err(|e| OperationFailed::Decode(e.to_string())),
            Some(LongRunningResult::Error(status)) => Err(OperationFailed::Status(*status)),
            Some(r) => Err(OperationFailed::Unexpected(format!("{r:?}"))),
        }
    }
}

/// A Vertex AI batch prediction job.
///
/// The job is its own response. Unknown and unspecified states are treated
/// as `RUNNING`, the poller keeps waiting for a terminal state.
#[derive(Clone, Debug)]
pub struct BatchPredictionJobOperation(pub BatchPredictionJob);

impl From<BatchPredictionJob> for BatchPredictionJobOperation {
    fn from(value: BatchPredictionJob) -> Self {
        Self(value)
    }
}

impl Operation for BatchPredictionJobOperation {
    type Response = BatchPredictionJob;
    type Error = OperationFailed;

    fn name(&self) -> Option<&str> {
        Some(self.0.name.as_str()).filter(|n| !n.is_empty())
    }

    fn state(&self) -> OperationState {
        job_state(&self.0)
    }

    fn into_result(self) -> Result<Option<BatchPredictionJob>, OperationFailed> {
        match self.0.error {
            Some(status) if status.code != 0 => Err(OperationFailed::Status(status)),
            _ => Ok(Some(self.0)),
        }
    }
}

/// Maps the `JOB_STATE_*` value of a job.
pub fn job_state(job: &BatchPredictionJob) -> OperationState {
    let Some(name) = job.state.name() else {
        tracing::warn!("unknown job state {:?} for {}", job.state, job.name);
        return OperationState::Running;
    };
    name.parse().unwrap_or_else(|e| {
        tracing::warn!("{e} for {}, keep polling", job.name);
        OperationState::Running
    })
}

/// A Cloud Batch job.
///
/// Jobs without a status have not been queued yet.
#[derive(Clone, Debug)]
pub struct BatchJobOperation(pub BatchJob);

impl From<BatchJob> for BatchJobOperation {
    fn from(value: BatchJob) -> Self {
        Self(value)
    }
}

impl Operation for BatchJobOperation {
    type Response = BatchJob;
    type Error = OperationFailed;

    fn name(&self) -> Option<&str> {
        Some(self.0.name.as_str()).filter(|n| !n.is_empty())
    }

    fn state(&self) -> OperationState {
        batch_job_state(&self.0)
    }

    fn into_result(self) -> Result<Option<BatchJob>, OperationFailed> {
        if batch_job_state(&self.0) != OperationState::Failed {
            return Ok(Some(self.0));
        }
        let description = self
            .0
            .status
            .and_then(|s| s.status_events.into_iter().last())
            .map(|e| e.description)
            .unwrap_or_else(|| "no status events".to_string());
        Err(OperationFailed::JobFailed(description))
    }
}

/// Maps the `status.state` value of a Cloud Batch job.
pub fn batch_job_state(job: &BatchJob) -> OperationState {
    let Some(status) = &job.status else {
        return OperationState::Pending;
    };
    let Some(name) = status.state.name() else {
        tracing::warn!("unknown job state {:?} for {}", status.state, job.name);
        return OperationState::Running;
    };
    name.parse().unwrap_or_else(|e| {
        tracing::warn!("{e} for {}, keep polling", job.name);
        OperationState::Running
    })
}

/// The name of the `status.state` value of a Cloud Batch job.
pub fn batch_job_state_name(job: &BatchJob) -> String {
    match &job.status {
        None => "STATE_UNSPECIFIED".to_string(),
        Some(s) => s
            .state
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", s.state)),
    }
}
