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

//! Cloud Batch snippets.

pub mod create_job;
pub mod wait_job;

/// The project and region where jobs run.
pub fn parent(project_id: &str, region: &str) -> String {
    format!("projects/{project_id}/locations/{region}")
}

/// The full resource name of a job.
pub fn job_name(project_id: &str, region: &str, job_id: &str) -> String {
    format!("{}/jobs/{job_id}", parent(project_id, region))
}
