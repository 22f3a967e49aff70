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

//! Vertex AI snippets.

pub mod get_batch_prediction_job;
pub mod wait_batch_prediction_job;

/// The regional endpoint for Vertex AI services.
pub fn endpoint(location: &str) -> String {
    format!("https://{location}-aiplatform.googleapis.com")
}

/// The full resource name of a batch prediction job.
pub fn job_name(project_id: &str, location: &str, job_id: &str) -> String {
    format!("projects/{project_id}/locations/{location}/batchPredictionJobs/{job_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(
            endpoint("us-central1"),
            "https://us-central1-aiplatform.googleapis.com"
        );
        assert_eq!(
            job_name("my-project", "us-central1", "123"),
            "projects/my-project/locations/us-central1/batchPredictionJobs/123"
        );
    }
}
