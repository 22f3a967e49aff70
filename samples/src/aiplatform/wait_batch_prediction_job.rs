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

use super::get_batch_prediction_job::state_name;
use crate::operations::BatchPredictionJobOperation;
use cookbook_lro::Poller;
use cookbook_snippet::config;
use google_cloud_aiplatform_v1::client::JobService;

/// Waits until a batch prediction job reaches a terminal state.
///
/// Jobs do not use the long-running operation protocol, the snippet polls the
/// job itself until its state is `JOB_STATE_SUCCEEDED` or another terminal
/// state.
#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(default_value = "YOUR_BATCH_PREDICTION_JOB_ID")]
    pub batch_prediction_job_id: String,
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    #[arg(env = config::LOCATION_ENV, default_value = config::DEFAULT_LOCATION)]
    pub location: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let options = config::polling_options()?;
    let client = JobService::builder()
        .with_endpoint(super::endpoint(&args.location))
        .build()
        .await?;

    let name = super::job_name(
        &args.project_id,
        &args.location,
        &args.batch_prediction_job_id,
    );
    let start = {
        let (client, name) = (client.clone(), name.clone());
        move || async move {
            client
                .get_batch_prediction_job()
                .set_name(name)
                .send()
                .await
                .map(BatchPredictionJobOperation::from)
        }
    };
    let query = move |name: String| {
        let client = client.clone();
        async move {
            client
                .get_batch_prediction_job()
                .set_name(name)
                .send()
                .await
                .map(BatchPredictionJobOperation::from)
        }
    };
    let job = cookbook_lro::new_poller(options, start, query)
        .until_done()
        .await?;
    println!("Job state: {}", state_name(&job));

    Ok(())
}
