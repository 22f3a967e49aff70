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

use crate::operations::{BatchJobOperation, batch_job_state_name};
use cookbook_lro::{Poller, PollingOptions};
use cookbook_snippet::config;
use google_cloud_batch_v1::client::BatchService;
use google_cloud_batch_v1::model::Job;

/// Waits until a Cloud Batch job succeeds or fails.
///
/// Batch jobs are not long-running operations. The snippet polls the job
/// itself and inspects `status.state`.
#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    #[arg(env = config::LOCATION_ENV, default_value = config::DEFAULT_LOCATION)]
    pub region: String,
    #[arg(default_value = "example-job")]
    pub job_id: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let options = config::polling_options()?;
    let client = BatchService::builder().build().await?;

    let name = super::job_name(&args.project_id, &args.region, &args.job_id);
    let job = wait_for_job(&client, name, options).await?;
    println!("Job state: {}", batch_job_state_name(&job));

    Ok(())
}

/// Polls the job named `name` until it reaches a terminal state.
///
/// Each poll is one `GetJob` call, including the first one. A failed job is
/// returned as an error, the last status event describes the failure.
pub async fn wait_for_job(
    client: &BatchService,
    name: String,
    options: PollingOptions,
) -> cookbook_lro::Result<Job> {
    let get_job = {
        let client = client.clone();
        move |name: String| {
            let client = client.clone();
            async move {
                client
                    .get_job()
                    .set_name(name)
                    .send()
                    .await
                    .map(BatchJobOperation::from)
            }
        }
    };
    let start = {
        let get_job = get_job.clone();
        move || get_job(name)
    };
    cookbook_lro::new_poller(options, start, get_job)
        .until_done()
        .await
}
