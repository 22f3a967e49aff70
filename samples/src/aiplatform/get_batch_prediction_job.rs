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

// [START aiplatform_get_batch_prediction_job_sample]
use cookbook_snippet::config;
use google_cloud_aiplatform_v1::client::JobService;
use google_cloud_aiplatform_v1::model::BatchPredictionJob;
use std::fmt::Write;

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
    let client = JobService::builder()
        .with_endpoint(super::endpoint(&args.location))
        .build()
        .await?;

    let job = client
        .get_batch_prediction_job()
        .set_name(super::job_name(
            &args.project_id,
            &args.location,
            &args.batch_prediction_job_id,
        ))
        .send()
        .await?;

    let mut text = String::new();
    describe(&job, &mut text)?;
    print!("{text}");

    Ok(())
}
// [END aiplatform_get_batch_prediction_job_sample]

/// Formats the interesting fields of a job, one per line.
pub fn describe<W: Write>(job: &BatchPredictionJob, out: &mut W) -> std::fmt::Result {
    writeln!(out, "Get batch prediction job response")?;
    writeln!(out, "\tName : {}", job.name)?;
    writeln!(out, "\tDisplayName : {}", job.display_name)?;
    writeln!(out, "\tModel : {}", job.model)?;
    writeln!(out, "\tState : {}", state_name(job))?;
    writeln!(out, "\tCreate Time : {:?}", job.create_time)?;
    writeln!(out, "\tStart Time : {:?}", job.start_time)?;
    writeln!(out, "\tEnd Time : {:?}", job.end_time)?;
    writeln!(out, "\tUpdate Time : {:?}", job.update_time)?;
    let mut labels = job.labels.iter().collect::<Vec<_>>();
    labels.sort();
    writeln!(out, "\tLabels : {labels:?}")?;

    writeln!(out, "\tInput config")?;
    if let Some(input) = &job.input_config {
        writeln!(out, "\t\tInstances format : {}", input.instances_format)?;
        writeln!(out, "\t\tSource : {:?}", input.source)?;
    }
    writeln!(out, "\tOutput config")?;
    if let Some(output) = &job.output_config {
        writeln!(out, "\t\tPredictions format : {}", output.predictions_format)?;
        writeln!(out, "\t\tDestination : {:?}", output.destination)?;
    }
    writeln!(out, "\tOutput info")?;
    if let Some(info) = &job.output_info {
        writeln!(out, "\t\tOutput location : {:?}", info.output_location)?;
    }

    writeln!(out, "\tError")?;
    if let Some(error) = &job.error {
        writeln!(out, "\t\tCode : {}", error.code)?;
        writeln!(out, "\t\tMessage : {}", error.message)?;
    }
    writeln!(out, "\tPartial failures : {}", job.partial_failures.len())?;
    for failure in &job.partial_failures {
        writeln!(out, "\t\t{} : {}", failure.code, failure.message)?;
    }

    writeln!(out, "\tResources consumed")?;
    if let Some(resources) = &job.resources_consumed {
        writeln!(out, "\t\tReplica Hours : {}", resources.replica_hours)?;
    }
    writeln!(out, "\tCompletion status")?;
    if let Some(stats) = &job.completion_stats {
        writeln!(out, "\t\tSuccessful count : {}", stats.successful_count)?;
        writeln!(out, "\t\tFailed count : {}", stats.failed_count)?;
        writeln!(out, "\t\tIncomplete count : {}", stats.incomplete_count)?;
    }
    Ok(())
}

/// The `JOB_STATE_*` name of the job state.
pub fn state_name(job: &BatchPredictionJob) -> String {
    job.state
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:?}", job.state))
}
