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

// [START batch_labels_runnable]
use cookbook_snippet::config;
use google_cloud_batch_v1::client::BatchService;
use google_cloud_batch_v1::model::{
    ComputeResource, Job, LogsPolicy, Runnable, TaskGroup, TaskSpec, logs_policy, runnable,
};
use google_cloud_wkt::Duration;

/// Creates a Cloud Batch job with a container and a script.
///
/// The job runs three tasks. Each task runs both programs and prints its
/// index. Use `batch-wait_job` to wait until the job completes.
#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    #[arg(env = config::LOCATION_ENV, default_value = config::DEFAULT_LOCATION)]
    pub region: String,
    /// Must be unique for each project and region pair.
    #[arg(default_value = "example-job")]
    pub job_id: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let client = BatchService::builder().build().await?;

    let job = client
        .create_job()
        .set_parent(super::parent(&args.project_id, &args.region))
        .set_job_id(&args.job_id)
        .set_job(hello_world_job())
        .send()
        .await?;
    println!("Created job {}", job.name);

    Ok(())
}

/// The job definition: three tasks, each running two labeled programs.
pub fn hello_world_job() -> Job {
    const COMMAND: &str = "echo Hello world! This is task ${BATCH_TASK_INDEX}.";

    let container = Runnable::new()
        .set_container(
            runnable::Container::new()
                .set_image_uri("gcr.io/google-containers/busybox")
                .set_entrypoint("/bin/sh")
                .set_commands(["-c", COMMAND]),
        )
        .set_labels([("RUNNABLE_LABEL_NAME1", "RUNNABLE_LABEL_VALUE1")]);
    let script = Runnable::new()
        .set_script(runnable::Script::new().set_text(COMMAND))
        .set_labels([("RUNNABLE_LABEL_NAME2", "RUNNABLE_LABEL_VALUE2")]);

    // 500 milli-CPUs is half a CPU.
    let task = TaskSpec::new()
        .set_runnables([container, script])
        .set_compute_resource(
            ComputeResource::new()
                .set_cpu_milli(500)
                .set_memory_mib(16),
        )
        .set_max_retry_count(2)
        .set_max_run_duration(Duration::clamp(3600, 0));

    Job::new()
        .set_task_groups([TaskGroup::new().set_task_count(3).set_task_spec(task)])
        .set_logs_policy(LogsPolicy::new().set_destination(logs_policy::Destination::CloudLogging))
}
// [END batch_labels_runnable]

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_definition() {
        let job = hello_world_job();
        assert_eq!(job.task_groups.len(), 1);
        let group = &job.task_groups[0];
        assert_eq!(group.task_count, 3);

        let task = group.task_spec.as_ref().expect("the group has a task spec");
        assert_eq!(task.max_retry_count, 2);
        assert_eq!(task.max_run_duration, Some(Duration::clamp(3600, 0)));
        let resources = task.compute_resource.as_ref().expect("resources are set");
        assert_eq!(resources.cpu_milli, 500);
        assert_eq!(resources.memory_mib, 16);

        let labels = task
            .runnables
            .iter()
            .flat_map(|r| r.labels.keys())
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(labels, ["RUNNABLE_LABEL_NAME1", "RUNNABLE_LABEL_NAME2"]);
        assert!(task.runnables[0].container().is_some(), "{task:?}");
        assert!(task.runnables[1].script().is_some(), "{task:?}");

        let logs = job.logs_policy.as_ref().map(|p| &p.destination);
        assert_eq!(logs, Some(&logs_policy::Destination::CloudLogging));
    }
}
