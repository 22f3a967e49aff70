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

//! Run the snippets against Google Cloud.
//!
//! Each test creates its resources with random names, runs the snippet
//! binaries, and releases the resources even if the test fails.

#[cfg(all(test, feature = "run-integration-tests"))]
mod driver {
    use cookbook_test_utils::cleanup::{self, Cleanup, ignore_not_found};
    use cookbook_test_utils::resource_names::{
        PREFIX, generate_test_id, random_instance_name, random_job_id, random_secret_id,
    };
    use cookbook_test_utils::runtime_config::{project_id, region_id, zone_id};
    use cookbook_test_utils::snippet::Snippet;
    use google_cloud_gax::error::rpc::Code;
    use std::time::Duration;

    fn is_not_found(e: &google_cloud_gax::error::Error) -> bool {
        e.status().is_some_and(|s| s.code == Code::NotFound)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn secretmanager() -> anyhow::Result<()> {
        let _guard = cookbook_test_utils::tracing::enable_tracing();
        let project_id = project_id()?;
        let secret_id = random_secret_id();
        let payload = format!("the payload for {}", generate_test_id());

        cleanup::scoped(|cleanup| async move {
            let name = format!("projects/[^/]+/secrets/{secret_id}");
            let args = [project_id.as_str(), secret_id.as_str()];

            Snippet::new(env!("CARGO_BIN_EXE_secretmanager-create_secret"))
                .args(args)
                .run()
                .await?
                .assert_success()?
                .assert_stdout_matches(&format!("Created secret {name}"))?;
            defer_delete_secret(&cleanup, &project_id, &secret_id);

            Snippet::new(env!("CARGO_BIN_EXE_secretmanager-get_secret"))
                .args(args)
                .run()
                .await?
                .assert_success()?
                .assert_stdout_matches(&format!(r"Found secret {name} \(automatic\)"))?;

            Snippet::new(env!("CARGO_BIN_EXE_secretmanager-add_secret_version"))
                .args(args)
                .arg(&payload)
                .run()
                .await?
                .assert_success()?
                .assert_stdout_matches(&format!("Added secret version {name}/versions/1"))?;

            Snippet::new(env!("CARGO_BIN_EXE_secretmanager-access_secret_version"))
                .args(args)
                .run()
                .await?
                .assert_success()?
                .assert_stdout_contains(&format!("Payload: {payload}"))?;

            Snippet::new(env!("CARGO_BIN_EXE_secretmanager-list_secrets"))
                .arg(&project_id)
                .run()
                .await?
                .assert_success()?
                .assert_stdout_matches(&format!("(?m)^{name}$"))?;

            Snippet::new(env!("CARGO_BIN_EXE_secretmanager-delete_secret"))
                .args(args)
                .run()
                .await?
                .assert_success()?
                .assert_stdout_contains(&format!(
                    "Deleted secret projects/{project_id}/secrets/{secret_id}"
                ))?;

            Snippet::new(env!("CARGO_BIN_EXE_secretmanager-get_secret"))
                .args(args)
                .run()
                .await?
                .assert_failure(1)?
                .assert_stderr_matches("NOT_FOUND|NotFound|not found")?;

            anyhow::Ok(())
        })
        .await
    }

    fn defer_delete_secret(cleanup: &Cleanup, project_id: &str, secret_id: &str) {
        use google_cloud_secretmanager_v1::client::SecretManagerService;
        let name = format!("projects/{project_id}/secrets/{secret_id}");
        cleanup.defer(format!("delete secret {name}"), async move {
            let client = SecretManagerService::builder().build().await?;
            let result = client.delete_secret().set_name(&name).send().await;
            ignore_not_found(result, is_not_found)?;
            anyhow::Ok(())
        });
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn compute() -> anyhow::Result<()> {
        let _guard = cookbook_test_utils::tracing::enable_tracing();
        let project_id = project_id()?;
        let zone = zone_id();
        let name = random_instance_name();
        if let Err(e) = cleanup_stale_instances(&project_id).await {
            tracing::warn!("cannot cleanup stale instances: {e:#}");
        }

        cleanup::scoped(|cleanup| async move {
            Snippet::new(env!("CARGO_BIN_EXE_compute-instances_create"))
                .args([&project_id, &zone, &name])
                .arg("e2-micro")
                .run()
                .await?
                .assert_success()?
                .assert_stdout_contains(&format!("Creating the {name} instance in {zone}..."))?
                .assert_stdout_contains("Instance created.")?;
            defer_delete_instance(&cleanup, &project_id, &zone, &name);

            Snippet::new(env!("CARGO_BIN_EXE_compute-instances_list"))
                .arg(&project_id)
                .run()
                .await?
                .assert_success()?
                .assert_stdout_matches(&format!("Instance {name} found in zone: .*{zone}"))?;

            Snippet::new(env!("CARGO_BIN_EXE_compute-instances_delete"))
                .args([&project_id, &zone, &name])
                .run()
                .await?
                .assert_success()?
                .assert_stdout_contains(&format!("Instance {name} deleted."))?;

            anyhow::Ok(())
        })
        .await
    }

    fn defer_delete_instance(cleanup: &Cleanup, project_id: &str, zone: &str, name: &str) {
        use google_cloud_compute_v1::client::Instances;
        use google_cloud_lro::Poller;
        let (project_id, zone, name) = (project_id.to_string(), zone.to_string(), name.to_string());
        cleanup.defer(format!("delete instance {name} in {zone}"), async move {
            let client = Instances::builder().build().await?;
            let result = client
                .delete()
                .set_project(project_id)
                .set_zone(zone)
                .set_instance(name)
                .poller()
                .until_done()
                .await;
            ignore_not_found(result, is_not_found)?;
            anyhow::Ok(())
        });
    }

    /// Deletes instances left behind by previous runs.
    async fn cleanup_stale_instances(project_id: &str) -> anyhow::Result<()> {
        use google_cloud_compute_v1::client::Instances;
        use google_cloud_gax::paginator::ItemPaginator;
        use google_cloud_lro::Poller;
        use google_cloud_wkt::Timestamp;
        use std::time::{SystemTime, UNIX_EPOCH};

        let stale_deadline = SystemTime::now().duration_since(UNIX_EPOCH)?;
        let stale_deadline = stale_deadline - Duration::from_secs(24 * 60 * 60);
        let stale_deadline = Timestamp::new(stale_deadline.as_secs() as i64, 0)
            .expect("24 hours ago fits in wkt Timestamp");

        let client = Instances::builder().build().await?;
        let mut items = client
            .aggregated_list()
            .set_project(project_id)
            .set_return_partial_success(true)
            .by_item();
        while let Some((_zone, scoped_list)) = items.next().await.transpose()? {
            for instance in scoped_list.instances {
                if instance
                    .name
                    .as_ref()
                    .is_none_or(|n| !n.starts_with(PREFIX))
                {
                    continue;
                }
                if instance
                    .creation_timestamp
                    .as_ref()
                    .and_then(|v| Timestamp::try_from(v).ok())
                    .is_none_or(|t| t > stale_deadline)
                {
                    continue;
                }
                if let (Some(name), Some(zone)) = (instance.name, instance.zone) {
                    tracing::info!("deleting stale instance {name} in {zone}");
                    let result = client
                        .delete()
                        .set_project(project_id)
                        .set_zone(zone)
                        .set_instance(name)
                        .poller()
                        .until_done()
                        .await;
                    if let Err(e) = result {
                        tracing::warn!("cannot delete stale instance: {e:?}");
                    }
                }
            }
        }
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn speech() -> anyhow::Result<()> {
        let _guard = cookbook_test_utils::tracing::enable_tracing();
        let project_id = project_id()?;

        Snippet::new(env!("CARGO_BIN_EXE_speech-batch_recognize"))
            .arg(&project_id)
            .env("COOKBOOK_POLL_INTERVAL", "5s")
            .run()
            .await?
            .assert_success()?
            .assert_stdout_matches(
                "Long running operation started: projects/[^/]+/locations/global/operations/",
            )?
            .assert_stdout_matches("(?i)Transcript: .*hello")?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn aiplatform_missing_job() -> anyhow::Result<()> {
        let _guard = cookbook_test_utils::tracing::enable_tracing();
        let project_id = project_id()?;
        let location = region_id();
        // Job ids are numeric, this one does not exist.
        let job_id = "1234567890";

        Snippet::new(env!("CARGO_BIN_EXE_aiplatform-get_batch_prediction_job"))
            .args([job_id, project_id.as_str(), location.as_str()])
            .run()
            .await?
            .assert_failure(1)?;

        Snippet::new(env!("CARGO_BIN_EXE_aiplatform-wait_batch_prediction_job"))
            .args([job_id, project_id.as_str(), location.as_str()])
            .run()
            .await?
            .assert_failure(1)?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn batch() -> anyhow::Result<()> {
        let _guard = cookbook_test_utils::tracing::enable_tracing();
        let project_id = project_id()?;
        let region = region_id();
        let job_id = random_job_id();

        cleanup::scoped(|cleanup| async move {
            let args = [project_id.as_str(), region.as_str(), job_id.as_str()];

            Snippet::new(env!("CARGO_BIN_EXE_batch-create_job"))
                .args(args)
                .run()
                .await?
                .assert_success()?
                .assert_stdout_matches(&format!(
                    "Created job projects/[^/]+/locations/{region}/jobs/{job_id}"
                ))?;
            defer_delete_job(&cleanup, &project_id, &region, &job_id);

            Snippet::new(env!("CARGO_BIN_EXE_batch-wait_job"))
                .args(args)
                .env("COOKBOOK_POLL_INTERVAL", "15s")
                .timeout(Duration::from_secs(30 * 60))
                .run()
                .await?
                .assert_success()?
                .assert_stdout_contains("Job state: SUCCEEDED")?;

            anyhow::Ok(())
        })
        .await
    }

    fn defer_delete_job(cleanup: &Cleanup, project_id: &str, region: &str, job_id: &str) {
        use google_cloud_batch_v1::client::BatchService;
        use google_cloud_lro::Poller;
        let name = format!("projects/{project_id}/locations/{region}/jobs/{job_id}");
        cleanup.defer(format!("delete job {name}"), async move {
            let client = BatchService::builder().build().await?;
            let result = client.delete_job().set_name(&name).poller().until_done().await;
            ignore_not_found(result, is_not_found)?;
            anyhow::Ok(())
        });
    }
}
