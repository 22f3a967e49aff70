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

//! Verify the exit code contract of the snippet binaries.
//!
//! These tests do not need a Google Cloud project. The snippets fail before
//! any RPC completes, either while validating their arguments or while
//! loading the credentials.

use cookbook_test_utils::snippet::Snippet;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(120);

/// Configures a snippet without usable credentials.
fn offline(program: &str) -> Snippet {
    Snippet::new(program)
        .env(
            "GOOGLE_APPLICATION_CREDENTIALS",
            "/nonexistent/cookbook/credentials.json",
        )
        .env_remove("GOOGLE_CLOUD_PROJECT")
        .env_remove("GOOGLE_CLOUD_ZONE")
        .env_remove("GOOGLE_CLOUD_LOCATION")
        .env_remove("COOKBOOK_POLL_INTERVAL")
        .env_remove("COOKBOOK_POLL_TIMEOUT")
        .timeout(TIMEOUT)
}

#[tokio::test]
async fn failed_rpc_exits_with_1() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_secretmanager-get_secret"))
        .args(["cookbook-test-project", "cookbook-test-secret"])
        .run()
        .await?;
    output.assert_failure(1)?.assert_stderr_matches("(?m)^Error: ")?;
    assert!(output.stdout.is_empty(), "{output}");
    Ok(())
}

#[tokio::test]
async fn failed_rpc_with_defaults_exits_with_1() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_secretmanager-list_secrets"))
        .run()
        .await?;
    output.assert_failure(1)?;
    Ok(())
}

#[tokio::test]
async fn failed_lro_start_exits_with_1() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_speech-batch_recognize"))
        .arg("cookbook-test-project")
        .run()
        .await?;
    output.assert_failure(1)?;
    assert!(
        !output.stdout.contains("Long running operation started"),
        "{output}"
    );
    Ok(())
}

#[tokio::test]
async fn failed_job_query_exits_with_1() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_batch-wait_job"))
        .args(["cookbook-test-project", "us-central1", "cookbook-test-job"])
        .run()
        .await?;
    output.assert_failure(1)?.assert_stderr_matches("(?m)^Error: ")?;
    assert!(!output.stdout.contains("Job state:"), "{output}");
    Ok(())
}

#[tokio::test]
async fn failed_job_creation_exits_with_1() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_batch-create_job"))
        .run()
        .await?;
    output.assert_failure(1)?;
    assert!(!output.stdout.contains("Created job"), "{output}");
    Ok(())
}

#[tokio::test]
async fn default_instance_name_is_rejected() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_compute-instances_create"))
        .run()
        .await?;
    output
        .assert_failure(1)?
        .assert_stderr_matches(r#"invalid instance name "YOUR_INSTANCE_NAME""#)?;
    assert!(!output.stdout.contains("Creating the"), "{output}");
    Ok(())
}

#[tokio::test]
async fn invalid_polling_configuration() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_compute-instances_create"))
        .args(["cookbook-test-project", "us-central1-a", "cookbook-test-vm"])
        .env("COOKBOOK_POLL_TIMEOUT", "a while")
        .run()
        .await?;
    output
        .assert_failure(1)?
        .assert_stderr_matches(r"invalid duration in \$COOKBOOK_POLL_TIMEOUT")?;
    Ok(())
}

#[tokio::test]
async fn usage_error_exits_with_1() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_compute-instances_list"))
        .args(["a", "b", "c"])
        .run()
        .await?;
    output.assert_failure(1)?.assert_stderr_matches("(?i)usage")?;
    Ok(())
}

#[tokio::test]
async fn help_exits_with_0() -> anyhow::Result<()> {
    let output = offline(env!("CARGO_BIN_EXE_aiplatform-get_batch_prediction_job"))
        .arg("--help")
        .run()
        .await?;
    output
        .assert_success()?
        .assert_stdout_matches("BATCH_PREDICTION_JOB_ID")?
        .assert_stdout_contains("YOUR_PROJECT_ID")?;
    Ok(())
}
