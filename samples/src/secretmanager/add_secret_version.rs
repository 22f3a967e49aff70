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

// [START secretmanager_add_secret_version]
use cookbook_snippet::config;
use google_cloud_secretmanager_v1::client::SecretManagerService;
use google_cloud_secretmanager_v1::model::SecretPayload;

/// Adds a new version to an existing secret.
///
/// The service rejects the payload if its checksum does not match.
#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    #[arg(default_value = "my-secret")]
    pub secret_id: String,
    #[arg(default_value = "my super secret data")]
    pub payload: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let client = SecretManagerService::builder().build().await?;

    let data = bytes::Bytes::from(args.payload);
    let checksum = crc32c::crc32c(&data) as i64;
    let version = client
        .add_secret_version()
        .set_parent(format!(
            "projects/{}/secrets/{}",
            args.project_id, args.secret_id
        ))
        .set_payload(
            SecretPayload::new()
                .set_data(data)
                .set_data_crc32c(checksum),
        )
        .send()
        .await?;
    println!("Added secret version {}", version.name);

    Ok(())
}
// [END secretmanager_add_secret_version]
