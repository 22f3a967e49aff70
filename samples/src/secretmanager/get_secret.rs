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

// [START secretmanager_get_secret]
use anyhow::Context;
use cookbook_snippet::config;
use google_cloud_secretmanager_v1::client::SecretManagerService;
use google_cloud_secretmanager_v1::model::{Secret, replication};

#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    #[arg(default_value = "my-secret")]
    pub secret_id: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let client = SecretManagerService::builder().build().await?;

    let name = format!("projects/{}/secrets/{}", args.project_id, args.secret_id);
    let secret = client
        .get_secret()
        .set_name(&name)
        .send()
        .await
        .with_context(|| format!("cannot get secret {name}"))?;
    println!("Found secret {} ({})", secret.name, replication_policy(&secret));

    Ok(())
}

/// Describes the replication policy of a secret.
pub fn replication_policy(secret: &Secret) -> &'static str {
    match secret.replication.as_ref().and_then(|r| r.replication.as_ref()) {
        Some(replication::Replication::Automatic(_)) => "automatic",
        Some(replication::Replication::UserManaged(_)) => "user managed",
        _ => "unspecified",
    }
}
// [END secretmanager_get_secret]
