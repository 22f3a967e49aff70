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

// [START secretmanager_create_secret]
use cookbook_snippet::config;
use google_cloud_secretmanager_v1::client::SecretManagerService;
use google_cloud_secretmanager_v1::model::{Replication, Secret, replication};

/// Creates a secret with automatic replication.
#[derive(Debug, clap::Parser)]
pub struct Args {
    /// The project hosting the secret.
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    /// The id of the new secret.
    #[arg(default_value = "my-secret")]
    pub secret_id: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let client = SecretManagerService::builder().build().await?;

    let secret = client
        .create_secret()
        .set_parent(format!("projects/{}", args.project_id))
        .set_secret_id(&args.secret_id)
        .set_secret(
            Secret::new()
                .set_replication(Replication::new().set_automatic(replication::Automatic::new())),
        )
        .send()
        .await?;
    println!("Created secret {}", secret.name);

    Ok(())
}
// [END secretmanager_create_secret]
