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

// [START secretmanager_delete_secret]
use cookbook_snippet::config;
use google_cloud_secretmanager_v1::client::SecretManagerService;

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
    client.delete_secret().set_name(&name).send().await?;
    println!("Deleted secret {name}");

    Ok(())
}
// [END secretmanager_delete_secret]
