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

// [START compute_instances_delete]
use cookbook_snippet::config;
use google_cloud_compute_v1::client::Instances;
use google_cloud_lro::Poller;

#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    #[arg(env = config::ZONE_ENV, default_value = config::DEFAULT_ZONE)]
    pub zone: String,
    #[arg(default_value = "YOUR_INSTANCE_NAME")]
    pub instance_name: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let client = Instances::builder().build().await?;

    // The client library includes its own poller for Compute Engine operations.
    client
        .delete()
        .set_project(args.project_id)
        .set_zone(args.zone)
        .set_instance(&args.instance_name)
        .poller()
        .until_done()
        .await?
        .to_result()?;
    println!("Instance {} deleted.", args.instance_name);

    Ok(())
}
// [END compute_instances_delete]
