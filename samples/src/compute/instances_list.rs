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

// [START compute_instances_list_all]
use cookbook_snippet::config;
use google_cloud_compute_v1::client::Instances;
use google_cloud_gax::paginator::ItemPaginator;

#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let client = Instances::builder().build().await?;

    let mut items = client
        .aggregated_list()
        .set_project(args.project_id)
        .by_item();
    while let Some((zone, scoped_list)) = items.next().await.transpose()? {
        for instance in scoped_list.instances {
            let name = instance.name.as_deref().unwrap_or_default();
            println!("Instance {name} found in zone: {zone}");
        }
    }

    Ok(())
}
// [END compute_instances_list_all]
