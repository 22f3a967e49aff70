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

// [START compute_instances_create]
use crate::operations::ComputeOperation;
use cookbook_lro::Poller;
use cookbook_snippet::config;
use google_cloud_compute_v1::client::{Instances, ZoneOperations};
use google_cloud_compute_v1::model::{
    AttachedDisk, AttachedDiskInitializeParams, Instance, NetworkInterface,
};

/// Creates a Compute Engine instance and waits until it is provisioned.
#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    #[arg(env = config::ZONE_ENV, default_value = config::DEFAULT_ZONE)]
    pub zone: String,
    /// The name of the new instance, it must be a valid RFC 1035 label.
    #[arg(default_value = "YOUR_INSTANCE_NAME")]
    pub instance_name: String,
    #[arg(default_value = "n1-standard-1")]
    pub machine_type: String,
    #[arg(default_value = "projects/debian-cloud/global/images/family/debian-11")]
    pub source_image: String,
    #[arg(default_value = "global/networks/default")]
    pub network_name: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let name = InstanceName::try_from(args.instance_name)?;
    let options = config::polling_options()?;
    let client = Instances::builder().build().await?;
    let operations = ZoneOperations::builder().build().await?;

    let instance = Instance::new()
        .set_machine_type(format!(
            "zones/{}/machineTypes/{}",
            args.zone, args.machine_type
        ))
        .set_name(name.as_str())
        .set_labels([("source", "compute_instances_create")])
        .set_disks([AttachedDisk::new()
            .set_initialize_params(
                AttachedDiskInitializeParams::new().set_source_image(args.source_image),
            )
            .set_boot(true)
            .set_auto_delete(true)])
        .set_network_interfaces([NetworkInterface::new().set_network(args.network_name)]);

    println!("Creating the {name} instance in {}...", args.zone);
    let operation = client
        .insert()
        .set_project(&args.project_id)
        .set_zone(&args.zone)
        .set_body(instance)
        .send()
        .await?;

    // Wait until the operation status is DONE.
    let (project_id, zone) = (args.project_id, args.zone);
    let query = move |operation: String| {
        let (operations, project_id, zone) = (operations.clone(), project_id.clone(), zone.clone());
        async move {
            operations
                .wait()
                .set_project(project_id)
                .set_zone(zone)
                .set_operation(operation)
                .send()
                .await
                .map(ComputeOperation::from)
        }
    };
    cookbook_lro::new_poller_from_operation(options, ComputeOperation::from(operation), query)
        .until_done()
        .await?;
    println!("Instance created.");

    Ok(())
}
// [END compute_instances_create]

/// A Compute Engine instance name.
///
/// Names are [RFC 1035] labels: 1 to 63 characters, lowercase letters, digits,
/// and hyphens. The first character is a letter and the last character is not
/// a hyphen.
///
/// [RFC 1035]: https://www.ietf.org/rfc/rfc1035.txt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceName(String);

const MAX_NAME_LENGTH: usize = 63;

impl InstanceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InstanceName {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        let valid = value.len() <= MAX_NAME_LENGTH
            && value.starts_with(|c: char| c.is_ascii_lowercase())
            && !value.ends_with('-')
            && value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            anyhow::bail!(
                "invalid instance name {value:?}, use up to 63 lowercase letters, digits or hyphens, starting with a letter"
            );
        }
        Ok(Self(value))
    }
}

impl std::fmt::Display for InstanceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("a")]
    #[test_case("my-instance")]
    #[test_case("cookbook-test-0123456789abcdef")]
    #[test_case(&"a".repeat(63); "longest")]
    fn valid(name: &str) -> anyhow::Result<()> {
        let got = InstanceName::try_from(name.to_string())?;
        assert_eq!(got.as_str(), name);
        assert_eq!(got.to_string(), name);
        Ok(())
    }

    #[test_case(""; "empty")]
    #[test_case("YOUR_INSTANCE_NAME")]
    #[test_case("My-Instance")]
    #[test_case("1-instance")]
    #[test_case("-instance")]
    #[test_case("instance-")]
    #[test_case("my_instance")]
    #[test_case(&"a".repeat(64); "too long")]
    fn invalid(name: &str) {
        let got = InstanceName::try_from(name.to_string());
        let err = got.unwrap_err();
        assert!(err.to_string().contains("invalid instance name"), "{err}");
    }
}
