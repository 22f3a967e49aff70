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

// [START secretmanager_access_secret_version]
use anyhow::bail;
use cookbook_snippet::config;
use google_cloud_secretmanager_v1::client::SecretManagerService;
use google_cloud_secretmanager_v1::model::SecretPayload;

#[derive(Debug, clap::Parser)]
pub struct Args {
    #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
    pub project_id: String,
    #[arg(default_value = "my-secret")]
    pub secret_id: String,
    /// A version number, or `latest`.
    #[arg(default_value = "latest")]
    pub version_id: String,
}

pub async fn sample(args: Args) -> anyhow::Result<()> {
    let client = SecretManagerService::builder().build().await?;

    let response = client
        .access_secret_version()
        .set_name(format!(
            "projects/{}/secrets/{}/versions/{}",
            args.project_id, args.secret_id, args.version_id
        ))
        .send()
        .await?;
    let Some(payload) = response.payload else {
        bail!("the secret version {} has no payload", response.name);
    };
    verify_checksum(&payload)?;
    println!("Payload: {}", String::from_utf8_lossy(&payload.data));

    Ok(())
}

/// Verifies the payload against its CRC32C checksum, if the service sent one.
pub fn verify_checksum(payload: &SecretPayload) -> anyhow::Result<()> {
    match payload.data_crc32c {
        Some(want) if crc32c::crc32c(&payload.data) as i64 != want => {
            bail!("Data corruption detected.")
        }
        _ => Ok(()),
    }
}
// [END secretmanager_access_secret_version]

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum() -> anyhow::Result<()> {
        let data = bytes::Bytes::from_static(b"my super secret data");
        let payload = SecretPayload::new().set_data(data.clone());
        verify_checksum(&payload)?;

        let payload = payload.set_data_crc32c(crc32c::crc32c(&data) as i64);
        verify_checksum(&payload)?;

        let payload = payload.set_data_crc32c(42);
        let err = verify_checksum(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Data corruption detected.");
        Ok(())
    }
}
