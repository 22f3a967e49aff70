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

use anyhow::{Context, Result};

const PROJECT_VAR: &str = "GOOGLE_CLOUD_PROJECT";
const REGION_VAR: &str = "COOKBOOK_TEST_REGION";
const ZONE_VAR: &str = "COOKBOOK_TEST_ZONE";
const DEFAULT_REGION: &str = "us-central1";
const DEFAULT_ZONE: &str = "us-central1-a";

/// Returns the project id used for the integration tests.
pub fn project_id() -> Result<String> {
    std::env::var(PROJECT_VAR).with_context(|| format!("${PROJECT_VAR} is not set"))
}

/// Returns the preferred region id used for the integration tests.
pub fn region_id() -> String {
    std::env::var(REGION_VAR)
        .ok()
        .unwrap_or(DEFAULT_REGION.to_string())
}

/// Returns the preferred zone id used for the integration tests.
pub fn zone_id() -> String {
    std::env::var(ZONE_VAR)
        .ok()
        .unwrap_or(DEFAULT_ZONE.to_string())
}
