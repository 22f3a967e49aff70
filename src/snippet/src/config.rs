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

//! Defaults and environment variables shared by the snippets.
//!
//! The argument structs in each snippet use these constants in their `#[arg]`
//! attributes, e.g.:
//!
//! ```
//! use cookbook_snippet::config;
//! #[derive(clap::Parser)]
//! struct Args {
//!     #[arg(env = config::PROJECT_ENV, default_value = config::DEFAULT_PROJECT)]
//!     project_id: String,
//! }
//! ```

use anyhow::Context;
use cookbook_lro::PollingOptions;
use cookbook_lro::polling_backoff_policy::FixedDelay;
use std::time::Duration;

/// The environment variable with the default project id.
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";
/// The environment variable with the default location, e.g. `us-central1`.
pub const LOCATION_ENV: &str = "GOOGLE_CLOUD_LOCATION";
/// The environment variable with the default zone, e.g. `us-central1-a`.
pub const ZONE_ENV: &str = "GOOGLE_CLOUD_ZONE";

pub const DEFAULT_PROJECT: &str = "YOUR_PROJECT_ID";
pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_ZONE: &str = "us-central1-a";

/// Overrides the time between two status queries.
///
/// The value uses the [humantime] format, e.g. `30s` or `1m 30s`.
pub const POLL_INTERVAL_ENV: &str = "COOKBOOK_POLL_INTERVAL";

/// Overrides the maximum time waiting for an operation.
///
/// The value uses the [humantime] format, e.g. `45m`. The special value
/// `unbounded` disables the deadline.
pub const POLL_TIMEOUT_ENV: &str = "COOKBOOK_POLL_TIMEOUT";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const UNBOUNDED: &str = "unbounded";

/// Returns the polling configuration for the snippets.
///
/// The snippets wait [DEFAULT_POLL_INTERVAL] between status queries, and
/// give up after [DEFAULT_POLL_TIMEOUT]. Both values can be changed with
/// environment variables.
///
/// # Example
/// ```
/// # use cookbook_snippet::config::*;
/// let options = polling_options()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn polling_options() -> anyhow::Result<PollingOptions> {
    let interval = duration_from_env(POLL_INTERVAL_ENV)?.unwrap_or(DEFAULT_POLL_INTERVAL);
    let options = match std::env::var(POLL_TIMEOUT_ENV) {
        Ok(v) if v.trim() == UNBOUNDED => PollingOptions::unbounded(),
        _ => PollingOptions::with_timeout(
            duration_from_env(POLL_TIMEOUT_ENV)?.unwrap_or(DEFAULT_POLL_TIMEOUT),
        ),
    };
    Ok(options.set_backoff_policy(FixedDelay::new(interval)))
}

fn duration_from_env(name: &str) -> anyhow::Result<Option<Duration>> {
    let value = match std::env::var(name) {
        Ok(v) => v,
        Err(std::env::VarError::NotPresent) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("cannot read ${name}")),
    };
    let d = humantime::parse_duration(value.trim())
        .with_context(|| format!("invalid duration in ${name}: {value:?}"))?;
    Ok(Some(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_env::ScopedEnv;
    use serial_test::serial;
    use test_case::test_case;

    #[derive(Debug, clap::Parser)]
    struct Args {
        #[arg(env = PROJECT_ENV, default_value = DEFAULT_PROJECT)]
        project_id: String,
        #[arg(env = LOCATION_ENV, default_value = DEFAULT_LOCATION)]
        location: String,
        #[arg(env = ZONE_ENV, default_value = DEFAULT_ZONE)]
        zone: String,
    }

    #[test]
    #[serial]
    fn argument_defaults() -> anyhow::Result<()> {
        use clap::Parser;
        let _p = ScopedEnv::remove(PROJECT_ENV);
        let _l = ScopedEnv::remove(LOCATION_ENV);
        let _z = ScopedEnv::remove(ZONE_ENV);
        let args = Args::try_parse_from(["program"])?;
        assert_eq!(args.project_id, "YOUR_PROJECT_ID");
        assert_eq!(args.location, "us-central1");
        assert_eq!(args.zone, "us-central1-a");

        let _p = ScopedEnv::set(PROJECT_ENV, "env-project");
        let _z = ScopedEnv::set(ZONE_ENV, "europe-west4-b");
        let args = Args::try_parse_from(["program"])?;
        assert_eq!(args.project_id, "env-project");
        assert_eq!(args.location, "us-central1");
        assert_eq!(args.zone, "europe-west4-b");
        Ok(())
    }

    #[test]
    #[serial]
    fn defaults() -> anyhow::Result<()> {
        let _i = ScopedEnv::remove(POLL_INTERVAL_ENV);
        let _t = ScopedEnv::remove(POLL_TIMEOUT_ENV);
        let options = polling_options()?;
        assert_eq!(options.timeout(), Some(DEFAULT_POLL_TIMEOUT));
        Ok(())
    }

    #[test_case("45m", Some(Duration::from_secs(45 * 60)); "minutes")]
    #[test_case(" 90s ", Some(Duration::from_secs(90)); "trimmed")]
    #[test_case("unbounded", None; "unbounded")]
    #[serial]
    fn timeout_override(value: &str, want: Option<Duration>) -> anyhow::Result<()> {
        let _i = ScopedEnv::remove(POLL_INTERVAL_ENV);
        let _t = ScopedEnv::set(POLL_TIMEOUT_ENV, value);
        let options = polling_options()?;
        assert_eq!(options.timeout(), want);
        Ok(())
    }

    #[test_case(POLL_INTERVAL_ENV; "interval")]
    #[test_case(POLL_TIMEOUT_ENV; "timeout")]
    #[serial]
    fn invalid_duration(name: &str) {
        let _e = ScopedEnv::set(name, "not-a-duration");
        let err = polling_options().expect_err("invalid durations are rejected");
        assert!(format!("{err}").contains(name), "{err}");
    }

    #[test]
    #[serial]
    fn interval_override() -> anyhow::Result<()> {
        let _i = ScopedEnv::set(POLL_INTERVAL_ENV, "2s");
        let _t = ScopedEnv::remove(POLL_TIMEOUT_ENV);
        assert_eq!(duration_from_env(POLL_INTERVAL_ENV)?, Some(Duration::from_secs(2)));
        let options = polling_options()?;
        assert_eq!(options.timeout(), Some(DEFAULT_POLL_TIMEOUT));
        Ok(())
    }
}
