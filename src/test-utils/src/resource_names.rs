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

//! Helper functions and types to generate random resource names.
//!
//! All the names start with [PREFIX]. Tests that garbage collect stale
//! resources use the prefix to find them.

use rand::{
    Rng,
    distr::{Alphanumeric, Distribution},
};

/// A common prefix for resource ids.
pub const PREFIX: &str = "cookbook-test-";

/// The maximum length for a secret ID.
const SECRET_ID_LENGTH: usize = 64;

/// Compute Engine resource names are at most 63 characters.
const INSTANCE_NAME_LENGTH: usize = 63;

/// Keep the instance names short, they appear in the output of many tests.
const INSTANCE_SUFFIX_LENGTH: usize = 16;

const JOB_SUFFIX_LENGTH: usize = 16;

const TEST_ID_LENGTH: usize = 30;

/// Generate a random secret id.
pub fn random_secret_id() -> String {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_ID_LENGTH - PREFIX.len())
        .map(char::from)
        .collect();
    format!("{PREFIX}{id}")
}

/// Generate a random Compute Engine instance name.
///
/// The name is a valid [RFC 1035] label: lowercase letters, digits, and
/// hyphens, starting with a letter and ending with a letter or digit.
///
/// [RFC 1035]: https://www.ietf.org/rfc/rfc1035.txt
pub fn random_instance_name() -> String {
    let id = LowercaseAlphanumeric.random_string(INSTANCE_SUFFIX_LENGTH);
    format!("{PREFIX}{id}")
}

/// Generate a random Cloud Batch job id.
///
/// Job ids are lowercase letters, digits, and hyphens, starting with a letter.
pub fn random_job_id() -> String {
    let id = LowercaseAlphanumeric.random_string(JOB_SUFFIX_LENGTH);
    format!("{PREFIX}job-{id}")
}

/// Get a unique id to use for test resources.
///
/// # Example
/// ```
/// use cookbook_test_utils::resource_names::{PREFIX, generate_test_id};
/// let id = generate_test_id();
/// assert!(id.starts_with(PREFIX), "{id}");
/// assert_eq!(id.len(), 30);
/// ```
pub fn generate_test_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    let mut id = format!("{PREFIX}{uuid}");
    id.truncate(TEST_ID_LENGTH);
    id
}

const LOWERCASE_ALPHANUMERIC_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Sample a `u8`, uniformly distributed over ASCII lowercase letters and numbers: a-z and 0-9.
///
/// # Example
/// ```
/// use cookbook_test_utils::resource_names::LowercaseAlphanumeric;
/// let got: String = LowercaseAlphanumeric.random_string(32);
/// assert_eq!(got.len(), 32);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseAlphanumeric;

impl LowercaseAlphanumeric {
    /// Create a string with `n` characters from the character set.
    pub fn random_string(&self, n: usize) -> String {
        rand::rng()
            .sample_iter(self)
            .take(n)
            .map(char::from)
            .collect()
    }
}

impl Distribution<u8> for LowercaseAlphanumeric {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        let index = rng.random_range(0..LOWERCASE_ALPHANUMERIC_CHARSET.len());
        LOWERCASE_ALPHANUMERIC_CHARSET[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn secret_id() {
        assert!(
            PREFIX.len() < SECRET_ID_LENGTH,
            "{PREFIX} length ({}) should be smaller than {SECRET_ID_LENGTH}",
            PREFIX.len()
        );
        let got = random_secret_id();
        assert_eq!(got.len(), SECRET_ID_LENGTH, "{got}");
        let suffix = got
            .strip_prefix(PREFIX)
            .expect("{got} should start with {PREFIX}");
        assert!(
            suffix.chars().all(|c| c.is_ascii_alphanumeric()),
            "the suffix should be alphanumeric: {suffix}"
        );
    }

    #[test]
    fn instance_name() {
        let got = random_instance_name();
        assert!(
            got.len() <= INSTANCE_NAME_LENGTH,
            "{got} has more than {INSTANCE_NAME_LENGTH} characters"
        );
        assert!(got.starts_with(|c: char| c.is_ascii_lowercase()), "{got}");
        let suffix = got
            .strip_prefix(PREFIX)
            .expect("{got} should start with {PREFIX}");
        let test = is_ascii_lowercase_alphanumeric(suffix);
        assert!(test.is_ok(), "{test:?}");
    }

    #[test]
    fn job_id() {
        let got = random_job_id();
        assert!(got.starts_with(PREFIX), "{got}");
        assert_ne!(got, random_job_id());
    }

    #[test]
    fn test_id() {
        let got = generate_test_id();
        assert_eq!(got.len(), TEST_ID_LENGTH, "{got}");
        assert!(got.starts_with(PREFIX), "{got}");
        assert_ne!(got, generate_test_id());
    }

    #[test]
    fn lowercase() {
        let got: String = rand::rng()
            .sample_iter(&LowercaseAlphanumeric)
            .take(128)
            .map(char::from)
            .collect();
        let test = is_ascii_lowercase_alphanumeric(&got);
        assert!(test.is_ok(), "{test:?}");
    }

    #[test]
    fn lowercase_string() {
        let got = LowercaseAlphanumeric.random_string(32);
        assert_eq!(got.len(), 32, "{got:?}");
        let test = is_ascii_lowercase_alphanumeric(&got);
        assert!(test.is_ok(), "{test:?}");
    }

    fn is_ascii_lowercase_alphanumeric(got: &str) -> anyhow::Result<()> {
        for (idx, c) in got.chars().enumerate() {
            if !c.is_ascii() {
                bail!("character at {idx} ({c}) is not ASCII in {got}")
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() {
                bail!("character at {idx} ({c}) is not in expected character class in {got}");
            }
        }
        Ok(())
    }
}
