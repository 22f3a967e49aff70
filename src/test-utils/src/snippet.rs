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

//! Run a snippet as a child process and make assertions on its output.
//!
//! # Example
//! ```no_run
//! # use cookbook_test_utils::snippet::Snippet;
//! # async fn sample() -> anyhow::Result<()> {
//! let output = Snippet::new("target/debug/secretmanager-get_secret")
//!     .args(["my-project", "my-secret"])
//!     .run()
//!     .await?;
//! output
//!     .assert_success()?
//!     .assert_stdout_matches(r"Found secret projects/\d+/secrets/my-secret")?;
//! # Ok(()) }
//! ```

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

/// How long a snippet may run before the harness kills it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Configures a child process running a snippet.
#[derive(Clone, Debug)]
pub struct Snippet {
    program: PathBuf,
    args: Vec<OsString>,
    envs: Vec<(OsString, Option<OsString>)>,
    timeout: Duration,
}

impl Snippet {
    /// Creates a new runner for the snippet at `program`.
    ///
    /// In integration tests use the path provided by cargo, for example
    /// `env!("CARGO_BIN_EXE_secretmanager-get_secret")`.
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Appends a positional argument.
    pub fn arg<V: Into<OsString>>(mut self, v: V) -> Self {
        self.args.push(v.into());
        self
    }

    /// Appends several positional arguments.
    pub fn args<I, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OsString>,
    {
        self.args.extend(v.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for the child process.
    pub fn env<K: Into<OsString>, V: Into<OsString>>(mut self, k: K, v: V) -> Self {
        self.envs.push((k.into(), Some(v.into())));
        self
    }

    /// Removes an environment variable inherited from the test process.
    pub fn env_remove<K: Into<OsString>>(mut self, k: K) -> Self {
        self.envs.push((k.into(), None));
        self
    }

    /// Changes the maximum running time of the child process.
    pub fn timeout(mut self, v: Duration) -> Self {
        self.timeout = v;
        self
    }

    /// Runs the snippet to completion and captures its output.
    ///
    /// Returns an error if the process cannot start, or if it runs for longer
    /// than the timeout. In the latter case the process is killed. A snippet
    /// that exits with a non-zero status is not an error, use
    /// [SnippetOutput::assert_success] or [SnippetOutput::assert_failure].
    pub async fn run(&self) -> Result<SnippetOutput> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        for (k, v) in &self.envs {
            match v {
                Some(v) => command.env(k, v),
                None => command.env_remove(k),
            };
        }
        tracing::info!("running {:?} with args {:?}", self.program, self.args);
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "{:?} did not complete in {:?}",
                    self.program,
                    self.timeout
                )
            })?
            .with_context(|| format!("cannot run {:?}", self.program))?;
        let output = SnippetOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::info!("{:?} completed with {output:?}", self.program);
        Ok(output)
    }
}

/// The captured result of running a snippet.
///
/// The assertions return an error describing the full output, so a failing
/// test shows what the snippet printed.
#[derive(Clone, Debug)]
pub struct SnippetOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl SnippetOutput {
    /// The exit code, `None` if the process was terminated by a signal.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn assert_success(&self) -> Result<&Self> {
        if !self.success() {
            bail!("the snippet failed with {:?}\n{self}", self.code());
        }
        Ok(self)
    }

    /// Verifies the snippet exited with `code` and printed an error message.
    pub fn assert_failure(&self, code: i32) -> Result<&Self> {
        if self.code() != Some(code) {
            bail!("expected exit code {code}, got {:?}\n{self}", self.code());
        }
        if self.stderr.trim().is_empty() {
            bail!("expected an error message in stderr\n{self}");
        }
        Ok(self)
    }

    pub fn assert_stdout_matches(&self, pattern: &str) -> Result<&Self> {
        assert_matches("stdout", &self.stdout, pattern)
            .with_context(|| self.to_string())?;
        Ok(self)
    }

    pub fn assert_stderr_matches(&self, pattern: &str) -> Result<&Self> {
        assert_matches("stderr", &self.stderr, pattern)
            .with_context(|| self.to_string())?;
        Ok(self)
    }

    pub fn assert_stdout_contains(&self, needle: &str) -> Result<&Self> {
        if !self.stdout.contains(needle) {
            bail!("stdout does not contain {needle:?}\n{self}");
        }
        Ok(self)
    }
}

impl std::fmt::Display for SnippetOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "status: {}", self.status)?;
        writeln!(f, "stdout:\n{}", self.stdout)?;
        write!(f, "stderr:\n{}", self.stderr)
    }
}

fn assert_matches(stream: &str, text: &str, pattern: &str) -> Result<()> {
    let re = Regex::new(pattern).with_context(|| format!("invalid regex {pattern:?}"))?;
    if !re.is_match(text) {
        bail!("{stream} does not match {pattern:?}");
    }
    Ok(())
}
