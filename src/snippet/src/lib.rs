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

//! The entrypoint convention shared by all the snippets.
//!
//! Each snippet is a binary with a typed argument struct and an `async`
//! function returning `anyhow::Result<()>`. The binary delegates to [run]:
//!
//! ```no_run
//! use clap::Parser;
//! use std::process::ExitCode;
//!
//! #[derive(Debug, Parser)]
//! struct Args {
//!     #[arg(env = "GOOGLE_CLOUD_PROJECT", default_value = "YOUR_PROJECT_ID")]
//!     project_id: String,
//! }
//!
//! async fn sample(args: Args) -> anyhow::Result<()> {
//!     println!("running in {}", args.project_id);
//!     Ok(())
//! }
//!
//! fn main() -> ExitCode {
//!     cookbook_snippet::run(sample)
//! }
//! ```
//!
//! [run] parses the arguments, runs the snippet to completion, and maps the
//! result to the process exit code. Any error, including invalid arguments,
//! prints a message to `stderr` and exits with code 1.

pub mod config;

use std::future::Future;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// The exit code for snippets that fail.
pub const FAILURE: u8 = 1;

/// The log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runs a snippet and returns the process exit code.
///
/// The arguments are parsed from the command line, falling back to any
/// environment variables and defaults declared in `A`. Requests for `--help`
/// or `--version` print to `stdout` and succeed.
pub fn run<A, F, Fut>(sample: F) -> ExitCode
where
    A: clap::Parser + std::fmt::Debug,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    enable_tracing();
    let args = match A::try_parse() {
        Ok(args) => args,
        Err(e) => return ExitCode::from(parse_error(e)),
    };
    tracing::info!("running snippet with {args:?}");
    let result = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(run_task(sample(args))),
        Err(e) => Err(anyhow::Error::new(e).context("cannot create the tokio runtime")),
    };
    report(&result);
    ExitCode::from(exit_status(&result))
}

/// Runs the snippet on a new task, so a panic is reported as a failure.
async fn run_task<Fut>(task: Fut) -> anyhow::Result<()>
where
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(anyhow::anyhow!("the snippet panicked")),
        Err(e) => Err(anyhow::Error::new(e).context("the snippet did not complete")),
    }
}

/// Maps the result of a snippet to its exit code.
///
/// # Example
/// ```
/// # use cookbook_snippet::{exit_status, FAILURE};
/// assert_eq!(exit_status(&Ok(())), 0);
/// assert_eq!(exit_status(&Err(anyhow::anyhow!("bad"))), FAILURE);
/// ```
pub fn exit_status(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => FAILURE,
    }
}

/// Prints the error, if any, to `stderr`.
///
/// The format matches what the standard library prints for `main()`
/// functions returning an error: the error, followed by its chain of causes.
pub fn report(result: &anyhow::Result<()>) {
    if let Err(e) = result {
        eprintln!("Error: {e:?}");
    }
}

/// Installs a `tracing` subscriber writing to `stderr`.
///
/// The filter is read from `RUST_LOG`, and defaults to [DEFAULT_LOG_FILTER].
/// Does nothing if a global subscriber is already installed.
pub fn enable_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn parse_error(e: clap::Error) -> u8 {
    // `--help` and `--version` are reported as errors that do not use stderr.
    let code = if e.use_stderr() { FAILURE } else { 0 };
    if let Err(io) = e.print() {
        eprintln!("cannot print the usage message: {io}");
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[derive(Debug, Parser)]
    #[command(version, about)]
    struct TestArgs {
        #[arg(default_value = "YOUR_PROJECT_ID")]
        project_id: String,
        #[arg(default_value = "my-secret")]
        secret_id: String,
    }

    #[test]
    fn success_exit_status() {
        assert_eq!(exit_status(&Ok(())), 0);
    }

    #[test]
    fn failure_exit_status() {
        let result = Err(anyhow::anyhow!("permission denied"));
        assert_eq!(exit_status(&result), FAILURE);
        let result =
            Err(anyhow::anyhow!("inner").context("cannot get secret projects/p/secrets/s"));
        assert_eq!(exit_status(&result), FAILURE);
    }

    #[test]
    fn report_does_not_panic() {
        report(&Ok(()));
        report(&Err(anyhow::anyhow!("bad")));
    }

    #[test]
    fn help_is_not_a_failure() {
        TestArgs::command().debug_assert();
        let e = TestArgs::try_parse_from(["program", "--help"])
            .expect_err("--help is reported as an error");
        assert!(!e.use_stderr(), "{e:?}");
        assert_eq!(parse_error(e), 0);
    }

    #[test]
    fn usage_error_is_a_failure() {
        let e = TestArgs::try_parse_from(["program", "a", "b", "c"])
            .expect_err("too many positional arguments");
        assert!(e.use_stderr(), "{e:?}");
        assert_eq!(parse_error(e), FAILURE);
    }

    #[test]
    fn defaults() -> anyhow::Result<()> {
        let args = TestArgs::try_parse_from(["program"])?;
        assert_eq!(args.project_id, "YOUR_PROJECT_ID");
        assert_eq!(args.secret_id, "my-secret");

        let args = TestArgs::try_parse_from(["program", "my-project"])?;
        assert_eq!(args.project_id, "my-project");
        assert_eq!(args.secret_id, "my-secret");
        Ok(())
    }

    #[tokio::test]
    async fn task_result() {
        let got = run_task(async { Ok(()) }).await;
        assert!(got.is_ok(), "{got:?}");
        let got = run_task(async { Err(anyhow::anyhow!("NOT_FOUND")) }).await;
        assert!(got.as_ref().is_err_and(|e| e.to_string() == "NOT_FOUND"), "{got:?}");
    }

    #[tokio::test]
    async fn task_panic() {
        let got = run_task(async { panic!("boom") }).await;
        assert!(got.as_ref().is_err_and(|e| e.to_string().contains("panicked")), "{got:?}");
        assert_eq!(exit_status(&got), FAILURE);
    }

    #[test]
    fn tracing_twice() {
        enable_tracing();
        enable_tracing();
    }
}
