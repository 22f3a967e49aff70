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

/// Enables tracing for the current test.
///
/// The snippets log to `stderr`, the test harness does too, so the output of
/// the child process and the harness interleave in the test logs.
pub fn enable_tracing() -> ::tracing::subscriber::DefaultGuard {
    use tracing_subscriber::fmt::format::FmtSpan;
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_max_level(max_level())
        .finish();

    tracing::subscriber::set_default(subscriber)
}

fn max_level() -> tracing::Level {
    #[cfg(feature = "log-integration-tests")]
    let level = tracing::Level::INFO;
    #[cfg(not(feature = "log-integration-tests"))]
    let level = tracing::Level::WARN;
    level
}
