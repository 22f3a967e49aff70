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

//! Helpers to test the snippets as black boxes.
//!
//! The tests spawn each snippet as a child process with [snippet::Snippet],
//! and then match its output with regular expressions. Any resources created
//! by the test are released by [cleanup::scoped], even if the test fails.

pub mod cleanup;
pub mod resource_names;
pub mod runtime_config;
pub mod snippet;
pub mod tracing;
