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

//! Snippets calling Google Cloud APIs.
//!
//! Each snippet is a module with an `Args` struct and an `async fn sample()`.
//! The binaries in `src/bin` wrap them with [cookbook_snippet::run].

pub mod aiplatform;
pub mod batch;
pub mod compute;
pub mod operations;
pub mod secretmanager;
pub mod speech;
