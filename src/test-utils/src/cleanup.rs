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

//! Release the resources created by a test, even if the test fails.
//!
//! Tests register one teardown action per resource as soon as the resource
//! exists. [scoped] runs all the actions when the test body completes, after
//! a success, an error, or a panic.
//!
//! # Example
//! ```
//! # use cookbook_test_utils::cleanup::{self, Cleanup};
//! # async fn sample() -> anyhow::Result<()> {
//! cleanup::scoped(|cleanup: Cleanup| async move {
//!     let name = "projects/p/secrets/s".to_string();
//!     cleanup.defer(format!("delete {name}"), async move {
//!         // delete the secret, ignoring NOT_FOUND errors
//!         anyhow::Ok(())
//!     });
//!     // run the snippets using the secret
//!     anyhow::Ok(())
//! })
//! .await
//! # }
//! ```

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

type Action = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A list of teardown actions.
///
/// Cloning a `Cleanup` shares the list, so helpers can register actions on
/// behalf of the test.
#[derive(Clone, Default)]
pub struct Cleanup {
    actions: Arc<Mutex<Vec<(String, Action)>>>,
}

impl Cleanup {
    /// Registers a teardown action.
    ///
    /// The action does not run until [Cleanup::run] is called. Actions run in
    /// reverse registration order, so resources are released before the
    /// resources they depend on.
    pub fn defer<D, F>(&self, description: D, action: F)
    where
        D: Into<String>,
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.lock().push((description.into(), Box::pin(action)));
    }

    /// The number of pending actions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs all the pending actions, last registered first.
    ///
    /// Failures are logged and do not stop the remaining actions. Returns the
    /// number of failed actions.
    pub async fn run(&self) -> usize {
        let actions = std::mem::take(&mut *self.lock());
        let mut failures = 0;
        for (description, action) in actions.into_iter().rev() {
            match AssertUnwindSafe(action).catch_unwind().await {
                Ok(Ok(())) => tracing::info!("cleanup succeeded: {description}"),
                Ok(Err(e)) => {
                    failures += 1;
                    tracing::warn!("cleanup failed: {description}: {e:#}");
                }
                Err(_) => {
                    failures += 1;
                    tracing::warn!("cleanup panicked: {description}");
                }
            }
        }
        failures
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Action)>> {
        self.actions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let descriptions = self
            .lock()
            .iter()
            .map(|(d, _)| d.clone())
            .collect::<Vec<_>>();
        f.debug_struct("Cleanup")
            .field("actions", &descriptions)
            .finish()
    }
}

/// Runs `test` and then all the teardown actions it registered.
///
/// The teardown actions run whether the test returns `Ok`, returns `Err`, or
/// panics. Teardown failures are logged and never change the result of the
/// test. If the test panicked, the panic resumes after the teardown.
pub async fn scoped<F, Fut, T>(test: F) -> anyhow::Result<T>
where
    F: FnOnce(Cleanup) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let cleanup = Cleanup::default();
    let result = AssertUnwindSafe(test(cleanup.clone()))
        .catch_unwind()
        .await;
    let failures = cleanup.run().await;
    if failures != 0 {
        tracing::warn!("{failures} cleanup action(s) failed");
    }
    match result {
        Ok(r) => r,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Treats a `NOT_FOUND` error as success.
///
/// Deleting a resource that does not exist is not an error during teardown.
/// The snippet under test may have deleted the resource already.
///
/// # Example
/// ```
/// # use cookbook_test_utils::cleanup::ignore_not_found;
/// let result: Result<(), String> = Err("NOT_FOUND".to_string());
/// assert!(ignore_not_found(result, |e| e == "NOT_FOUND").is_ok());
/// ```
pub fn ignore_not_found<T, E, P>(result: Result<T, E>, is_not_found: P) -> Result<(), E>
where
    P: FnOnce(&E) -> bool,
{
    match result {
        Ok(_) => Ok(()),
        Err(e) if is_not_found(&e) => Ok(()),
        Err(e) => Err(e),
    }
}
