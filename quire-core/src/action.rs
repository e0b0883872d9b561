//! Deferred computations that carry their file dependencies.
//!
//! An [`Action`] is a description of work, not work in progress: it pairs a
//! dependency list, known at composition time, with a closure that builds a
//! fresh future each time the action is forced. Nothing is cached, so forcing
//! an action twice performs the work twice.

use crate::error::RenderError;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

type Thunk<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, RenderError>> + Send + Sync>;

/// A deferred computation producing `T`, with the paths it reads
pub struct Action<T> {
    dependencies: Vec<PathBuf>,
    thunk: Thunk<T>,
}

impl<T: Send + 'static> Action<T> {
    /// Wrap an async closure. `dependencies` must list every path the
    /// closure's result depends on.
    pub fn new<F, Fut>(dependencies: Vec<PathBuf>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, RenderError>> + Send + 'static,
    {
        Self {
            dependencies,
            thunk: Arc::new(move || f().boxed()),
        }
    }

    /// An action with no dependencies that always yields `value`
    pub fn pure(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::new(Vec::new(), move || {
            let value = value.clone();
            async move { Ok(value) }
        })
    }

    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    /// Force the computation
    pub async fn run(&self) -> Result<T, RenderError> {
        (self.thunk)().await
    }

    /// Transform the result, keeping the dependencies
    pub fn map<U, F>(self, f: F) -> Action<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.try_map(move |value| Ok(f(value)))
    }

    /// Transform the result with a step that may fail
    pub fn try_map<U, F>(self, f: F) -> Action<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<U, RenderError> + Send + Sync + 'static,
    {
        let thunk = self.thunk;
        let f = Arc::new(f);
        Action::new(self.dependencies, move || {
            let pending = thunk();
            let f = Arc::clone(&f);
            async move { f(pending.await?) }
        })
    }

    /// Append extra dependencies, e.g. files read by a later step
    pub fn depends_on(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.dependencies.extend(paths);
        self
    }
}

impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        Self {
            dependencies: self.dependencies.clone(),
            thunk: Arc::clone(&self.thunk),
        }
    }
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_pure_has_no_dependencies() {
        let action = Action::pure("hello".to_string());
        assert!(action.dependencies().is_empty());
        assert_eq!(action.run().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_every_run_recomputes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let action = Action::new(vec![PathBuf::from("a.md")], move || {
            let counter = Arc::clone(&counter);
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst)) }
        });

        assert_eq!(action.run().await.unwrap(), 0);
        assert_eq!(action.run().await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_construction_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _action = Action::new(Vec::new(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .map(|_| 1);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_map_keeps_dependencies() {
        let action = Action::new(vec![PathBuf::from("a.md")], || async { Ok(2) })
            .map(|n| n * 21)
            .depends_on([PathBuf::from("b.md")]);

        assert_eq!(
            action.dependencies(),
            &[PathBuf::from("a.md"), PathBuf::from("b.md")]
        );
        assert_eq!(action.run().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_try_map_propagates_failure() {
        let action = Action::pure(1).try_map(|_| Err::<i32, _>(RenderError::evaluation("nope")));
        let err = action.run().await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
