//! Process-wide load-once latch for shared third-party resources.
//!
//! Several independent components may ask for the same resource (for example a
//! provider SDK or its credentials) at about the same time. The first caller
//! runs the loader, everyone who arrives while it is running waits for that
//! same result, and later callers get the cached value.
//!
//! The service itself holds no such resource yet; this is the hook for the
//! address-autocomplete provider bootstrap, which lives outside this crate.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The loader returned an error
    Failed(String),
    /// The caller running the loader went away before it finished
    Abandoned,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Failed(msg) => write!(f, "load failed: {}", msg),
            LoadError::Abandoned => write!(f, "load abandoned before completion"),
        }
    }
}

impl std::error::Error for LoadError {}

type Waiter<T> = oneshot::Sender<Result<Arc<T>, LoadError>>;

enum State<T> {
    Unloaded,
    Loading(Vec<Waiter<T>>),
    Ready(Arc<T>),
    Failed(String),
}

/// A value loaded at most once at a time, shareable from a `static`
pub struct LoadOnce<T> {
    name: &'static str,
    state: Mutex<State<T>>,
}

enum Role<T> {
    Ready(Arc<T>),
    Wait(oneshot::Receiver<Result<Arc<T>, LoadError>>),
    Load,
}

impl<T> LoadOnce<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(State::Unloaded),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> LoadStatus {
        match &*self.lock() {
            State::Unloaded => LoadStatus::Unloaded,
            State::Loading(_) => LoadStatus::Loading,
            State::Ready(_) => LoadStatus::Ready,
            State::Failed(_) => LoadStatus::Failed,
        }
    }

    /// The loaded value, without triggering a load
    pub fn get(&self) -> Option<Arc<T>> {
        match &*self.lock() {
            State::Ready(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Return the value, loading it with `init` if nobody has yet.
    ///
    /// Concurrent callers share one run of `init`. After a failure the next
    /// call starts a fresh load.
    pub async fn get_or_load<F, Fut, E>(&self, init: F) -> Result<Arc<T>, LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let role = {
            let mut state = self.lock();
            match &mut *state {
                State::Ready(value) => Role::Ready(Arc::clone(value)),
                State::Loading(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Role::Wait(rx)
                }
                State::Unloaded | State::Failed(_) => {
                    *state = State::Loading(Vec::new());
                    Role::Load
                }
            }
        };

        match role {
            Role::Ready(value) => Ok(value),
            Role::Wait(rx) => {
                debug!("{} is loading, waiting for it", self.name);
                rx.await.unwrap_or(Err(LoadError::Abandoned))
            }
            Role::Load => {
                info!("Loading {}", self.name);
                let mut guard = LoadGuard { cell: self, armed: true };
                let result = init()
                    .await
                    .map(Arc::new)
                    .map_err(|e| LoadError::Failed(e.to_string()));
                guard.armed = false;
                self.finish(result.clone());
                result
            }
        }
    }

    fn finish(&self, result: Result<Arc<T>, LoadError>) {
        let waiters = {
            let mut state = self.lock();
            let next = match &result {
                Ok(value) => {
                    info!("{} ready", self.name);
                    State::Ready(Arc::clone(value))
                }
                Err(LoadError::Failed(msg)) => {
                    warn!("{} failed to load: {}", self.name, msg);
                    State::Failed(msg.clone())
                }
                Err(LoadError::Abandoned) => {
                    warn!("{} load abandoned", self.name);
                    State::Unloaded
                }
            };
            match std::mem::replace(&mut *state, next) {
                State::Loading(waiters) => waiters,
                _ => Vec::new(),
            }
        };

        for waiter in waiters {
            // a waiter that stopped listening does not need the result
            let _ = waiter.send(result.clone());
        }
    }
}

/// Resolves waiters if the loading future is dropped mid-flight
struct LoadGuard<'a, T> {
    cell: &'a LoadOnce<T>,
    armed: bool,
}

impl<T> Drop for LoadGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.cell.finish(Err(LoadError::Abandoned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_callers_share_one_load() {
        let cell: LoadOnce<String> = LoadOnce::new("places library");
        let runs = AtomicUsize::new(0);
        let counter = &runs;
        let load = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, String>("v3".to_string())
        };

        let (a, b, c) = tokio::join!(
            cell.get_or_load(load),
            cell.get_or_load(load),
            cell.get_or_load(load)
        );

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        for result in [a, b, c] {
            assert_eq!(result.unwrap().as_str(), "v3");
        }
        assert_eq!(cell.status(), LoadStatus::Ready);
    }

    #[tokio::test]
    async fn waiters_see_the_failure_and_next_call_retries() {
        let cell: LoadOnce<u32> = LoadOnce::new("geocoder");
        let failing = || async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<u32, _>("script blocked")
        };

        let (a, b) = tokio::join!(cell.get_or_load(failing), cell.get_or_load(failing));
        assert_eq!(a, Err(LoadError::Failed("script blocked".to_string())));
        assert_eq!(b, Err(LoadError::Failed("script blocked".to_string())));
        assert_eq!(cell.status(), LoadStatus::Failed);
        assert!(cell.get().is_none());

        let value = cell.get_or_load(|| async { Ok::<_, String>(7) }).await.unwrap();
        assert_eq!(*value, 7);
        assert_eq!(cell.status(), LoadStatus::Ready);
    }

    #[tokio::test]
    async fn ready_value_is_not_reloaded() {
        let cell: LoadOnce<u32> = LoadOnce::new("config");
        assert_eq!(cell.status(), LoadStatus::Unloaded);
        cell.get_or_load(|| async { Ok::<_, String>(1) }).await.unwrap();
        let again = cell
            .get_or_load(|| async { Err::<u32, _>("should not run") })
            .await
            .unwrap();
        assert_eq!(*again, 1);
    }

    #[tokio::test]
    async fn dropped_loader_releases_waiters() {
        let cell: LoadOnce<u32> = LoadOnce::new("slow");
        let slow = cell.get_or_load(|| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, String>(1)
        });
        let waiting = cell.get_or_load(|| async { Ok::<_, String>(2) });

        let (first, second) = tokio::join!(
            tokio::time::timeout(Duration::from_millis(10), slow),
            waiting
        );
        assert!(first.is_err());
        assert_eq!(second, Err(LoadError::Abandoned));
        assert_eq!(cell.status(), LoadStatus::Unloaded);
    }

    static SHARED: LoadOnce<&'static str> = LoadOnce::new("shared");

    #[tokio::test]
    async fn works_as_a_static_singleton() {
        let value = SHARED
            .get_or_load(|| async { Ok::<_, String>("loaded") })
            .await
            .unwrap();
        assert_eq!(*value, "loaded");
        assert_eq!(SHARED.get().as_deref(), Some(&"loaded"));
    }
}
