//! auth::refresh
//!
//! Single-flight coordination for bearer-token refresh.
//!
//! # Architecture
//!
//! When several requests hit 401 at once, exactly one of them performs the
//! refresh (the leader) while the others queue behind it (waiters). The
//! leader's outcome, success or failure, is delivered to every waiter in
//! arrival order.
//!
//! # Invariants
//!
//! - At most one refresh is in flight per coordinator
//! - The `refreshing` check-and-set happens under a synchronous mutex with no
//!   suspension point between check and set
//! - The pending queue is drained exactly once per refresh cycle and is empty
//!   afterward; no waiter is dropped or resolved twice
//! - `refreshing` is reset by [`RefreshLease`]'s `Drop`, so it is cleared on
//!   success, failure, and cancellation of the leader alike. A leader dropped
//!   before settling rejects its waiters instead of leaving them hanging
//! - A request whose 401 arrives after a newer refresh already succeeded is
//!   handed that token instead of starting another refresh (the generation
//!   re-check, same as re-checking a bundle after taking a lock)
//!
//! # Example
//!
//! ```ignore
//! match coordinator.enter(observed_generation) {
//!     RefreshTurn::Ready(token) => replay(token),
//!     RefreshTurn::Wait(waiter) => replay(waiter.wait().await?),
//!     RefreshTurn::Lead(mut lease) => {
//!         let outcome = lease.refresh(auth.refresh()).await;
//!         // lease drops here: refreshing = false, late waiters settled
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;

use super::errors::AuthError;

/// Default upper bound on a single refresh call (30 seconds).
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

type RefreshOutcome = Result<String, AuthError>;

/// Shared refresh state. Lives as long as the auth client.
#[derive(Debug)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    timeout: Duration,
}

#[derive(Debug, Default)]
struct RefreshState {
    /// Gates queue admission.
    refreshing: bool,
    /// Pending Request Queue, FIFO.
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
    /// Bumped on every successful refresh and every invalidation.
    generation: u64,
    /// Token minted by the most recent successful refresh.
    latest_token: Option<String>,
    /// Number of refreshes started (leaders elected).
    cycles: u64,
}

/// What a caller that just saw a 401 should do.
#[derive(Debug)]
pub enum RefreshTurn<'a> {
    /// This caller performs the refresh.
    Lead(RefreshLease<'a>),
    /// A refresh is in flight; wait for its outcome.
    Wait(RefreshWaiter),
    /// A refresh newer than the caller's request already succeeded.
    Ready(String),
}

/// Held by the leader for the duration of one refresh cycle.
#[derive(Debug)]
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    outcome: Option<RefreshOutcome>,
}

/// Held by a queued caller.
#[derive(Debug)]
pub struct RefreshWaiter {
    rx: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshCoordinator {
    /// Coordinator with [`DEFAULT_REFRESH_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REFRESH_TIMEOUT)
    }

    /// Coordinator with a custom refresh timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: Mutex::new(RefreshState::default()),
            timeout,
        }
    }

    /// Refresh timeout applied by [`RefreshLease::refresh`].
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        // Every critical section leaves the state consistent, so a poisoned
        // lock is still safe to use.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current generation. Capture this before attaching a token to a request.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// True while a refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    /// Number of callers currently queued.
    pub fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Number of refresh cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.lock().cycles
    }

    /// Decide this caller's role after a 401.
    ///
    /// `observed_generation` is the value of [`generation`](Self::generation)
    /// captured before the failing request was sent.
    pub fn enter(&self, observed_generation: u64) -> RefreshTurn<'_> {
        let mut state = self.lock();

        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            return RefreshTurn::Wait(RefreshWaiter { rx });
        }

        if state.generation != observed_generation {
            if let Some(token) = state.latest_token.clone() {
                return RefreshTurn::Ready(token);
            }
        }

        state.refreshing = true;
        state.cycles += 1;
        drop(state);

        RefreshTurn::Lead(RefreshLease {
            coordinator: self,
            outcome: None,
        })
    }

    /// Start a new generation with no minted token.
    ///
    /// Called whenever the session is replaced or cleared (login, logout), so
    /// a request sent under the previous session never picks up a token
    /// minted for it.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.latest_token = None;
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshLease<'_> {
    /// Run the refresh future under the coordinator's timeout and settle.
    pub async fn refresh<F>(&mut self, refresh: F) -> RefreshOutcome
    where
        F: Future<Output = RefreshOutcome>,
    {
        let outcome = self.run(refresh).await;
        self.settle(outcome.clone());
        outcome
    }

    /// Run the refresh future under the coordinator's timeout without
    /// settling, so the leader can act on the outcome before waiters see it.
    pub async fn run<F>(&self, refresh: F) -> RefreshOutcome
    where
        F: Future<Output = RefreshOutcome>,
    {
        let limit = self.coordinator.timeout;
        match tokio::time::timeout(limit, refresh).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AuthError::RefreshTimeout(limit.as_secs())),
        }
    }

    /// Record the outcome and drain the queue in arrival order.
    ///
    /// Callers arriving after this point (while the lease is still held) are
    /// settled with the same outcome when the lease drops.
    pub fn settle(&mut self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.coordinator.lock();
            if let Ok(ref token) = outcome {
                state.generation += 1;
                state.latest_token = Some(token.clone());
            }
            std::mem::take(&mut state.waiters)
        };

        for waiter in waiters {
            // A waiter whose request was dropped has nobody to notify.
            let _ = waiter.send(outcome.clone());
        }
        self.outcome = Some(outcome);
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        let outcome = self
            .outcome
            .take()
            .unwrap_or_else(|| Err(AuthError::RefreshFailed("refresh abandoned".into())));

        let late = {
            let mut state = self.coordinator.lock();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        for waiter in late {
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl RefreshWaiter {
    /// Suspend until the in-flight refresh settles.
    pub async fn wait(self) -> RefreshOutcome {
        self.rx
            .await
            .unwrap_or_else(|_| Err(AuthError::RefreshFailed("refresh abandoned".into())))
    }
}
