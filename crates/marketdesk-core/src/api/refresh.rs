//! Single-flight coordination of access-token refreshes.
//!
//! The first request that hits a 401 becomes the leader and performs the
//! refresh. Requests that hit a 401 while the leader is still working become
//! followers: they park on a oneshot channel and receive the leader's
//! outcome when it settles.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

use super::ApiError;

/// New access token, or the error that ended the refresh.
pub type RefreshOutcome = Result<String, ApiError>;

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Per-client refresh gate. Clones share the same state.
#[derive(Clone, Default)]
pub struct RefreshCoordinator {
    state: Arc<Mutex<RefreshState>>,
}

/// Role handed out by [`RefreshCoordinator::join`].
pub enum Ticket {
    Leader(LeaderGuard),
    Follower(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        // The lock is never held across a panic-prone section; recover anyway.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Become the leader if no refresh is running, otherwise queue up.
    /// Check-and-set and enqueue happen under one lock acquisition.
    pub fn join(&self) -> Ticket {
        let mut state = self.lock();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            Ticket::Follower(rx)
        } else {
            state.refreshing = true;
            Ticket::Leader(LeaderGuard {
                coordinator: self.clone(),
                settled: false,
            })
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Release every waiter with `outcome` and return to idle.
    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        let count = waiters.len();
        for waiter in waiters {
            // A waiter whose request was dropped has nobody listening.
            let _ = waiter.send(outcome.clone());
        }
        count
    }
}

/// Held by the leader for the duration of a refresh.
///
/// Dropping it without calling [`LeaderGuard::settle`] (for example when the
/// leader's future is cancelled) fails the refresh for all waiters.
pub struct LeaderGuard {
    coordinator: RefreshCoordinator,
    settled: bool,
}

impl LeaderGuard {
    /// Publish the refresh outcome. Returns how many waiters were released.
    pub fn settle(mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for LeaderGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.settle(&Err(ApiError::SessionExpired(
                "Token refresh was abandoned".to_string(),
            )));
        }
    }
}

/// Await a follower ticket. A dropped sender counts as a failed refresh.
pub async fn wait_for(rx: oneshot::Receiver<RefreshOutcome>) -> RefreshOutcome {
    rx.await.unwrap_or_else(|_| {
        Err(ApiError::SessionExpired(
            "Token refresh was abandoned".to_string(),
        ))
    })
}
