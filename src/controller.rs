//! Lookup controller: turns a handle into either a profile or an error message.
//!
//! State is published through a `watch` channel so the window can render snapshots
//! without sharing locks with the runtime tasks that perform fetches.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{client::ProfileSource, models::Profile};

/// What happens when lookups overlap and resolve out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Whichever fetch resolves last overwrites the state.
    #[default]
    LastResolutionWins,
    /// Only the most recently issued lookup may settle the state.
    LatestRequestWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Success,
    Failure,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupState {
    pub query: String,
    pub profile: Option<Profile>,
    pub error: Option<String>,
    /// Lookups started but not yet settled.
    pub in_flight: usize,
}

impl LookupState {
    pub fn phase(&self) -> Phase {
        if self.in_flight > 0 {
            Phase::Fetching
        } else if self.profile.is_some() {
            Phase::Success
        } else if self.error.is_some() {
            Phase::Failure
        } else {
            Phase::Idle
        }
    }
}

pub struct LookupController<S> {
    source: S,
    policy: StalePolicy,
    issued: AtomicU64,
    state: watch::Sender<LookupState>,
}

impl<S: ProfileSource> LookupController<S> {
    pub fn new(source: S, policy: StalePolicy) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self {
            source,
            policy,
            issued: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|state| {
            if state.query == text {
                return false;
            }
            state.query = text;
            true
        });
    }

    /// Looks up whatever is currently in the search box.
    pub async fn submit(&self) {
        let query = self.state.borrow().query.clone();
        self.lookup(&query).await;
    }

    /// Clears the previous outcome, fetches `handle` and settles into exactly one of
    /// profile or error. No validation, retry or caching happens here.
    pub async fn lookup(&self, handle: &str) {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.profile = None;
            state.error = None;
            state.in_flight += 1;
        });
        debug!(handle, ticket, "lookup started");

        let outcome = self.source.fetch_profile(handle).await;

        let latest = self.issued.load(Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.in_flight = state.in_flight.saturating_sub(1);

            if self.policy == StalePolicy::LatestRequestWins && ticket != latest {
                debug!(handle, ticket, latest, "discarding stale lookup result");
                return;
            }

            match outcome {
                Ok(profile) => {
                    info!(login = %profile.login, "profile loaded");
                    state.profile = Some(profile);
                    state.error = None;
                }
                Err(err) => {
                    info!(handle, error = %err, kind = ?err.kind(), "lookup failed");
                    state.error = Some(err.user_message());
                    state.profile = None;
                }
            }
        });
    }
}
