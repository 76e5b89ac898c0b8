//! Changeset readiness polling.
//!
//! The service offers no way to block until a changeset is computed, so the
//! poller queries its status at a fixed interval with a fixed attempt budget.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::cloudformation::{ChangesetDescription, ChangesetHandle, ChangesetStatus, CloudFormationApi};
use crate::error::{ChangesetError, Result};

/// Maximum number of status queries per changeset.
pub const MAX_POLL_ATTEMPTS: u32 = 20;

/// Delay between two status queries.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Suspends the poll loop between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Progress notifications emitted while polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// Polling started.
    Started,
    /// A non-terminal status was observed and the poller is about to wait.
    Waiting {
        /// Attempt that observed the status (1-based).
        attempt: u32,
    },
    /// A terminal status was reached.
    Finished {
        /// The terminal status.
        status: ChangesetStatus,
    },
    /// The attempt budget ran out.
    TimedOut,
}

/// Polls a changeset until its computation finishes.
pub struct ChangesetPoller<'a, A: CloudFormationApi + ?Sized, S: Sleeper = TokioSleeper> {
    /// CloudFormation API.
    api: &'a A,
    /// Sleep implementation.
    sleeper: S,
}

impl<'a, A: CloudFormationApi + ?Sized> ChangesetPoller<'a, A, TokioSleeper> {
    /// Creates a poller that sleeps on the tokio timer.
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self {
            api,
            sleeper: TokioSleeper,
        }
    }
}

impl<'a, A: CloudFormationApi + ?Sized, S: Sleeper> ChangesetPoller<'a, A, S> {
    /// Replaces the sleep implementation.
    #[must_use]
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> ChangesetPoller<'a, A, T> {
        ChangesetPoller {
            api: self.api,
            sleeper,
        }
    }

    /// Waits until the changeset reaches `CreateComplete` or `Failed`.
    ///
    /// A `Failed` changeset is returned as a description, not as an error;
    /// the caller decides what it means.
    ///
    /// # Errors
    ///
    /// Returns a poll timeout after [`MAX_POLL_ATTEMPTS`] non-terminal
    /// answers, or forwards the API error of a failed query.
    pub async fn await_completion(
        &self,
        handle: &ChangesetHandle,
        notify: &mut (dyn FnMut(PollEvent) + Send),
    ) -> Result<ChangesetDescription> {
        notify(PollEvent::Started);

        for attempt in 1..=MAX_POLL_ATTEMPTS {
            let description = self.api.describe_change_set(handle).await?;
            debug!(
                "Changeset {handle} status on attempt {attempt}/{MAX_POLL_ATTEMPTS}: {}",
                description.status
            );

            if description.status.is_terminal() {
                info!("Changeset {handle} reached status: {}", description.status);
                notify(PollEvent::Finished {
                    status: description.status,
                });
                return Ok(description);
            }

            if attempt < MAX_POLL_ATTEMPTS {
                notify(PollEvent::Waiting { attempt });
                self.sleeper.sleep(POLL_INTERVAL).await;
            }
        }

        warn!("Changeset {handle} did not complete after {MAX_POLL_ATTEMPTS} attempts");
        notify(PollEvent::TimedOut);

        Err(ChangesetError::PollTimeout {
            handle: handle.to_string(),
            attempts: MAX_POLL_ATTEMPTS,
        }
        .into())
    }
}
