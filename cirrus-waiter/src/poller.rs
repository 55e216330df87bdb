//! Operation poller
//!
//! Re-checks an operation's status until it reaches DONE, then turns the
//! final snapshot into success or failure. One deadline bounds the whole
//! wait: the initial delay, every lookup and every sleep.

use cirrus_core::domain::operation::{Operation, OperationStatus};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::config::{INITIAL_BACKOFF, MAX_BACKOFF, PollConfig};
use crate::error::{OperationFailure, Result, WaitError};
use crate::lookup::OperationLookup;

/// Where a wait stands after a status check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// PENDING or RUNNING: check again later
    Waiting,
    /// DONE: stop polling and inspect the result
    Done,
    /// Any other status: stop polling, the wait failed
    Failed,
}

impl PollState {
    /// Classifies a raw status code reported by the backend
    pub fn from_status(status: &str) -> Self {
        match OperationStatus::parse(status) {
            Some(s) if s.is_terminal() => PollState::Done,
            Some(s) if s.is_pending() => PollState::Waiting,
            _ => PollState::Failed,
        }
    }
}

/// Polls one operation until it finishes, fails, times out or is cancelled
pub struct OperationPoller<L> {
    lookup: L,
    activity: String,
    config: PollConfig,
    cancel: Option<CancellationToken>,
}

impl<L: OperationLookup> OperationPoller<L> {
    /// Creates a new poller
    ///
    /// # Arguments
    /// * `lookup` - Fetches the latest snapshot of the operation
    /// * `activity` - What is being waited for, e.g. "instance to create"
    /// * `config` - Timing of the wait
    pub fn new(lookup: L, activity: impl Into<String>, config: PollConfig) -> Self {
        Self {
            lookup,
            activity: activity.into(),
            config,
            cancel: None,
        }
    }

    /// Stops the wait early when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn activity(&self) -> &str {
        &self.activity
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Waits for the operation and checks its outcome
    ///
    /// Returns the final snapshot when the operation finished without errors,
    /// [`WaitError::OperationFailed`] when it finished with errors.
    pub async fn wait(&self) -> Result<Operation> {
        let op = self.wait_for_state().await?;

        if let Some(failure) = OperationFailure::from_operation(&op) {
            info!(
                "Operation {} for {} finished with {} error(s)",
                op.name,
                self.activity,
                failure.errors.len()
            );
            return Err(failure.into());
        }

        info!("Operation {} for {} finished", op.name, self.activity);
        Ok(op)
    }

    /// Polls until the operation reaches DONE, without inspecting its errors
    pub async fn wait_for_state(&self) -> Result<Operation> {
        let started = Instant::now();
        let deadline = started + self.config.timeout;
        let mut last_status = String::new();
        let mut backoff = INITIAL_BACKOFF;
        let mut checks: u32 = 0;

        debug!(
            "Waiting for {} ({}), timeout {:?}",
            self.activity,
            self.lookup.describe(),
            self.config.timeout
        );

        if !self.config.delay.is_zero() {
            let first_check = started + self.config.delay;
            if first_check >= deadline {
                self.sleep_until(deadline).await?;
                return Err(self.timeout_error(last_status));
            }
            trace!("Delaying first check by {:?}", self.config.delay);
            self.sleep_until(first_check).await?;
        }

        loop {
            checks += 1;
            let op = self.check(deadline, &last_status).await?;

            debug!(
                "Got {} when asking for operation {} (check {})",
                op.status, op.name, checks
            );
            last_status = op.status.clone();

            match PollState::from_status(&op.status) {
                PollState::Done => return Ok(op),
                PollState::Failed => {
                    return Err(WaitError::UnexpectedStatus {
                        activity: self.activity.clone(),
                        status: op.status,
                    });
                }
                PollState::Waiting => {}
            }

            backoff = (backoff * 2).min(MAX_BACKOFF);
            let wait = self.config.wait_after(backoff);
            let next_check = Instant::now() + wait;

            if next_check >= deadline {
                self.sleep_until(deadline).await?;
                return Err(self.timeout_error(last_status));
            }

            trace!("Waiting {:?} before next check", wait);
            self.sleep_until(next_check).await?;
        }
    }

    /// Runs one lookup, bounded by the deadline and the cancellation token
    async fn check(&self, deadline: Instant, last_status: &str) -> Result<Operation> {
        let lookup = time::timeout_at(deadline, self.lookup.lookup());

        let outcome = match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(self.cancelled_error()),
                outcome = lookup => outcome,
            },
            None => lookup.await,
        };

        match outcome {
            Ok(Ok(op)) => Ok(op),
            Ok(Err(source)) => Err(WaitError::Lookup {
                activity: self.activity.clone(),
                source,
            }),
            Err(_) => Err(self.timeout_error(last_status.to_string())),
        }
    }

    async fn sleep_until(&self, when: Instant) -> Result<()> {
        match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(self.cancelled_error()),
                _ = time::sleep_until(when) => Ok(()),
            },
            None => {
                time::sleep_until(when).await;
                Ok(())
            }
        }
    }

    fn timeout_error(&self, last_status: String) -> WaitError {
        WaitError::Timeout {
            activity: self.activity.clone(),
            last_status,
            timeout: self.config.timeout,
        }
    }

    fn cancelled_error(&self) -> WaitError {
        WaitError::Cancelled {
            activity: self.activity.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_state_from_status() {
        assert_eq!(PollState::from_status("PENDING"), PollState::Waiting);
        assert_eq!(PollState::from_status("RUNNING"), PollState::Waiting);
        assert_eq!(PollState::from_status("DONE"), PollState::Done);
        assert_eq!(PollState::from_status("ABORTING"), PollState::Failed);
        assert_eq!(PollState::from_status(""), PollState::Failed);
    }
}
