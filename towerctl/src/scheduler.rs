//! Completion timers for in-progress landings and takeoffs.
//!
//! When tower control grants a runway, the plane occupies it for a
//! configured duration. The [`CompletionScheduler`] trait is the seam
//! for that "time passes" collaborator: it fires a one-shot completion
//! [`Event`] after a delay, delivering it back into the same serialized
//! arbitration path as every other event.
//!
//! [`TokioScheduler`] is the production implementation. Tests (or hosts
//! embedding the arbitrator synchronously) can substitute
//! [`NullScheduler`] or their own implementation.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::event::Event;

/// Schedules one-shot completion events.
///
/// Implementations must deliver the event no earlier than `delay` after
/// the call, and must not deliver it at all once the returned handle is
/// cancelled.
pub trait CompletionScheduler: Send + Sync {
    /// Schedules `event` for delivery after `delay`.
    fn schedule(&self, delay: Duration, event: Event) -> ScheduledCompletion;
}

/// Cancellation handle for a scheduled completion.
///
/// Held by the plane record while its landing or takeoff is in
/// progress. Dropping the handle does not cancel the timer; cancellation
/// is always explicit.
#[derive(Clone, Debug)]
pub struct ScheduledCompletion {
    token: CancellationToken,
}

impl ScheduledCompletion {
    /// Creates a handle around the given token.
    ///
    /// Custom [`CompletionScheduler`] implementations use this to hand
    /// back a handle wired to their own delivery task.
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Creates a handle attached to no timer at all.
    pub fn detached() -> Self {
        Self::new(CancellationToken::new())
    }

    /// Cancels the scheduled delivery.
    ///
    /// A completion that already fired is unaffected.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once the handle has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Scheduler backed by the tokio runtime.
///
/// Each schedule call spawns a task that sleeps for the delay and then
/// sends the completion event into the tower's completion channel. The
/// task exits early, sending nothing, when the handle is cancelled.
pub struct TokioScheduler {
    completion_tx: mpsc::UnboundedSender<Event>,
}

impl TokioScheduler {
    /// Creates a scheduler delivering into the given channel.
    pub fn new(completion_tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { completion_tx }
    }
}

impl CompletionScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, event: Event) -> ScheduledCompletion {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let tx = self.completion_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    trace!(event = %event, "Completion timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    // Receiver gone means the tower shut down first.
                    let _ = tx.send(event);
                }
            }
        });

        ScheduledCompletion::new(token)
    }
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler").finish_non_exhaustive()
    }
}

/// Scheduler that never fires.
///
/// Useful for driving the arbitrator synchronously in tests: grants
/// succeed and hold their runway until an explicit completion event is
/// injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScheduler;

impl CompletionScheduler for NullScheduler {
    fn schedule(&self, _delay: Duration, _event: Event) -> ScheduledCompletion {
        ScheduledCompletion::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Intent;

    #[test]
    fn test_detached_handle_cancels() {
        let handle = ScheduledCompletion::detached();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_null_scheduler_returns_live_handle() {
        let scheduler = NullScheduler;
        let handle = scheduler.schedule(
            Duration::from_millis(1),
            Event::new("plane-1", Intent::LandingComplete),
        );
        assert!(!handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_tokio_scheduler_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);

        let event = Event::new("plane-1", Intent::LandingComplete);
        scheduler.schedule(Duration::from_millis(10), event.clone());

        let fired = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timer did not fire")
            .expect("channel closed");
        assert_eq!(fired, event);
    }

    #[tokio::test]
    async fn test_tokio_scheduler_cancel_suppresses_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);

        let handle = scheduler.schedule(
            Duration::from_millis(50),
            Event::new("plane-1", Intent::TakeoffComplete),
        );
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_tokio_scheduler_survives_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);
        drop(rx);

        scheduler.schedule(
            Duration::from_millis(5),
            Event::new("plane-1", Intent::LandingComplete),
        );
        // Delivery into a closed channel must not panic the task.
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
}
