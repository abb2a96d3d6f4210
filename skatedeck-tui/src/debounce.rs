//! Input debouncing for filter keystrokes.

use std::time::Duration;

use tokio::time::Instant;

/// Collapses a burst of keystrokes into a single commit.
///
/// Each [`poke`](Debouncer::poke) restarts the delay, so a typing burst
/// produces one fetch instead of one per keystroke. [`wait`](Debouncer::wait)
/// resolves once the delay elapses with no further pokes, and never resolves
/// while disarmed.
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates a disarmed debouncer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arms the debouncer, restarting the delay from now.
    pub fn poke(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Disarms the debouncer. Call after committing the pending input.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` if a commit is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Waits until the current deadline passes. Pends forever while
    /// disarmed, which makes it safe to poll from a `select!` arm.
    pub async fn wait(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arming() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        assert!(!debouncer.is_armed());

        debouncer.poke();
        assert!(debouncer.is_armed());

        debouncer.disarm();
        assert!(!debouncer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poke_restarts_delay() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.poke();
        tokio::time::advance(Duration::from_millis(300)).await;
        debouncer.poke();

        // The second poke moved the deadline, so 300ms later nothing fires.
        let early = tokio::time::timeout(Duration::from_millis(300), debouncer.wait()).await;
        assert!(early.is_err());

        // Another 300ms crosses the restarted deadline.
        let late = tokio::time::timeout(Duration::from_millis(300), debouncer.wait()).await;
        assert!(late.is_ok());
    }
}
