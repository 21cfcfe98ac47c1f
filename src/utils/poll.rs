use crate::platform::sleep;
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Succeeded { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl PollOutcome {
    pub fn succeeded(self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Calls `callback` up to `count` times, [`POLL_INTERVAL`] apart, until it
/// sets the flag it is handed. Used for late-appearing DOM/player state.
pub async fn fallback<F>(count: u32, callback: F) -> PollOutcome
where
    F: FnMut(&mut bool),
{
    poll_with_interval(count, POLL_INTERVAL, callback).await
}

pub async fn poll_with_interval<F>(count: u32, interval: Duration, mut callback: F) -> PollOutcome
where
    F: FnMut(&mut bool),
{
    let mut done = false;
    for attempt in 1..=count {
        callback(&mut done);
        if done {
            return PollOutcome::Succeeded { attempts: attempt };
        }
        if attempt < count {
            sleep(interval).await;
        }
    }

    tracing::debug!(count, "polling gave up");
    PollOutcome::Exhausted { attempts: count }
}
