// SPDX-License-Identifier: MPL-2.0
//! Control auto-hide timer.
//!
//! At most one timer is pending. Its abort handle aborts on drop, so
//! rescheduling, cancelling and dropping the owner all stop the previous
//! timer.

use iced::task::Handle;
use iced::Task;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct HideTimer {
    pending: Option<Handle>,
}

impl HideTimer {
    /// Replaces any pending timer with one firing `on_elapsed(generation)`
    /// after `after`.
    pub fn schedule<M: Send + 'static>(
        &mut self,
        generation: u64,
        after: Duration,
        on_elapsed: fn(u64) -> M,
    ) -> Task<M> {
        let (task, handle) = Task::perform(
            async move {
                tokio::time::sleep(after).await;
                generation
            },
            on_elapsed,
        )
        .abortable();
        self.pending = Some(handle.abort_on_drop());
        task
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_aborted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_then_cancel() {
        let mut timer = HideTimer::default();
        assert!(!timer.is_pending());

        let _task = timer.schedule(1, Duration::from_secs(3), |generation| generation);
        assert!(timer.is_pending());

        timer.cancel();
        assert!(!timer.is_pending());
    }

    #[test]
    fn reschedule_keeps_one_pending_timer() {
        let mut timer = HideTimer::default();
        let _first = timer.schedule(1, Duration::from_secs(3), |generation| generation);
        let _second = timer.schedule(2, Duration::from_secs(3), |generation| generation);
        assert!(timer.is_pending());
    }
}
