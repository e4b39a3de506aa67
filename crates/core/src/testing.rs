//! Deterministic clock and timer doubles for exercising the session store
//! without a browser event loop.

use crate::clock::Clock;
use crate::timer::{TimerCallback, TimerHandle, TimerScheduler};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Clock that only moves when told to
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

struct PendingTimer {
    id: u64,
    due: DateTime<Utc>,
    delay: std::time::Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct SchedulerState {
    next_id: u64,
    pending: Vec<PendingTimer>,
    scheduled: Vec<std::time::Duration>,
    cancelled: usize,
    fired: usize,
}

/// Virtual-time scheduler driven by a [`ManualClock`].
///
/// Dropping a handle does not cancel its timer; only an explicit
/// [`TimerHandle::cancel`] does.
#[derive(Clone)]
pub struct ManualScheduler {
    clock: ManualClock,
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            state: Rc::default(),
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Move time forward, firing every timer that comes due in order.
    /// Timers armed by a callback fire too if they fall inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.now() + by;
        while let Some(timer) = self.take_next_due(target) {
            self.clock.set(timer.due.max(self.clock.now()));
            self.state.borrow_mut().fired += 1;
            (timer.callback)();
        }
        self.clock.set(target);
    }

    /// Delays of the timers still pending, earliest first
    pub fn pending_delays(&self) -> Vec<std::time::Duration> {
        let state = self.state.borrow();
        let mut pending: Vec<_> = state.pending.iter().map(|t| (t.due, t.id, t.delay)).collect();
        pending.sort();
        pending.into_iter().map(|(_, _, delay)| delay).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Every delay ever passed to `schedule`, in call order
    pub fn scheduled_delays(&self) -> Vec<std::time::Duration> {
        self.state.borrow().scheduled.clone()
    }

    pub fn cancelled_count(&self) -> usize {
        self.state.borrow().cancelled
    }

    pub fn fired_count(&self) -> usize {
        self.state.borrow().fired
    }

    fn take_next_due(&self, target: DateTime<Utc>) -> Option<PendingTimer> {
        let mut state = self.state.borrow_mut();
        let index = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= target)
            .min_by_key(|(_, timer)| (timer.due, timer.id))
            .map(|(index, _)| index)?;
        Some(state.pending.remove(index))
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule(&self, delay: std::time::Duration, callback: TimerCallback) -> Box<dyn TimerHandle> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;

        let now = self.clock.now();
        let due = Duration::from_std(delay)
            .ok()
            .and_then(|offset| now.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        state.scheduled.push(delay);
        state.pending.push(PendingTimer {
            id,
            due,
            delay,
            callback,
        });

        Box::new(ManualTimerHandle {
            id,
            state: Rc::downgrade(&self.state),
        })
    }
}

struct ManualTimerHandle {
    id: u64,
    state: Weak<RefCell<SchedulerState>>,
}

impl TimerHandle for ManualTimerHandle {
    fn cancel(self: Box<Self>) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.borrow_mut();
        let before = state.pending.len();
        state.pending.retain(|timer| timer.id != self.id);
        if state.pending.len() != before {
            state.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_fires_in_due_order() {
        let scheduler = ManualScheduler::new(ManualClock::default());
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, secs) in [("late", 30), ("early", 10), ("middle", 20)] {
            let log = log.clone();
            let clock = scheduler.clock().clone();
            let start = clock.now();
            let _ = scheduler.schedule(
                std::time::Duration::from_secs(secs),
                Box::new(move || log.borrow_mut().push((name, clock.now() - start))),
            );
        }

        scheduler.advance(Duration::seconds(25));
        assert_eq!(
            *log.borrow(),
            vec![("early", Duration::seconds(10)), ("middle", Duration::seconds(20))]
        );
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.advance(Duration::seconds(5));
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(scheduler.fired_count(), 3);
    }

    #[test]
    fn test_cancel_removes_timer() {
        let scheduler = ManualScheduler::new(ManualClock::default());
        let fired = Rc::new(Cell::new(false));

        let handle = {
            let fired = fired.clone();
            scheduler.schedule(
                std::time::Duration::from_secs(1),
                Box::new(move || fired.set(true)),
            )
        };
        handle.cancel();
        scheduler.advance(Duration::minutes(1));

        assert!(!fired.get());
        assert_eq!(scheduler.cancelled_count(), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
