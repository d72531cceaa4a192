use core_types::TimerId;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    ConfigRetry,
    HostWaitTimeout,
    Debounce,
    Navigation,
    WatcherExpiry,
}

/// One-shot timers on a millisecond clock owned by the caller.
///
/// Timers due at the same instant fire in scheduling order.
#[derive(Default)]
pub struct Timers {
    next_id: TimerId,
    pending: BTreeMap<(u64, TimerId), TimerKind>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: u64, delay_ms: u64, kind: TimerKind) -> TimerId {
        self.next_id += 1;
        let id = self.next_id;
        self.pending.insert((now.saturating_add(delay_ms), id), kind);
        id
    }

    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, pending| *pending != kind);
        before - self.pending.len()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerId, TimerKind)> {
        let (&(due, id), _) = self.pending.iter().next()?;
        if due > now {
            return None;
        }
        self.pending.remove(&(due, id)).map(|kind| (id, kind))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_then_schedule_order() {
        let mut timers = Timers::new();
        timers.schedule(0, 300, TimerKind::Debounce);
        timers.schedule(0, 100, TimerKind::Navigation);
        timers.schedule(200, 100, TimerKind::ConfigRetry);

        assert_eq!(timers.pop_due(99), None);
        assert_eq!(timers.pop_due(300).map(|t| t.1), Some(TimerKind::Navigation));
        assert_eq!(timers.pop_due(300).map(|t| t.1), Some(TimerKind::Debounce));
        assert_eq!(timers.pop_due(300).map(|t| t.1), Some(TimerKind::ConfigRetry));
        assert!(timers.is_empty());
    }

    #[test]
    fn cancel_by_kind() {
        let mut timers = Timers::new();
        timers.schedule(0, 10, TimerKind::Navigation);
        timers.schedule(0, 20, TimerKind::Navigation);
        timers.schedule(0, 30, TimerKind::Debounce);
        assert_eq!(timers.cancel_kind(TimerKind::Navigation), 2);
        assert_eq!(timers.cancel_kind(TimerKind::Navigation), 0);
        assert_eq!(timers.next_due(), Some(30));
    }
}
