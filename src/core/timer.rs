//! Cooperative periodic timers.
//!
//! Nothing runs in the background: the owner calls `due(now)` from its
//! tick loop and gets back the kinds whose period has elapsed. Starting a
//! timer hands out a `TimerHandle`; starting another one of the same kind
//! cancels the previous handle, and a cancelled handle never shows up in
//! `due` again.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Work,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    kind: TimerKind,
    generation: u64,
}

impl TimerHandle {
    pub fn kind(&self) -> TimerKind {
        self.kind
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    generation: u64,
    next_due_ms: i64,
}

#[derive(Debug)]
pub struct TimerSet {
    interval_ms: i64,
    next_generation: u64,
    work: Option<Scheduled>,
    brk: Option<Scheduled>,
}

impl TimerSet {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: (interval.as_millis() as i64).max(1),
            next_generation: 1,
            work: None,
            brk: None,
        }
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<Scheduled> {
        match kind {
            TimerKind::Work => &mut self.work,
            TimerKind::Break => &mut self.brk,
        }
    }

    fn peek(&self, kind: TimerKind) -> Option<&Scheduled> {
        match kind {
            TimerKind::Work => self.work.as_ref(),
            TimerKind::Break => self.brk.as_ref(),
        }
    }

    /// Start a timer of `kind`, replacing any running one. The first tick
    /// is due immediately.
    pub fn start(&mut self, kind: TimerKind, now_ms: i64) -> TimerHandle {
        let generation = self.next_generation;
        self.next_generation += 1;

        *self.slot(kind) = Some(Scheduled {
            generation,
            next_due_ms: now_ms,
        });

        TimerHandle { kind, generation }
    }

    /// Cancel the timer behind `handle`. Returns false when the handle was
    /// already cancelled or superseded.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let active = self.is_active(handle);
        if active {
            *self.slot(handle.kind) = None;
        }
        active
    }

    pub fn cancel_all(&mut self) {
        self.work = None;
        self.brk = None;
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.peek(handle.kind)
            .is_some_and(|s| s.generation == handle.generation)
    }

    pub fn is_running(&self, kind: TimerKind) -> bool {
        self.peek(kind).is_some()
    }

    /// Kinds whose tick is due at `now_ms`, work first. Each returned timer
    /// is rescheduled one interval after `now_ms`; missed ticks collapse
    /// into one.
    pub fn due(&mut self, now_ms: i64) -> Vec<TimerKind> {
        let interval = self.interval_ms;
        let mut fired = Vec::new();

        for kind in [TimerKind::Work, TimerKind::Break] {
            if let Some(s) = self.slot(kind)
                && s.next_due_ms <= now_ms
            {
                s.next_due_ms = now_ms + interval;
                fired.push(kind);
            }
        }

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> TimerSet {
        TimerSet::new(Duration::from_secs(1))
    }

    #[test]
    fn first_tick_is_immediate_then_periodic() {
        let mut t = set();
        t.start(TimerKind::Work, 0);

        assert_eq!(t.due(0), vec![TimerKind::Work]);
        assert!(t.due(500).is_empty());
        assert_eq!(t.due(1_000), vec![TimerKind::Work]);
    }

    #[test]
    fn missed_ticks_collapse() {
        let mut t = set();
        t.start(TimerKind::Break, 0);
        t.due(0);

        assert_eq!(t.due(10_000), vec![TimerKind::Break]);
        assert!(t.due(10_500).is_empty());
    }

    #[test]
    fn restarting_a_kind_cancels_previous_handle() {
        let mut t = set();
        let first = t.start(TimerKind::Work, 0);
        let second = t.start(TimerKind::Work, 0);

        assert!(!t.is_active(first));
        assert!(t.is_active(second));
        assert!(!t.cancel(first));
        assert!(t.is_active(second));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut t = set();
        let h = t.start(TimerKind::Break, 0);
        assert!(t.cancel(h));

        assert!(t.due(0).is_empty());
        assert!(t.due(60_000).is_empty());
        assert!(!t.is_running(TimerKind::Break));
    }

    #[test]
    fn kinds_are_independent() {
        let mut t = set();
        let w = t.start(TimerKind::Work, 0);
        t.start(TimerKind::Break, 0);
        t.cancel(w);

        assert_eq!(t.due(0), vec![TimerKind::Break]);
        t.cancel_all();
        assert!(t.due(5_000).is_empty());
    }
}
