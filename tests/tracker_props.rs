use chrono::Duration;
use proptest::prelude::*;
use workforce_hub::core::{Clock, ManualClock, MemoryStore};
use workforce_hub::models::break_type::BreakType;
use workforce_hub::models::session::SessionPhase;

mod common;
use common::{FakeService, at, tracker_with, transport_error};

#[derive(Debug, Clone)]
enum Op {
    ClockIn,
    ClockOut,
    FailingClockOut,
    StartBreak(usize),
    EndBreak,
    Advance(i64),
    Tick,
    Restart,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::ClockIn),
        Just(Op::ClockOut),
        Just(Op::FailingClockOut),
        (0usize..4).prop_map(Op::StartBreak),
        Just(Op::EndBreak),
        (1i64..3_600).prop_map(Op::Advance),
        Just(Op::Tick),
        Just(Op::Restart),
    ]
}

proptest! {
    #[test]
    fn session_invariants_hold_for_any_operation_sequence(ops in prop::collection::vec(op(), 1..60)) {
        let svc = FakeService::default();
        let store = MemoryStore::new();
        let clock = ManualClock::new(at(8, 0, 0));
        let mut t = tracker_with(&svc, &store, &clock);

        for op in ops {
            let was_clocked_in = t.session().is_clocked_in;
            let prev_total = t.session().total_break_ms;

            match &op {
                Op::ClockIn => t.clock_in(),
                Op::ClockOut => {
                    svc.set_clock_out(Ok(common::closed_record("att-1", 1.0)));
                    t.clock_out();
                }
                Op::FailingClockOut => {
                    svc.set_clock_out(Err(transport_error()));
                    t.clock_out();
                }
                Op::StartBreak(i) => {
                    t.start_break(BreakType::ALL[*i]);
                }
                Op::EndBreak => {
                    t.end_break();
                }
                Op::Advance(secs) => clock.advance(Duration::seconds(*secs)),
                Op::Tick => t.tick(),
                Op::Restart => {
                    drop(t);
                    t = tracker_with(&svc, &store, &clock);
                }
            }

            let s = t.session();

            // a break only exists inside a work session
            if s.active_break.is_some() {
                prop_assert!(s.is_clocked_in);
            }
            prop_assert_eq!(s.active_break.is_some(), s.break_started_at_ms.is_some());
            if !s.is_clocked_in {
                prop_assert_eq!(t.phase(), SessionPhase::NotClockedIn);
                prop_assert_eq!(s.total_break_ms, 0);
            }

            match op {
                Op::ClockIn => {
                    prop_assert_eq!(s.total_break_ms, 0);
                }
                _ if was_clocked_in && s.is_clocked_in => {
                    prop_assert!(s.total_break_ms >= prev_total);
                }
                _ => {}
            }

            let now = clock.now_millis();
            prop_assert!(s.worked_millis(now) >= 0);
            prop_assert!(!t.view().hours_worked.starts_with('-'));
            prop_assert!(!t.view().break_time.starts_with('-'));
        }
    }

    #[test]
    fn persisted_session_survives_restart(work_secs in 1i64..20_000, break_secs in 0i64..3_000) {
        let svc = FakeService::default();
        let store = MemoryStore::new();
        let clock = ManualClock::new(at(8, 0, 0));

        let mut first = tracker_with(&svc, &store, &clock);
        first.clock_in();
        if break_secs > 0 {
            first.start_break(BreakType::Other);
            clock.advance(Duration::seconds(break_secs));
            first.end_break();
        }
        clock.advance(Duration::seconds(work_secs));
        first.tick();
        let before = first.view();
        drop(first);

        let mut second = tracker_with(&svc, &store, &clock);
        second.tick();
        let after = second.view();

        prop_assert_eq!(after.hours_worked, before.hours_worked);
        prop_assert_eq!(after.total_break_ms, before.total_break_ms);
        prop_assert_eq!(after.phase, SessionPhase::Working);
    }
}
