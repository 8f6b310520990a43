//! Property tests for the round timer state machine.

use proptest::prelude::*;
use rounds_core::{Cue, Event, Phase, TimerEngine, TimerState, Timings};

fn arb_timings() -> impl Strategy<Value = Timings> {
    (0u64..20, 1u64..30, 0u64..15, 1u32..6).prop_map(|(prep, round, rest, rounds)| Timings {
        prep_secs: prep,
        round_secs: round,
        rest_secs: rest,
        rounds,
    })
}

/// Start the engine and tick it to the end, returning (ticks, all events).
fn run_to_end(engine: &mut TimerEngine) -> (u64, Vec<Event>) {
    let mut events = engine.start();
    let mut ticks = 0;
    while engine.state() == TimerState::Running {
        let before = engine.elapsed_secs();
        events.extend(engine.tick());
        ticks += 1;
        assert_eq!(engine.elapsed_secs(), before + 1);
        assert!(engine.remaining_secs() <= engine.phase_length_secs());
        assert!(engine.current_round() >= 1 && engine.current_round() <= engine.rounds());
        assert!(ticks <= 10_000, "engine never finished");
    }
    (ticks, events)
}

fn count(events: &[Event], cue: Cue) -> u64 {
    events.iter().filter(|e| e.cue() == Some(cue)).count() as u64
}

proptest! {
    #[test]
    fn workout_lasts_exactly_its_total(t in arb_timings()) {
        let mut engine = TimerEngine::new(t);
        let (ticks, events) = run_to_end(&mut engine);
        prop_assert_eq!(ticks, t.total_secs());
        prop_assert_eq!(engine.phase(), Phase::Finished);
        prop_assert_eq!(events.iter().filter(|e| e.is_finished()).count(), 1);
        prop_assert!((engine.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn every_round_is_belled_in_and_out(t in arb_timings()) {
        let mut engine = TimerEngine::new(t);
        let (_, events) = run_to_end(&mut engine);
        prop_assert_eq!(count(&events, Cue::RoundStart), u64::from(t.rounds));
        prop_assert_eq!(count(&events, Cue::RoundEnd), u64::from(t.rounds));
    }

    #[test]
    fn warnings_and_beeps_follow_phase_lengths(t in arb_timings()) {
        let mut engine = TimerEngine::new(t);
        let (_, events) = run_to_end(&mut engine);
        let rounds = u64::from(t.rounds);
        let warnings = if t.round_secs >= 10 { rounds } else { 0 };
        let beeps = t.prep_secs.min(3) + (rounds - 1) * t.rest_secs.min(3);
        prop_assert_eq!(count(&events, Cue::TenSecondWarning), warnings);
        prop_assert_eq!(count(&events, Cue::Beep), beeps);
    }

    #[test]
    fn pausing_never_changes_the_outcome(t in arb_timings(), pause_at in 0u64..40) {
        let mut engine = TimerEngine::new(t);
        engine.start();
        let mut ticks = 0;
        while engine.state() == TimerState::Running {
            if ticks == pause_at {
                engine.pause();
                prop_assert!(engine.tick().is_empty());
                engine.start();
            }
            engine.tick();
            ticks += 1;
        }
        prop_assert_eq!(ticks, t.total_secs());
    }

    #[test]
    fn skipping_always_reaches_the_finish(t in arb_timings()) {
        let mut engine = TimerEngine::new(t);
        engine.start();
        let mut skips = 0;
        while !engine.is_finished() {
            engine.skip();
            skips += 1;
            prop_assert!(skips <= 2 * t.rounds + 1);
        }
        prop_assert_eq!(engine.remaining_secs(), 0);
    }
}
