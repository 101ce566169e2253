//! Property-based tests for the frame clock, transition arbitration, and
//! the action lifecycle.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

mod common;

use action_machine::builder::{MachineDefinitionBuilder, StateConfigBuilder};
use action_machine::config::ActionConfig;
use action_machine::core::{FrameClock, TransitionArbiter};
use common::{machine, Log, Phase};
use proptest::prelude::*;

const STATES: [&str; 3] = ["Idle", "Walk", "Attack"];

prop_compose! {
    fn arbitrary_request()(state in 0..STATES.len(), priority in -5i32..5) -> (&'static str, i32) {
        (STATES[state], priority)
    }
}

/// One host action between ticks.
#[derive(Clone, Debug)]
enum Step {
    Tick,
    Wait(u32),
    Request(&'static str, i32),
}

prop_compose! {
    fn arbitrary_step()(variant in 0..6u8, wait in 0..4u32, request in arbitrary_request()) -> Step {
        match variant {
            0 => Step::Wait(wait),
            1 => Step::Request(request.0, request.1),
            _ => Step::Tick,
        }
    }
}

fn three_state_machine(log: &Log) -> action_machine::ActionMachine<(), ()> {
    let definition = MachineDefinitionBuilder::new()
        .first_state("Idle")
        .global_action(ActionConfig::hold("global", 1, 4))
        .state(
            StateConfigBuilder::new("Idle")
                .frames(3)
                .looping(true)
                .action(ActionConfig::continuous("record"))
                .action(ActionConfig::hold("record", 1, 2).looping(true)),
        )
        .and_then(|b| {
            b.state(
                StateConfigBuilder::new("Walk")
                    .frames(2)
                    .looping(true)
                    .action(ActionConfig::hold("record", 0, 0)),
            )
        })
        .and_then(|b| {
            b.state(
                StateConfigBuilder::new("Attack")
                    .frames(4)
                    .next_state("Idle")
                    .action(ActionConfig::hold("record", 1, 6))
                    .action(ActionConfig::continuous("record")),
            )
        })
        .unwrap()
        .build()
        .unwrap();
    machine(definition, log)
}

proptest! {
    #[test]
    fn looping_index_is_ticks_mod_frame_count(frames in 1usize..8, ticks in 1i64..64) {
        let mut clock = FrameClock::new();
        clock.begin_state();
        for _ in 0..ticks {
            clock.advance_global();
            clock.advance_state();
        }

        let k = ticks - 1;
        prop_assert_eq!(clock.state_frame_index(frames, true), k % frames as i64);
        prop_assert_eq!(i64::from(clock.loop_count(frames, true)), k / frames as i64);
        prop_assert_eq!(clock.loop_count(frames, false), 0);
    }

    #[test]
    fn later_request_wins_iff_priority_not_lower(
        first in arbitrary_request(),
        second in arbitrary_request(),
    ) {
        let mut arbiter = TransitionArbiter::new();
        prop_assert!(arbiter.request(Some(first.0), first.1));

        let accepted = arbiter.request(Some(second.0), second.1);
        let pending = arbiter.pending().unwrap();

        prop_assert_eq!(accepted, second.1 >= first.1);
        if accepted {
            prop_assert_eq!(pending.target.as_str(), second.0);
            prop_assert_eq!(pending.priority, second.1);
        } else {
            prop_assert_eq!(pending.target.as_str(), first.0);
            prop_assert_eq!(pending.priority, first.1);
        }
    }

    #[test]
    fn empty_target_never_replaces_pending(first in arbitrary_request(), priority in any::<i32>()) {
        let mut arbiter = TransitionArbiter::new();
        arbiter.request(Some(first.0), first.1);

        prop_assert!(!arbiter.request(None, priority));
        prop_assert!(!arbiter.request(Some(""), priority));
        prop_assert_eq!(arbiter.take().map(|r| r.target), Some(first.0.to_string()));
        prop_assert!(!arbiter.has_pending());
    }

    #[test]
    fn wait_frames_only_hold_back_state_frame(waits in prop::collection::vec(0u32..4, 1..12)) {
        let log = Log::default();
        let mut machine = three_state_machine(&log);

        let mut ticks = 0i64;
        let mut frozen = 0i64;
        for wait in waits {
            machine.set_wait_frames(wait);
            for _ in 0..=wait {
                machine.tick(0.016).unwrap();
                ticks += 1;
            }
            frozen += i64::from(wait);

            prop_assert_eq!(machine.global_frame_index(), ticks - 1);
            prop_assert_eq!(machine.frame_index(), ticks - frozen - 1);
            prop_assert_eq!(machine.wait_frames(), 0);
        }
    }

    #[test]
    fn every_entered_action_exits_exactly_once(
        steps in prop::collection::vec(arbitrary_step(), 1..48),
    ) {
        let log = Log::default();
        let mut machine = three_state_machine(&log);

        for step in steps {
            match step {
                Step::Tick => machine.tick(0.016).unwrap(),
                Step::Wait(frames) => machine.set_wait_frames(frames),
                Step::Request(state, priority) => {
                    machine.request_transition(state, priority);
                }
            }

            let active = machine
                .state_actions()
                .chain(machine.global_actions())
                .filter(|node| node.is_updating())
                .count();
            let events = log.snapshot();
            let enters = events.iter().filter(|e| e.phase == Phase::Enter).count();
            let exits = events.iter().filter(|e| e.phase == Phase::Exit).count();
            prop_assert_eq!(enters, exits + active);
        }

        machine.destroy();
        let events = log.take();
        let enters = events.iter().filter(|e| e.phase == Phase::Enter).count();
        let exits = events.iter().filter(|e| e.phase == Phase::Exit).count();
        prop_assert_eq!(enters, exits);
    }

    #[test]
    fn state_machine_never_halts_with_fallbacks(ticks in 1usize..80, request in arbitrary_request()) {
        let log = Log::default();
        let mut machine = three_state_machine(&log);

        machine.request_transition(request.0, request.1);
        for _ in 0..ticks {
            prop_assert!(machine.tick(0.016).is_ok());
            let frame_count = machine.state_config().unwrap().frame_count();
            let index = machine.state_frame_index().unwrap();
            prop_assert!(index >= 0 && (index as usize) < frame_count);
        }
    }
}
