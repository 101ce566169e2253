//! Shared fixtures for integration tests.

#![allow(dead_code)]

use action_machine::action::{ActionContext, ActionHandler, ActionNode, HandlerRegistry};
use action_machine::config::{InMemoryConfigProvider, MachineDefinition};
use action_machine::machine::ActionMachine;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

/// One handler callback as observed by [`Recorder`].
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub kind: String,
    pub phase: Phase,
    pub state: String,
    pub reference_frame: i64,
    pub global_frame: i64,
}

/// Shared event log.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<Event>>>);

impl Log {
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }
}

/// Records every callback into a [`Log`].
pub struct Recorder {
    pub log: Log,
}

impl Recorder {
    fn record<C, I>(&self, node: &ActionNode<C, I>, cx: &ActionContext<'_, C, I>, phase: Phase) {
        self.log.push(Event {
            kind: node.kind().to_string(),
            phase,
            state: cx.state_name().to_string(),
            reference_frame: cx.frame().reference_frame,
            global_frame: cx.frame().global_frame_index,
        });
    }
}

impl<C, I> ActionHandler<C, I> for Recorder {
    fn enter(&self, node: &mut ActionNode<C, I>, cx: &mut ActionContext<'_, C, I>) {
        self.record(node, cx, Phase::Enter);
    }

    fn update(&self, node: &mut ActionNode<C, I>, cx: &mut ActionContext<'_, C, I>, _delta_time: f32) {
        self.record(node, cx, Phase::Update);
    }

    fn exit(&self, node: &mut ActionNode<C, I>, cx: &mut ActionContext<'_, C, I>) {
        self.record(node, cx, Phase::Exit);
    }
}

/// Requests a transition when entered.
pub struct RequestOnEnter {
    pub target: &'static str,
    pub priority: i32,
}

impl<C, I> ActionHandler<C, I> for RequestOnEnter {
    fn enter(&self, _node: &mut ActionNode<C, I>, cx: &mut ActionContext<'_, C, I>) {
        cx.request_transition(self.target, self.priority);
    }
}

/// Freezes the state frame when entered.
pub struct Hitstop {
    pub frames: u32,
}

impl<C, I> ActionHandler<C, I> for Hitstop {
    fn enter(&self, _node: &mut ActionNode<C, I>, cx: &mut ActionContext<'_, C, I>) {
        cx.set_wait_frames(self.frames);
    }
}

/// Registry with recorders under `record` and `global`, plus the helper handlers.
pub fn registry(log: &Log) -> HandlerRegistry<(), ()> {
    HandlerRegistry::new()
        .register("record", Recorder { log: log.clone() })
        .register("global", Recorder { log: log.clone() })
        .register(
            "to_hurt",
            RequestOnEnter {
                target: "Hurt",
                priority: 5,
            },
        )
        .register(
            "to_walk",
            RequestOnEnter {
                target: "Walk",
                priority: 1,
            },
        )
        .register("hitstop", Hitstop { frames: 2 })
}

/// An initialized machine over `definition`, recording into `log`.
pub fn machine(definition: MachineDefinition, log: &Log) -> ActionMachine<(), ()> {
    let mut provider = InMemoryConfigProvider::new();
    provider
        .insert_validated("test", definition)
        .expect("test definition should be valid");

    let mut machine: ActionMachine<(), ()> =
        ActionMachine::new(Arc::new(provider), Arc::new(registry(log)));
    machine
        .initialize("test", (), ())
        .expect("test machine should initialize");
    machine
}

/// Events of one phase, as `(kind, reference_frame)` pairs.
pub fn phases(events: &[Event], phase: Phase) -> Vec<(String, i64)> {
    events
        .iter()
        .filter(|e| e.phase == phase)
        .map(|e| (e.kind.clone(), e.reference_frame))
        .collect()
}
