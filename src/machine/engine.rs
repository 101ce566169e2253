//! Tick-driven action machine.

use crate::action::dispatch::{dispose_nodes, update_nodes};
use crate::action::{
    ActionContext, ActionNode, FrameInfo, HandlerResolver, NodeArena, NodeId, SharedHandler,
};
use crate::config::{
    ActionConfig, ConfigError, ConfigProvider, FrameConfig, MachineConfig, StateConfig,
};
use crate::core::{DataStore, FrameClock, TransitionArbiter, TransitionRequest};
use crate::machine::error::MachineError;
use std::sync::Arc;

type Resolved<C, I> = Vec<(Arc<ActionConfig>, SharedHandler<C, I>)>;

struct Bindings<C, I> {
    config_id: String,
    controller: C,
    input: I,
}

/// Split borrows of the machine used while handlers run.
struct Parts<'a, C, I> {
    cx: ActionContext<'a, C, I>,
    arena: &'a mut NodeArena<C, I>,
    global_nodes: &'a mut Vec<NodeId>,
    state_nodes: &'a mut Vec<NodeId>,
}

/// Frame-sequenced state machine for one owning entity.
///
/// Each [`tick`](Self::tick):
/// 1. applies the pending transition, if any
/// 2. advances the global frame and updates global actions
/// 3. unless frozen by wait frames, advances the state frame and updates the
///    state's actions
/// 4. on the last frame of a non-looping state, requests its fallback state
///    for the next tick
///
/// `C` is the owning context and `I` the input capability. Both are stored as
/// given and handed to handlers; the machine never inspects them.
///
/// # Example
///
/// ```rust
/// use action_machine::action::HandlerRegistry;
/// use action_machine::builder::{MachineDefinitionBuilder, StateConfigBuilder};
/// use action_machine::config::InMemoryConfigProvider;
/// use action_machine::machine::ActionMachine;
/// use std::sync::Arc;
///
/// let definition = MachineDefinitionBuilder::new()
///     .first_state("Attack")
///     .state(StateConfigBuilder::new("Attack").frames(2).next_state("Idle"))
///     .unwrap()
///     .state(StateConfigBuilder::new("Idle").frames(1).looping(true))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut provider = InMemoryConfigProvider::new();
/// provider.insert_validated("hero", definition).unwrap();
///
/// let mut machine: ActionMachine<(), ()> = ActionMachine::new(
///     Arc::new(provider),
///     Arc::new(HandlerRegistry::<(), ()>::new()),
/// );
/// machine.initialize("hero", (), ()).unwrap();
///
/// machine.tick(0.016).unwrap();
/// machine.tick(0.016).unwrap();
/// assert_eq!(machine.state_name(), "Attack");
///
/// machine.tick(0.016).unwrap();
/// assert_eq!(machine.state_name(), "Idle");
/// assert!(machine.is_state_changed());
/// ```
pub struct ActionMachine<C = (), I = ()> {
    provider: Arc<dyn ConfigProvider>,
    resolver: Arc<dyn HandlerResolver<C, I>>,
    bindings: Option<Bindings<C, I>>,
    clock: FrameClock,
    arbiter: TransitionArbiter,
    data: DataStore,
    arena: NodeArena<C, I>,
    global_nodes: Vec<NodeId>,
    state_nodes: Vec<NodeId>,
    state_name: String,
    machine_config: Option<Arc<MachineConfig>>,
    state_config: Option<Arc<StateConfig>>,
    is_state_changed: bool,
    is_frame_changed: bool,
    fault: Option<String>,
}

impl<C, I> ActionMachine<C, I> {
    /// Create an uninitialized machine.
    pub fn new(
        provider: Arc<dyn ConfigProvider>,
        resolver: Arc<dyn HandlerResolver<C, I>>,
    ) -> Self {
        Self {
            provider,
            resolver,
            bindings: None,
            clock: FrameClock::new(),
            arbiter: TransitionArbiter::new(),
            data: DataStore::new(),
            arena: NodeArena::new(),
            global_nodes: Vec::new(),
            state_nodes: Vec::new(),
            state_name: String::new(),
            machine_config: None,
            state_config: None,
            is_state_changed: false,
            is_frame_changed: false,
            fault: None,
        }
    }

    /// Load `config_id`, create the global actions, and enter the first state.
    ///
    /// Nothing is changed if any config or handler fails to resolve.
    pub fn initialize(
        &mut self,
        config_id: impl Into<String>,
        controller: C,
        input: I,
    ) -> Result<(), MachineError> {
        if let Some(bindings) = &self.bindings {
            return Err(MachineError::AlreadyInitialized {
                config_id: bindings.config_id.clone(),
            });
        }

        let config_id = config_id.into();
        let machine_config = self.provider.machine_config(&config_id)?;
        let state_config = self
            .provider
            .state_config(&config_id, &machine_config.first_state)?;
        let global_actions = self.resolve_handlers(&machine_config.global_actions)?;
        let state_actions = self.resolve_handlers(&state_config.actions)?;

        self.clock = FrameClock::new();
        self.arbiter.clear();
        self.fault = None;

        let created_frame = self.clock.frame_index();
        spawn_nodes(
            &mut self.arena,
            &mut self.global_nodes,
            global_actions,
            created_frame,
        );

        self.state_name = machine_config.first_state.clone();
        self.clock.begin_state();
        spawn_nodes(
            &mut self.arena,
            &mut self.state_nodes,
            state_actions,
            created_frame,
        );

        tracing::debug!(
            config_id = %config_id,
            state = %self.state_name,
            global_actions = self.global_nodes.len(),
            state_actions = self.state_nodes.len(),
            "action machine initialized"
        );

        self.machine_config = Some(machine_config);
        self.state_config = Some(state_config);
        self.bindings = Some(Bindings {
            config_id,
            controller,
            input,
        });
        self.is_state_changed = true;
        self.is_frame_changed = true;
        Ok(())
    }

    /// Advance the machine by one tick.
    ///
    /// Any error is fatal: it is logged, recorded, and every later call
    /// returns [`MachineError::Halted`].
    pub fn tick(&mut self, delta_time: f32) -> Result<(), MachineError> {
        if let Some(reason) = &self.fault {
            return Err(MachineError::Halted {
                reason: reason.clone(),
            });
        }
        if self.bindings.is_none() {
            return Err(MachineError::NotInitialized);
        }

        self.is_frame_changed = false;
        self.is_state_changed = !self.clock.is_started();

        let result = self
            .apply_pending_transition()
            .and_then(|()| self.update_frame(delta_time));

        if let Err(err) = &result {
            tracing::error!(
                state = %self.state_name,
                frame = self.clock.frame_index(),
                global_frame = self.clock.global_frame_index(),
                error = %err,
                "action machine halted"
            );
            self.fault = Some(err.to_string());
        }
        result
    }

    /// Exit and release every action node and clear the data store.
    ///
    /// The machine can be initialized again afterwards. Does nothing if the
    /// machine is not initialized.
    pub fn destroy(&mut self) {
        if self.bindings.is_none() {
            return;
        }

        let frame = self.frame_info(self.clock.frame_index(), 0);
        if let Some(mut parts) = self.parts(frame) {
            dispose_nodes(parts.arena, parts.state_nodes, &mut parts.cx);
            dispose_nodes(parts.arena, parts.global_nodes, &mut parts.cx);
        }

        tracing::debug!(state = %self.state_name, "action machine destroyed");

        self.data.clear();
        self.arbiter.clear();
        self.bindings = None;
        self.machine_config = None;
        self.state_config = None;
        self.state_name.clear();
        self.clock = FrameClock::new();
        self.is_state_changed = false;
        self.is_frame_changed = false;
        self.fault = None;
    }

    /// Request a state change, applied at the start of the next tick.
    ///
    /// Returns `false` if the request lost arbitration. An empty state name
    /// never replaces a pending request.
    pub fn request_transition(&mut self, state: &str, priority: i32) -> bool {
        self.arbiter.request(Some(state), priority)
    }

    pub fn pending_transition(&self) -> Option<&TransitionRequest> {
        self.arbiter.pending()
    }

    pub fn is_initialized(&self) -> bool {
        self.bindings.is_some()
    }

    /// Whether a fatal error has stopped this machine.
    pub fn is_halted(&self) -> bool {
        self.fault.is_some()
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    pub fn config_id(&self) -> Option<&str> {
        self.bindings.as_ref().map(|b| b.config_id.as_str())
    }

    pub fn controller(&self) -> Option<&C> {
        self.bindings.as_ref().map(|b| &b.controller)
    }

    pub fn input(&self) -> Option<&I> {
        self.bindings.as_ref().map(|b| &b.input)
    }

    pub fn machine_config(&self) -> Option<&MachineConfig> {
        self.machine_config.as_deref()
    }

    pub fn state_config(&self) -> Option<&StateConfig> {
        self.state_config.as_deref()
    }

    pub fn state_name(&self) -> &str {
        &self.state_name
    }

    pub fn frame_index(&self) -> i64 {
        self.clock.frame_index()
    }

    pub fn global_frame_index(&self) -> i64 {
        self.clock.global_frame_index()
    }

    pub fn state_begin_frame_index(&self) -> i64 {
        self.clock.state_begin_frame_index()
    }

    pub fn wait_frames(&self) -> u32 {
        self.clock.wait_frames()
    }

    /// Freeze the state frame for the next `frames` ticks.
    pub fn set_wait_frames(&mut self, frames: u32) {
        self.clock.set_wait_frames(frames);
    }

    /// Effective frame within the current state, wrapped for looping states.
    pub fn state_frame_index(&self) -> Option<i64> {
        self.state_config
            .as_ref()
            .map(|c| self.clock.state_frame_index(c.frame_count(), c.enable_loop))
    }

    /// Completed passes over the current looping state.
    pub fn loop_count(&self) -> u32 {
        self.state_config
            .as_ref()
            .map_or(0, |c| self.clock.loop_count(c.frame_count(), c.enable_loop))
    }

    /// Config of the frame the state is currently on.
    pub fn current_frame(&self) -> Option<&FrameConfig> {
        let config = self.state_config.as_ref()?;
        config.frame(self.clock.state_frame_index(config.frame_count(), config.enable_loop))
    }

    /// True on the tick a state was entered.
    pub fn is_state_changed(&self) -> bool {
        self.is_state_changed
    }

    /// True if the state frame advanced this tick; false on frozen ticks.
    pub fn is_frame_changed(&self) -> bool {
        self.is_frame_changed
    }

    pub fn data(&self) -> &DataStore {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataStore {
        &mut self.data
    }

    pub fn global_actions(&self) -> impl Iterator<Item = &ActionNode<C, I>> {
        self.global_nodes.iter().filter_map(|&id| self.arena.get(id))
    }

    pub fn state_actions(&self) -> impl Iterator<Item = &ActionNode<C, I>> {
        self.state_nodes.iter().filter_map(|&id| self.arena.get(id))
    }

    fn resolve_handlers(&self, actions: &[Arc<ActionConfig>]) -> Result<Resolved<C, I>, MachineError> {
        actions
            .iter()
            .map(|config| {
                let handler = self.resolver.resolve(&config.kind).ok_or_else(|| {
                    MachineError::UnknownActionKind {
                        kind: config.kind.clone(),
                    }
                })?;
                Ok((Arc::clone(config), handler))
            })
            .collect()
    }

    fn frame_info(&self, reference_frame: i64, loop_count: u32) -> FrameInfo {
        FrameInfo {
            global_frame_index: self.clock.global_frame_index(),
            frame_index: self.clock.frame_index(),
            state_begin_frame_index: self.clock.state_begin_frame_index(),
            reference_frame,
            loop_count,
        }
    }

    fn parts(&mut self, frame: FrameInfo) -> Option<Parts<'_, C, I>> {
        let bindings = self.bindings.as_ref()?;
        Some(Parts {
            cx: ActionContext {
                controller: &bindings.controller,
                input: &bindings.input,
                state_name: &self.state_name,
                frame,
                data: &mut self.data,
                arbiter: &mut self.arbiter,
                wait_frames: self.clock.wait_frames_mut(),
            },
            arena: &mut self.arena,
            global_nodes: &mut self.global_nodes,
            state_nodes: &mut self.state_nodes,
        })
    }

    fn apply_pending_transition(&mut self) -> Result<(), MachineError> {
        let Some(request) = self.arbiter.take() else {
            return Ok(());
        };

        let bindings = self.bindings.as_ref().ok_or(MachineError::NotInitialized)?;
        let state_config = self
            .provider
            .state_config(&bindings.config_id, &request.target)
            .map_err(|err| match err {
                ConfigError::StateNotFound { state, .. } => {
                    MachineError::MissingStateConfig { state }
                }
                other => MachineError::Config(other),
            })?;
        let actions = self.resolve_handlers(&state_config.actions)?;

        let frame = self.frame_info(self.state_frame_index().unwrap_or(-1), self.loop_count());
        let mut parts = self.parts(frame).ok_or(MachineError::NotInitialized)?;
        dispose_nodes(parts.arena, parts.state_nodes, &mut parts.cx);

        let previous = std::mem::replace(&mut self.state_name, request.target);
        self.clock.begin_state();
        spawn_nodes(
            &mut self.arena,
            &mut self.state_nodes,
            actions,
            self.clock.frame_index(),
        );
        self.state_config = Some(state_config);
        self.is_state_changed = true;

        tracing::debug!(
            from = %previous,
            to = %self.state_name,
            priority = request.priority,
            begin_frame = self.clock.state_begin_frame_index(),
            "state transition applied"
        );
        Ok(())
    }

    fn update_frame(&mut self, delta_time: f32) -> Result<(), MachineError> {
        let state_config = self
            .state_config
            .clone()
            .ok_or_else(|| MachineError::MissingStateConfig {
                state: self.state_name.clone(),
            })?;

        let global_frame = self.clock.advance_global();
        let state_loop_count = self.loop_count();
        let frame = self.frame_info(global_frame, state_loop_count);
        let mut parts = self.parts(frame).ok_or(MachineError::NotInitialized)?;
        update_nodes(
            parts.arena,
            parts.global_nodes.as_slice(),
            global_frame,
            state_loop_count,
            delta_time,
            &mut parts.cx,
        );

        if !self.clock.advance_state() {
            tracing::trace!(
                state = %self.state_name,
                global_frame,
                wait_frames = self.clock.wait_frames(),
                "frozen tick"
            );
            return Ok(());
        }

        let frame_count = state_config.frame_count();
        let index = self
            .clock
            .state_frame_index(frame_count, state_config.enable_loop);
        if index >= frame_count as i64 {
            return Err(MachineError::FrameOutOfRange {
                state: state_config.name.clone(),
                index,
                frame_count,
            });
        }
        let loop_count = self.clock.loop_count(frame_count, state_config.enable_loop);

        let frame = self.frame_info(index, loop_count);
        let mut parts = self.parts(frame).ok_or(MachineError::NotInitialized)?;
        update_nodes(
            parts.arena,
            parts.state_nodes.as_slice(),
            index,
            loop_count,
            delta_time,
            &mut parts.cx,
        );

        self.is_frame_changed = true;
        tracing::trace!(
            state = %self.state_name,
            index,
            loop_count,
            frame = self.clock.frame_index(),
            "frame advanced"
        );

        let is_last_frame = index + 1 == frame_count as i64;
        if !state_config.enable_loop && is_last_frame && !self.arbiter.has_pending() {
            if let Some(next) = state_config.next_state.as_deref() {
                tracing::debug!(
                    state = %self.state_name,
                    next,
                    "last frame reached, requesting fallback state"
                );
                self.arbiter.request(Some(next), 0);
            }
        }
        Ok(())
    }
}

impl<C, I> Drop for ActionMachine<C, I> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn spawn_nodes<C, I>(
    arena: &mut NodeArena<C, I>,
    ids: &mut Vec<NodeId>,
    actions: Resolved<C, I>,
    created_frame: i64,
) {
    ids.extend(
        actions
            .into_iter()
            .map(|(config, handler)| arena.create(ActionNode::new(config, handler, created_frame))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionHandler, HandlerRegistry};
    use crate::config::{InMemoryConfigProvider, MachineDefinition};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        exits: AtomicUsize,
    }

    impl ActionHandler<(), ()> for Arc<Counter> {
        fn exit(&self, _node: &mut ActionNode<(), ()>, _cx: &mut ActionContext<'_, (), ()>) {
            self.exits.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn state(name: &str, frames: usize, enable_loop: bool, next: Option<&str>) -> StateConfig {
        StateConfig {
            name: name.to_string(),
            frames: vec![FrameConfig::default(); frames],
            enable_loop,
            actions: vec![Arc::new(ActionConfig::continuous("count"))],
            next_state: next.map(str::to_string),
        }
    }

    fn machine_with(states: Vec<StateConfig>, counter: &Arc<Counter>) -> ActionMachine<(), ()> {
        let mut provider = InMemoryConfigProvider::new();
        provider.insert(
            "test",
            MachineDefinition {
                machine: MachineConfig {
                    first_state: states[0].name.clone(),
                    global_actions: Vec::new(),
                },
                states,
            },
        );
        let registry = HandlerRegistry::<(), ()>::new().register("count", Arc::clone(counter));
        ActionMachine::new(Arc::new(provider), Arc::new(registry))
    }

    #[test]
    fn tick_before_initialize_fails() {
        let counter = Arc::new(Counter::default());
        let mut machine = machine_with(vec![state("Idle", 1, true, None)], &counter);
        assert!(matches!(machine.tick(0.1), Err(MachineError::NotInitialized)));
        assert!(!machine.is_halted());
    }

    #[test]
    fn initialize_twice_fails() {
        let counter = Arc::new(Counter::default());
        let mut machine = machine_with(vec![state("Idle", 1, true, None)], &counter);
        machine.initialize("test", (), ()).unwrap();
        assert!(matches!(
            machine.initialize("test", (), ()),
            Err(MachineError::AlreadyInitialized { .. })
        ));
    }

    #[test]
    fn unknown_action_kind_leaves_machine_uninitialized() {
        let mut idle = state("Idle", 1, true, None);
        idle.actions = vec![Arc::new(ActionConfig::continuous("missing"))];
        let counter = Arc::new(Counter::default());
        let mut machine = machine_with(vec![idle], &counter);

        assert!(matches!(
            machine.initialize("test", (), ()),
            Err(MachineError::UnknownActionKind { kind }) if kind == "missing"
        ));
        assert!(!machine.is_initialized());
        assert_eq!(machine.state_actions().count(), 0);
    }

    #[test]
    fn initialize_sets_up_first_state() {
        let counter = Arc::new(Counter::default());
        let mut machine = machine_with(vec![state("Idle", 2, true, None)], &counter);
        machine.initialize("test", (), ()).unwrap();

        assert_eq!(machine.state_name(), "Idle");
        assert_eq!(machine.frame_index(), -1);
        assert_eq!(machine.global_frame_index(), -1);
        assert_eq!(machine.state_begin_frame_index(), 0);
        assert!(machine.is_state_changed());
        assert_eq!(machine.state_actions().count(), 1);
        assert_eq!(machine.config_id(), Some("test"));
    }

    #[test]
    fn missing_target_state_halts_machine() {
        let counter = Arc::new(Counter::default());
        let mut machine = machine_with(vec![state("Idle", 1, true, None)], &counter);
        machine.initialize("test", (), ()).unwrap();
        machine.tick(0.1).unwrap();

        assert!(machine.request_transition("Nowhere", 1));
        assert!(matches!(
            machine.tick(0.1),
            Err(MachineError::MissingStateConfig { state }) if state == "Nowhere"
        ));
        assert!(machine.is_halted());
        assert!(matches!(machine.tick(0.1), Err(MachineError::Halted { .. })));
    }

    #[test]
    fn non_looping_state_without_fallback_runs_out_of_frames() {
        let counter = Arc::new(Counter::default());
        let mut machine = machine_with(vec![state("Once", 2, false, None)], &counter);
        machine.initialize("test", (), ()).unwrap();

        machine.tick(0.1).unwrap();
        machine.tick(0.1).unwrap();
        assert!(matches!(
            machine.tick(0.1),
            Err(MachineError::FrameOutOfRange {
                index: 2,
                frame_count: 2,
                ..
            })
        ));
    }

    #[test]
    fn destroy_exits_active_nodes_and_clears_data() {
        let counter = Arc::new(Counter::default());
        let mut machine = machine_with(vec![state("Idle", 1, true, None)], &counter);
        machine.initialize("test", (), ()).unwrap();
        machine.tick(0.1).unwrap();
        machine.data_mut().set(1, "x");

        machine.destroy();
        assert_eq!(counter.exits.load(Ordering::SeqCst), 1);
        assert!(machine.data().is_empty());
        assert!(!machine.is_initialized());

        machine.destroy();
        assert_eq!(counter.exits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_exits_active_nodes() {
        let counter = Arc::new(Counter::default());
        {
            let mut machine = machine_with(vec![state("Idle", 1, true, None)], &counter);
            machine.initialize("test", (), ()).unwrap();
            machine.tick(0.1).unwrap();
        }
        assert_eq!(counter.exits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn machine_can_be_reinitialized_after_destroy() {
        let counter = Arc::new(Counter::default());
        let mut machine = machine_with(vec![state("Idle", 1, true, None)], &counter);
        machine.initialize("test", (), ()).unwrap();
        machine.tick(0.1).unwrap();
        machine.destroy();

        machine.initialize("test", (), ()).unwrap();
        assert_eq!(machine.frame_index(), -1);
        machine.tick(0.1).unwrap();
        assert_eq!(machine.frame_index(), 0);
    }
}
