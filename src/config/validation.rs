//! Validation of machine definitions using Validation.
//!
//! Every check runs, and every violation is reported together, so an author
//! can fix a broken definition in one pass.

use crate::config::error::ConfigViolation;
use crate::config::types::{ActionConfig, MachineDefinition, StateConfig};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of a validation pass.
pub type ConfigValidation = Validation<(), NonEmptyVec<ConfigViolation>>;

fn check(violation: Option<ConfigViolation>) -> ConfigValidation {
    match violation {
        Some(violation) => Validation::fail(violation),
        None => Validation::success(()),
    }
}

fn window_checks(state: &StateConfig, action: &ActionConfig) -> Vec<ConfigValidation> {
    let Some(hold) = action.hold_frames() else {
        return Vec::new();
    };

    let inverted = (hold.begin > hold.end).then(|| ConfigViolation::InvertedWindow {
        state: state.name.clone(),
        kind: action.kind.clone(),
        begin: hold.begin,
        end: hold.end,
    });

    // An end past the last frame is allowed: the action then holds until the
    // state is left.
    let out_of_range =
        (hold.begin as usize >= state.frame_count()).then(|| ConfigViolation::WindowOutOfRange {
            state: state.name.clone(),
            kind: action.kind.clone(),
            begin: hold.begin,
            frame_count: state.frame_count(),
        });

    vec![check(inverted), check(out_of_range)]
}

/// Validate one state in isolation.
pub fn validate_state(state: &StateConfig) -> ConfigValidation {
    let mut checks = vec![check(state.frames.is_empty().then(|| {
        ConfigViolation::EmptyFrames {
            state: state.name.clone(),
        }
    }))];

    for action in &state.actions {
        checks.extend(window_checks(state, action));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Validate a whole definition, including references between states.
///
/// # Example
///
/// ```rust
/// use action_machine::builder::{MachineDefinitionBuilder, StateConfigBuilder};
/// use action_machine::config::validate_definition;
///
/// let definition = MachineDefinitionBuilder::new()
///     .first_state("Idle")
///     .state(StateConfigBuilder::new("Idle").frames(2).looping(true))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert!(validate_definition(&definition).is_success());
/// ```
pub fn validate_definition(definition: &MachineDefinition) -> ConfigValidation {
    let mut checks = Vec::new();
    let mut seen = HashSet::new();

    for state in &definition.states {
        if !seen.insert(state.name.as_str()) {
            checks.push(check(Some(ConfigViolation::DuplicateState {
                state: state.name.clone(),
            })));
        }
    }

    let first = &definition.machine.first_state;
    checks.push(check((!seen.contains(first.as_str())).then(|| {
        ConfigViolation::MissingFirstState {
            state: first.clone(),
        }
    })));

    for state in &definition.states {
        checks.push(validate_state(state));

        if let Some(next) = state.next_state.as_deref().filter(|n| !n.is_empty()) {
            checks.push(check((!seen.contains(next)).then(|| {
                ConfigViolation::UnknownNextState {
                    state: state.name.clone(),
                    next: next.to_string(),
                }
            })));
        }
    }

    // Global actions run against the global frame counter, which is unbounded,
    // so only the window ordering is checked.
    for action in &definition.machine.global_actions {
        if let Some(hold) = action.hold_frames() {
            checks.push(check((hold.begin > hold.end).then(|| {
                ConfigViolation::InvertedWindow {
                    state: "<global>".to_string(),
                    kind: action.kind.clone(),
                    begin: hold.begin,
                    end: hold.end,
                }
            })));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Collect the violations of a failed validation, or `None` on success.
pub fn violations(validation: ConfigValidation) -> Option<Vec<ConfigViolation>> {
    match validation {
        Validation::Success(_) => None,
        Validation::Failure(errors) => Some(errors.iter().cloned().collect()),
    }
}
