//! Combat Sequence
//!
//! This example drives a fighter through a short combo: an attack with a
//! hitbox window and hitstop, then a fallback to a looping idle.
//!
//! Key concepts:
//! - Hold-frame actions bound to a window of state frames
//! - Wait frames freezing the state clock while the global clock runs
//! - Fallback transitions out of non-looping states
//! - Tagged data shared between actions and the host
//!
//! Run with: RUST_LOG=debug cargo run --example combat_sequence

use action_machine::action::{ActionContext, ActionHandler, ActionNode, HandlerRegistry};
use action_machine::config::InMemoryConfigProvider;
use action_machine::machine::ActionMachine;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DAMAGE_DEALT: i32 = 1;
const COMBO: i32 = 2;

const FIGHTER: &str = r#"{
    "machine": {
        "first_state": "Idle",
        "global_actions": [{ "kind": "combo_decay" }]
    },
    "states": [
        {
            "name": "Idle",
            "frames": [{}, {}, {}, {}],
            "enable_loop": true
        },
        {
            "name": "Slash",
            "frames": [{}, {}, {}, {}, {}, {}],
            "next_state": "Idle",
            "actions": [
                {
                    "kind": "hitbox",
                    "window": { "mode": "hold", "begin": 2, "end": 3 },
                    "params": { "damage": 12, "hitstop": 2 }
                }
            ]
        }
    ]
}"#;

struct Fighter {
    name: &'static str,
}

/// Deals damage once per activation and freezes the attacker on impact.
struct Hitbox;

impl ActionHandler<Fighter, ()> for Hitbox {
    fn enter(&self, node: &mut ActionNode<Fighter, ()>, cx: &mut ActionContext<'_, Fighter, ()>) {
        let params = &node.config().params;
        let damage = params["damage"].as_i64().unwrap_or(0);
        let hitstop = params["hitstop"].as_u64().unwrap_or(0) as u32;

        let total = cx.data().get_or(DAMAGE_DEALT, 0i64) + damage;
        let combo = cx.data().get_or(COMBO, 0i64) + 1;
        cx.data_mut().set(DAMAGE_DEALT, total);
        cx.data_mut().set(COMBO, combo);
        cx.set_wait_frames(hitstop);

        println!(
            "  {} hits for {} (combo {}) at frame {}",
            cx.controller().name,
            damage,
            combo,
            cx.frame().reference_frame
        );
    }

    fn exit(&self, _node: &mut ActionNode<Fighter, ()>, _cx: &mut ActionContext<'_, Fighter, ()>) {
        println!("  hitbox closed");
    }
}

/// Resets the combo counter every 20 global frames.
struct ComboDecay;

impl ActionHandler<Fighter, ()> for ComboDecay {
    fn update(
        &self,
        _node: &mut ActionNode<Fighter, ()>,
        cx: &mut ActionContext<'_, Fighter, ()>,
        _delta_time: f32,
    ) {
        let frame = cx.frame().global_frame_index;
        if frame > 0 && frame % 20 == 0 {
            cx.data_mut().set(COMBO, 0i64);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Combat Sequence Example ===\n");

    let mut provider = InMemoryConfigProvider::new();
    provider.load_json("fighter", FIGHTER)?;

    let registry = HandlerRegistry::<Fighter, ()>::new()
        .register("hitbox", Hitbox)
        .register("combo_decay", ComboDecay);

    let mut machine: ActionMachine<Fighter, ()> =
        ActionMachine::new(Arc::new(provider), Arc::new(registry));
    machine.initialize("fighter", Fighter { name: "Knight" }, ())?;

    for tick in 0..24 {
        if tick == 3 || tick == 14 {
            println!("tick {tick}: attack pressed");
            machine.request_transition("Slash", 10);
        }

        machine.tick(1.0 / 60.0)?;

        if machine.is_state_changed() {
            println!("tick {tick}: entered {}", machine.state_name());
        }
        if !machine.is_frame_changed() {
            println!("tick {tick}: hitstop (global frame {})", machine.global_frame_index());
        }
    }

    println!(
        "\nTotal damage: {}",
        machine.data().get_or(DAMAGE_DEALT, 0i64)
    );
    println!("Final state: {}", machine.state_name());

    machine.destroy();
    println!("\n=== Example Complete ===");
    Ok(())
}
