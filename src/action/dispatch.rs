//! Per-tick enter/update/exit decisions for a list of nodes.

use crate::action::context::ActionContext;
use crate::action::node::{NodeArena, NodeId};
use crate::config::FrameWindow;

/// Run one tick of every node in `ids` against `reference_frame`.
///
/// Hold windows:
/// - skipped entirely once `loop_count > 0` unless the window loops
/// - enter when the frame equals `begin`
/// - update every tick (a dormant node ignores it)
/// - exit when the frame equals `end`, possibly on the same tick as enter
///
/// Continuous actions enter on their first update and never exit here.
pub(crate) fn update_nodes<C, I>(
    arena: &mut NodeArena<C, I>,
    ids: &[NodeId],
    reference_frame: i64,
    loop_count: u32,
    delta_time: f32,
    cx: &mut ActionContext<'_, C, I>,
) {
    for &id in ids {
        let Some(node) = arena.get_mut(id) else {
            continue;
        };

        let window = node.config().window;
        match window {
            FrameWindow::Hold(hold) => {
                if !hold.enable_loop && loop_count > 0 {
                    continue;
                }

                if i64::from(hold.begin) == reference_frame {
                    node.invoke_enter(cx);
                }

                node.invoke_update(cx, delta_time);

                if i64::from(hold.end) == reference_frame {
                    node.invoke_exit(cx);
                }
            }
            FrameWindow::Continuous => {
                if !node.is_updating() && node.update_count() == 0 {
                    node.invoke_enter(cx);
                }

                node.invoke_update(cx, delta_time);
            }
        }
    }
}

/// Exit every still-active node in `ids`, then release its slot.
pub(crate) fn dispose_nodes<C, I>(
    arena: &mut NodeArena<C, I>,
    ids: &mut Vec<NodeId>,
    cx: &mut ActionContext<'_, C, I>,
) {
    for id in ids.drain(..) {
        if let Some(node) = arena.get_mut(id) {
            node.invoke_exit(cx);
        }
        arena.recycle(id);
    }
}
