//! Player kinematics
//!
//! Semi-implicit Euler at a fixed nominal step: velocity first, then
//! position. Enemies are moved by the AI, not here.

use serde::{Deserialize, Serialize};

use super::state::{JumpState, Player};
use crate::consts::ANIM_RATE;
use crate::tuning::Tuning;

/// Horizontal intent for a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

/// Classify a jump tap into the running combo; returns the tap's position
pub fn register_tap(jump: &mut JumpState, now_ms: u64, window_ms: u64) -> u32 {
    jump.taps = match jump.last_tap_ms {
        Some(last) if now_ms.saturating_sub(last) < window_ms => jump.taps + 1,
        _ => 1,
    };
    jump.last_tap_ms = Some(now_ms);
    jump.taps
}

/// Handle a jump tap; returns the combo position when the jump was taken
pub fn try_jump(player: &mut Player, now_ms: u64, tuning: &Tuning) -> Option<u32> {
    let taps = register_tap(&mut player.jump, now_ms, tuning.jump_tap_window_ms);
    if player.jump.jumps >= tuning.max_jumps {
        return None;
    }

    player.jump.jumps += 1;
    player.body.vel.y = tuning.jump_impulse(taps);
    player.airborne = true;
    if taps >= tuning.flip_min_taps {
        player.flip.active = true;
        player.flip.angle = 0.0;
    }
    Some(taps)
}

/// Apply held direction, or friction when nothing is held
pub fn apply_direction(player: &mut Player, direction: Direction, tuning: &Tuning) {
    match direction {
        Direction::Left => {
            player.body.vel.x = -tuning.move_speed;
            player.facing_right = false;
        }
        Direction::Right => {
            player.body.vel.x = tuning.move_speed;
            player.facing_right = true;
        }
        Direction::None => player.body.vel.x *= tuning.friction,
    }
}

/// Advance the player one tick under gravity
pub fn integrate(player: &mut Player, tuning: &Tuning) {
    let body = &mut player.body;
    body.vel.y += tuning.gravity;
    if let Some(cap) = tuning.max_fall_speed {
        body.vel.y = body.vel.y.min(cap);
    }
    body.pos += body.vel;

    player.anim_phase += body.vel.x.abs() * ANIM_RATE;

    if player.flip.active {
        let spin = if player.facing_right {
            tuning.flip_spin
        } else {
            -tuning.flip_spin
        };
        player.flip.angle += spin;
        if player.flip.angle.abs() >= std::f32::consts::TAU {
            player.flip.angle = 0.0;
            player.flip.active = false;
        }
    }
}
