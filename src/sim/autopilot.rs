//! Idle/demo mode - the simulation plays itself
//!
//! Produces the same intents a person would: run right, hop gaps, swing at
//! anything in reach. Purely reactive, like the enemies.

use super::collision::platform_under;
use super::physics::Direction;
use super::state::World;
use super::tick::TickInput;

/// How far ahead of the player's right edge to look for a rooftop edge, in ticks of travel
const EDGE_LOOKAHEAD_TICKS: f32 = 8.0;

/// Choose this tick's input for the player
pub fn drive(world: &World, now_ms: u64) -> TickInput {
    let player = &world.player;
    let tuning = &world.tuning;
    let center = player.body.center();

    let attack = !player.is_attacking()
        && world.entities.iter().any(|e| {
            if !e.is_active_enemy() {
                return false;
            }
            let d = e.body.center() - center;
            d.x.abs() < tuning.player_attack_reach && d.y.abs() < tuning.player_attack_reach
        });

    let jump = if player.airborne {
        // Falling with nothing underneath to catch us: spend another jump
        let falling = player.body.vel.y > 0.0;
        let bottom = player.body.bottom();
        let caught = world
            .platforms
            .iter()
            .any(|p| center.x >= p.pos.x && center.x <= p.right() && p.top() >= bottom);
        falling && !caught && player.jump.jumps < tuning.max_jumps
    } else {
        let lookahead = tuning.move_speed * EDGE_LOOKAHEAD_TICKS;
        match platform_under(&player.body, &world.platforms) {
            Some(platform) => player.body.right() + lookahead > platform.right(),
            None => true,
        }
    };

    TickInput {
        direction: Direction::Right,
        jump_at_ms: jump.then_some(now_ms),
        attack,
    }
}
