//! Melee resolution
//!
//! Both sides deal damage per tick while a swing is live and the target is
//! inside a box around the attacker. The player's invulnerability window is
//! what keeps enemy contact to one hit per window.

use super::ai::Sensing;
use super::state::{Entity, Player};
use crate::tuning::Tuning;

/// Count down the player's invulnerability window
pub fn tick_invulnerability(player: &mut Player) {
    player.invuln_ticks = player.invuln_ticks.saturating_sub(1);
}

/// Count down the player's swing, clearing it once spent
pub fn advance_attack(player: &mut Player) {
    if let Some(attack) = player.attack.as_mut() {
        attack.remaining = attack.remaining.saturating_sub(1);
        if attack.remaining == 0 {
            player.attack = None;
        }
    }
}

/// Player sword against one enemy; returns true if this hit killed it
pub fn player_strike(
    player: &Player,
    enemy: &mut Entity,
    sensing: &Sensing,
    now: u64,
    tuning: &Tuning,
) -> bool {
    if !player.is_attacking() || !enemy.is_active_enemy() {
        return false;
    }
    let reach = tuning.player_attack_reach;
    if sensing.delta.x.abs() >= reach || sensing.delta.y.abs() >= reach {
        return false;
    }

    enemy.hp -= 1;
    if enemy.hp > 0 {
        return false;
    }
    enemy.hp = 0;
    enemy.died_at = Some(now);
    true
}

/// Enemy windup against the player; returns damage dealt, if any
pub fn enemy_strike(
    enemy: &Entity,
    player: &mut Player,
    sensing: &Sensing,
    tuning: &Tuning,
) -> Option<i32> {
    if !enemy.is_active_enemy() || !enemy.ai.is_winding_up() || player.is_invulnerable() {
        return None;
    }
    if sensing.delta.x.abs() >= tuning.melee_reach_x || sensing.delta.y.abs() >= tuning.melee_reach_y {
        return None;
    }

    let amount = enemy.kind.contact_damage(tuning);
    player.take_damage(amount);
    player.invuln_ticks = tuning.invuln_ticks;
    player.body.vel.x = if player.body.pos.x < enemy.body.pos.x {
        -tuning.knockback
    } else {
        tuning.knockback
    };
    Some(amount)
}
