//! Enemy behavior
//!
//! A reactive rule set evaluated once per tick per live enemy. Motion
//! (patrol/chase) and action (idle/windup) are independent axes.

use glam::Vec2;

use super::collision::platform_under;
use super::state::{Action, Body, Entity, Motion, Platform};
use crate::tuning::Tuning;

/// What an enemy perceives of the player this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensing {
    /// Player center minus enemy center
    pub delta: Vec2,
    pub distance: f32,
    /// Player is airborne well above the enemy's head
    pub player_high: bool,
}

impl Sensing {
    #[inline]
    pub fn within(&self, radius: f32) -> bool {
        self.distance < radius && !self.player_high
    }
}

pub fn sense(enemy: &Body, player: &Body, tuning: &Tuning) -> Sensing {
    let delta = player.center() - enemy.center();
    Sensing {
        delta,
        distance: delta.length(),
        player_high: player.bottom() < enemy.pos.y - tuning.high_margin,
    }
}

/// Run one tick of sensing, movement, and windup for a live enemy
pub fn update_enemy(enemy: &mut Entity, sensing: &Sensing, platforms: &[Platform], tuning: &Tuning) {
    let ai = &mut enemy.ai;

    if sensing.within(tuning.sense_radius) {
        ai.motion = Motion::Chase;
        enemy.facing_right = sensing.delta.x > 0.0;
        ai.chase_multiplier = (ai.chase_multiplier + tuning.chase_accel).min(tuning.max_chase_multiplier);
    } else {
        ai.motion = Motion::Patrol;
        ai.chase_multiplier = 1.0;
    }

    let heading = if enemy.facing_right { 1.0 } else { -1.0 };
    let speed = match ai.motion {
        Motion::Chase => tuning.chase_base_speed * ai.chase_multiplier,
        Motion::Patrol => tuning.patrol_speed,
    };
    enemy.body.vel.x = heading * speed;
    enemy.body.pos.x += enemy.body.vel.x;

    // A windup runs to completion once started; a new one waits for the next tick
    ai.action = match ai.action {
        Action::Windup { remaining } if remaining > 1 => Action::Windup {
            remaining: remaining - 1,
        },
        Action::Windup { .. } => Action::Idle,
        Action::Idle if sensing.within(tuning.attack_range) => Action::Windup {
            remaining: tuning.windup_ticks,
        },
        Action::Idle => Action::Idle,
    };

    if ai.motion == Motion::Patrol && platform_under(&enemy.body, platforms).is_none() {
        enemy.facing_right = !enemy.facing_right;
        log::trace!("Enemy {} turned at a rooftop edge", enemy.id);
    }
}
