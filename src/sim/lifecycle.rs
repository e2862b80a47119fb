//! Removal policy for the active entity set
//!
//! Hearts vanish on contact; corpses linger for a tick-counted grace period.

use super::state::{Entity, EntityKind, GameEvent, Player};
use crate::tuning::Tuning;

/// Player center is within reach of the pickup center
pub fn touches_pickup(player: &Player, pickup: &Entity, reach: f32) -> bool {
    let delta = player.body.center() - pickup.body.center();
    delta.x.abs() < reach && delta.y.abs() < reach
}

/// Corpse has outlived its grace period
#[inline]
pub fn corpse_expired(entity: &Entity, now: u64, grace_ticks: u32) -> bool {
    entity
        .died_at
        .is_some_and(|died| now.saturating_sub(died) >= grace_ticks as u64)
}

/// Collect touched hearts and drop expired corpses
pub fn sweep(
    entities: &mut Vec<Entity>,
    player: &mut Player,
    now: u64,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    let grace = tuning.corpse_grace_ticks();
    entities.retain(|entity| {
        if entity.kind == EntityKind::Pickup {
            if touches_pickup(player, entity, tuning.pickup_reach) {
                player.heal(tuning.heal_amount);
                log::debug!("Heart {} collected, hp={}", entity.id, player.hp);
                events.push(GameEvent::PickupCollected { hp: player.hp });
                return false;
            }
            return true;
        }
        !corpse_expired(entity, now, grace)
    });
}
