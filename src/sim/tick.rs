//! Fixed-step simulation tick
//!
//! Ordering within a tick is load-bearing: input, physics, landing, the
//! entity pass (AI, then combat, then culling), outcome checks, camera.

use serde::{Deserialize, Serialize};

use super::state::{AttackKind, DefeatCause, GameEvent, Outcome, World};
use super::{ai, collision, combat, lifecycle, physics};
use super::physics::Direction;
use crate::consts::*;

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Held direction
    pub direction: Direction,
    /// Jump tap this tick, with its wall-clock timestamp in ms
    pub jump_at_ms: Option<u64>,
    /// Sword strike this tick
    pub attack: bool,
}

/// Advance the world by one tick; returns what happened
///
/// Once the world has an outcome, it no longer changes and no events are raised.
pub fn tick(world: &mut World, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if world.is_over() {
        return events;
    }
    world.time_ticks += 1;
    let now = world.time_ticks;
    let fall_y = world.fall_death_y();

    let World {
        tuning,
        platforms,
        entities,
        player,
        kills,
        kill_target,
        outcome,
        ..
    } = world;

    // Input
    if input.attack {
        player.start_attack(AttackKind::Sword, tuning.player_attack_ticks);
    }
    if let Some(at_ms) = input.jump_at_ms
        && let Some(taps) = physics::try_jump(player, at_ms, tuning)
    {
        log::debug!("Jump x{taps} at tick {now}");
        events.push(GameEvent::Jumped { taps });
    }
    physics::apply_direction(player, input.direction, tuning);

    // Physics
    physics::integrate(player, tuning);
    combat::tick_invulnerability(player);

    // Landing
    let was_airborne = player.airborne;
    if collision::resolve_landing(player, platforms, tuning.landing_tolerance) && was_airborne {
        events.push(GameEvent::Landed);
    }

    if player.body.pos.y > fall_y {
        finish(outcome, Outcome::Failed(DefeatCause::Fell), &mut events);
        update_camera(world);
        return events;
    }

    // Entity pass
    for enemy in entities.iter_mut().filter(|e| e.is_active_enemy()) {
        let sensing = ai::sense(&enemy.body, &player.body, tuning);
        ai::update_enemy(enemy, &sensing, platforms, tuning);

        if combat::player_strike(player, enemy, &sensing, now, tuning) {
            *kills += 1;
            log::debug!("Enemy {} ({:?}) down, kills={}", enemy.id, enemy.kind, kills);
            events.push(GameEvent::EnemyKilled {
                id: enemy.id,
                kind: enemy.kind,
            });
            continue;
        }

        if let Some(amount) = combat::enemy_strike(enemy, player, &sensing, tuning) {
            log::debug!("Player hit by enemy {} for {amount}, hp={}", enemy.id, player.hp);
            events.push(GameEvent::PlayerDamaged {
                amount,
                hp: player.hp,
            });
            if player.hp <= 0 {
                finish(outcome, Outcome::Failed(DefeatCause::Slain), &mut events);
            }
        }
    }

    if outcome.is_none() {
        lifecycle::sweep(entities, player, now, tuning, &mut events);
    }
    combat::advance_attack(player);

    // Outcome
    if outcome.is_none() && *kills >= *kill_target {
        finish(outcome, Outcome::Cleared, &mut events);
    }

    update_camera(world);
    events
}

/// Record the outcome once and raise its signal
fn finish(outcome: &mut Option<Outcome>, result: Outcome, events: &mut Vec<GameEvent>) {
    if outcome.is_some() {
        return;
    }
    *outcome = Some(result);
    match result {
        Outcome::Cleared => {
            log::info!("Level clear");
            events.push(GameEvent::LevelClear);
        }
        Outcome::Failed(cause) => {
            log::info!("Game over: {cause:?}");
            events.push(GameEvent::GameOver { cause });
        }
    }
}

/// Ease the camera toward the player
pub fn update_camera(world: &mut World) {
    let target_x = world.player.body.pos.x - world.viewport.x * CAMERA_LEAD_FRAC;
    let target_y = world.viewport.y * CAMERA_TARGET_Y_FRAC;
    world.camera.x += (target_x - world.camera.x) * CAMERA_EASE_X;
    world.camera.y += (target_y - world.camera.y) * CAMERA_EASE_Y;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{CAMPAIGN, LevelDescriptor};
    use crate::sim::state::{Action, Entity, EntityKind, Platform, PlatformKind};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 900.0);
    const ROOF_Y: f32 = 600.0;

    /// One endless rooftop, no entities, player standing at x=100
    fn flat_world(level: LevelDescriptor) -> World {
        let mut rng = Pcg32::seed_from_u64(1234);
        let mut world = World::with_rng(level, VIEWPORT, Tuning::default(), &mut rng);
        world.platforms = vec![Platform {
            pos: Vec2::new(0.0, ROOF_Y),
            size: Vec2::new(100_000.0, 300.0),
            kind: PlatformKind::Rooftop,
            windows: Vec::new(),
        }];
        world.entities.clear();
        world.player.body.pos = Vec2::new(100.0, ROOF_Y - world.player.body.size.y);
        world
    }

    /// Enemy whose center sits `dx` from the player's center, on the same roof
    fn enemy_beside(world: &World, id: u32, kind: EntityKind, hp: i32, dx: f32) -> Entity {
        let mut enemy = Entity::enemy(id, kind, 0.0, ROOF_Y, hp);
        let cx = world.player.body.center().x + dx;
        enemy.body.pos.x = cx - enemy.body.size.x / 2.0;
        enemy
    }

    fn idle(world: &mut World, ticks: usize) -> Vec<GameEvent> {
        (0..ticks)
            .flat_map(|_| tick(world, &TickInput::default()))
            .collect()
    }

    #[test]
    fn test_player_rests_on_roof() {
        let mut world = flat_world(CAMPAIGN[0]);
        idle(&mut world, 30);
        assert_eq!(world.player.body.bottom(), ROOF_Y);
        assert_eq!(world.player.body.vel.y, 0.0);
        assert!(world.outcome.is_none());
    }

    #[test]
    fn test_generated_world_spawn_lands() {
        let mut rng = Pcg32::seed_from_u64(77);
        let mut world = World::with_rng(CAMPAIGN[0], VIEWPORT, Tuning::default(), &mut rng);
        world.entities.clear();
        tick(&mut world, &TickInput::default());
        assert_eq!(world.player.body.bottom(), world.platforms[0].top());
    }

    #[test]
    fn test_scenario_a_invulnerability_window() {
        let mut world = flat_world(CAMPAIGN[0]);
        let mut grunt = enemy_beside(&world, 1, EntityKind::Standard, 1, 20.0);
        grunt.ai.action = Action::Windup { remaining: 200 };
        world.entities.push(grunt);

        let events = tick(&mut world, &TickInput::default());
        assert!(events.contains(&GameEvent::PlayerDamaged { amount: 20, hp: 80 }));
        assert_eq!(world.player.hp, 80);
        assert_eq!(world.player.invuln_ticks, 45);

        for _ in 0..44 {
            // Keep the enemy in contact and mid-swing
            world.entities[0].body.pos.x = world.player.body.center().x + 20.0 - 17.5;
            world.entities[0].ai.action = Action::Windup { remaining: 200 };
            let events = tick(&mut world, &TickInput::default());
            assert!(
                !events
                    .iter()
                    .any(|e| matches!(e, GameEvent::PlayerDamaged { .. }))
            );
        }
        assert_eq!(world.player.hp, 80);
    }

    #[test]
    fn test_scenario_b_boss_melts_under_sustained_strike() {
        let mut world = flat_world(CAMPAIGN[3]);
        world.player.invuln_ticks = 10_000;
        world.entities.push(enemy_beside(&world, 9, EntityKind::Boss, 5, 30.0));

        let mut kill_events = 0;
        let strike = TickInput {
            attack: true,
            ..Default::default()
        };
        let none = TickInput::default();
        for t in 1..=8 {
            // Keep the boss in reach
            let cx = world.player.body.center().x + 30.0;
            world.entities[0].body.pos.x = cx - world.entities[0].body.size.x / 2.0;
            let events = tick(&mut world, if t == 1 { &strike } else { &none });
            kill_events += events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyKilled { id: 9, .. }))
                .count();
            if t < 5 {
                assert_eq!(world.entities[0].hp, 5 - t);
                assert!(!world.entities[0].is_dead());
            }
            if t == 5 {
                assert_eq!(world.entities[0].hp, 0);
                assert_eq!(world.entities[0].died_at, Some(5));
            }
        }
        assert_eq!(kill_events, 1);
        assert_eq!(world.kills, 1);
    }

    #[test]
    fn test_attack_lasts_its_duration() {
        let mut world = flat_world(CAMPAIGN[3]);
        world.player.invuln_ticks = 10_000;
        world.entities.push(enemy_beside(&world, 9, EntityKind::Boss, 100, 30.0));
        tick(
            &mut world,
            &TickInput {
                attack: true,
                ..Default::default()
            },
        );
        for _ in 0..20 {
            let cx = world.player.body.center().x + 30.0;
            world.entities[0].body.pos.x = cx - world.entities[0].body.size.x / 2.0;
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.entities[0].hp, 100 - 15);
    }

    #[test]
    fn test_level_clear_on_same_tick() {
        let level = LevelDescriptor::new(1, 2, 0, 0, 0.1);
        let mut world = flat_world(level);
        world.entities.push(enemy_beside(&world, 1, EntityKind::Standard, 1, 30.0));
        world.entities.push(enemy_beside(&world, 2, EntityKind::Heavy, 1, -30.0));
        world.player.invuln_ticks = 10_000;

        let events = tick(
            &mut world,
            &TickInput {
                attack: true,
                ..Default::default()
            },
        );
        assert_eq!(world.kills, 2);
        assert_eq!(events.last(), Some(&GameEvent::LevelClear));
        assert_eq!(world.outcome, Some(Outcome::Cleared));
        assert!(tick(&mut world, &TickInput::default()).is_empty());
    }

    #[test]
    fn test_capped_target_can_be_cleared() {
        let mut world = flat_world(LevelDescriptor::new(1, 500, 0, 0, 0.1));
        world.kill_target = 1;
        world.player.invuln_ticks = 10_000;
        world.entities.push(enemy_beside(&world, 1, EntityKind::Standard, 1, 30.0));
        let events = tick(
            &mut world,
            &TickInput {
                attack: true,
                ..Default::default()
            },
        );
        assert_eq!(events.last(), Some(&GameEvent::LevelClear));
    }

    #[test]
    fn test_empty_target_clears_immediately() {
        let mut world = flat_world(LevelDescriptor::new(1, 0, 0, 0, 0.0));
        let events = tick(&mut world, &TickInput::default());
        assert_eq!(events, vec![GameEvent::LevelClear]);
    }

    #[test]
    fn test_scenario_e_fall_signals_once() {
        let mut world = flat_world(CAMPAIGN[0]);
        world.platforms.clear();
        let mut game_overs = 0;
        for _ in 0..400 {
            game_overs += tick(&mut world, &TickInput::default())
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { cause: DefeatCause::Fell }))
                .count();
        }
        assert_eq!(game_overs, 1);
        assert_eq!(world.outcome, Some(Outcome::Failed(DefeatCause::Fell)));
        assert!(world.player.body.pos.y > world.fall_death_y());
    }

    #[test]
    fn test_slain_player_ends_episode() {
        let mut world = flat_world(CAMPAIGN[4]);
        world.player.hp = 30;
        let mut boss = enemy_beside(&world, 5, EntityKind::Boss, 5, 10.0);
        boss.ai.action = Action::Windup { remaining: 10 };
        world.entities.push(boss);
        let events = tick(&mut world, &TickInput::default());
        assert_eq!(world.player.hp, 0);
        assert!(events.contains(&GameEvent::GameOver {
            cause: DefeatCause::Slain
        }));
        assert!(tick(&mut world, &TickInput::default()).is_empty());
    }

    #[test]
    fn test_landing_restores_jump_budget() {
        let mut world = flat_world(CAMPAIGN[0]);
        let mut jumps = 0;
        for t in 0..4u64 {
            let events = tick(
                &mut world,
                &TickInput {
                    jump_at_ms: Some(1000 + t * 100),
                    ..Default::default()
                },
            );
            jumps += events.iter().filter(|e| matches!(e, GameEvent::Jumped { .. })).count();
        }
        assert_eq!(jumps, 4);
        let rejected = tick(
            &mut world,
            &TickInput {
                jump_at_ms: Some(1450),
                ..Default::default()
            },
        );
        assert!(rejected.is_empty());

        let mut landed = false;
        for _ in 0..600 {
            if tick(&mut world, &TickInput::default()).contains(&GameEvent::Landed) {
                landed = true;
                break;
            }
        }
        assert!(landed);

        let events = tick(
            &mut world,
            &TickInput {
                jump_at_ms: Some(60_000),
                ..Default::default()
            },
        );
        assert_eq!(events, vec![GameEvent::Jumped { taps: 1 }]);
    }

    #[test]
    fn test_corpse_removed_after_grace() {
        let mut world = flat_world(CAMPAIGN[0]);
        world.player.invuln_ticks = 10_000;
        world.entities.push(enemy_beside(&world, 1, EntityKind::Standard, 1, 30.0));
        world.entities.push(enemy_beside(&world, 2, EntityKind::Standard, 1, 5000.0));
        tick(
            &mut world,
            &TickInput {
                attack: true,
                ..Default::default()
            },
        );
        assert!(world.entities[0].is_dead());
        let corpse_x = world.entities[0].body.pos.x;

        // Died on tick 1; the grace period is 180 ticks
        idle(&mut world, 179);
        assert_eq!(world.entities.len(), 2);
        assert_eq!(world.entities[0].body.pos.x, corpse_x);
        idle(&mut world, 1);
        assert_eq!(world.entities.len(), 1);
        assert_eq!(world.entities[0].id, 2);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut world = flat_world(CAMPAIGN[0]);
        let hold_right = TickInput {
            direction: Direction::Right,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut world, &hold_right);
        }
        let target = world.player.body.pos.x - VIEWPORT.x / 3.0;
        assert!((world.camera.x - target).abs() < 100.0);
        assert!((world.camera.y - VIEWPORT.y * 0.4).abs() < 1.0);
    }

    #[test]
    fn test_friction_after_release() {
        let mut world = flat_world(CAMPAIGN[0]);
        tick(
            &mut world,
            &TickInput {
                direction: Direction::Right,
                ..Default::default()
            },
        );
        let mut prev = world.player.body.vel.x;
        for _ in 0..50 {
            tick(&mut world, &TickInput::default());
            let vx = world.player.body.vel.x;
            assert!(vx >= 0.0 && vx < prev || vx == 0.0);
            prev = vx;
        }
    }
}
