//! World state and core simulation types
//!
//! Everything one attempt at a mission mutates lives in `World`. A fresh
//! `World` is built on every (re)start; nothing here outlives the attempt.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::worldgen::generate_world;
use crate::consts::*;
use crate::levels::LevelDescriptor;
use crate::tuning::Tuning;

/// Axis-aligned box with velocity; `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// What an entity in the active set is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Standard,
    Heavy,
    Boss,
    /// Heart that restores hit points on contact
    Pickup,
}

impl EntityKind {
    pub fn is_enemy(self) -> bool {
        self != EntityKind::Pickup
    }

    /// Damage one tick of this enemy's windup deals to the player
    pub fn contact_damage(self, tuning: &Tuning) -> i32 {
        match self {
            EntityKind::Standard => tuning.enemy_damage,
            EntityKind::Heavy => tuning.heavy_damage,
            EntityKind::Boss => tuning.boss_damage,
            EntityKind::Pickup => 0,
        }
    }
}

/// Movement half of the enemy state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Motion {
    #[default]
    Patrol,
    Chase,
}

/// Attack half of the enemy state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    /// Sword windup in progress; `remaining` is always > 0
    Windup { remaining: u32 },
}

/// Orthogonal motion x action state plus the chase ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    pub motion: Motion,
    pub action: Action,
    /// Scales chase speed; stays in [1.0, max_chase_multiplier]
    pub chase_multiplier: f32,
}

impl Default for AiState {
    fn default() -> Self {
        Self {
            motion: Motion::Patrol,
            action: Action::Idle,
            chase_multiplier: 1.0,
        }
    }
}

impl AiState {
    #[inline]
    pub fn is_chasing(&self) -> bool {
        self.motion == Motion::Chase
    }

    #[inline]
    pub fn is_winding_up(&self) -> bool {
        matches!(self.action, Action::Windup { .. })
    }
}

/// An enemy or pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub body: Body,
    pub hp: i32,
    pub max_hp: i32,
    pub facing_right: bool,
    pub ai: AiState,
    /// Tick on which the entity died (set once)
    pub died_at: Option<u64>,
}

impl Entity {
    /// Enemy standing on a surface at `floor_y`
    pub fn enemy(id: u32, kind: EntityKind, x: f32, floor_y: f32, hp: i32) -> Self {
        let size = if kind == EntityKind::Boss {
            Vec2::new(BOSS_WIDTH, BOSS_HEIGHT)
        } else {
            Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT)
        };
        Self {
            id,
            kind,
            body: Body::new(Vec2::new(x, floor_y - size.y), size),
            hp,
            max_hp: hp,
            facing_right: false,
            ai: AiState::default(),
            died_at: None,
        }
    }

    /// Heart hovering above a surface at `floor_y`
    pub fn pickup(id: u32, x: f32, floor_y: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Pickup,
            body: Body::new(
                Vec2::new(x, floor_y - PICKUP_HOVER),
                Vec2::splat(PICKUP_SIZE),
            ),
            hp: 0,
            max_hp: 0,
            facing_right: true,
            ai: AiState::default(),
            died_at: None,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.died_at.is_some()
    }

    /// Live enemy that still takes part in AI and combat
    #[inline]
    pub fn is_active_enemy(&self) -> bool {
        self.kind.is_enemy() && !self.is_dead()
    }
}

/// Player attack types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Sword,
}

/// An attack in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub kind: AttackKind,
    /// Ticks left; the hit region is live while this is > 0
    pub remaining: u32,
}

/// Jump combo bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JumpState {
    /// Position in the current tap combo (0 after landing)
    pub taps: u32,
    /// Jumps performed since last ground contact
    pub jumps: u32,
    /// Timestamp of the previous tap, in ms
    pub last_tap_ms: Option<u64>,
}

/// Cosmetic flip rotation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Flip {
    pub active: bool,
    pub angle: f32,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub hp: i32,
    pub max_hp: i32,
    pub facing_right: bool,
    /// True from a jump until the next landing
    pub airborne: bool,
    pub jump: JumpState,
    pub flip: Flip,
    pub attack: Option<Attack>,
    pub invuln_ticks: u32,
    /// Walk cycle accumulator
    pub anim_phase: f32,
}

impl Player {
    pub fn spawn(viewport_height: f32, max_hp: i32) -> Self {
        Self {
            body: Body::new(
                Vec2::new(PLAYER_SPAWN_X, viewport_height - PLAYER_SPAWN_FROM_BOTTOM),
                Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            ),
            hp: max_hp,
            max_hp,
            facing_right: true,
            airborne: false,
            jump: JumpState::default(),
            flip: Flip::default(),
            attack: None,
            invuln_ticks: 0,
            anim_phase: 0.0,
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invuln_ticks > 0
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.attack.is_some_and(|a| a.remaining > 0)
    }

    /// Start an attack unless one is already running
    pub fn start_attack(&mut self, kind: AttackKind, ticks: u32) -> bool {
        if self.is_attacking() {
            return false;
        }
        self.attack = Some(Attack {
            kind,
            remaining: ticks,
        });
        true
    }

    /// Restore hit points, capped at max
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
    }

    /// Apply damage, clamped at zero; returns remaining hit points
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.hp = (self.hp - amount.max(0)).max(0);
        self.hp
    }
}

/// Platform kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Rooftop,
    /// Narrow obstacle
    Tree,
}

/// Decorative window, relative to the platform's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub offset: Vec2,
    pub lit: bool,
}

/// Static surface the player can land on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PlatformKind,
    pub windows: Vec<Window>,
}

impl Platform {
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Whether `x` lies within the usable span, keeping `clearance` from the right edge
    #[inline]
    pub fn hosts_x(&self, x: f32, clearance: f32) -> bool {
        x >= self.pos.x && x <= self.right() - clearance
    }

    /// Whether the span [left, right] fits entirely on this platform
    #[inline]
    pub fn contains_span(&self, left: f32, right: f32) -> bool {
        left >= self.pos.x && right <= self.right()
    }
}

/// How an attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatCause {
    Fell,
    Slain,
}

/// Final result of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Cleared,
    Failed(DefeatCause),
}

/// Things that happened during a tick, for UI/audio collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { taps: u32 },
    Landed,
    PlayerDamaged { amount: i32, hp: i32 },
    EnemyKilled { id: u32, kind: EntityKind },
    PickupCollected { hp: i32 },
    GameOver { cause: DefeatCause },
    LevelClear,
}

/// Mutable aggregate for one attempt at a mission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub tuning: Tuning,
    pub level: LevelDescriptor,
    /// Viewport width/height
    pub viewport: Vec2,
    /// Horizontal extent the generator had to cover
    pub level_width: f32,
    /// Sorted by ascending x
    pub platforms: Vec<Platform>,
    /// Enemies and pickups; order is irrelevant
    pub entities: Vec<Entity>,
    pub player: Player,
    pub kills: u32,
    /// Kills that clear the attempt, never more than the enemies spawned
    pub kill_target: u32,
    pub camera: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once, after which the world no longer ticks
    pub outcome: Option<Outcome>,
}

impl World {
    /// Build a fresh world with an unseeded layout
    pub fn new(level: LevelDescriptor, viewport: Vec2, tuning: Tuning) -> Self {
        Self::with_rng(level, viewport, tuning, &mut rand::rng())
    }

    /// Build a fresh world drawing the layout from `rng`
    pub fn with_rng<R: Rng + ?Sized>(
        level: LevelDescriptor,
        viewport: Vec2,
        tuning: Tuning,
        rng: &mut R,
    ) -> Self {
        let level = level.sanitized();
        let layout = generate_world(rng, &level, viewport.y);
        let player = Player::spawn(viewport.y, tuning.player_max_hp);

        let spawned = layout.entities.iter().filter(|e| e.kind.is_enemy()).count() as u32;
        let mut kill_target = level.kill_target();
        if kill_target > spawned {
            log::warn!(
                "Mission {}: kill target {} lowered to the {} enemies spawned",
                level.ordinal,
                kill_target,
                spawned
            );
            kill_target = spawned;
        }
        Self {
            tuning,
            level,
            viewport,
            level_width: layout.width,
            platforms: layout.platforms,
            entities: layout.entities,
            player,
            kills: 0,
            kill_target,
            camera: Vec2::ZERO,
            time_ticks: 0,
            outcome: None,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Player y beyond which a fall is fatal
    #[inline]
    pub fn fall_death_y(&self) -> f32 {
        self.viewport.y + self.tuning.fall_death_margin
    }

    pub fn enemies_alive(&self) -> usize {
        self.entities.iter().filter(|e| e.is_active_enemy()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_edges() {
        let body = Body::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        assert_eq!(body.center(), Vec2::new(25.0, 40.0));
        assert_eq!(body.right(), 40.0);
        assert_eq!(body.bottom(), 60.0);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut player = Player::spawn(800.0, 100);
        player.hp = 40;
        player.heal(20);
        assert_eq!(player.hp, 60);
        player.hp = 90;
        player.heal(20);
        assert_eq!(player.hp, 100);
    }

    #[test]
    fn test_damage_clamps_to_zero() {
        let mut player = Player::spawn(800.0, 100);
        assert_eq!(player.take_damage(40), 60);
        assert_eq!(player.take_damage(500), 0);
        assert_eq!(player.hp, 0);
    }

    #[test]
    fn test_single_attack_at_a_time() {
        let mut player = Player::spawn(800.0, 100);
        assert!(player.start_attack(AttackKind::Sword, 15));
        assert!(!player.start_attack(AttackKind::Sword, 15));
        player.attack = Some(Attack {
            kind: AttackKind::Sword,
            remaining: 0,
        });
        assert!(player.start_attack(AttackKind::Sword, 15));
    }

    #[test]
    fn test_enemy_stands_on_floor() {
        let boss = Entity::enemy(1, EntityKind::Boss, 500.0, 600.0, 5);
        assert_eq!(boss.body.bottom(), 600.0);
        assert_eq!(boss.body.size, Vec2::new(BOSS_WIDTH, BOSS_HEIGHT));
        assert!(boss.is_active_enemy());
        assert!(!Entity::pickup(2, 0.0, 600.0).is_active_enemy());
    }

    #[test]
    fn test_unreachable_kill_target_is_capped() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(21);
        let level = LevelDescriptor::new(1, 500, 0, 0, 0.1);
        let world = World::with_rng(level, Vec2::new(1280.0, 900.0), Tuning::default(), &mut rng);
        assert_eq!(world.level.kill_target(), 500);
        assert_eq!(world.kill_target as usize, world.enemies_alive());
    }

    #[test]
    fn test_reachable_kill_target_is_kept() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(21);
        let level = crate::levels::CAMPAIGN[4];
        let world = World::with_rng(level, Vec2::new(1280.0, 900.0), Tuning::default(), &mut rng);
        assert_eq!(world.kill_target, 27);
    }
}
