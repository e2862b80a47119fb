//! Render snapshot
//!
//! Flattens a `World` into POD instances an external renderer can upload
//! as-is. Positions are world-space; add `Hud::view_offset` to get screen space.

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::consts::{CAMERA_TARGET_Y_FRAC, WINDOW_SIZE};
use crate::sim::{Entity, EntityKind, PlatformKind, World};

/// What an instance depicts
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    Player = 0,
    Standard = 1,
    Heavy = 2,
    Boss = 3,
    Heart = 4,
    Rooftop = 5,
    Tree = 6,
    WindowLit = 7,
    WindowDark = 8,
}

impl From<EntityKind> for InstanceKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Standard => InstanceKind::Standard,
            EntityKind::Heavy => InstanceKind::Heavy,
            EntityKind::Boss => InstanceKind::Boss,
            EntityKind::Pickup => InstanceKind::Heart,
        }
    }
}

/// Instance flag bits
pub mod flags {
    pub const FACING_RIGHT: u32 = 1 << 0;
    pub const ATTACKING: u32 = 1 << 1;
    pub const DEAD: u32 = 1 << 2;
    pub const INVULNERABLE: u32 = 1 << 3;
    pub const CHASING: u32 = 1 << 4;
}

/// One drawable box
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    /// Flip rotation in radians
    pub rotation: f32,
    pub anim_phase: f32,
    /// 1.0 while alive, fading to 0.0 over the corpse grace period
    pub fade: f32,
    /// Hit points as a fraction of max (0 for scenery)
    pub health: f32,
    pub kind: u32,
    pub flags: u32,
}

impl Instance {
    fn new(position: glam::Vec2, size: glam::Vec2, kind: InstanceKind) -> Self {
        Self {
            position: position.to_array(),
            size: size.to_array(),
            rotation: 0.0,
            anim_phase: 0.0,
            fade: 1.0,
            health: 0.0,
            kind: kind as u32,
            flags: 0,
        }
    }
}

/// Continuous HUD outputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub hp: i32,
    pub max_hp: i32,
    pub kills: u32,
    pub kill_target: u32,
    pub camera: [f32; 2],
    /// Translation from world to screen space
    pub view_offset: [f32; 2],
}

pub fn hud(world: &World) -> Hud {
    Hud {
        hp: world.player.hp,
        max_hp: world.player.max_hp,
        kills: world.kills,
        kill_target: world.kill_target,
        camera: world.camera.to_array(),
        view_offset: [
            -world.camera.x,
            -world.camera.y + world.viewport.y * CAMERA_TARGET_Y_FRAC,
        ],
    }
}

/// Player first, then every enemy, corpse, and heart
pub fn actors(world: &World) -> Vec<Instance> {
    let player = &world.player;
    let mut out = Vec::with_capacity(world.entities.len() + 1);

    let mut p = Instance::new(player.body.pos, player.body.size, InstanceKind::Player);
    p.rotation = player.flip.angle;
    p.anim_phase = player.anim_phase;
    p.health = player.hp as f32 / player.max_hp.max(1) as f32;
    if player.facing_right {
        p.flags |= flags::FACING_RIGHT;
    }
    if player.is_attacking() {
        p.flags |= flags::ATTACKING;
    }
    if player.is_invulnerable() {
        p.flags |= flags::INVULNERABLE;
    }
    out.push(p);

    let grace = world.tuning.corpse_grace_ticks().max(1) as f32;
    out.extend(
        world
            .entities
            .iter()
            .map(|e| entity_instance(e, world.time_ticks, grace)),
    );
    out
}

fn entity_instance(entity: &Entity, now: u64, grace: f32) -> Instance {
    let mut inst = Instance::new(entity.body.pos, entity.body.size, entity.kind.into());
    if entity.max_hp > 0 {
        inst.health = entity.hp as f32 / entity.max_hp as f32;
    }
    if entity.facing_right {
        inst.flags |= flags::FACING_RIGHT;
    }
    if entity.ai.is_winding_up() {
        inst.flags |= flags::ATTACKING;
    }
    if entity.ai.is_chasing() {
        inst.flags |= flags::CHASING;
    }
    if let Some(died) = entity.died_at {
        inst.flags |= flags::DEAD;
        inst.fade = (1.0 - now.saturating_sub(died) as f32 / grace).clamp(0.0, 1.0);
    }
    inst
}

/// Platforms and their windows
pub fn skyline(world: &World) -> Vec<Instance> {
    let mut out = Vec::new();
    for platform in &world.platforms {
        let kind = match platform.kind {
            PlatformKind::Rooftop => InstanceKind::Rooftop,
            PlatformKind::Tree => InstanceKind::Tree,
        };
        out.push(Instance::new(platform.pos, platform.size, kind));
        out.extend(platform.windows.iter().map(|w| {
            let kind = if w.lit {
                InstanceKind::WindowLit
            } else {
                InstanceKind::WindowDark
            };
            Instance::new(platform.pos + w.offset, WINDOW_SIZE, kind)
        }));
    }
    out
}

/// Raw bytes for GPU upload
pub fn as_bytes(instances: &[Instance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
