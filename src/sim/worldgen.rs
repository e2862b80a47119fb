//! Procedural skyline generation
//!
//! Lays rooftops and trees left to right until the level width is covered,
//! then drops enemies and hearts onto whatever platform sits under them.

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntityKind, Platform, PlatformKind, Window};
use crate::consts::*;
use crate::levels::LevelDescriptor;

/// Static layout plus initial entities for one attempt
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: f32,
    pub platforms: Vec<Platform>,
    pub entities: Vec<Entity>,
}

/// Level width for a mission ordinal
pub fn level_width(ordinal: u32) -> f32 {
    LEVEL_BASE_WIDTH + ordinal as f32 * LEVEL_WIDTH_PER_ORDINAL
}

/// Generate a full layout for `level` on a viewport `viewport_height` tall
pub fn generate_world<R: Rng + ?Sized>(
    rng: &mut R,
    level: &LevelDescriptor,
    viewport_height: f32,
) -> Layout {
    let level = &level.sanitized();
    let width = level_width(level.ordinal);
    let platforms = generate_platforms(rng, width, viewport_height);

    let mut next_id = 1;
    let mut entities = seed_enemies(rng, level, width, &platforms, &mut next_id);
    let enemy_count = entities.len();
    let boss_count = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Boss)
        .count();
    entities.extend(seed_pickups(rng, level, width, &platforms, &mut next_id));

    log::info!(
        "Mission {}: width={}, platforms={}, enemies={} (bosses={}), hearts={}",
        level.ordinal,
        width,
        platforms.len(),
        enemy_count,
        boss_count,
        entities.len() - enemy_count
    );

    Layout {
        width,
        platforms,
        entities,
    }
}

/// Lay platforms from x=0 until `width` is covered
pub fn generate_platforms<R: Rng + ?Sized>(
    rng: &mut R,
    width: f32,
    viewport_height: f32,
) -> Vec<Platform> {
    let min_roof = viewport_height * ROOF_MIN_HEIGHT_FRAC;
    let max_roof = viewport_height * ROOF_MAX_HEIGHT_FRAC;

    let start_size = Vec2::new(START_ROOF_WIDTH, START_ROOF_HEIGHT);
    let mut platforms = vec![Platform {
        pos: Vec2::new(0.0, viewport_height - START_ROOF_HEIGHT),
        size: start_size,
        kind: PlatformKind::Rooftop,
        windows: decorate(rng, start_size),
    }];

    // Every step advances `covered` by at least TREE_WIDTH + GAP_MIN, so this terminates
    let mut cur_x = START_ROOF_WIDTH + START_ROOF_GAP;
    let mut covered = START_ROOF_WIDTH;
    while covered < width {
        let is_tree = rng.random_bool(TREE_CHANCE);
        let (kind, size) = if is_tree {
            let h = TREE_MIN_HEIGHT + rng.random::<f32>() * TREE_HEIGHT_SPREAD;
            (PlatformKind::Tree, Vec2::new(TREE_WIDTH, h))
        } else {
            let w = ROOF_MIN_WIDTH + rng.random::<f32>() * ROOF_WIDTH_SPREAD;
            let h = min_roof + rng.random::<f32>() * (max_roof - min_roof);
            (PlatformKind::Rooftop, Vec2::new(w, h))
        };
        let gap = GAP_MIN + rng.random::<f32>() * GAP_SPREAD;

        let windows = match kind {
            PlatformKind::Rooftop => decorate(rng, size),
            PlatformKind::Tree => Vec::new(),
        };
        platforms.push(Platform {
            pos: Vec2::new(cur_x, viewport_height - size.y),
            size,
            kind,
            windows,
        });
        covered = cur_x + size.x;
        cur_x = covered + gap;
    }

    platforms
}

/// Window grid for a rooftop face
fn decorate<R: Rng + ?Sized>(rng: &mut R, size: Vec2) -> Vec<Window> {
    let mut windows = Vec::new();
    let mut wx = WINDOW_MARGIN_X;
    while wx < size.x - WINDOW_MARGIN_X {
        let mut wy = WINDOW_MARGIN_TOP;
        while wy < size.y - WINDOW_MARGIN_BOTTOM {
            windows.push(Window {
                offset: Vec2::new(wx, wy),
                lit: rng.random_bool(WINDOW_LIT_CHANCE),
            });
            wy += WINDOW_STEP_Y;
        }
        wx += WINDOW_STEP_X;
    }
    windows
}

/// First platform whose usable span contains `x`
fn host_platform(platforms: &[Platform], x: f32, clearance: f32) -> Option<&Platform> {
    // Sorted by x: skip everything that starts to the right of `x`
    let end = platforms.partition_point(|p| p.pos.x <= x);
    platforms[..end].iter().find(|p| p.hosts_x(x, clearance))
}

fn seed_enemies<R: Rng + ?Sized>(
    rng: &mut R,
    level: &LevelDescriptor,
    width: f32,
    platforms: &[Platform],
    next_id: &mut u32,
) -> Vec<Entity> {
    let count = ENEMY_BASE_COUNT.saturating_add(level.ordinal.saturating_mul(ENEMY_COUNT_PER_ORDINAL));
    let step = width / count as f32;

    let mut enemies = Vec::new();
    for slot in ENEMY_FIRST_SLOT..count {
        // The last `boss_count` slots are bosses
        let is_boss = slot.saturating_add(level.boss_count) >= count;
        let x = slot as f32 * step + rng.random::<f32>() * step * 0.5;
        let Some(plat) = host_platform(platforms, x, ENEMY_EDGE_CLEARANCE) else {
            continue;
        };
        let (kind, hp) = if is_boss {
            (EntityKind::Boss, level.boss_hp.max(1))
        } else if rng.random_bool(HEAVY_CHANCE) {
            (EntityKind::Heavy, 1)
        } else {
            (EntityKind::Standard, 1)
        };
        enemies.push(Entity::enemy(*next_id, kind, x, plat.top(), hp));
        *next_id += 1;
    }
    enemies
}

fn seed_pickups<R: Rng + ?Sized>(
    rng: &mut R,
    level: &LevelDescriptor,
    width: f32,
    platforms: &[Platform],
    next_id: &mut u32,
) -> Vec<Entity> {
    let count = PICKUP_BASE_COUNT.saturating_add(level.ordinal.saturating_mul(PICKUP_COUNT_PER_ORDINAL));
    let span = (width - 2.0 * PICKUP_BUFFER).max(0.0);

    let mut pickups = Vec::new();
    for _ in 0..count {
        let x = PICKUP_BUFFER + rng.random::<f32>() * span;
        if let Some(plat) = host_platform(platforms, x, 0.0) {
            pickups.push(Entity::pickup(*next_id, x, plat.top()));
            *next_id += 1;
        }
    }
    pickups
}
