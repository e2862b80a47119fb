//! Mission descriptors
//!
//! A `LevelDescriptor` is immutable per attempt and drives world sizing.

use serde::{Deserialize, Serialize};

/// Bounds applied by `sanitized`; the campaign sits well inside them
pub const MAX_ORDINAL: u32 = 50;
pub const MAX_TARGET_ENEMIES: u32 = 10_000;
pub const MAX_BOSSES: u32 = 100;

/// Per-mission configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// 1-based mission number
    pub ordinal: u32,
    /// Kills required besides bosses
    pub target_enemies: u32,
    pub boss_count: u32,
    /// Hit points each boss starts with
    pub boss_hp: i32,
    /// Heart spawn density; informational only, pickup count scales with ordinal
    pub pickup_density: f32,
}

impl LevelDescriptor {
    pub const fn new(
        ordinal: u32,
        target_enemies: u32,
        boss_count: u32,
        boss_hp: i32,
        pickup_density: f32,
    ) -> Self {
        Self {
            ordinal,
            target_enemies,
            boss_count,
            boss_hp,
            pickup_density,
        }
    }

    /// Kills needed to clear the mission
    pub fn kill_target(&self) -> u32 {
        self.target_enemies.saturating_add(self.boss_count)
    }

    /// Repair degenerate values so the level can always be generated and cleared
    pub fn sanitized(mut self) -> Self {
        if self.ordinal > MAX_ORDINAL
            || self.target_enemies > MAX_TARGET_ENEMIES
            || self.boss_count > MAX_BOSSES
        {
            log::warn!(
                "Mission {}: clamping ordinal/targets/bosses to {}/{}/{}",
                self.ordinal,
                MAX_ORDINAL,
                MAX_TARGET_ENEMIES,
                MAX_BOSSES
            );
            self.ordinal = self.ordinal.min(MAX_ORDINAL);
            self.target_enemies = self.target_enemies.min(MAX_TARGET_ENEMIES);
            self.boss_count = self.boss_count.min(MAX_BOSSES);
        }
        if self.boss_count > 0 && self.boss_hp <= 0 {
            log::warn!(
                "Mission {}: boss hp {} raised to 1",
                self.ordinal,
                self.boss_hp
            );
            self.boss_hp = 1;
        }
        self.pickup_density = self.pickup_density.clamp(0.0, 1.0);
        self
    }
}

/// The five missions of the campaign
pub const CAMPAIGN: [LevelDescriptor; 5] = [
    LevelDescriptor::new(1, 5, 0, 0, 0.15),
    LevelDescriptor::new(2, 10, 0, 0, 0.2),
    LevelDescriptor::new(3, 15, 0, 0, 0.25),
    LevelDescriptor::new(4, 20, 1, 5, 0.4),
    LevelDescriptor::new(5, 25, 2, 5, 0.5),
];
