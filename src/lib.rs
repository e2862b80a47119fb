//! Rooftop Ronin - A side-scrolling rooftop brawler
//!
//! Core modules:
//! - `sim`: Simulation engine (world generation, physics, collisions, AI, combat)
//! - `tuning`: Data-driven game balance
//! - `levels`: Mission descriptors and the campaign table
//! - `session`: Menu / playing / result flow around a single `World`
//! - `render`: Per-entity render snapshot for an external renderer

pub mod levels;
pub mod render;
pub mod session;
pub mod sim;
pub mod tuning;

pub use levels::{CAMPAIGN, LevelDescriptor};
pub use session::{MissionReport, Phase, Session};
pub use tuning::{Tuning, TuningError};

/// Fixed geometry and generation constants
pub mod consts {
    use glam::Vec2;

    /// Nominal simulation rate (one tick per display refresh)
    pub const NOMINAL_TICK_HZ: f32 = 60.0;

    /// Player bounding box
    pub const PLAYER_WIDTH: f32 = 35.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Player spawn, measured from the left edge and the viewport bottom
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_FROM_BOTTOM: f32 = 300.0;

    /// Enemy bounding boxes
    pub const ENEMY_WIDTH: f32 = 35.0;
    pub const ENEMY_HEIGHT: f32 = 60.0;
    pub const BOSS_WIDTH: f32 = 45.0;
    pub const BOSS_HEIGHT: f32 = 80.0;

    /// Heart pickup box and hover height above its rooftop
    pub const PICKUP_SIZE: f32 = 25.0;
    pub const PICKUP_HOVER: f32 = 75.0;

    /// Level width = base + ordinal * per-level
    pub const LEVEL_BASE_WIDTH: f32 = 15000.0;
    pub const LEVEL_WIDTH_PER_ORDINAL: f32 = 3000.0;

    /// Starting rooftop
    pub const START_ROOF_WIDTH: f32 = 800.0;
    pub const START_ROOF_HEIGHT: f32 = 250.0;
    pub const START_ROOF_GAP: f32 = 50.0;

    /// Rooftop footprint (height is a fraction of the viewport)
    pub const ROOF_MIN_WIDTH: f32 = 300.0;
    pub const ROOF_WIDTH_SPREAD: f32 = 400.0;
    pub const ROOF_MIN_HEIGHT_FRAC: f32 = 0.2;
    pub const ROOF_MAX_HEIGHT_FRAC: f32 = 0.45;

    /// Trees are narrow obstacles
    pub const TREE_CHANCE: f64 = 0.05;
    pub const TREE_WIDTH: f32 = 60.0;
    pub const TREE_MIN_HEIGHT: f32 = 180.0;
    pub const TREE_HEIGHT_SPREAD: f32 = 50.0;

    /// Horizontal gap between consecutive platforms
    pub const GAP_MIN: f32 = 120.0;
    pub const GAP_SPREAD: f32 = 80.0;

    /// Window grid on rooftops
    pub const WINDOW_MARGIN_X: f32 = 30.0;
    pub const WINDOW_MARGIN_TOP: f32 = 50.0;
    pub const WINDOW_MARGIN_BOTTOM: f32 = 40.0;
    pub const WINDOW_STEP_X: f32 = 45.0;
    pub const WINDOW_STEP_Y: f32 = 65.0;
    pub const WINDOW_LIT_CHANCE: f64 = 0.3;
    pub const WINDOW_SIZE: Vec2 = Vec2::new(16.0, 24.0);

    /// Enemy seeding
    pub const ENEMY_BASE_COUNT: u32 = 60;
    pub const ENEMY_COUNT_PER_ORDINAL: u32 = 10;
    /// The first slots are left empty so the spawn rooftop is quiet
    pub const ENEMY_FIRST_SLOT: u32 = 2;
    /// Enemies need this much rooftop to their right
    pub const ENEMY_EDGE_CLEARANCE: f32 = 50.0;
    pub const HEAVY_CHANCE: f64 = 0.3;

    /// Pickup seeding
    pub const PICKUP_BASE_COUNT: u32 = 20;
    pub const PICKUP_COUNT_PER_ORDINAL: u32 = 5;
    /// Pickups stay out of the first and last stretch of the level
    pub const PICKUP_BUFFER: f32 = 1000.0;

    /// Camera easing factors per tick
    pub const CAMERA_EASE_X: f32 = 0.1;
    pub const CAMERA_EASE_Y: f32 = 0.05;
    pub const CAMERA_LEAD_FRAC: f32 = 1.0 / 3.0;
    pub const CAMERA_TARGET_Y_FRAC: f32 = 0.4;

    /// Walking animation speed (phase per unit of horizontal speed)
    pub const ANIM_RATE: f32 = 0.15;
}

/// Convert a wall-clock duration into whole ticks at the given rate
#[inline]
pub fn ms_to_ticks(ms: u32, tick_hz: f32) -> u32 {
    (ms as f32 * tick_hz / 1000.0).round() as u32
}

/// Convert a tick count into milliseconds at the given rate
#[inline]
pub fn ticks_to_ms(ticks: u64, tick_hz: f32) -> u64 {
    (ticks as f64 * 1000.0 / tick_hz as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpse_grace_in_ticks() {
        assert_eq!(ms_to_ticks(3000, consts::NOMINAL_TICK_HZ), 180);
        assert_eq!(ms_to_ticks(0, consts::NOMINAL_TICK_HZ), 0);
    }

    #[test]
    fn test_ticks_to_ms() {
        assert_eq!(ticks_to_ms(60, 60.0), 1000);
        assert_eq!(ticks_to_ms(21, 60.0), 350);
    }
}
