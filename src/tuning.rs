//! Data-driven game balance
//!
//! Every feel/balance number the simulation reads lives here so a mission
//! can be retuned from a JSON file without touching code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::NOMINAL_TICK_HZ;
use crate::ms_to_ticks;

/// Why a tuning file was rejected
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "tuning is not valid JSON: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning value `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Balance values, all per nominal tick unless noted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ticks per second the tick math assumes
    pub tick_hz: f32,

    // === Movement ===
    pub gravity: f32,
    pub move_speed: f32,
    /// Horizontal velocity multiplier when no direction is held
    pub friction: f32,
    /// Terminal fall speed (None = unbounded)
    pub max_fall_speed: Option<f32>,

    // === Jumping ===
    /// Upward impulse of a single jump (negative is up)
    pub jump_force: f32,
    pub max_jumps: u32,
    /// Max gap between taps that still counts as the same combo
    pub jump_tap_window_ms: u64,
    /// Extra jump force per tap beyond the first
    pub jump_combo_boost: f32,
    /// Combo length that starts a flip
    pub flip_min_taps: u32,
    /// Flip spin in radians per tick
    pub flip_spin: f32,

    // === Platforms ===
    /// Depth below a rooftop surface that still snaps the player onto it
    pub landing_tolerance: f32,
    /// Falling this far below the viewport bottom is fatal
    pub fall_death_margin: f32,

    // === Player combat ===
    pub player_max_hp: i32,
    pub player_attack_ticks: u32,
    /// Half-extent of the square sword reach around the player center
    pub player_attack_reach: f32,
    pub invuln_ticks: u32,
    pub knockback: f32,

    // === Enemies ===
    pub enemy_damage: i32,
    pub heavy_damage: i32,
    pub boss_damage: i32,
    pub sense_radius: f32,
    /// Player bottom this far above an enemy's head hides them from sensing
    pub high_margin: f32,
    pub attack_range: f32,
    pub windup_ticks: u32,
    pub melee_reach_x: f32,
    pub melee_reach_y: f32,
    pub chase_accel: f32,
    pub max_chase_multiplier: f32,
    pub chase_base_speed: f32,
    pub patrol_speed: f32,

    // === Lifecycle ===
    pub pickup_reach: f32,
    pub heal_amount: i32,
    /// How long a corpse lingers before removal (wall-clock at nominal rate)
    pub corpse_grace_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_hz: NOMINAL_TICK_HZ,

            gravity: 0.6,
            move_speed: 5.5,
            friction: 0.8,
            max_fall_speed: None,

            jump_force: -12.0,
            max_jumps: 4,
            jump_tap_window_ms: 350,
            jump_combo_boost: 0.08,
            flip_min_taps: 3,
            flip_spin: 0.35,

            landing_tolerance: 40.0,
            fall_death_margin: 1000.0,

            player_max_hp: 100,
            player_attack_ticks: 15,
            player_attack_reach: 85.0,
            invuln_ticks: 45,
            knockback: 10.0,

            enemy_damage: 20,
            heavy_damage: 34,
            boss_damage: 40,
            sense_radius: 180.0,
            high_margin: 40.0,
            attack_range: 60.0,
            windup_ticks: 15,
            melee_reach_x: 55.0,
            melee_reach_y: 60.0,
            chase_accel: 0.05,
            max_chase_multiplier: 4.0,
            chase_base_speed: 1.0,
            patrol_speed: 1.4,

            pickup_reach: 45.0,
            heal_amount: 20,
            corpse_grace_ms: 3000,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} Hz nominal)", tuning.tick_hz);
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            log::warn!("Rejecting tuning: {field} {reason}");
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.tick_hz > 0.0) {
            return invalid("tick_hz", "must be positive");
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return invalid("friction", "must be strictly between 0 and 1");
        }
        if !(self.jump_force < 0.0) {
            return invalid("jump_force", "must be negative (upward)");
        }
        if self.max_jumps == 0 {
            return invalid("max_jumps", "must allow at least one jump");
        }
        if self.player_attack_ticks == 0 {
            return invalid("player_attack_ticks", "must be at least one tick");
        }
        if self.windup_ticks == 0 {
            return invalid("windup_ticks", "must be at least one tick");
        }
        if self.invuln_ticks == 0 {
            return invalid("invuln_ticks", "must be at least one tick");
        }
        if self.player_max_hp <= 0 {
            return invalid("player_max_hp", "must be positive");
        }
        if !(self.max_chase_multiplier >= 1.0) {
            return invalid("max_chase_multiplier", "must be at least 1.0");
        }
        if let Some(cap) = self.max_fall_speed
            && !(cap > 0.0)
        {
            return invalid("max_fall_speed", "must be positive when set");
        }
        Ok(())
    }

    /// Corpse grace converted to ticks at the nominal rate
    pub fn corpse_grace_ticks(&self) -> u32 {
        ms_to_ticks(self.corpse_grace_ms, self.tick_hz)
    }

    /// Jump impulse for the given combo position (1-based)
    pub fn jump_impulse(&self, taps: u32) -> f32 {
        self.jump_force * (1.0 + taps.saturating_sub(1) as f32 * self.jump_combo_boost)
    }
}
