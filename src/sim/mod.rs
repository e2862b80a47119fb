//! Simulation module
//!
//! All gameplay logic lives here. Everything is in-memory arithmetic:
//! - Fixed nominal timestep (tick counts, never wall-clock)
//! - Randomness only at world generation, through an injected RNG
//! - No rendering or platform dependencies

pub mod ai;
pub mod autopilot;
pub mod collision;
pub mod combat;
pub mod lifecycle;
pub mod physics;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use ai::{Sensing, sense};
pub use collision::{platform_under, resolve_landing};
pub use physics::Direction;
pub use state::{
    Action, AiState, Attack, AttackKind, Body, DefeatCause, Entity, EntityKind, GameEvent, Motion,
    Outcome, Platform, PlatformKind, Player, Window, World,
};
pub use tick::{TickInput, tick};
pub use worldgen::{Layout, generate_world, level_width};
