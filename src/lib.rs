//! Medieval RPG - A side-scrolling action RPG core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, AI, level progression)
//! - `game`: Fixed timestep scheduler driving input -> update -> present
//! - `platform`: Input source / presentation sink contracts
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use game::{FixedStep, Game};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Box extents per entity kind (never mutated after creation)
    pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 50.0);
    pub const ENEMY_SIZE: Vec2 = Vec2::new(35.0, 40.0);
    pub const PROJECTILE_SIZE: Vec2 = Vec2::new(10.0, 10.0);

    /// Where the player is placed at the start of every level
    pub const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 300.0);

    /// Projectiles leave the caster this far ahead, this far below its top edge
    pub const MUZZLE_OFFSET: Vec2 = Vec2::new(20.0, 10.0);
}

/// Clamp without panicking on an inverted range (min wins)
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Uniform sample in `[min, max)`; an empty range yields `min`
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// -1, 0 or 1
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
