//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. Loaded from JSON;
//! missing fields fall back to the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading tuning data.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance and world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative = up)
    pub jump_force: f32,
    /// Horizontal damping applied to enemies every tick
    pub friction: f32,

    // === World ===
    /// Level width in pixels
    pub map_width: f32,
    /// Y coordinate of the ground line
    pub ground_y: f32,

    // === Player ===
    pub player_speed: f32,
    /// Horizontal damping when no direction is held
    pub player_idle_damping: f32,
    pub attack_range: f32,
    pub attack_cooldown: u32,
    pub magic_cost: f32,
    pub magic_cooldown: u32,
    pub mana_regen: f32,
    pub potion_heal: f32,
    pub knockback_force: f32,

    // === Projectiles ===
    pub projectile_life: u32,
    pub projectile_knockback: f32,

    // === Enemies ===
    pub enemy_chase_speed: f32,
    pub enemy_patrol_speed: f32,
    pub enemy_patrol_range: f32,
    pub aggro_range: f32,
    pub aggro_vertical_range: f32,
    /// Aggro enemies stop chasing inside this horizontal distance
    pub chase_standoff: f32,
    pub enemy_attack_range: f32,
    pub enemy_attack_cooldown: u32,
    pub enemy_damage: f32,

    // === Spawning / progression ===
    pub spawn_distance: f32,
    pub max_enemies: usize,
    pub max_projectiles: usize,
    /// Castle reached -> next level starts (ticks)
    pub advance_delay_ticks: u64,
    /// Death -> session reset (ticks)
    pub reset_delay_ticks: u64,
    /// Final dungeon level
    pub max_level: u32,

    // === Scheduler ===
    pub target_fps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_force: -12.0,
            friction: 0.9,

            map_width: 2000.0,
            ground_y: 400.0,

            player_speed: 5.0,
            player_idle_damping: 0.8,
            attack_range: 60.0,
            attack_cooldown: 30,
            magic_cost: 10.0,
            magic_cooldown: 60,
            mana_regen: 0.1,
            potion_heal: 30.0,
            knockback_force: 3.0,

            projectile_life: 120,
            projectile_knockback: 4.0,

            enemy_chase_speed: 1.2,
            enemy_patrol_speed: 0.5,
            enemy_patrol_range: 50.0,
            aggro_range: 100.0,
            aggro_vertical_range: 100.0,
            chase_standoff: 40.0,
            enemy_attack_range: 45.0,
            enemy_attack_cooldown: 90,
            enemy_damage: 10.0,

            spawn_distance: 200.0,
            max_enemies: 20,
            max_projectiles: 50,
            advance_delay_ticks: 4 * 60,
            reset_delay_ticks: 2 * 60,
            max_level: 100,

            target_fps: 60,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(TuningError::Invalid {
                field: "friction",
                reason: "must be in (0, 1]",
            });
        }
        if self.map_width <= 0.0 {
            return Err(TuningError::Invalid {
                field: "map_width",
                reason: "must be positive",
            });
        }
        if self.target_fps == 0 {
            return Err(TuningError::Invalid {
                field: "target_fps",
                reason: "must be at least 1",
            });
        }
        if self.max_enemies == 0 || self.max_projectiles == 0 {
            return Err(TuningError::Invalid {
                field: "max_enemies/max_projectiles",
                reason: "pools need at least one slot",
            });
        }
        if self.max_level == 0 {
            return Err(TuningError::Invalid {
                field: "max_level",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Seconds per scheduler frame
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}
