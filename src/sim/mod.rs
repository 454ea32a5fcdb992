//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod ai;
pub mod combat;
pub mod items;
pub mod level;
pub mod physics;
pub mod pool;
pub mod progression;
pub mod rect;
pub mod state;
pub mod tick;

pub use combat::Spell;
pub use items::{apply_heal, apply_resource_restore, cast_by_name, use_item};
pub use pool::{Pool, SlotId};
pub use rect::Rect;
pub use state::{
    AiState, Body, Castle, DamageTarget, Enemy, EnemyKind, EventCategory, Facing, GameEvent,
    GamePhase, GameState, LevelLayout, Platform, Player, Projectile, ProjectileKind, Session,
    SpawnTrigger,
};
pub use tick::{TickInput, tick};
