//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`], which is owned by
//! the caller and threaded through every system by `&mut`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::Pool;
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Shared physical shape of every moving entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Box extents, fixed per entity kind
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

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Which way the player is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub health: f32,
    pub max_health: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub level: u32,
    pub exp: u32,
    pub exp_next: u32,
    pub gold: u32,
    pub potions: u32,
    /// Ticks until the next melee swing
    pub attack_cooldown: u32,
    /// Ticks until the next spell
    pub magic_cooldown: u32,
    pub grounded: bool,
    /// Swing animation in progress (presentation only)
    pub attacking: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            body: Body::new(PLAYER_SPAWN, PLAYER_SIZE),
            facing: Facing::Right,
            health: 100.0,
            max_health: 100.0,
            mana: 50.0,
            max_mana: 50.0,
            level: 1,
            exp: 0,
            exp_next: 100,
            gold: 0,
            potions: 3,
            attack_cooldown: 0,
            magic_cooldown: 0,
            grounded: false,
            attacking: false,
        }
    }

    /// Put the player back at the level entrance (stats untouched)
    pub fn reset_transform(&mut self) {
        self.body.pos = PLAYER_SPAWN;
        self.body.vel = Vec2::ZERO;
        self.grounded = false;
        self.facing = Facing::Right;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Heal up to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        (self.health - before).max(0.0)
    }

    /// Restore mana up to max mana. Returns the amount actually restored.
    pub fn restore_mana(&mut self, amount: f32) -> f32 {
        let before = self.mana;
        self.mana = (self.mana + amount.max(0.0)).min(self.max_mana);
        (self.mana - before).max(0.0)
    }
}

/// Enemy archetypes (both fight in melee)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Skeleton,
}

/// Enemy behavior. Aggro is one-way: once chasing, never back to patrol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiState {
    /// Walk back and forth around the spawn point
    Patrol {
        center: f32,
        half_range: f32,
        /// -1 or +1
        direction: f32,
    },
    /// Chasing the player
    Aggro,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub health: f32,
    pub max_health: f32,
    pub ai: AiState,
    pub aggro_range: f32,
    pub attack_cooldown: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, kind: EnemyKind, max_health: f32, direction: f32, tuning: &Tuning) -> Self {
        Self {
            body: Body::new(pos, ENEMY_SIZE),
            kind,
            health: max_health,
            max_health,
            ai: AiState::Patrol {
                center: pos.x,
                half_range: tuning.enemy_patrol_range,
                direction,
            },
            aggro_range: tuning.aggro_range,
            attack_cooldown: 0,
        }
    }

    pub fn is_aggro(&self) -> bool {
        matches!(self.ai, AiState::Aggro)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Projectile visuals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Fireball,
    Ice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub kind: ProjectileKind,
    pub damage: f32,
    /// Remaining lifetime in ticks
    pub life: u32,
}

/// A static ledge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
}

impl Platform {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

/// The goal structure at the far end of the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Castle {
    /// Entering this box completes the level
    pub rect: Rect,
    /// Flag marker on the keep
    pub flag: Rect,
}

/// Spawns one enemy the first time the player comes close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTrigger {
    pub pos: Vec2,
    pub spawned: bool,
    /// Horizontal activation distance
    pub trigger_distance: f32,
}

/// Per-level geometry, rebuilt on every level start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelLayout {
    pub platforms: Vec<Platform>,
    pub castle: Option<Castle>,
    pub spawn_triggers: Vec<SpawnTrigger>,
}

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before a level, waiting for the start command
    Waiting,
    /// Simulation running
    Playing,
    /// Castle reached, next level pending
    LevelComplete,
    /// Health hit zero, session reset pending
    PlayerDead,
    /// Every level cleared
    Victory,
}

/// Deferred transition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    AdvanceLevel,
    ResetSession,
}

/// A transition scheduled for a future tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    pub kind: TransitionKind,
    pub due_tick: u64,
}

/// Level session bookkeeping. Written only by progression and the kill handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Dungeon level (1-based)
    pub level: u32,
    pub enemies_required: u32,
    pub enemies_killed: u32,
    pub phase: GamePhase,
    pub level_started: bool,
    /// Castle already reached this level
    pub goal_triggered: bool,
    pub pending: Option<PendingTransition>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            level: 1,
            enemies_required: super::level::enemies_for_level(1),
            enemies_killed: 0,
            phase: GamePhase::Waiting,
            level_started: false,
            goal_triggered: false,
            pending: None,
        }
    }

    /// A deferred transition is in flight
    pub fn transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn enemies_left(&self) -> u32 {
        self.enemies_required.saturating_sub(self.enemies_killed)
    }
}

/// Who took damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageTarget {
    Player,
    Enemy,
}

/// Presentation grouping for events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Damage,
    LevelUp,
    Victory,
    Death,
    Item,
    Progress,
}

/// Something the presentation layer may want to show (floating text, flashes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Damage {
        pos: Vec2,
        amount: f32,
        target: DamageTarget,
    },
    EnemyKilled {
        pos: Vec2,
        kind: EnemyKind,
        exp: u32,
        gold: u32,
    },
    LevelUp {
        pos: Vec2,
        level: u32,
    },
    /// Castle reached
    Victory {
        pos: Vec2,
        level: u32,
    },
    LevelStarted {
        pos: Vec2,
        level: u32,
    },
    CampaignComplete {
        pos: Vec2,
        levels: u32,
    },
    Death {
        pos: Vec2,
    },
    ItemUsed {
        pos: Vec2,
        text: String,
    },
}

impl GameEvent {
    pub fn pos(&self) -> Vec2 {
        match self {
            GameEvent::Damage { pos, .. }
            | GameEvent::EnemyKilled { pos, .. }
            | GameEvent::LevelUp { pos, .. }
            | GameEvent::Victory { pos, .. }
            | GameEvent::LevelStarted { pos, .. }
            | GameEvent::CampaignComplete { pos, .. }
            | GameEvent::Death { pos }
            | GameEvent::ItemUsed { pos, .. } => *pos,
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            GameEvent::Damage { .. } => EventCategory::Damage,
            GameEvent::EnemyKilled { .. } | GameEvent::LevelStarted { .. } => {
                EventCategory::Progress
            }
            GameEvent::LevelUp { .. } => EventCategory::LevelUp,
            GameEvent::Victory { .. } | GameEvent::CampaignComplete { .. } => {
                EventCategory::Victory
            }
            GameEvent::Death { .. } => EventCategory::Death,
            GameEvent::ItemUsed { .. } => EventCategory::Item,
        }
    }

    /// Short floating-text label
    pub fn text(&self) -> String {
        match self {
            GameEvent::Damage { amount, .. } => format!("-{:.0}", amount),
            GameEvent::EnemyKilled { exp, gold, .. } => format!("+{} XP +{} gold", exp, gold),
            GameEvent::LevelUp { level, .. } => format!("LEVEL UP! Level {}", level),
            GameEvent::Victory { level, .. } => format!("VICTORY! Level {} Complete!", level),
            GameEvent::LevelStarted { level, .. } => format!("Dungeon Level {}", level),
            GameEvent::CampaignComplete { levels, .. } => {
                format!("CONGRATULATIONS! You have completed all {} levels!", levels)
            }
            GameEvent::Death { .. } => "YOU DIED! Game Reset...".to_string(),
            GameEvent::ItemUsed { text, .. } => text.clone(),
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Every random roll goes through this
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub session: Session,
    pub player: Player,
    pub enemies: Pool<Enemy>,
    pub projectiles: Pool<Projectile>,
    pub level: LevelLayout,
    /// Events produced since the last drain (not persisted)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            session: Session::new(),
            player: Player::new(),
            enemies: Pool::with_capacity(tuning.max_enemies),
            projectiles: Pool::with_capacity(tuning.max_projectiles),
            level: LevelLayout::default(),
            events: Vec::new(),
            tuning,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand all pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every level-scoped entity and all geometry
    pub fn clear_level(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.level = LevelLayout::default();
    }
}
