//! Combat resolution: melee swings, spells, projectiles and kill rewards
//!
//! Hits are collected first and applied afterwards so that a kill (which
//! frees the enemy's pool slot) never invalidates the iteration in progress.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics;
use super::pool::SlotId;
use super::progression;
use super::state::{Body, DamageTarget, Facing, GameEvent, GameState, Projectile, ProjectileKind};
use crate::consts::{MUZZLE_OFFSET, PROJECTILE_SIZE};
use crate::{distance, sign};

const MELEE_BASE_DAMAGE: f32 = 15.0;
const MELEE_DAMAGE_PER_LEVEL: f32 = 2.0;

const LIGHTNING_RADIUS: f32 = 150.0;

const KILL_BASE_EXP: u32 = 20;
const KILL_EXP_PER_LEVEL: u32 = 5;
const KILL_BASE_GOLD: u32 = 5;
/// Gold bonus is rolled in `0..KILL_GOLD_ROLL`
const KILL_GOLD_ROLL: u32 = 10;

/// Floating damage numbers appear this far above the target
const POPUP_RISE: f32 = 20.0;

/// How a volley leaves the caster: one projectile per spread entry,
/// `vel = (facing * speed + spread.x, spread.y)`.
#[derive(Debug, Clone, Copy)]
pub struct ShotPattern {
    pub kind: ProjectileKind,
    pub speed: f32,
    pub spread: &'static [Vec2],
}

pub const FIREBALL_SHOT: ShotPattern = ShotPattern {
    kind: ProjectileKind::Fireball,
    speed: 8.0,
    spread: &[Vec2::ZERO],
};

pub const ICE_SHOT: ShotPattern = ShotPattern {
    kind: ProjectileKind::Ice,
    speed: 6.0,
    spread: &[
        Vec2::new(-2.0, -2.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(2.0, 2.0),
    ],
};

/// Castable spells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spell {
    /// Single fast projectile
    Fireball,
    /// Three-way spread
    Ice,
    /// Instant strike on everything nearby
    Lightning,
}

impl Spell {
    pub fn as_str(&self) -> &'static str {
        match self {
            Spell::Fireball => "fireball",
            Spell::Ice => "ice",
            Spell::Lightning => "lightning",
        }
    }

    /// Accepts spell ids ("fireball") and scroll names ("Fire Scroll")
    pub fn from_name(name: &str) -> Option<Self> {
        const NAMES: [(&str, &str, Spell); 3] = [
            ("fireball", "fire scroll", Spell::Fireball),
            ("ice", "ice scroll", Spell::Ice),
            ("lightning", "lightning scroll", Spell::Lightning),
        ];

        let name = name.trim().to_lowercase();
        NAMES
            .iter()
            .find(|(id, scroll, _)| name == *id || name.contains(scroll))
            .map(|&(_, _, spell)| spell)
    }

    /// Damage at the given caster level
    pub fn damage(&self, level: u32) -> f32 {
        let level = level as f32;
        match self {
            Spell::Fireball => 25.0 + level * 3.0,
            Spell::Ice => 20.0 + level * 2.0,
            Spell::Lightning => 30.0 + level * 4.0,
        }
    }
}

pub fn melee_damage(level: u32) -> f32 {
    MELEE_BASE_DAMAGE + level as f32 * MELEE_DAMAGE_PER_LEVEL
}

/// Apply damage (and optional horizontal knockback) to one enemy.
/// Returns true if the hit killed it.
fn hit_enemy(state: &mut GameState, id: SlotId, damage: f32, knockback: Option<f32>) -> bool {
    let Some(enemy) = state.enemies.get_mut(id) else {
        return false;
    };
    enemy.health -= damage;
    if let Some(vx) = knockback {
        enemy.body.vel.x = vx;
    }
    let pos = enemy.body.pos - Vec2::new(0.0, POPUP_RISE);
    let dead = enemy.is_dead();

    state.emit(GameEvent::Damage {
        pos,
        amount: damage,
        target: DamageTarget::Enemy,
    });

    if dead {
        on_kill(state, id);
    }
    dead
}

/// Swing at every enemy in range on the side the player faces.
/// Returns the number of enemies hit.
pub fn melee_attack(state: &mut GameState) -> usize {
    let origin = state.player.body.pos;
    let facing = state.player.facing.sign();
    let range = state.tuning.attack_range;
    let knockback = state.tuning.knockback_force;
    let damage = melee_damage(state.player.level);

    let targets: Vec<(SlotId, f32)> = state
        .enemies
        .iter()
        .filter_map(|(id, enemy)| {
            let side = sign(enemy.body.pos.x - origin.x);
            (distance(enemy.body.pos, origin) < range && side == facing).then_some((id, side))
        })
        .collect();

    for &(id, side) in &targets {
        hit_enemy(state, id, damage, Some(side * knockback));
    }
    targets.len()
}

/// Launch a volley from `origin`. Returns how many projectiles were created
/// (fewer than the pattern asks for when the pool runs out).
pub fn spawn_projectiles(
    state: &mut GameState,
    origin: Vec2,
    facing: Facing,
    pattern: &ShotPattern,
    damage: f32,
) -> usize {
    let dir = facing.sign();
    let start = origin + Vec2::new(dir * MUZZLE_OFFSET.x, MUZZLE_OFFSET.y);
    let life = state.tuning.projectile_life;

    let mut spawned = 0;
    for offset in pattern.spread {
        let vel = Vec2::new(dir * pattern.speed + offset.x, offset.y);
        let projectile = Projectile {
            body: Body::new(start, PROJECTILE_SIZE).with_vel(vel),
            kind: pattern.kind,
            damage,
            life,
        };
        if state.projectiles.spawn(projectile).is_none() {
            log::warn!("Projectile pool exhausted, {:?} volley cut short", pattern.kind);
            break;
        }
        spawned += 1;
    }
    spawned
}

/// Damage every enemy within `radius` of `origin`, regardless of facing.
/// Returns the number of enemies hit.
pub fn area_effect(state: &mut GameState, origin: Vec2, radius: f32, damage: f32) -> usize {
    let targets: Vec<SlotId> = state
        .enemies
        .iter()
        .filter(|(_, enemy)| distance(enemy.body.pos, origin) < radius)
        .map(|(id, _)| id)
        .collect();

    for &id in &targets {
        hit_enemy(state, id, damage, None);
    }
    targets.len()
}

/// Cast a spell from the player's position. No mana or cooldown checks here;
/// callers gate on those. Returns false if nothing was produced.
pub fn cast_spell(state: &mut GameState, spell: Spell) -> bool {
    let origin = state.player.body.pos;
    let facing = state.player.facing;
    let damage = spell.damage(state.player.level);

    match spell {
        Spell::Fireball => spawn_projectiles(state, origin, facing, &FIREBALL_SHOT, damage) > 0,
        Spell::Ice => spawn_projectiles(state, origin, facing, &ICE_SHOT, damage) > 0,
        Spell::Lightning => {
            area_effect(state, origin, LIGHTNING_RADIUS, damage);
            true
        }
    }
}

/// Move projectiles, expire them, and resolve at most one hit each
pub fn advance_projectiles(state: &mut GameState) {
    let map_width = state.tuning.map_width;
    let knockback = state.tuning.projectile_knockback;

    for id in state.projectiles.ids() {
        let Some(projectile) = state.projectiles.get_mut(id) else {
            continue;
        };
        physics::integrate(&mut projectile.body);
        projectile.life = projectile.life.saturating_sub(1);

        let x = projectile.body.pos.x;
        if projectile.life == 0 || x < 0.0 || x > map_width {
            state.projectiles.release(id);
            continue;
        }

        let rect = projectile.body.rect();
        let damage = projectile.damage;
        let push = sign(projectile.body.vel.x) * knockback;

        // First match wins
        let target = state
            .enemies
            .iter()
            .find(|(_, enemy)| enemy.body.rect().overlaps(&rect))
            .map(|(enemy_id, _)| enemy_id);

        if let Some(enemy_id) = target {
            state.projectiles.release(id);
            hit_enemy(state, enemy_id, damage, Some(push));
        }
    }
}

/// Reward the player for a kill and remove the enemy
pub fn on_kill(state: &mut GameState, id: SlotId) {
    let Some(enemy) = state.enemies.release(id) else {
        return;
    };

    let exp = KILL_BASE_EXP + state.player.level * KILL_EXP_PER_LEVEL;
    let gold = KILL_BASE_GOLD + state.rng.random_range(0..KILL_GOLD_ROLL);

    state.player.gold += gold;
    state.session.enemies_killed += 1;
    state.emit(GameEvent::EnemyKilled {
        pos: enemy.body.pos,
        kind: enemy.kind,
        exp,
        gold,
    });
    log::debug!(
        "{:?} slain ({}/{}), +{} exp +{} gold",
        enemy.kind,
        state.session.enemies_killed,
        state.session.enemies_required,
        exp,
        gold
    );

    progression::grant_experience(state, exp);
}
