//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. All velocities
//! are in pixels per tick, so the pass takes no `dt`.

use super::state::{Facing, GamePhase, GameState};
use super::{ai, combat, items, level, physics, progression};

/// The swing pose is shown while the cooldown is above this
const SWING_VISIBLE_ABOVE: u32 = 20;

/// Input intents for a single tick (deterministic).
///
/// Intents may stay asserted across ticks (held keys); the tick itself does
/// all cooldown and resource gating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Melee swing
    pub attack: bool,
    /// Fireball
    pub cast_spell: bool,
    pub drink_potion: bool,
    /// Start the level (only honoured while waiting)
    pub start: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    // Deadlines first so a due reset wins over this tick's input
    progression::process_transitions(state);

    if input.start {
        progression::start_level(state);
    }

    if state.session.phase == GamePhase::Playing {
        apply_player_input(state, input);
    }

    // Player physics runs in every phase
    update_player_physics(state);

    if state.session.phase != GamePhase::Playing {
        return;
    }

    level::check_spawning(state);
    ai::update_enemies(state);

    // An enemy may have just killed the player
    if state.session.phase != GamePhase::Playing {
        return;
    }

    combat::advance_projectiles(state);
    progression::check_goal(state);
    update_player_timers(state);
}

fn apply_player_input(state: &mut GameState, input: &TickInput) {
    let t = &state.tuning;
    let (speed, damping, jump_force) = (t.player_speed, t.player_idle_damping, t.jump_force);
    let (attack_cooldown, magic_cost, magic_cooldown) =
        (t.attack_cooldown, t.magic_cost, t.magic_cooldown);

    let player = &mut state.player;

    if input.move_left {
        player.body.vel.x = -speed;
        player.facing = Facing::Left;
    } else if input.move_right {
        player.body.vel.x = speed;
        player.facing = Facing::Right;
    } else {
        player.body.vel.x *= damping;
    }

    if input.jump && player.grounded {
        player.body.vel.y = jump_force;
        player.grounded = false;
    }

    if input.attack && state.player.attack_cooldown == 0 {
        state.player.attack_cooldown = attack_cooldown;
        state.player.attacking = true;
        combat::melee_attack(state);
    }

    // Nothing is spent unless the fireball has a free slot to fly in
    if input.cast_spell
        && state.player.magic_cooldown == 0
        && state.player.mana >= magic_cost
        && !state.projectiles.is_full()
    {
        state.player.mana -= magic_cost;
        state.player.magic_cooldown = magic_cooldown;
        combat::cast_spell(state, combat::Spell::Fireball);
    }

    if input.drink_potion {
        items::drink_potion(state);
    }
}

fn update_player_physics(state: &mut GameState) {
    let t = &state.tuning;
    let (gravity, ground_y, map_width) = (t.gravity, t.ground_y, t.map_width);
    let player = &mut state.player;

    physics::apply_gravity(&mut player.body, gravity);
    physics::integrate(&mut player.body);
    physics::clamp_to_world_bounds(&mut player.body, map_width);
    player.grounded = physics::resolve_terrain(&mut player.body, ground_y, &state.level.platforms);
}

fn update_player_timers(state: &mut GameState) {
    let regen = state.tuning.mana_regen;
    let player = &mut state.player;

    player.attack_cooldown = player.attack_cooldown.saturating_sub(1);
    player.magic_cooldown = player.magic_cooldown.saturating_sub(1);
    player.attacking = player.attack_cooldown > SWING_VISIBLE_ABOVE;
    player.restore_mana(regen);
}
