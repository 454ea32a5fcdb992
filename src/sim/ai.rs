//! Enemy behaviour: patrol until the player comes close, then chase and strike

use super::physics;
use super::progression;
use super::state::{AiState, DamageTarget, Enemy, GameEvent, GamePhase, GameState};
use crate::{distance, sign};

/// Per-tick AI parameters pulled out of the tuning table
struct Steering {
    patrol_speed: f32,
    chase_speed: f32,
    standoff: f32,
    idle_damping: f32,
}

/// Run physics, aggro detection, movement and attacks for every live enemy
pub fn update_enemies(state: &mut GameState) {
    let t = &state.tuning;
    let (gravity, friction, ground_y, map_width) = (t.gravity, t.friction, t.ground_y, t.map_width);
    let aggro_vertical = t.aggro_vertical_range;
    let (attack_range, attack_cooldown) = (t.enemy_attack_range, t.enemy_attack_cooldown);
    let steering = Steering {
        patrol_speed: t.enemy_patrol_speed,
        chase_speed: t.enemy_chase_speed,
        standoff: t.chase_standoff,
        idle_damping: t.player_idle_damping,
    };
    let player_pos = state.player.body.pos;

    for id in state.enemies.ids() {
        let Some(enemy) = state.enemies.get_mut(id) else {
            continue;
        };

        physics::apply_gravity(&mut enemy.body, gravity);
        physics::integrate(&mut enemy.body);
        physics::resolve_terrain(&mut enemy.body, ground_y, &state.level.platforms);
        physics::clamp_to_world_bounds(&mut enemy.body, map_width);

        let dx = player_pos.x - enemy.body.pos.x;
        let dy = player_pos.y - enemy.body.pos.y;
        if !enemy.is_aggro() && dx.abs() < enemy.aggro_range && dy.abs() < aggro_vertical {
            enemy.ai = AiState::Aggro;
            log::debug!("{:?} #{} noticed the player", enemy.kind, id);
        }

        steer(enemy, dx, &steering);
        physics::apply_friction(&mut enemy.body, friction);

        let strikes =
            enemy.attack_cooldown == 0 && distance(player_pos, enemy.body.pos) < attack_range;
        if strikes {
            enemy.attack_cooldown = attack_cooldown;
        }
        enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);

        if strikes {
            let enemy_x = enemy.body.pos.x;
            strike_player(state, enemy_x);
        }
    }
}

fn steer(enemy: &mut Enemy, dx: f32, s: &Steering) {
    let x = enemy.body.pos.x;
    match &mut enemy.ai {
        AiState::Aggro => {
            if dx.abs() > s.standoff {
                enemy.body.vel.x = sign(dx) * s.chase_speed;
            } else {
                // Close enough to fight, just slow down
                enemy.body.vel.x *= s.idle_damping;
            }
        }
        AiState::Patrol {
            center,
            half_range,
            direction,
        } => {
            let offset = x - *center;
            if offset.abs() > *half_range {
                // Always turn back toward the center so the edge can't trap us
                *direction = -sign(offset);
            }
            enemy.body.vel.x = *direction * s.patrol_speed;
        }
    }
}

fn strike_player(state: &mut GameState, enemy_x: f32) {
    if state.session.phase != GamePhase::Playing {
        return;
    }
    let damage = state.tuning.enemy_damage;
    let player = &mut state.player;
    player.health -= damage;
    player.body.vel.x = sign(player.body.pos.x - enemy_x) * state.tuning.knockback_force;

    let pos = player.body.pos;
    state.emit(GameEvent::Damage {
        pos,
        amount: damage,
        target: DamageTarget::Player,
    });

    if state.player.is_dead() {
        progression::on_player_death(state);
    }
}
