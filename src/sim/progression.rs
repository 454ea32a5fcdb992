//! Level lifecycle, experience and death handling
//!
//! ```text
//! Waiting --start--> Playing --castle--> LevelComplete --delay--> Playing (level + 1)
//!                                                      \--delay--> Victory (past the last level)
//! any --health <= 0--> PlayerDead --delay--> Waiting (fresh session)
//! ```
//!
//! Delayed steps are stored as a deadline on the session and fired from
//! [`process_transitions`] at the top of a tick. A deadline whose phase no
//! longer matches when it comes due is dropped.

use super::level;
use super::state::{
    GameEvent, GamePhase, GameState, PendingTransition, Player, Session, TransitionKind,
};

const EXP_GROWTH: f32 = 1.5;
const LEVEL_UP_HEALTH: f32 = 20.0;
const LEVEL_UP_MANA: f32 = 10.0;
const LEVEL_UP_POTIONS: u32 = 2;

/// Start the current level from `Waiting`. Any other phase is ignored.
pub fn start_level(state: &mut GameState) -> bool {
    if state.session.phase != GamePhase::Waiting {
        log::debug!("Start ignored in {:?}", state.session.phase);
        return false;
    }
    begin_level(state);
    true
}

/// Shared start sequence for a fresh start and an auto-advance
fn begin_level(state: &mut GameState) {
    state.player.reset_transform();
    state.clear_level();

    let session = &mut state.session;
    session.phase = GamePhase::Playing;
    session.level_started = true;
    session.enemies_killed = 0;
    session.goal_triggered = false;

    level::build_level(state);
    log::info!(
        "Level {} started ({} enemies)",
        state.session.level,
        state.session.enemies_required
    );
}

fn schedule(state: &mut GameState, kind: TransitionKind) {
    let delay = match kind {
        TransitionKind::AdvanceLevel => state.tuning.advance_delay_ticks,
        TransitionKind::ResetSession => state.tuning.reset_delay_ticks,
    };
    state.session.pending = Some(PendingTransition {
        kind,
        due_tick: state.time_ticks + delay,
    });
}

/// Complete the level if the player is inside the castle. Fires at most once
/// per level no matter how often it is called.
pub fn check_goal(state: &mut GameState) -> bool {
    if state.session.phase != GamePhase::Playing || state.session.goal_triggered {
        return false;
    }
    let Some(castle) = &state.level.castle else {
        return false;
    };
    if !state.player.body.rect().overlaps(&castle.rect) {
        return false;
    }

    state.session.goal_triggered = true;
    state.session.phase = GamePhase::LevelComplete;
    schedule(state, TransitionKind::AdvanceLevel);
    state.emit(GameEvent::Victory {
        pos: state.player.body.pos,
        level: state.session.level,
    });
    log::info!("Level {} complete", state.session.level);
    true
}

/// Enter the death path. Only the first call per death has any effect.
pub fn on_player_death(state: &mut GameState) -> bool {
    if state.session.phase == GamePhase::PlayerDead || !state.player.is_dead() {
        return false;
    }

    state.session.phase = GamePhase::PlayerDead;
    // Supersedes a pending level advance
    schedule(state, TransitionKind::ResetSession);
    state.emit(GameEvent::Death {
        pos: state.player.body.pos,
    });
    log::info!("Player died on level {}", state.session.level);
    true
}

/// Fire the pending transition if its deadline has passed
pub fn process_transitions(state: &mut GameState) {
    let Some(pending) = state.session.pending else {
        return;
    };
    if state.time_ticks < pending.due_tick {
        return;
    }
    state.session.pending = None;

    match (pending.kind, state.session.phase) {
        (TransitionKind::AdvanceLevel, GamePhase::LevelComplete) => advance_level(state),
        (TransitionKind::ResetSession, GamePhase::PlayerDead) => reset_session(state),
        (kind, phase) => log::debug!("Dropped stale {:?} transition in {:?}", kind, phase),
    }
}

fn advance_level(state: &mut GameState) {
    state.session.level += 1;
    state.clear_level();
    state.session.level_started = false;

    let level = state.session.level;
    let pos = state.player.body.pos;

    if level > state.tuning.max_level {
        state.session.phase = GamePhase::Victory;
        state.emit(GameEvent::CampaignComplete {
            pos,
            levels: state.tuning.max_level,
        });
        log::info!("All {} levels cleared", state.tuning.max_level);
        return;
    }

    state.session.enemies_required = level::enemies_for_level(level);
    state.emit(GameEvent::LevelStarted { pos, level });
    begin_level(state);
}

/// Back to a brand new session at level 1
pub fn reset_session(state: &mut GameState) {
    state.player = Player::new();
    state.session = Session::new();
    state.clear_level();
    log::info!("Session reset");
}

/// Add experience and apply every level-up it pays for. Returns the number
/// of levels gained.
pub fn grant_experience(state: &mut GameState, amount: u32) -> u32 {
    let player = &mut state.player;
    player.exp += amount;

    let mut gained = 0;
    while player.exp >= player.exp_next {
        player.level += 1;
        player.exp -= player.exp_next;
        player.exp_next = ((player.exp_next as f32 * EXP_GROWTH).floor() as u32).max(1);
        player.max_health += LEVEL_UP_HEALTH;
        player.health = player.max_health;
        player.max_mana += LEVEL_UP_MANA;
        player.mana = player.max_mana;
        player.potions += LEVEL_UP_POTIONS;
        gained += 1;
    }

    let top = state.player.level;
    let pos = state.player.body.pos;
    for level in (top + 1 - gained)..=top {
        state.emit(GameEvent::LevelUp { pos, level });
        log::info!("Level up! Now level {}", level);
    }
    gained
}
