//! Level layout and proximity-triggered enemy spawning

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{Castle, Enemy, EnemyKind, GamePhase, GameState, Platform, SpawnTrigger};
use crate::{clamp, random_range};

/// Stone ledges as (x, height above ground, width)
const LEDGES: [(f32, f32, f32); 6] = [
    (400.0, 120.0, 120.0),
    (600.0, 180.0, 100.0),
    (800.0, 140.0, 140.0),
    (1100.0, 200.0, 120.0),
    (1400.0, 160.0, 100.0),
    (1700.0, 220.0, 150.0),
];
const LEDGE_THICKNESS: f32 = 20.0;

const CASTLE_SIZE: f32 = 300.0;

/// Triggers are spread over `[SPAWN_MIN_X, map_width - SPAWN_END_MARGIN]`
const SPAWN_MIN_X: f32 = 300.0;
const SPAWN_END_MARGIN: f32 = 400.0;
const SPAWN_JITTER: f32 = 50.0;

/// Enemies per level grow every other level, capped
const BASE_ENEMIES: u32 = 5;
const MAX_ENEMIES_PER_LEVEL: u32 = 10;

/// Enemy health grows with dungeon level
const ENEMY_BASE_HEALTH: f32 = 50.0;
const ENEMY_HEALTH_PER_LEVEL: f32 = 15.0;

pub fn enemies_for_level(level: u32) -> u32 {
    (BASE_ENEMIES + level / 2).min(MAX_ENEMIES_PER_LEVEL)
}

pub fn build_platforms(ground_y: f32) -> Vec<Platform> {
    LEDGES
        .iter()
        .map(|&(x, height, w)| Platform::new(Rect::new(x, ground_y - height, w, LEDGE_THICKNESS)))
        .collect()
}

pub fn build_castle(map_width: f32, ground_y: f32) -> Castle {
    Castle {
        rect: Rect::new(
            map_width - CASTLE_SIZE,
            ground_y - CASTLE_SIZE,
            CASTLE_SIZE,
            CASTLE_SIZE,
        ),
        flag: Rect::new(map_width - 150.0, ground_y - 350.0, 20.0, 30.0),
    }
}

/// Evenly spaced triggers with a little random jitter
pub fn build_spawn_triggers<R: Rng + ?Sized>(
    rng: &mut R,
    count: u32,
    map_width: f32,
    ground_y: f32,
    trigger_distance: f32,
) -> Vec<SpawnTrigger> {
    let min_x = SPAWN_MIN_X;
    let max_x = map_width - SPAWN_END_MARGIN;
    let spacing = (max_x - min_x) / count.max(1) as f32;

    (0..count)
        .map(|i| {
            let base_x = min_x + i as f32 * spacing;
            let jitter = random_range(rng, -SPAWN_JITTER, SPAWN_JITTER);
            SpawnTrigger {
                pos: Vec2::new(clamp(base_x + jitter, min_x, max_x), ground_y - 40.0),
                spawned: false,
                trigger_distance,
            }
        })
        .collect()
}

/// Rebuild platforms, castle and spawn triggers for the current level
pub fn build_level(state: &mut GameState) {
    let t = &state.tuning;
    let (map_width, ground_y, spawn_distance) = (t.map_width, t.ground_y, t.spawn_distance);
    let count = state.session.enemies_required;

    state.level.platforms = build_platforms(ground_y);
    state.level.castle = Some(build_castle(map_width, ground_y));
    state.level.spawn_triggers =
        build_spawn_triggers(&mut state.rng, count, map_width, ground_y, spawn_distance);

    log::debug!(
        "Level {} built: {} platforms, {} spawn triggers",
        state.session.level,
        state.level.platforms.len(),
        state.level.spawn_triggers.len()
    );
}

/// Create one enemy at `pos`, scaled to the current dungeon level
pub fn spawn_enemy(state: &mut GameState, pos: Vec2) -> bool {
    let kind = if state.rng.random_bool(0.5) {
        EnemyKind::Goblin
    } else {
        EnemyKind::Skeleton
    };
    let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let max_health = ENEMY_BASE_HEALTH + state.session.level as f32 * ENEMY_HEALTH_PER_LEVEL;
    let enemy = Enemy::new(pos, kind, max_health, direction, &state.tuning);

    match state.enemies.spawn(enemy) {
        Some(id) => {
            log::debug!("Spawned {:?} #{} at x={:.0}", kind, id, pos.x);
            true
        }
        None => {
            log::warn!("Enemy pool exhausted, spawn at x={:.0} skipped", pos.x);
            false
        }
    }
}

/// Fire every untriggered spawn point the player is close enough to
pub fn check_spawning(state: &mut GameState) {
    if !state.session.level_started || state.session.phase != GamePhase::Playing {
        return;
    }

    let player_x = state.player.body.pos.x;
    for i in 0..state.level.spawn_triggers.len() {
        let trigger = &state.level.spawn_triggers[i];
        if trigger.spawned || (player_x - trigger.pos.x).abs() >= trigger.trigger_distance {
            continue;
        }
        let pos = trigger.pos;
        // A full pool leaves the trigger armed for a later tick
        if spawn_enemy(state, pos) {
            state.level.spawn_triggers[i].spawned = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42);
        state.session.phase = GamePhase::Playing;
        state.session.level_started = true;
        state
    }

    #[test]
    fn test_enemies_for_level() {
        assert_eq!(enemies_for_level(1), 5);
        assert_eq!(enemies_for_level(2), 6);
        assert_eq!(enemies_for_level(9), 9);
        assert_eq!(enemies_for_level(10), 10);
        assert_eq!(enemies_for_level(50), 10);
    }

    #[test]
    fn test_platforms_sit_above_ground() {
        let platforms = build_platforms(400.0);
        assert_eq!(platforms.len(), 6);
        assert_eq!(platforms[0].rect, Rect::new(400.0, 280.0, 120.0, 20.0));
        assert!(platforms.iter().all(|p| p.rect.bottom() < 400.0));
    }

    #[test]
    fn test_castle_at_far_end() {
        let castle = build_castle(2000.0, 400.0);
        assert_eq!(castle.rect, Rect::new(1700.0, 100.0, 300.0, 300.0));
        assert_eq!(castle.rect.right(), 2000.0);
    }

    #[test]
    fn test_triggers_spaced_and_clamped() {
        let mut rng = Pcg32::seed_from_u64(3);
        let triggers = build_spawn_triggers(&mut rng, 5, 2000.0, 400.0, 200.0);
        assert_eq!(triggers.len(), 5);
        for (i, t) in triggers.iter().enumerate() {
            let base = 300.0 + i as f32 * 260.0;
            assert!((t.pos.x - base).abs() <= 50.0);
            assert!(t.pos.x >= 300.0 && t.pos.x <= 1600.0);
            assert_eq!(t.pos.y, 360.0);
            assert!(!t.spawned);
        }
    }

    #[test]
    fn test_trigger_fires_exactly_once() {
        let mut state = playing_state();
        state.level.spawn_triggers = vec![SpawnTrigger {
            pos: Vec2::new(500.0, 360.0),
            spawned: false,
            trigger_distance: 200.0,
        }];

        // Still out of range
        state.player.body.pos.x = 250.0;
        check_spawning(&mut state);
        assert_eq!(state.enemies.len(), 0);

        // Exactly at the trigger distance is not close enough
        state.player.body.pos.x = 300.0;
        check_spawning(&mut state);
        assert_eq!(state.enemies.len(), 0);
        assert!(!state.level.spawn_triggers[0].spawned);

        // First tick in range
        state.player.body.pos.x = 310.0;
        check_spawning(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.level.spawn_triggers[0].spawned);

        // Oscillate out and back in
        for x in [100.0, 500.0, 900.0, 650.0, 320.0] {
            state.player.body.pos.x = x;
            check_spawning(&mut state);
        }
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_no_spawning_unless_playing() {
        let mut state = GameState::new(42);
        state.level.spawn_triggers = vec![SpawnTrigger {
            pos: Vec2::new(100.0, 360.0),
            spawned: false,
            trigger_distance: 200.0,
        }];
        check_spawning(&mut state);
        assert!(state.enemies.is_empty());
        assert!(!state.level.spawn_triggers[0].spawned);
    }

    #[test]
    fn test_enemy_health_scales_with_level() {
        let mut state = playing_state();
        state.session.level = 3;
        assert!(spawn_enemy(&mut state, Vec2::new(800.0, 360.0)));
        let enemy = state.enemies.values().next().unwrap();
        assert_eq!(enemy.max_health, 95.0);
    }

    #[test]
    fn test_full_pool_keeps_trigger_armed() {
        let mut tuning = crate::Tuning::default();
        tuning.max_enemies = 1;
        let mut state = GameState::with_tuning(5, tuning);
        state.session.phase = GamePhase::Playing;
        state.session.level_started = true;
        assert!(spawn_enemy(&mut state, Vec2::new(0.0, 0.0)));

        state.level.spawn_triggers = vec![SpawnTrigger {
            pos: Vec2::new(100.0, 360.0),
            spawned: false,
            trigger_distance: 200.0,
        }];
        check_spawning(&mut state);
        assert!(!state.level.spawn_triggers[0].spawned);
    }
}
