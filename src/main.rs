//! Medieval RPG headless entry point
//!
//! Runs the simulation with a scripted player and logs what happens.
//!
//! ```text
//! medieval-rpg [tuning.json] [seed] [ticks]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use medieval_rpg::platform::{LogSink, ScriptedInput};
    use medieval_rpg::sim::{GamePhase, TickInput};
    use medieval_rpg::{Game, Tuning};
    use serde::Serialize;

    const DEFAULT_SEED: u64 = 0x5EED;
    const DEFAULT_TICKS: u32 = 20 * 60 * 60;

    /// Re-press start this often so the bot recovers after a death
    const START_EVERY: u32 = 180;

    #[derive(Serialize)]
    struct Summary {
        seed: u64,
        ticks: u64,
        phase: GamePhase,
        dungeon_level: u32,
        player_level: u32,
        exp: u32,
        gold: u32,
        potions: u32,
        enemies_killed: u32,
        deaths: u32,
        levels_cleared: u32,
        events: u64,
    }

    fn load_tuning(path: Option<&str>) -> Tuning {
        let Some(path) = path else {
            log::info!("No tuning file given, using defaults");
            return Tuning::default();
        };
        match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Failed to load tuning from {}: {}, using defaults", path, e);
                Tuning::default()
            }
        }
    }

    /// Charge right, swing constantly, throw fireballs and drink when hurt
    fn bot_script(ticks: u32) -> ScriptedInput {
        ScriptedInput::new((0..ticks).map(|i| TickInput {
            start: i % START_EVERY == 0,
            move_right: true,
            jump: i % 90 == 45,
            attack: true,
            cast_spell: true,
            drink_potion: true,
            ..Default::default()
        }))
    }

    pub fn run() {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let tuning = load_tuning(args.first().map(String::as_str));
        let seed = args
            .get(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let ticks = args
            .get(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TICKS);

        let interval = tuning.frame_interval();
        let mut game = Game::new(seed, tuning);
        let mut input = bot_script(ticks);
        let mut sink = LogSink::default();

        while input.remaining() > 0 {
            game.frame(interval, &mut input, &mut sink);
            if game.state().session.phase == GamePhase::Victory {
                break;
            }
        }

        let state = game.state();
        let summary = Summary {
            seed,
            ticks: state.time_ticks,
            phase: state.session.phase,
            dungeon_level: state.session.level,
            player_level: state.player.level,
            exp: state.player.exp,
            gold: state.player.gold,
            potions: state.player.potions,
            enemies_killed: state.session.enemies_killed,
            deaths: sink.deaths,
            levels_cleared: sink.victories,
            events: sink.events,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Medieval RPG (native) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser frontends drive `medieval_rpg::Game` directly
}
