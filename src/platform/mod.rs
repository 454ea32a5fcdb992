//! Platform abstraction layer
//!
//! The simulation never talks to a window, keyboard or screen directly. A
//! frontend plugs in through two traits:
//! - [`InputSource`]: sampled once per pass for the held intents
//! - [`PresentationSink`]: handed the state after each pass, plus every event
//!
//! Two headless implementations live here for the native driver and tests.

use std::collections::VecDeque;

use crate::sim::{GameEvent, GameState, TickInput};

/// Produces the intents for the next simulation pass
pub trait InputSource {
    fn sample(&mut self) -> TickInput;
}

/// Consumes simulation output. Read-only: sinks never mutate the game.
pub trait PresentationSink {
    /// Called once per pass with the updated state
    fn present(&mut self, state: &GameState);

    /// Called for every event the pass produced, in emission order
    fn notify(&mut self, event: &GameEvent);
}

/// Replays a fixed list of inputs, then holds the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<TickInput>,
    hold: TickInput,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            queue: inputs.into_iter().collect(),
            hold: TickInput::default(),
        }
    }

    /// Inputs not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> TickInput {
        if let Some(next) = self.queue.pop_front() {
            // One-shot commands are never held
            self.hold = TickInput {
                start: false,
                ..next
            };
            return next;
        }
        self.hold
    }
}

/// Writes events to the log and keeps a running tally
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    pub frames: u64,
    pub events: u64,
    pub deaths: u32,
    pub victories: u32,
}

impl PresentationSink for LogSink {
    fn present(&mut self, state: &GameState) {
        self.frames += 1;
        if self.frames % 600 == 0 {
            let p = &state.player;
            log::info!(
                "tick {} | {:?} | level {} ({} to slay) | hp {:.0}/{:.0} | mp {:.0}/{:.0} | x {:.0} | enemies {}",
                state.time_ticks,
                state.session.phase,
                state.session.level,
                state.session.enemies_left(),
                p.health,
                p.max_health,
                p.mana,
                p.max_mana,
                p.body.pos.x,
                state.enemies.len()
            );
        }
    }

    fn notify(&mut self, event: &GameEvent) {
        self.events += 1;
        match event {
            GameEvent::Death { .. } => self.deaths += 1,
            GameEvent::Victory { .. } => self.victories += 1,
            _ => {}
        }
        log::debug!(
            "[{:?}] {} at ({:.0}, {:.0})",
            event.category(),
            event.text(),
            event.pos().x,
            event.pos().y
        );
    }
}
