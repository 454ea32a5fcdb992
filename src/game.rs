//! Fixed timestep scheduler
//!
//! One frame of the host loop reports how much real time passed. Once a full
//! frame interval has built up the game runs exactly one
//! input -> tick -> present pass and keeps the leftover time.

use crate::platform::{InputSource, PresentationSink};
use crate::sim::{GameState, tick};
use crate::tuning::Tuning;

/// Longest frame we account for; anything above is a stall (tab switch, debugger)
const MAX_FRAME_TIME: f32 = 0.1;

/// Accumulates real time and says when a pass is due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    interval: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Time carried over toward the next pass
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Add `elapsed` seconds. Returns true when a pass should run; the
    /// remainder modulo the interval carries over.
    pub fn advance(&mut self, elapsed: f32) -> bool {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.accumulator += elapsed;

        if self.accumulator < self.interval {
            return false;
        }
        self.accumulator %= self.interval;
        true
    }
}

/// Owns the game state and the clock that drives it
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    clock: FixedStep,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let clock = FixedStep::new(tuning.frame_interval());
        log::info!("New game (seed {}, {} fps)", seed, tuning.target_fps);
        Self {
            state: GameState::with_tuning(seed, tuning),
            clock,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn clock(&self) -> &FixedStep {
        &self.clock
    }

    /// Feed one host frame. Returns true if a simulation pass ran.
    pub fn frame<I, S>(&mut self, elapsed: f32, input: &mut I, sink: &mut S) -> bool
    where
        I: InputSource + ?Sized,
        S: PresentationSink + ?Sized,
    {
        if !self.clock.advance(elapsed) {
            return false;
        }
        self.step(input, sink);
        true
    }

    /// Run one pass unconditionally
    pub fn step<I, S>(&mut self, input: &mut I, sink: &mut S)
    where
        I: InputSource + ?Sized,
        S: PresentationSink + ?Sized,
    {
        let intents = input.sample();
        tick(&mut self.state, &intents);

        sink.present(&self.state);
        for event in self.state.drain_events() {
            sink.notify(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ScriptedInput;
    use crate::sim::{GameEvent, GamePhase, TickInput};

    #[derive(Default)]
    struct Recorder {
        presented: usize,
        events: Vec<GameEvent>,
    }

    impl PresentationSink for Recorder {
        fn present(&mut self, _state: &GameState) {
            self.presented += 1;
        }

        fn notify(&mut self, event: &GameEvent) {
            self.events.push(event.clone());
        }
    }

    #[test]
    fn test_fixed_step_waits_for_full_interval() {
        let mut step = FixedStep::new(1.0 / 60.0);
        assert!(!step.advance(0.01));
        assert!(step.advance(0.01));
        assert!((step.accumulator() - (0.02 - 1.0 / 60.0)).abs() < 1e-5);
    }

    #[test]
    fn test_stall_runs_one_pass() {
        let mut step = FixedStep::new(1.0 / 60.0);
        assert!(step.advance(5.0));
        assert!(step.accumulator() < step.interval());
        assert!(!step.advance(0.0));
    }

    #[test]
    fn test_bad_elapsed_is_ignored() {
        let mut step = FixedStep::new(1.0 / 60.0);
        assert!(!step.advance(f32::NAN));
        assert!(!step.advance(-1.0));
        assert_eq!(step.accumulator(), 0.0);
    }

    #[test]
    fn test_half_frames_run_every_other_pass() {
        let mut game = Game::new(3, Tuning::default());
        let mut input = ScriptedInput::default();
        let mut sink = Recorder::default();

        let half = game.clock().interval() / 2.0;
        let ran = (0..10)
            .filter(|_| game.frame(half, &mut input, &mut sink))
            .count();

        assert_eq!(ran, 5);
        assert_eq!(sink.presented, 5);
        assert_eq!(game.state().time_ticks, 5);
    }

    #[test]
    fn test_events_reach_sink_and_are_drained() {
        let mut game = Game::new(3, Tuning::default());
        game.state_mut().session.phase = GamePhase::Playing;
        game.state_mut().player.health = 10.0;
        let mut input = ScriptedInput::new([TickInput {
            drink_potion: true,
            ..Default::default()
        }]);
        let mut sink = Recorder::default();

        game.step(&mut input, &mut sink);

        assert_eq!(sink.events.len(), 1);
        assert_eq!(sink.events[0].text(), "+30 HP");
        assert!(game.state().events.is_empty());
    }

    #[test]
    fn test_scripted_run_reaches_castle() {
        let mut game = Game::new(2024, Tuning::default());
        let mut input = ScriptedInput::new([
            TickInput {
                start: true,
                move_right: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
        ]);
        let mut sink = Recorder::default();
        let interval = game.clock().interval();

        for _ in 0..1000 {
            game.frame(interval, &mut input, &mut sink);
            if game.state().session.phase == GamePhase::LevelComplete {
                break;
            }
        }

        assert_eq!(game.state().session.phase, GamePhase::LevelComplete);
        assert!(
            sink.events
                .iter()
                .any(|e| matches!(e, GameEvent::Victory { level: 1, .. }))
        );
        assert!(!sink.events.iter().any(|e| matches!(e, GameEvent::Death { .. })));
    }
}
