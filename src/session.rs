//! Round bookkeeping for a host
//!
//! A session owns the game, the level generator and the update schedule.
//! Every round starts from a fresh level with freshly joined paddles and a
//! new timer anchored at the wall time the round began.

use crate::consts::{HEIGHT, WIDTH};
use crate::game::Game;
use crate::level::LevelGenerator;
use crate::settings::Settings;
use crate::sim::{EntityId, GameObserver};
use crate::timer::UpdateTimer;

pub struct Session<O: GameObserver> {
    settings: Settings,
    levels: LevelGenerator,
    game: Game<O>,
    timer: UpdateTimer,
    /// Rounds started so far
    round: u32,
}

impl<O: GameObserver> Session<O> {
    /// A session with no round started yet; its timer is idle until
    /// `start_round`
    pub fn new(settings: Settings, observer: O) -> Self {
        let mut timer = UpdateTimer::new(settings.update_interval_ms, settings.skew_ms, 0.0);
        timer.stop();
        Self {
            levels: LevelGenerator::new(&settings, WIDTH, HEIGHT),
            game: Game::new(observer),
            timer,
            round: 0,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn game(&self) -> &Game<O> {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game<O> {
        &mut self.game
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// True while a round is being played
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Load a fresh level at wall time `now` (ms), join one paddle per name
    /// and restart the schedule. Returns the paddle ids in join order.
    pub fn start_round(&mut self, now: f64, names: &[&str]) -> Vec<EntityId> {
        self.round += 1;
        self.game.load(self.levels.generate(now - self.settings.skew_ms));
        let ids = names.iter().map(|name| self.game.join_next(*name)).collect();
        self.timer = UpdateTimer::new(self.settings.update_interval_ms, self.settings.skew_ms, now);
        log::info!(
            "Round {} started, updating every {}ms",
            self.round,
            self.timer.interval()
        );
        ids
    }

    /// Timestamp of the update due at wall time `now`, if any
    pub fn poll(&mut self, now: f64) -> Option<f64> {
        self.timer.poll(now)
    }

    /// Stop the schedule and freeze the field
    pub fn end_round(&mut self) {
        self.timer.stop();
        self.game.pause_balls();
        log::info!("Round {} over", self.round);
    }

    /// Whether the configured round limit has been played
    pub fn is_finished(&self) -> bool {
        !self.is_running() && self.settings.round_limit().is_some_and(|n| self.round >= n)
    }
}
