//! Blob Pong headless host
//!
//! Plays rounds between two scripted paddles on the real-time update
//! schedule, restarting with a fresh level after every victory.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use blob_pong::consts::*;
use blob_pong::sim::{Entity, EntityId, EventLog, GameEvent};
use blob_pong::{LevelLayout, Result, Session, Settings, aim_angle};

/// Farthest a scripted paddle moves per update
const BOT_SPEED: f64 = 12.0;
/// Scripted paddles stop shooting below this radius
const BOT_MIN_SHOT_RADIUS: f64 = 8.0;
/// Range of the pause between scripted shots (ms)
const BOT_SHOT_INTERVAL: std::ops::Range<f64> = 1_500.0..6_000.0;
const BOT_NAMES: [&str; 2] = ["north", "south"];

/// Headless blob pong host
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used if it is missing
    #[arg(short, long, default_value = Settings::DEFAULT_PATH)]
    config: PathBuf,

    /// Level seed, overrides the settings file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rounds to play (0 = forever), overrides the settings file
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Level layout (centered or scattered), overrides the settings file
    #[arg(short, long, value_parser = parse_layout)]
    layout: Option<LevelLayout>,

    /// Write the effective settings back to the config file and exit
    #[arg(long)]
    save_config: bool,
}

fn parse_layout(s: &str) -> std::result::Result<LevelLayout, String> {
    LevelLayout::from_str(s).ok_or_else(|| format!("unknown layout '{s}' (expected centered or scattered)"))
}

struct Bot {
    name: &'static str,
    id: EntityId,
    next_shot: f64,
}

struct Host {
    session: Session<EventLog>,
    bots: Vec<Bot>,
    rng: Pcg32,
    clock: Instant,
    wins: BTreeMap<&'static str, u32>,
}

impl Host {
    fn new(settings: Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed.wrapping_add(1)),
            session: Session::new(settings, EventLog::new()),
            bots: BOT_NAMES
                .iter()
                .map(|&name| Bot {
                    name,
                    id: 0,
                    next_shot: 0.0,
                })
                .collect(),
            clock: Instant::now(),
            wins: BTreeMap::new(),
        }
    }

    /// Wall time since the host started (ms)
    fn now(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    fn start_round(&mut self) {
        let now = self.now();
        let ids = self.session.start_round(now, &BOT_NAMES);
        let start = self.session.game().timestamp();
        for (bot, id) in self.bots.iter_mut().zip(ids) {
            bot.id = id;
            bot.next_shot = start + self.rng.random_range(BOT_SHOT_INTERVAL);
        }
    }

    /// Run the current round to its victory; returns the winner's id
    fn play_round(&mut self) -> Result<EntityId> {
        let mut winner = None;
        while self.session.is_running() {
            if let Some(timestamp) = self.session.poll(self.now()) {
                self.drive_bots(timestamp);
                let game = self.session.game_mut();
                game.update(timestamp)?;

                for event in game.observer_mut().drain() {
                    match event {
                        GameEvent::Dead(dead) => log::info!("{:?} {} died", dead.kind, dead.id),
                        GameEvent::Victory(victory) => {
                            winner.get_or_insert(victory.id);
                        }
                    }
                }
                if winner.is_some() {
                    self.session.end_round();
                }
            }
            thread::sleep(Duration::from_millis(1));
        }
        Ok(winner.unwrap_or(0))
    }

    /// Steer each paddle under the nearest blob heading its way, and shoot
    /// at the opponent every few seconds
    fn drive_bots(&mut self, timestamp: f64) {
        for i in 0..self.bots.len() {
            let id = self.bots[i].id;
            let state = self.session.game().state();
            let Some(me) = state.get(id).and_then(Entity::as_player) else {
                continue;
            };
            let pos = me.blob.pos;
            let r = me.blob.r;
            let guards_top = me.guards_top();

            let target = state
                .balls()
                .filter(|b| if guards_top { b.vel.y < 0.0 } else { b.vel.y > 0.0 })
                .min_by(|a, b| (a.pos.y - pos.y).abs().total_cmp(&(b.pos.y - pos.y).abs()))
                .map(|b| b.pos.x);
            let opponent = state
                .players()
                .find(|p| p.id() != id)
                .map(|p| p.blob.pos + DVec2::new(PADDLE_HALF_WIDTH, 0.0))
                .unwrap_or(DVec2::new(WIDTH / 2.0, HEIGHT / 2.0));

            let game = self.session.game_mut();
            if let Some(x) = target {
                let center = pos.x + PADDLE_HALF_WIDTH;
                let step = (x - center).clamp(-BOT_SPEED, BOT_SPEED);
                game.move_paddle(id, center + step, pos.x);
            }

            if timestamp >= self.bots[i].next_shot && r > BOT_MIN_SHOT_RADIUS {
                game.shoot(id, aim_angle(pos, opponent), timestamp);
                self.bots[i].next_shot = timestamp + self.rng.random_range(BOT_SHOT_INTERVAL);
            }
        }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            self.start_round();
            let updates_before = self.session.game().update_count();
            let winner = self.play_round()?;
            let name = self.bots.iter().find(|b| b.id == winner).map(|b| b.name).unwrap_or("nobody");
            *self.wins.entry(name).or_default() += 1;
            log::info!(
                "Round {} won by {} after {} updates",
                self.session.round(),
                name,
                self.session.game().update_count() - updates_before
            );

            if self.session.is_finished() {
                break;
            }
            let delay = self.session.settings().restart_delay_ms.max(0.0);
            thread::sleep(Duration::from_secs_f64(delay / 1000.0));
        }

        for (name, wins) in &self.wins {
            log::info!("{}: {} wins", name, wins);
        }
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = Settings::load(&args.config);
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        settings.rounds = rounds;
    }
    if let Some(layout) = args.layout {
        settings.level.layout = layout;
    }

    if args.save_config {
        if let Err(e) = settings.save(&args.config) {
            log::error!("Could not write {}: {}", args.config.display(), e);
            std::process::exit(1);
        }
        return;
    }

    log::info!(
        "Blob Pong host starting with seed {} ({} levels)",
        settings.seed,
        settings.level.layout.as_str()
    );

    if let Err(e) = Host::new(settings).run() {
        log::error!("Host stopped: {}", e);
        std::process::exit(1);
    }
}
