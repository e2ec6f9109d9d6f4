use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use blob_pong::consts::*;
use blob_pong::level::LevelGenerator;
use blob_pong::sim::{Callbacks, DeadEvent, EventLog, GameEvent, Snapshot, VictoryEvent};
use blob_pong::timer::UpdateTimer;
use blob_pong::{Command, Game, LevelLayout, Settings};

fn centered_settings() -> Settings {
    let mut settings = Settings::default();
    settings.level.layout = LevelLayout::Centered;
    settings.level.blob_count = 1;
    settings.level.max_radius = 20.0;
    settings
}

fn total_area(game: &Game<EventLog>) -> f64 {
    game.state().objects.values().map(|e| e.blob().area()).sum()
}

/// A launched center blob drifts right, reflects off the wall and slips past
/// the bottom paddle; the top paddle takes the round.
#[test]
fn centered_round_ends_in_victory() -> blob_pong::Result<()> {
    let mut game = Game::new(EventLog::new());
    let mut levels = LevelGenerator::new(&centered_settings(), WIDTH, HEIGHT);
    game.load(levels.generate(0.0));

    let top = game.join_next("top");
    let bottom = game.join_next("bottom");
    assert!(top > 1 && bottom > top);

    let mut t = 0.0;
    while game.observer().is_empty() && t < 20_000.0 {
        t += UPDATE_INTERVAL;
        game.update(t)?;
    }
    assert_eq!(
        game.observer_mut().drain(),
        vec![GameEvent::Victory(VictoryEvent { id: top })]
    );
    Ok(())
}

/// Two peers fed the same snapshot and the same commands stay identical.
#[test]
fn server_and_client_agree() -> blob_pong::Result<()> {
    let mut settings = centered_settings();
    settings.level.layout = LevelLayout::Scattered;
    settings.level.blob_count = 5;
    settings.seed = 99;

    let mut server = Game::new(EventLog::new());
    server.load(LevelGenerator::new(&settings, WIDTH, HEIGHT).generate(0.0));
    let a = server.join_next("a");
    let b = server.join_next("b");
    server.update(66.0)?;
    server.observer_mut().drain();

    let mut client = Game::new(EventLog::new());
    client.load(Snapshot::from_json(&server.save().to_json()?)?);
    assert_eq!(client.state(), server.state());

    let script = [
        (a, Command::Move { mouse_x: 100.0, player_x: 320.0 }),
        (b, Command::Shoot { direction: -1.2, timestamp: 66.0 }),
        (a, Command::Shoot { direction: 0.9, timestamp: 70.0 }),
        (b, Command::Move { mouse_x: 600.0, player_x: 320.0 }),
    ];
    let mut t = 66.0;
    for (from, command) in &script {
        server.apply(*from, command);
        client.apply(*from, command);
        t += UPDATE_INTERVAL;
        server.update(t)?;
        client.update(t)?;
    }

    assert_eq!(client.state(), server.state());
    assert_eq!(client.last_id(), server.last_id());
    assert_eq!(client.observer().events(), server.observer().events());
    Ok(())
}

/// Closure observers see deaths as they happen.
#[test]
fn callbacks_receive_deaths() {
    let deaths = Rc::new(RefCell::new(Vec::new()));
    let victories = Rc::new(RefCell::new(Vec::new()));
    let observer = {
        let deaths = Rc::clone(&deaths);
        let victories = Rc::clone(&victories);
        Callbacks::new(
            move |e: DeadEvent| deaths.borrow_mut().push(e.id),
            move |e: VictoryEvent| victories.borrow_mut().push(e.id),
        )
    };

    let mut game = Game::new(observer);
    let id = game.join_next("tiny");
    // Shrink to just above the death threshold, then shoot once
    let mut snap = game.save();
    if let Some(blob_pong::sim::EntityRecord::Player(p)) = snap.objects.get_mut(&id) {
        p.r = 2.01;
    }
    game.load(snap);
    game.shoot(id, 0.0, 0.0);

    assert_eq!(*deaths.borrow(), vec![id]);
    assert!(victories.borrow().is_empty());
}

/// Shots move area around but never create or destroy it.
#[test]
fn shooting_conserves_area() -> blob_pong::Result<()> {
    let mut game = Game::new(EventLog::new());
    game.load(LevelGenerator::new(&centered_settings(), WIDTH, HEIGHT).generate(0.0));
    let a = game.join_next("a");
    let b = game.join_next("b");
    let before = total_area(&game);

    let mut t = 0.0;
    for i in 0..10 {
        let shooter = if i % 2 == 0 { a } else { b };
        game.shoot(shooter, 0.3 * i as f64, t);
        t += UPDATE_INTERVAL;
        game.update(t)?;
    }
    // Escaped blobs are not removed, so they still count
    assert_relative_eq!(total_area(&game), before, max_relative = 1e-9);
    Ok(())
}

/// The timer drives updates on whole intervals regardless of poll jitter.
#[test]
fn timer_drives_updates() -> blob_pong::Result<()> {
    let mut game = Game::new(EventLog::new());
    let mut timer = UpdateTimer::new(UPDATE_INTERVAL, 0.0, 0.0);

    let mut now = 0.0;
    while now < 1_000.0 {
        now += 7.0;
        if let Some(ts) = timer.poll(now) {
            game.update(ts)?;
        }
    }
    // 30 intervals fit in 1001ms
    assert_eq!(game.update_count(), 30);
    assert!(game.timestamp() <= now);

    timer.stop();
    assert_eq!(timer.poll(now + 100.0), None);
    Ok(())
}

/// Ids minted after loading a level never collide with level ids.
#[test]
fn ids_stay_unique_after_load() {
    let mut settings = centered_settings();
    settings.level.blob_count = 4;
    let mut game = Game::new(EventLog::new());
    game.load(LevelGenerator::new(&settings, WIDTH, HEIGHT).generate(0.0));
    assert_eq!(game.last_id(), 4);

    let p = game.join_next("p");
    game.shoot(p, 1.0, 0.0);
    assert_eq!(p, 5);
    assert!(game.blob_exists(6));
    assert_eq!(game.state().objects.len(), 6);
}

#[test]
fn invalid_delta_leaves_state_alone() {
    let mut game = Game::new(EventLog::new());
    game.join_next("p");
    let before = game.state().clone();
    assert!(game.update(-1.0).is_err());
    assert!(game.update(MAX_DELTA + 0.5).is_err());
    assert_eq!(game.state(), &before);
    assert_eq!(game.update_count(), 0);
}
