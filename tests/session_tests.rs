//! Session tests - multi-player rules driven through the facade

use tetron::engine::{
    AiPlanner, SessionConfig, SessionCoordinator, SessionEvent, SessionOutcome,
};
use tetron::types::{Cell, ColorCategory, GameAction, GameMode, ShapeId, TICK_MS};

const X: Cell = Cell::Locked(ColorCategory::Garbage);

fn session(mode: GameMode) -> SessionCoordinator {
    let mut session = SessionCoordinator::new(SessionConfig::for_mode(mode)).unwrap();
    session.start();
    session
}

#[test]
fn test_session_needs_start() {
    let mut session = SessionCoordinator::new(SessionConfig::default()).unwrap();
    assert!(!session.is_running());
    assert_eq!(session.tick(TICK_MS), None);
    assert!(!session.apply_human_action(0, GameAction::HardDrop));
}

#[test]
fn test_battle_preset_fills_the_lobby() {
    let session = session(GameMode::Battle);
    assert_eq!(session.participants().len(), 99);
    assert_eq!(session.survivors(), 99);
    assert_eq!(session.participants().iter().filter(|p| p.is_ai()).count(), 98);
}

#[test]
fn test_ai_opponent_plays_on_its_own() {
    let mut session = session(GameMode::Versus);
    let start = session.participants()[1].game.piece_serial();
    for _ in 0..1000 {
        session.tick(TICK_MS);
        if !session.is_running() {
            break;
        }
    }
    assert!(session.participants()[1].game.piece_serial() > start);
}

#[test]
fn test_twin_hard_drop_moves_both_players() {
    let mut session = session(GameMode::Twin);
    let serials: Vec<u32> = session
        .participants()
        .iter()
        .map(|p| p.game.piece_serial())
        .collect();

    session.apply_human_action(1, GameAction::HardDrop);
    session.tick(TICK_MS);

    for (p, before) in session.participants().iter().zip(serials) {
        assert_eq!(p.game.piece_serial(), before + 1);
    }
}

#[test]
fn test_every_game_follows_the_shared_score() {
    let mut session = session(GameMode::Twin);
    {
        let game = session.human_game_mut(0).unwrap();
        for col in 0..10 {
            if col != 4 && col != 5 {
                game.board_mut().set(19, col, X);
            }
        }
        game.board_mut().set(18, 0, X);
        assert!(game.spawn_shape(ShapeId::O));
    }
    session.apply_human_action(0, GameAction::HardDrop);
    session.tick(TICK_MS);

    let score = session.score();
    assert!(score > 0);
    let intervals: Vec<f64> = session
        .participants()
        .iter()
        .map(|p| p.game.difficulty().fall_interval_ms)
        .collect();
    assert_eq!(intervals[0], intervals[1]);
    assert!(intervals[0] < 1000.0);
}

#[test]
fn test_block_out_loses_the_session() {
    let mut session = session(GameMode::Solo);
    {
        let game = session.human_game_mut(0).unwrap();
        for col in 0..10 {
            game.board_mut().set(0, col, X);
        }
        assert!(!game.spawn_shape(ShapeId::T));
    }
    assert_eq!(session.tick(TICK_MS), Some(SessionEvent::Lost));
    assert_eq!(session.outcome(), Some(SessionOutcome::Lost));
    assert!(!session.is_running());
}

#[test]
fn test_autopilot_session_is_deterministic() {
    let run = || {
        let mut config = SessionConfig::for_mode(GameMode::Battle);
        config.ai_opponents = 3;
        config.seed = 11;
        let mut session = SessionCoordinator::new(config).unwrap();
        session.start();
        let mut pilot = AiPlanner::new(5);
        for _ in 0..2000 {
            if let Some(game) = session.human_game_mut(0) {
                pilot.step(game);
            }
            session.tick(TICK_MS);
        }
        let boards: Vec<_> = session
            .participants()
            .iter()
            .map(|p| p.game.snapshot().board_hash)
            .collect();
        (session.score(), session.survivors(), boards)
    };
    assert_eq!(run(), run());
}
