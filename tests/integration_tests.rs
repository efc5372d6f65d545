//! Integration tests - whole-game scenarios through the public API

use tetron::core::{ActiveGame, GameConfig, LockEvent, PieceGenerator};
use tetron::engine::{SessionConfig, SessionCoordinator};
use tetron::types::{Cell, ColorCategory, GameAction, GameMode, ShapeId, TSpinKind, TICK_MS};

const X: Cell = Cell::Locked(ColorCategory::Garbage);

fn started(seed: u64) -> ActiveGame {
    let mut game = ActiveGame::new(GameConfig::default(), seed).unwrap();
    game.start();
    game
}

fn fill_row_except(game: &mut ActiveGame, row: i32, gaps: &[i32]) {
    for col in 0..10 {
        if !gaps.contains(&col) {
            game.board_mut().set(row, col, X);
        }
    }
}

fn drop_and_take(game: &mut ActiveGame) -> LockEvent {
    assert!(game.hard_drop());
    game.take_last_event().expect("hard drop records a lock event")
}

#[test]
fn test_game_lifecycle() {
    let mut game = ActiveGame::new(GameConfig::default(), 12345).unwrap();
    assert!(!game.started());
    assert!(game.active().is_none());

    game.start();
    assert!(game.started());
    assert!(game.is_playing());
    assert!(game.active().is_some());
    assert_eq!(game.next_snapshot().len(), 5);

    game.stop();
    assert!(!game.is_playing());
    assert!(!game.apply_action(GameAction::MoveLeft));
}

#[test]
fn test_o_drop_on_empty_board() {
    let mut game = started(1);
    assert!(game.spawn_shape(ShapeId::O));

    let event = drop_and_take(&mut game);
    assert_eq!(event.lines_cleared, 0);
    assert_eq!(event.score_increment, 0);
    for row in [18, 19] {
        for col in 0..10 {
            assert_eq!(game.board().is_locked(row, col), col == 4 || col == 5);
        }
    }
    assert!(!game.board().is_row_full(19));
}

#[test]
fn test_single_line_scores_five() {
    let mut game = started(2);
    fill_row_except(&mut game, 19, &[4, 5]);
    game.board_mut().set(18, 0, X);
    assert!(game.spawn_shape(ShapeId::O));

    let event = drop_and_take(&mut game);
    assert_eq!(event.lines_cleared, 1);
    assert_eq!(event.combo, 1);
    assert_eq!(event.score_increment, 5);
    assert!(!event.perfect_clear);
    assert_eq!(game.score(), 5);
}

#[test]
fn test_i_well_scores_forty() {
    let mut game = started(3);
    for row in 16..20 {
        fill_row_except(&mut game, row, &[5]);
    }
    game.board_mut().set(15, 0, X);
    assert!(game.spawn_shape(ShapeId::I));
    assert!(game.apply_action(GameAction::RotateCw));

    let event = drop_and_take(&mut game);
    assert_eq!(event.lines_cleared, 4);
    assert_eq!(event.score_increment, 40);
    assert_eq!(event.tspin, TSpinKind::None);
    // The leftover cell drops to the floor.
    assert!(game.board().is_locked(19, 0));
}

#[test]
fn test_consecutive_clears_multiply_score() {
    let mut game = started(4);
    fill_row_except(&mut game, 19, &[4, 5]);
    fill_row_except(&mut game, 17, &[4, 5]);
    game.board_mut().set(16, 0, X);
    game.board_mut().set(18, 0, X);

    assert!(game.spawn_shape(ShapeId::O));
    assert_eq!(drop_and_take(&mut game).score_increment, 5);

    assert!(game.spawn_shape(ShapeId::O));
    let second = drop_and_take(&mut game);
    assert_eq!(second.combo, 2);
    assert_eq!(second.score_increment, 10);
}

#[test]
fn test_classic_pool_is_exhausted_before_repeats() {
    for seed in [1, 7, 99, 2024] {
        let mut generator = PieceGenerator::new(seed);
        for _ in 0..3 {
            let mut drawn: Vec<ShapeId> = (0..7).map(|_| generator.next_shape(0.0)).collect();
            drawn.sort_by_key(|s| s.as_str());
            let mut classic = ShapeId::CLASSIC.to_vec();
            classic.sort_by_key(|s| s.as_str());
            assert_eq!(drawn, classic, "seed {}", seed);
        }
    }
}

#[test]
fn test_versus_double_sends_one_line() {
    let mut session = SessionCoordinator::new(SessionConfig::for_mode(GameMode::Versus)).unwrap();
    session.start();
    {
        let game = session.human_game_mut(0).unwrap();
        fill_row_except(game, 18, &[4, 5]);
        fill_row_except(game, 19, &[4, 5]);
        game.board_mut().set(17, 0, X);
        assert!(game.spawn_shape(ShapeId::O));
        assert_eq!(game.pending_garbage(), 0);
    }
    assert!(session.apply_human_action(0, GameAction::HardDrop));
    session.tick(TICK_MS);

    assert_eq!(session.participants()[1].game.pending_garbage(), 1);
}

#[test]
fn test_same_seed_replays_same_game() {
    let run = |seed: u64| {
        let mut game = started(seed);
        let actions = [
            GameAction::MoveLeft,
            GameAction::RotateCw,
            GameAction::HardDrop,
            GameAction::MoveRight,
            GameAction::MoveRight,
            GameAction::Hold,
            GameAction::RotateCcw,
            GameAction::HardDrop,
        ];
        for i in 0..400 {
            game.apply_action(actions[i % actions.len()]);
            game.tick(TICK_MS);
        }
        game.snapshot()
    };

    assert_eq!(run(77), run(77));
}

#[test]
fn test_snapshot_tracks_lock() {
    let mut game = started(5);
    assert!(game.spawn_shape(ShapeId::O));
    let before = game.snapshot();
    game.hard_drop();
    let after = game.snapshot();

    assert_ne!(before.board_hash, after.board_hash);
    assert_eq!(after.piece_serial, before.piece_serial + 1);
    assert_eq!(
        after.cell(19, 4),
        Some(Cell::Locked(ShapeId::O.color()).as_u8())
    );
}
