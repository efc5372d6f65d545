//! Session module - several games advanced together under one mode
//!
//! The coordinator owns every participant's [`ActiveGame`]. Each tick it first
//! advances every game (and lets AI planners act), then applies cross-game
//! effects in participant order:
//!
//! 1. twin lock-step hard drops
//! 2. garbage delivery to a random alive opponent
//! 3. score aggregation and survivor count
//! 4. difficulty propagation of the aggregate score
//! 5. win, loss and stage transitions
//!
//! | Mode   | Score                      | Stages by  | Won when           |
//! |--------|----------------------------|------------|--------------------|
//! | solo   | sum                        | score      | score reaches 1000 |
//! | twin   | sum, ×3 when both score    | score      | score reaches 1000 |
//! | versus | best frame gain added      | score      | one survivor left  |
//! | battle | best frame gain added      | survivors  | one survivor left  |

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use tetron_core::config::{ConfigError, GameConfig};
use tetron_core::game::ActiveGame;
use tetron_core::types::{
    GameAction, GameMode, BATTLE_OPPONENTS, SCORE_THRESHOLDS, SURVIVOR_THRESHOLDS,
    TWIN_SCORE_MULTIPLIER,
};

use crate::ai::AiPlanner;

/// Settings for a whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Shared by every participant; `game_mode` selects the session rules
    pub game: GameConfig,
    pub humans: usize,
    pub ai_opponents: usize,
    pub seed: u64,
}

impl SessionConfig {
    /// Standard participant mix for a mode
    pub fn for_mode(mode: GameMode) -> Self {
        let (humans, ai_opponents) = match mode {
            GameMode::Solo => (1, 0),
            GameMode::Twin => (2, 0),
            GameMode::Versus => (1, 1),
            GameMode::Battle => (1, BATTLE_OPPONENTS),
        };
        Self {
            game: GameConfig {
                game_mode: mode,
                ..Default::default()
            },
            humans,
            ai_opponents,
            seed: 1,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.game.game_mode
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;

        let mode = self.mode();
        let fits = match mode {
            GameMode::Solo => self.humans == 1 && self.ai_opponents == 0,
            GameMode::Twin => self.humans == 2 && self.ai_opponents == 0,
            GameMode::Versus | GameMode::Battle => self.humans == 1,
        };
        if !fits {
            return Err(ConfigError::ParticipantCount {
                mode,
                humans: self.humans,
                ai: self.ai_opponents,
            });
        }
        if matches!(mode, GameMode::Versus | GameMode::Battle) && self.ai_opponents == 0 {
            return Err(ConfigError::NoOpponents);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_mode(GameMode::Solo)
    }
}

/// Who drives a participant's game
#[derive(Debug, Clone)]
pub enum Controller {
    Human,
    Ai(AiPlanner),
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub game: ActiveGame,
    pub controller: Controller,
}

impl Participant {
    pub fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai(_))
    }
}

/// Transition reported by [`SessionCoordinator::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    StageAdvanced(u8),
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Won,
    Lost,
}

/// Drives every participant of one session
#[derive(Debug, Clone)]
pub struct SessionCoordinator {
    config: SessionConfig,
    participants: Vec<Participant>,
    /// Garbage target selection
    rng: StdRng,
    score: u32,
    survivors: usize,
    stage: u8,
    outcome: Option<SessionOutcome>,
    running: bool,
}

impl SessionCoordinator {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let total = config.humans + config.ai_opponents;
        let mut participants = Vec::with_capacity(total);
        for index in 0..total {
            let seed = config.seed.wrapping_add(index as u64);
            let controller = if index < config.humans {
                Controller::Human
            } else {
                Controller::Ai(AiPlanner::new(seed ^ 0xA1))
            };
            participants.push(Participant {
                game: ActiveGame::new(config.game, seed)?,
                controller,
            });
        }

        Ok(Self {
            config,
            participants,
            rng: StdRng::seed_from_u64(config.seed),
            score: 0,
            survivors: total,
            stage: 0,
            outcome: None,
            running: false,
        })
    }

    /// Start (or restart) every game
    pub fn start(&mut self) {
        for participant in &mut self.participants {
            participant.game.start();
            participant.game.set_shared_score(0);
        }
        self.score = 0;
        self.survivors = self.participants.len();
        self.stage = 0;
        self.outcome = None;
        self.running = true;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn survivors(&self) -> usize {
        self.survivors
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Indices of human-controlled participants
    pub fn human_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_ai())
            .map(|(i, _)| i)
    }

    /// Mutable access to a human participant's game (None for AI seats)
    pub fn human_game_mut(&mut self, index: usize) -> Option<&mut ActiveGame> {
        self.participants
            .get_mut(index)
            .filter(|p| !p.is_ai())
            .map(|p| &mut p.game)
    }

    /// Forward a primitive action to a human participant
    pub fn apply_human_action(&mut self, index: usize, action: GameAction) -> bool {
        if !self.running {
            return false;
        }
        match self.human_game_mut(index) {
            Some(game) => game.apply_action(action),
            None => false,
        }
    }

    /// Advance every game by `elapsed_ms`, then apply cross-game effects
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<SessionEvent> {
        if !self.running {
            return None;
        }

        for participant in &mut self.participants {
            participant.game.tick(elapsed_ms);
            if let Controller::Ai(planner) = &mut participant.controller {
                planner.step(&mut participant.game);
            }
        }

        self.sync_hard_drops();
        self.deliver_garbage();
        self.stop_defeated_ais();

        let prev_score = self.score;
        let prev_survivors = self.survivors;
        self.score = self.aggregate_score();
        self.survivors = self.participants.iter().filter(|p| !p.game.lost()).count();
        for participant in &mut self.participants {
            participant.game.set_shared_score(self.score);
        }

        self.check_transitions(prev_score, prev_survivors)
    }

    /// Twin mode: a human hard drop drops every other human's piece too
    fn sync_hard_drops(&mut self) {
        let dropped: Vec<bool> = self
            .participants
            .iter_mut()
            .map(|p| p.game.take_hard_dropped())
            .collect();
        if self.mode() != GameMode::Twin || !dropped.iter().any(|&d| d) {
            return;
        }

        for (participant, &already) in self.participants.iter_mut().zip(&dropped) {
            if already || participant.is_ai() {
                continue;
            }
            participant.game.hard_drop();
            participant.game.take_hard_dropped();
        }
    }

    /// Route attacks to a random alive opponent; co-op modes discard them
    fn deliver_garbage(&mut self) {
        let competitive = matches!(self.mode(), GameMode::Versus | GameMode::Battle);
        for attacker in 0..self.participants.len() {
            let attack = self.participants[attacker].game.take_attack();
            if attack == 0 || !competitive {
                continue;
            }
            let targets: Vec<usize> = (0..self.participants.len())
                .filter(|&i| i != attacker && !self.participants[i].game.lost())
                .collect();
            if let Some(&target) = targets.choose(&mut self.rng) {
                self.participants[target].game.receive_garbage(attack);
            }
        }
    }

    fn stop_defeated_ais(&mut self) {
        for participant in &mut self.participants {
            if participant.is_ai() && participant.game.lost() && participant.game.started() {
                participant.game.stop();
            }
        }
    }

    fn aggregate_score(&mut self) -> u32 {
        let deltas: Vec<u32> = self
            .participants
            .iter_mut()
            .map(|p| p.game.take_score_delta())
            .collect();

        match self.mode() {
            GameMode::Solo => self.score.saturating_add(deltas.iter().sum()),
            GameMode::Twin => {
                let gained: u32 = deltas.iter().sum();
                let scorers = deltas.iter().filter(|&&d| d > 0).count();
                let gained = if scorers > 1 {
                    gained.saturating_mul(TWIN_SCORE_MULTIPLIER)
                } else {
                    gained
                };
                self.score.saturating_add(gained)
            }
            GameMode::Versus | GameMode::Battle => self
                .score
                .saturating_add(deltas.iter().copied().max().unwrap_or(0)),
        }
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionEvent {
        self.outcome = Some(outcome);
        self.running = false;
        for participant in &mut self.participants {
            if outcome == SessionOutcome::Won && !participant.is_ai() {
                participant.game.mark_won();
            } else {
                participant.game.stop();
            }
        }
        match outcome {
            SessionOutcome::Won => SessionEvent::Won,
            SessionOutcome::Lost => SessionEvent::Lost,
        }
    }

    fn check_transitions(&mut self, prev_score: u32, prev_survivors: usize) -> Option<SessionEvent> {
        let mode = self.mode();
        let last = SCORE_THRESHOLDS.len() - 1;

        let won = if mode.is_score_driven() {
            prev_score < SCORE_THRESHOLDS[last] && self.score >= SCORE_THRESHOLDS[last]
        } else {
            self.survivors <= SURVIVOR_THRESHOLDS[last] && prev_survivors > SURVIVOR_THRESHOLDS[last]
        };
        if won {
            let all_ai_lost = self
                .participants
                .iter()
                .filter(|p| p.is_ai())
                .all(|p| p.game.lost());
            let outcome = if all_ai_lost {
                SessionOutcome::Won
            } else {
                SessionOutcome::Lost
            };
            return Some(self.finish(outcome));
        }

        if self
            .participants
            .iter()
            .any(|p| !p.is_ai() && p.game.lost())
        {
            return Some(self.finish(SessionOutcome::Lost));
        }

        let stage = self.stage as usize;
        if stage >= last {
            return None;
        }
        if mode == GameMode::Battle {
            let threshold = SURVIVOR_THRESHOLDS[stage];
            if self.survivors <= threshold && threshold < prev_survivors {
                let reached = SURVIVOR_THRESHOLDS
                    .iter()
                    .filter(|&&t| self.survivors <= t)
                    .count();
                self.stage = reached.min(last) as u8;
                return Some(SessionEvent::StageAdvanced(self.stage));
            }
        } else {
            let threshold = SCORE_THRESHOLDS[stage];
            if prev_score < threshold && threshold <= self.score {
                let reached = SCORE_THRESHOLDS.iter().filter(|&&t| self.score >= t).count();
                self.stage = reached.min(last) as u8;
                return Some(SessionEvent::StageAdvanced(self.stage));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetron_core::types::{Cell, ColorCategory, ShapeId};

    const X: Cell = Cell::Locked(ColorCategory::Garbage);

    fn started(config: SessionConfig) -> SessionCoordinator {
        let mut session = SessionCoordinator::new(config).unwrap();
        session.start();
        session
    }

    /// Set up a single-line clear for an O dropped from the spawn column
    fn prepare_single(game: &mut ActiveGame) {
        for col in 0..10 {
            if col != 4 && col != 5 {
                game.board_mut().set(19, col, X);
            }
        }
        game.board_mut().set(18, 0, X);
        assert!(game.spawn_shape(ShapeId::O));
    }

    fn knock_out(game: &mut ActiveGame) {
        for col in 0..10 {
            game.board_mut().set(0, col, X);
            game.board_mut().set(1, col, X);
        }
        game.spawn_shape(ShapeId::O);
        assert!(game.lost());
    }

    #[test]
    fn test_presets_validate() {
        for mode in [
            GameMode::Solo,
            GameMode::Twin,
            GameMode::Versus,
            GameMode::Battle,
        ] {
            let config = SessionConfig::for_mode(mode);
            assert_eq!(config.validate(), Ok(()), "{:?}", mode);
        }
        assert_eq!(SessionConfig::for_mode(GameMode::Battle).ai_opponents, 98);
    }

    #[test]
    fn test_bad_participant_mix_rejected() {
        let mut config = SessionConfig::for_mode(GameMode::Twin);
        config.humans = 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ParticipantCount {
                mode: GameMode::Twin,
                humans: 1,
                ai: 0
            })
        );

        let mut config = SessionConfig::for_mode(GameMode::Battle);
        config.ai_opponents = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoOpponents));
        assert!(SessionCoordinator::new(config).is_err());
    }

    #[test]
    fn test_human_actions_only_reach_humans() {
        let mut session = started(SessionConfig::for_mode(GameMode::Versus));
        assert!(session.apply_human_action(0, GameAction::MoveLeft));
        assert!(!session.apply_human_action(1, GameAction::MoveLeft));
        assert_eq!(session.human_indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_solo_score_sums_and_drives_difficulty() {
        let mut session = started(SessionConfig::default());
        prepare_single(session.human_game_mut(0).unwrap());
        session.apply_human_action(0, GameAction::HardDrop);

        assert_eq!(session.tick(0), None);
        assert_eq!(session.score(), 5);
        let game = &session.participants()[0].game;
        assert!(game.difficulty().fall_interval_ms < 1000.0);
    }

    #[test]
    fn test_versus_double_sends_one_line() {
        let mut session = started(SessionConfig::for_mode(GameMode::Versus));
        {
            let game = session.human_game_mut(0).unwrap();
            for row in [18, 19] {
                for col in 0..10 {
                    if col != 4 && col != 5 {
                        game.board_mut().set(row, col, X);
                    }
                }
            }
            game.board_mut().set(17, 0, X);
            assert!(game.spawn_shape(ShapeId::O));
        }
        session.apply_human_action(0, GameAction::HardDrop);
        session.tick(0);

        assert_eq!(session.participants()[1].game.pending_garbage(), 1);
        assert_eq!(session.participants()[0].game.pending_garbage(), 0);
    }

    #[test]
    fn test_twin_lock_step_and_multiplier() {
        let mut session = started(SessionConfig::for_mode(GameMode::Twin));
        prepare_single(session.human_game_mut(0).unwrap());
        prepare_single(session.human_game_mut(1).unwrap());
        let other_serial = session.participants()[1].game.piece_serial();

        session.apply_human_action(0, GameAction::HardDrop);
        session.tick(0);

        assert_eq!(session.participants()[1].game.piece_serial(), other_serial + 1);
        assert_eq!(session.score(), (5 + 5) * TWIN_SCORE_MULTIPLIER);
    }

    #[test]
    fn test_versus_score_adds_best_gain_per_frame() {
        let mut session = started(SessionConfig::for_mode(GameMode::Versus));
        prepare_single(session.human_game_mut(0).unwrap());
        session.apply_human_action(0, GameAction::HardDrop);
        assert_eq!(session.tick(0), None);
        assert_eq!(session.score(), 5);

        let ai = &mut session.participants[1];
        assert!(ai.is_ai());
        ai.controller = Controller::Human;
        prepare_single(&mut ai.game);
        session.apply_human_action(1, GameAction::HardDrop);
        session.tick(0);

        assert_eq!(session.participants()[1].game.score(), 5);
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn test_twin_single_scorer_has_no_multiplier() {
        let mut session = started(SessionConfig::for_mode(GameMode::Twin));
        prepare_single(session.human_game_mut(0).unwrap());
        session.apply_human_action(0, GameAction::HardDrop);
        session.tick(0);
        assert_eq!(session.score(), 5);
    }

    #[test]
    fn test_stage_advances_on_score_threshold() {
        let mut session = started(SessionConfig::default());
        session.score = SCORE_THRESHOLDS[0] - 1;
        prepare_single(session.human_game_mut(0).unwrap());
        session.apply_human_action(0, GameAction::HardDrop);

        assert_eq!(session.tick(0), Some(SessionEvent::StageAdvanced(1)));
        assert_eq!(session.stage(), 1);
        assert!(session.is_running());
    }

    #[test]
    fn test_solo_win_at_last_threshold() {
        let mut session = started(SessionConfig::default());
        session.stage = 2;
        session.score = SCORE_THRESHOLDS[2] - 1;
        prepare_single(session.human_game_mut(0).unwrap());
        session.apply_human_action(0, GameAction::HardDrop);

        assert_eq!(session.tick(0), Some(SessionEvent::Won));
        assert_eq!(session.outcome(), Some(SessionOutcome::Won));
        assert!(session.participants()[0].game.won());
        assert!(!session.is_running());
        assert_eq!(session.tick(16), None);
    }

    #[test]
    fn test_human_loss_ends_session() {
        let mut session = started(SessionConfig::for_mode(GameMode::Versus));
        knock_out(session.human_game_mut(0).unwrap());
        assert_eq!(session.tick(0), Some(SessionEvent::Lost));
        assert_eq!(session.outcome(), Some(SessionOutcome::Lost));
    }

    #[test]
    fn test_versus_won_when_ai_eliminated() {
        let mut session = started(SessionConfig::for_mode(GameMode::Versus));
        knock_out(&mut session.participants[1].game);
        assert_eq!(session.tick(0), Some(SessionEvent::Won));
        assert_eq!(session.survivors(), 1);
    }

    #[test]
    fn test_battle_stage_follows_survivors() {
        let mut config = SessionConfig::for_mode(GameMode::Battle);
        config.ai_opponents = 59;
        let mut session = started(config);
        for index in 1..=10 {
            knock_out(&mut session.participants[index].game);
        }
        assert_eq!(session.tick(0), Some(SessionEvent::StageAdvanced(1)));
        assert_eq!(session.survivors(), 50);
        assert!(!session.participants[3].game.started());
    }
}
