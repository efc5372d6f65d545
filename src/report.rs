//! JSON run report for the `tetron-sim` runner.

use serde::Serialize;

use crate::core::snapshot::GameSnapshot;
use crate::engine::{SessionCoordinator, SessionEvent, SessionOutcome};

/// A session transition and the frame it happened on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub tick: u64,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<u8>,
}

impl EventRecord {
    pub fn new(tick: u64, event: SessionEvent) -> Self {
        let (name, stage) = match event {
            SessionEvent::StageAdvanced(stage) => ("stage_advanced", Some(stage)),
            SessionEvent::Won => ("won", None),
            SessionEvent::Lost => ("lost", None),
        };
        Self {
            tick,
            event: name.to_string(),
            stage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantReport {
    pub index: usize,
    /// "human" or "ai"
    pub controller: String,
    pub score: u32,
    pub pieces: u32,
    pub combo: u32,
    pub pending_garbage: u32,
    pub lost: bool,
    pub won: bool,
    /// Hex FNV-1a of the final board
    pub board_hash: String,
    /// Final board, one string per row: `.` empty, `#` locked
    pub board: Vec<String>,
}

impl ParticipantReport {
    pub fn from_snapshot(index: usize, is_ai: bool, snap: &GameSnapshot) -> Self {
        let board = (0..snap.rows)
            .map(|row| {
                (0..snap.columns)
                    .map(|col| match snap.cell(row, col) {
                        Some(0) | None => '.',
                        Some(_) => '#',
                    })
                    .collect()
            })
            .collect();

        Self {
            index,
            controller: if is_ai { "ai" } else { "human" }.to_string(),
            score: snap.score,
            pieces: snap.piece_serial,
            combo: snap.combo,
            pending_garbage: snap.pending_garbage,
            lost: snap.lost,
            won: snap.won,
            board_hash: format!("{:016x}", snap.board_hash),
            board,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub mode: String,
    pub seed: u64,
    pub ticks: u64,
    pub score: u32,
    pub stage: u8,
    pub survivors: usize,
    /// "won", "lost", or absent while still running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    pub events: Vec<EventRecord>,
    pub participants: Vec<ParticipantReport>,
}

impl SessionReport {
    pub fn from_session(session: &SessionCoordinator, ticks: u64, events: Vec<EventRecord>) -> Self {
        let mut snap = GameSnapshot::default();
        let participants = session
            .participants()
            .iter()
            .enumerate()
            .map(|(index, p)| {
                p.game.snapshot_into(&mut snap);
                ParticipantReport::from_snapshot(index, p.is_ai(), &snap)
            })
            .collect();

        Self {
            mode: session.mode().as_str().to_string(),
            seed: session.config().seed,
            ticks,
            score: session.score(),
            stage: session.stage(),
            survivors: session.survivors(),
            outcome: session.outcome().map(|o| {
                match o {
                    SessionOutcome::Won => "won",
                    SessionOutcome::Lost => "lost",
                }
                .to_string()
            }),
            events,
            participants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SessionConfig;
    use crate::types::GameMode;

    #[test]
    fn test_report_serializes_session() {
        let mut session = SessionCoordinator::new(SessionConfig::for_mode(GameMode::Versus)).unwrap();
        session.start();
        let events = vec![EventRecord::new(7, SessionEvent::StageAdvanced(1))];
        let report = SessionReport::from_session(&session, 7, events);

        assert_eq!(report.participants.len(), 2);
        assert_eq!(report.participants[0].controller, "human");
        assert_eq!(report.participants[1].controller, "ai");
        assert_eq!(report.participants[0].board.len(), 20);
        assert!(report.participants[0].board.iter().all(|r| r == ".........."));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "versus");
        assert_eq!(json["events"][0]["event"], "stage_advanced");
        assert_eq!(json["events"][0]["stage"], 1);
        assert!(json.get("outcome").is_none());
        assert_eq!(json["participants"][0]["board_hash"].as_str().unwrap().len(), 16);
    }
}
