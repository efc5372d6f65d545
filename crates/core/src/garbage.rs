//! Garbage module - attack lines and the pending garbage queue
//!
//! A clearing lock produces attack lines. The attacker first cancels its own
//! pending garbage (oldest entries first) and only the remainder is sent on.
//! Received garbage waits in the queue until it has aged past the warning
//! timeout; the next lock that produces no attack then injects the oldest entry.

use std::collections::VecDeque;

use crate::types::{TSpinKind, GARBAGE_CAP, PERFECT_CLEAR_ATTACK};

/// Bonus lines for a combo of the given length
pub fn combo_bonus(combo: u32) -> u32 {
    match combo {
        0..=1 => 0,
        2..=3 => 1,
        4..=5 => 2,
        6..=7 => 3,
        8..=10 => 4,
        _ => 5,
    }
}

/// Attack lines produced by a lock
pub fn attack_lines(
    lines: u32,
    tspin: TSpinKind,
    combo: u32,
    perfect_clear: bool,
    scoring_eligible: bool,
) -> u32 {
    let full = tspin == TSpinKind::Full;
    let base = match lines {
        0 => 0,
        1 if full => 2,
        1 => 0,
        2 if full => 4,
        2 => 1,
        3 if full => 6,
        3 => 2,
        _ => 4,
    };

    if !scoring_eligible {
        return base;
    }
    let perfect = if perfect_clear { PERFECT_CLEAR_ATTACK } else { 0 };
    base + perfect + combo_bonus(combo)
}

/// Pending lines received at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarbageEntry {
    pub lines: u32,
    pub received_ms: u64,
}

/// Incoming garbage waiting to be injected, capped at [`GARBAGE_CAP`] lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarbageQueue {
    entries: VecDeque<GarbageEntry>,
    cap: u32,
}

impl GarbageQueue {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            cap: GARBAGE_CAP,
        }
    }

    pub fn total_pending(&self) -> u32 {
        self.entries.iter().map(|e| e.lines).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &GarbageEntry> {
        self.entries.iter()
    }

    /// Queue incoming lines, truncated so the total never exceeds the cap.
    /// Returns the number of lines actually accepted.
    pub fn add(&mut self, lines: u32, now_ms: u64) -> u32 {
        let accepted = lines.min(self.cap.saturating_sub(self.total_pending()));
        if accepted > 0 {
            self.entries.push_back(GarbageEntry {
                lines: accepted,
                received_ms: now_ms,
            });
        }
        accepted
    }

    /// Cancel pending lines with an attack, oldest first.
    /// Returns the part of the attack left over.
    pub fn cancel(&mut self, mut attack: u32) -> u32 {
        self.entries.retain_mut(|entry| {
            if attack == 0 {
                return true;
            }
            if attack >= entry.lines {
                attack -= entry.lines;
                false
            } else {
                entry.lines -= attack;
                attack = 0;
                true
            }
        });
        attack
    }

    /// Whether the oldest entry has waited at least `timeout_ms`
    pub fn is_due(&self, now_ms: u64, timeout_ms: u64) -> bool {
        self.entries
            .front()
            .is_some_and(|e| now_ms.saturating_sub(e.received_ms) >= timeout_ms)
    }

    /// Pop the oldest entry. The next entry's warning period restarts at `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<u32> {
        let entry = self.entries.pop_front()?;
        if let Some(next) = self.entries.front_mut() {
            next.received_ms = now_ms;
        }
        Some(entry.lines)
    }
}

impl Default for GarbageQueue {
    fn default() -> Self {
        Self::new()
    }
}
