//! Scoring module - line clear points and multipliers
//!
//! Points per lock:
//! - base: `5 × lines`, or `10 × lines` for four or more lines
//! - a full T-spin replaces the base with `20 × (lines + 1)`
//! - a mini T-spin replaces the base with `5 × 2^lines`
//!
//! The base is then multiplied by the combo count (when the combo is above one)
//! and by the line count again on a perfect clear. Neither multiplier applies to
//! non-scoring shapes (the Freebie). Session-level multipliers such as the twin
//! bonus are applied by the session, not here.

use crate::types::TSpinKind;

/// Everything the score of a single lock depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearContext {
    pub lines: u32,
    pub tspin: TSpinKind,
    /// Consecutive clearing locks including this one (0 if this lock cleared nothing)
    pub combo: u32,
    pub perfect_clear: bool,
    /// False for shapes that never earn combo or perfect-clear bonuses
    pub scoring_eligible: bool,
}

/// Points before multipliers
pub fn base_points(lines: u32, tspin: TSpinKind) -> u32 {
    match tspin {
        TSpinKind::Full => 20 * (lines + 1),
        TSpinKind::Mini => 5 * 2u32.saturating_pow(lines),
        TSpinKind::None if lines >= 4 => 10 * lines,
        TSpinKind::None => 5 * lines,
    }
}

/// Product of the combo and perfect-clear multipliers
pub fn multiplier(ctx: &ClearContext) -> u32 {
    let mut product: u32 = 1;
    if ctx.scoring_eligible {
        if ctx.combo > 1 {
            product = product.saturating_mul(ctx.combo);
        }
        if ctx.perfect_clear {
            product = product.saturating_mul(ctx.lines);
        }
    }
    product
}

/// Calculate the score increment for one lock
pub fn score_increment(ctx: &ClearContext) -> u32 {
    base_points(ctx.lines, ctx.tspin).saturating_mul(multiplier(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(lines: u32, combo: u32) -> ClearContext {
        ClearContext {
            lines,
            combo,
            scoring_eligible: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_line_scores() {
        assert_eq!(score_increment(&ctx(0, 0)), 0);
        assert_eq!(score_increment(&ctx(1, 1)), 5);
        assert_eq!(score_increment(&ctx(2, 1)), 10);
        assert_eq!(score_increment(&ctx(3, 1)), 15);
        assert_eq!(score_increment(&ctx(4, 1)), 40);
        assert_eq!(score_increment(&ctx(5, 1)), 50);
    }

    #[test]
    fn test_tspin_scores() {
        assert_eq!(base_points(0, TSpinKind::Full), 20);
        assert_eq!(base_points(1, TSpinKind::Full), 40);
        assert_eq!(base_points(3, TSpinKind::Full), 80);
        assert_eq!(base_points(0, TSpinKind::Mini), 5);
        assert_eq!(base_points(1, TSpinKind::Mini), 10);
        assert_eq!(base_points(2, TSpinKind::Mini), 20);
    }

    #[test]
    fn test_combo_multiplier() {
        assert_eq!(score_increment(&ctx(1, 2)), 10);
        assert_eq!(score_increment(&ctx(2, 3)), 30);

        let mut freebie = ctx(2, 3);
        freebie.scoring_eligible = false;
        assert_eq!(score_increment(&freebie), 10);
    }

    #[test]
    fn test_perfect_clear_multiplier() {
        let mut c = ctx(4, 1);
        c.perfect_clear = true;
        assert_eq!(score_increment(&c), 160);

        c.combo = 2;
        assert_eq!(score_increment(&c), 320);
    }
}
