//! Percussion selection.
//!
//! At most one percussion hit sounds per step. Rules are tried in order and
//! the first one whose predicate holds wins.

use bgmgen_spec::{Note, PitchClass};

use crate::envelope::EnvelopeKind;

// Levels before intensity scaling.
const KICK_LEVEL: f64 = 0.8;
const SNARE_LEVEL: f64 = 0.6;
const HIHAT_LEVEL: f64 = 0.3;

/// Steps in one bar of the percussion grid.
const BAR_STEPS: usize = 8;

/// Kick pitch: half the frequency of C2.
pub fn kick_frequency() -> f64 {
    Note::pitched(PitchClass::C, 2).frequency() / 2.0
}

/// Position of a step within a track, as seen by the percussion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContext {
    /// Step index from the start of the track.
    pub step: usize,
    /// Percussion density, 1 to 8.
    pub complexity: u32,
    /// Whether boss-mode percussion is enabled.
    pub boss_mode: bool,
}

impl StepContext {
    /// Steps between kicks: `8 / complexity` with integer division.
    ///
    /// Complexities outside `1..=8` are rejected by validation; here they
    /// are clamped so the period is never zero.
    pub fn kick_period(&self) -> usize {
        let complexity = self.complexity.max(1) as usize;
        (BAR_STEPS / complexity).max(1)
    }
}

/// A percussion sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercussionHit {
    /// Low square-wave thump.
    Kick,
    /// Full-step noise burst on the backbeat.
    Snare,
    /// Half-step noise tick used by boss tracks.
    HiHat,
}

impl PercussionHit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PercussionHit::Kick => "kick",
            PercussionHit::Snare => "snare",
            PercussionHit::HiHat => "hihat",
        }
    }

    /// Level before intensity scaling.
    pub fn level(&self) -> f64 {
        match self {
            PercussionHit::Kick => KICK_LEVEL,
            PercussionHit::Snare => SNARE_LEVEL,
            PercussionHit::HiHat => HIHAT_LEVEL,
        }
    }

    /// Fraction of the step the hit occupies.
    pub fn step_fraction(&self) -> f64 {
        match self {
            PercussionHit::HiHat => 0.5,
            _ => 1.0,
        }
    }

    /// Tone parameters for pitched hits, `None` for noise hits.
    pub fn tone(&self) -> Option<(f64, EnvelopeKind)> {
        match self {
            PercussionHit::Kick => Some((kick_frequency(), EnvelopeKind::Decaying)),
            PercussionHit::Snare | PercussionHit::HiHat => None,
        }
    }
}

impl std::fmt::Display for PercussionHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the ordered percussion rule list.
#[derive(Debug, Clone, Copy)]
pub struct PercussionRule {
    /// Hit emitted when the rule matches.
    pub hit: PercussionHit,
    /// Predicate over the step position.
    pub applies: fn(&StepContext) -> bool,
}

fn on_kick_grid(ctx: &StepContext) -> bool {
    ctx.step % ctx.kick_period() == 0
}

fn on_backbeat(ctx: &StepContext) -> bool {
    ctx.step % BAR_STEPS == 4 && ctx.complexity > 1
}

fn on_boss_offbeat(ctx: &StepContext) -> bool {
    ctx.boss_mode && ctx.step % 2 == 0
}

/// Percussion rules in priority order.
///
/// The backbeat snare only fires when `step % 8 == 4` and the kick grid is
/// not hit on the same step, which requires a kick period that does not
/// divide 4.
pub const PERCUSSION_RULES: &[PercussionRule] = &[
    PercussionRule {
        hit: PercussionHit::Kick,
        applies: on_kick_grid,
    },
    PercussionRule {
        hit: PercussionHit::Snare,
        applies: on_backbeat,
    },
    PercussionRule {
        hit: PercussionHit::HiHat,
        applies: on_boss_offbeat,
    },
];

/// Selects the percussion hit for a step, if any.
pub fn select_percussion(ctx: &StepContext) -> Option<PercussionHit> {
    PERCUSSION_RULES
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .map(|rule| rule.hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx(complexity: u32, boss_mode: bool, step: usize) -> StepContext {
        StepContext {
            step,
            complexity,
            boss_mode,
        }
    }

    #[test]
    fn test_kick_frequency_is_half_c2() {
        let c2 = Note::pitched(PitchClass::C, 2).frequency();
        assert!((kick_frequency() * 2.0 - c2).abs() < 1e-12);
        assert!((kick_frequency() - 32.703).abs() < 0.01);
    }

    #[test]
    fn test_kick_period() {
        assert_eq!(ctx(1, false, 0).kick_period(), 8);
        assert_eq!(ctx(2, false, 0).kick_period(), 4);
        assert_eq!(ctx(3, false, 0).kick_period(), 2);
        assert_eq!(ctx(4, false, 0).kick_period(), 2);
        assert_eq!(ctx(8, false, 0).kick_period(), 1);
        assert_eq!(ctx(0, false, 0).kick_period(), 8);
        assert_eq!(ctx(9, false, 0).kick_period(), 1);
    }

    #[test]
    fn test_selection_grid() {
        let cases = [
            ((1, false, 0), Some(PercussionHit::Kick)),
            ((1, false, 4), None),
            ((1, false, 8), Some(PercussionHit::Kick)),
            ((2, false, 4), Some(PercussionHit::Kick)),
            ((2, false, 2), None),
            ((1, true, 2), Some(PercussionHit::HiHat)),
            ((1, true, 3), None),
            ((4, true, 0), Some(PercussionHit::Kick)),
            ((4, true, 1), None),
            ((2, true, 6), Some(PercussionHit::HiHat)),
            ((4, true, 6), Some(PercussionHit::Kick)),
        ];
        for ((complexity, boss, step), expected) in cases {
            assert_eq!(
                select_percussion(&ctx(complexity, boss, step)),
                expected,
                "complexity={} boss={} step={}",
                complexity,
                boss,
                step
            );
        }
    }

    #[test]
    fn test_kick_takes_priority_over_hihat() {
        assert_eq!(
            select_percussion(&ctx(1, true, 0)),
            Some(PercussionHit::Kick)
        );
    }

    #[test]
    fn test_backbeat_predicate() {
        assert!(on_backbeat(&ctx(2, false, 4)));
        assert!(on_backbeat(&ctx(3, false, 12)));
        assert!(!on_backbeat(&ctx(1, false, 4)));
        assert!(!on_backbeat(&ctx(2, false, 5)));
    }

    #[test]
    fn test_kick_grid_shadows_backbeat_for_valid_complexities() {
        for complexity in 2..=8 {
            for step in (4..64).step_by(8) {
                assert_ne!(
                    select_percussion(&ctx(complexity, false, step)),
                    Some(PercussionHit::Snare)
                );
            }
        }
    }

    #[test]
    fn test_hit_properties() {
        assert_eq!(PercussionHit::HiHat.step_fraction(), 0.5);
        assert_eq!(PercussionHit::Snare.step_fraction(), 1.0);
        assert_eq!(PercussionHit::Kick.level(), 0.8);
        assert!(PercussionHit::Snare.tone().is_none());
        assert_eq!(
            PercussionHit::Kick.tone().map(|(_, env)| env),
            Some(EnvelopeKind::Decaying)
        );
    }
}
