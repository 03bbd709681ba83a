//! Experience and level progression.

/// Threshold a freshly created player needs to reach level 2.
pub const STARTING_XP_TO_NEXT_LEVEL: i64 = 100;

/// A player's position on the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub level: i64,
    pub xp: i64,
    pub xp_to_next_level: i64,
}

/// Adds `xp_earned` to `progress` and applies at most one level-up.
///
/// When the sum reaches the threshold the level goes up by one, the threshold
/// is subtracted from the xp and the new threshold is `floor(1.5 * old)`.
/// Overflow past the new threshold is kept as-is and is not re-checked.
///
/// Returns `None` when any value would leave the `i64` range.
pub fn apply_xp(progress: Progress, xp_earned: i64) -> Option<Progress> {
    let xp = progress.xp.checked_add(xp_earned)?;
    if xp < progress.xp_to_next_level {
        return Some(Progress { xp, ..progress });
    }

    Some(Progress {
        level: progress.level.checked_add(1)?,
        xp: xp - progress.xp_to_next_level,
        xp_to_next_level: next_threshold(progress.xp_to_next_level)?,
    })
}

fn next_threshold(threshold: i64) -> Option<i64> {
    threshold.checked_add(threshold / 2)
}
