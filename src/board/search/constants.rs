//! Search tuning constants.

/// Window bound; no real score ever reaches it
pub(crate) const SCORE_INFINITE: i32 = 30_000;

/// Checkmate at the root scores this; mate at ply `p` scores `MATE_SCORE - p`
pub const MATE_SCORE: i32 = 29_000;

/// Scores at least this close to mate are reported as `mate N`
pub(crate) const MATE_THRESHOLD: i32 = MATE_SCORE - 100;

/// Default iterative-deepening ceiling when no depth limit is given
pub(crate) const MAX_DEPTH: u32 = 64;

// Move ordering scores
pub(crate) const HASH_MOVE_SCORE: i32 = 1_000_000;
pub(crate) const GOOD_CAPTURE_BONUS: i32 = 100_000;
pub(crate) const BAD_CAPTURE_PENALTY: i32 = 200_000;
pub(crate) const KILLER_SCORE: i32 = 90_000;

/// History entries are halved when one crosses this value
pub(crate) const HISTORY_LIMIT: i32 = 100_000;

/// Only this many moves are selection-sorted; the tail keeps generation order
pub(crate) const PARTIAL_SORT_COUNT: usize = 12;

/// Node interval between log heartbeats and clock reads
pub(crate) const HEARTBEAT_INTERVAL: u64 = 100_000;

/// Null-move pruning is suppressed at or below 7 pieces (zugzwang guard)
pub(crate) const NULL_MOVE_MIN_PIECES: u32 = 8;

/// Fraction of the time budget after which no deeper iteration starts
pub(crate) const SOFT_TIME_NUMERATOR: u64 = 4;
pub(crate) const SOFT_TIME_DENOMINATOR: u64 = 10;
