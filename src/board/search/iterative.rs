//! The iterative-deepening driver.

use std::sync::atomic::AtomicBool;

use crate::board::{Board, EMPTY_MOVE};

use super::constants::{
    MATE_THRESHOLD, MAX_DEPTH, SCORE_INFINITE, SOFT_TIME_DENOMINATOR, SOFT_TIME_NUMERATOR,
};
use super::{
    InfoCallback, SearchContext, SearchLimits, SearchReport, SearchResult, SearchState, MATE_SCORE,
};

/// Search depth 1, 2, 3, ... until a limit trips. Each completed iteration
/// updates the best move and emits one report; a stopped iteration is
/// discarded wholesale so results always come from a finished depth.
pub(crate) fn run(
    board: &mut Board,
    state: &mut SearchState,
    limits: &SearchLimits,
    stop: &AtomicBool,
    info: Option<InfoCallback>,
    game_history: &[u64],
) -> SearchResult {
    state.new_search();

    let legal = board.generate_moves();
    if legal.is_empty() {
        return SearchResult {
            best_move: None,
            score: 0,
        };
    }

    let max_depth = limits.depth.clamp(1, MAX_DEPTH);
    let mut ctx = SearchContext::new(board, state, stop, limits, game_history);

    // Fall back to any legal move if even depth 1 is cut short
    let mut best_move = legal.first();
    let mut best_score = 0;

    for depth in 1..=max_depth {
        if ctx.should_stop() {
            break;
        }

        // Do not start an iteration unlikely to finish: past 40% of the
        // budget the next depth would almost certainly be cut off anyway.
        if ctx.time_limit_ms > 0 && depth > 1 {
            let elapsed = ctx.start.elapsed().as_millis() as u64;
            if elapsed * SOFT_TIME_DENOMINATOR > ctx.time_limit_ms * SOFT_TIME_NUMERATOR {
                break;
            }
        }

        ctx.pv.clear();
        ctx.seldepth = 0;
        ctx.root_best = EMPTY_MOVE;

        let score = ctx.alphabeta(depth, -SCORE_INFINITE, SCORE_INFINITE, 0, true);

        if ctx.stopped {
            break;
        }

        if ctx.root_best != EMPTY_MOVE {
            best_move = Some(ctx.root_best);
            best_score = score;
        }

        if let Some(callback) = &info {
            let elapsed = ctx.start.elapsed().as_millis() as u64;
            let mate_in = if score.abs() < MATE_THRESHOLD {
                None
            } else if score > 0 {
                Some((MATE_SCORE - score + 1) / 2)
            } else {
                Some(-((MATE_SCORE + score + 1) / 2))
            };
            callback(&SearchReport {
                depth,
                seldepth: ctx.seldepth,
                score,
                mate_in,
                nodes: ctx.nodes,
                time_ms: elapsed,
                nps: ctx.nodes * 1000 / elapsed.max(1),
                hashfull: ctx.state.tt.hashfull_per_mille(),
                pv: ctx.pv.line_string(),
            });
        }

        // A proven mate cannot improve with depth
        if score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    SearchResult {
        best_move,
        score: best_score,
    }
}
