//! Iterative-deepening alpha-beta search.
//!
//! Features:
//! - Full-window negamax per iteration with triangular PV collection
//! - Quiescence search with stand-pat
//! - Null-move pruning and late-move reductions
//! - Move ordering (hash move, MVV-LVA captures, killers, history)
//! - Transposition table shared across iterations
//! - Cooperative stop flag and soft time management

mod alphabeta;
mod constants;
mod evaluator;
mod iterative;
mod move_order;
mod pv;
mod quiescence;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::tt::{TranspositionTable, DEFAULT_TT_MB};

use super::nnue::Network;
use super::{Board, Move, EMPTY_MOVE};

use evaluator::Evaluator;
use move_order::{HistoryTable, KillerTable};
use pv::PvTable;

pub use constants::MATE_SCORE;
pub(crate) use constants::MATE_THRESHOLD;

/// Limits for one search. Zero means unlimited for time and nodes.
#[derive(Clone, Debug)]
pub struct SearchLimits {
    /// Maximum iterative-deepening depth
    pub depth: u32,
    /// Soft time budget in milliseconds
    pub time_limit_ms: u64,
    /// Node budget
    pub node_limit: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            depth: constants::MAX_DEPTH,
            time_limit_ms: 0,
            node_limit: 0,
        }
    }
}

impl SearchLimits {
    /// Depth-limited search
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth,
            ..Default::default()
        }
    }

    /// Time-limited search
    #[must_use]
    pub fn time(time_limit_ms: u64) -> Self {
        SearchLimits {
            time_limit_ms,
            ..Default::default()
        }
    }
}

/// Progress report emitted after each completed iteration.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub depth: u32,
    pub seldepth: u32,
    /// Score in centipawns from the side to move
    pub score: i32,
    /// Moves to mate when the score is a forced mate, signed like the score
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub time_ms: u64,
    pub nps: u64,
    /// Transposition table fill, per mille
    pub hashfull: u32,
    /// Principal variation in long algebraic notation
    pub pv: String,
}

/// Callback receiving iteration reports.
pub type InfoCallback = Arc<dyn Fn(&SearchReport) + Send + Sync>;

/// Terminal result of a search.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// Best move of the deepest completed iteration, if any move is legal
    pub best_move: Option<Move>,
    /// Score of that iteration from the side to move
    pub score: i32,
}

/// State that survives across searches: the transposition table, the
/// ordering heuristics and the optional network weights.
pub struct SearchState {
    pub(crate) tt: TranspositionTable,
    pub(crate) killers: KillerTable,
    pub(crate) history: HistoryTable,
    pub(crate) generation: u16,
    network: Option<Arc<Network>>,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: TranspositionTable::new(tt_mb),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            generation: 0,
            network: None,
        }
    }

    /// Install or remove the neural evaluation weights.
    pub fn set_network(&mut self, network: Option<Arc<Network>>) {
        self.network = network;
    }

    #[must_use]
    pub fn has_network(&self) -> bool {
        self.network.is_some()
    }

    /// Replace the transposition table, e.g. after a Hash option change.
    pub fn reset_tt(&mut self, tt_mb: usize) {
        self.tt = TranspositionTable::new(tt_mb);
    }

    /// Per-search bookkeeping: killers are cleared, history decays, and the
    /// table generation advances for replacement decisions.
    fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.killers.clear();
        self.history.age();
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tt.hashfull_per_mille()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_MB)
    }
}

/// Run a search over `board` within `limits`.
///
/// `game_history` carries the Zobrist hashes of the game so far (ending
/// with the current position) for repetition detection; it may be empty.
/// Iteration reports go to `info`; the returned best move comes from the
/// deepest fully completed iteration.
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    limits: &SearchLimits,
    stop: &AtomicBool,
    info: Option<InfoCallback>,
    game_history: &[u64],
) -> SearchResult {
    iterative::run(board, state, limits, stop, info, game_history)
}

/// Depth-limited convenience wrapper.
pub fn find_best_move(
    board: &mut Board,
    state: &mut SearchState,
    depth: u32,
    stop: &AtomicBool,
) -> Option<Move> {
    search(board, state, &SearchLimits::depth(depth), stop, None, &[]).best_move
}

/// Everything one search invocation needs, borrowed together.
pub(crate) struct SearchContext<'a> {
    pub(crate) board: &'a mut Board,
    pub(crate) state: &'a mut SearchState,
    pub(crate) stop: &'a AtomicBool,
    pub(crate) evaluator: Evaluator,
    pub(crate) start: Instant,
    pub(crate) time_limit_ms: u64,
    pub(crate) node_limit: u64,
    pub(crate) nodes: u64,
    pub(crate) seldepth: u32,
    pub(crate) next_heartbeat: u64,
    pub(crate) stopped: bool,
    pub(crate) pv: PvTable,
    /// Position hashes from game start through the current node
    pub(crate) path: Vec<u64>,
    pub(crate) root_best: Move,
}

impl<'a> SearchContext<'a> {
    fn new(
        board: &'a mut Board,
        state: &'a mut SearchState,
        stop: &'a AtomicBool,
        limits: &SearchLimits,
        game_history: &[u64],
    ) -> Self {
        let evaluator = Evaluator::new(state.network.clone(), board);
        let mut path = game_history.to_vec();
        if path.last() != Some(&board.hash()) {
            path.push(board.hash());
        }

        SearchContext {
            board,
            state,
            stop,
            evaluator,
            start: Instant::now(),
            time_limit_ms: limits.time_limit_ms,
            node_limit: limits.node_limit,
            nodes: 0,
            seldepth: 0,
            next_heartbeat: constants::HEARTBEAT_INTERVAL,
            stopped: false,
            pv: PvTable::new(),
            path,
            root_best: EMPTY_MOVE,
        }
    }

    /// Cooperative stop check, run before every node. The clock is read on
    /// a coarse node granularity; an external request takes effect at once.
    #[inline]
    pub(crate) fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.stopped = true;
            return true;
        }
        if self.node_limit > 0 && self.nodes >= self.node_limit {
            self.stopped = true;
            return true;
        }
        if self.nodes >= self.next_heartbeat {
            self.next_heartbeat = self.nodes + constants::HEARTBEAT_INTERVAL;
            let elapsed = self.start.elapsed().as_millis() as u64;
            log::debug!(
                "heartbeat: {} nodes, {} ms, {} nps",
                self.nodes,
                elapsed,
                self.nodes * 1000 / elapsed.max(1)
            );
        }
        if self.time_limit_ms > 0 && self.nodes.trailing_zeros() >= 10 {
            let elapsed = self.start.elapsed().as_millis() as u64;
            if elapsed >= self.time_limit_ms {
                self.stopped = true;
                return true;
            }
        }
        false
    }

    #[inline]
    pub(crate) fn evaluate(&self) -> i32 {
        self.evaluator.evaluate(self.board)
    }

    /// Has the current position occurred before within the reversible-move
    /// window? Any such repetition scores as a draw in the search.
    pub(crate) fn is_repetition(&self) -> bool {
        let hash = self.board.hash();
        let len = self.path.len();
        if len < 2 {
            return false;
        }
        let window = (self.board.halfmove_clock() as usize).min(len - 1);
        self.path[len - 1 - window..len - 1]
            .iter()
            .any(|&h| h == hash)
    }

    #[inline]
    pub(crate) fn bump_seldepth(&mut self, ply: usize) {
        let depth = ply as u32 + 1;
        if depth > self.seldepth {
            self.seldepth = depth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_context<'a>(
        board: &'a mut Board,
        state: &'a mut SearchState,
        stop: &'a AtomicBool,
        history: &[u64],
    ) -> SearchContext<'a> {
        SearchContext::new(board, state, stop, &SearchLimits::default(), history)
    }

    #[test]
    fn test_repetition_detected_after_knight_shuffle() {
        let mut board = Board::new();
        let mut state = SearchState::new(1);
        let stop = AtomicBool::new(false);
        let mut ctx = make_context(&mut board, &mut state, &stop, &[]);

        assert!(!ctx.is_repetition());
        for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            let parsed = ctx.board.parse_move(mv).unwrap();
            ctx.board.make_move(parsed);
            ctx.path.push(ctx.board.hash());
        }
        // Back at the start position, which the path already holds
        assert!(ctx.is_repetition());
    }

    #[test]
    fn test_repetition_window_respects_halfmove_clock() {
        // The game history repeats the current hash, but an intervening
        // irreversible move reset the clock, closing the window
        let mut board = Board::from_fen("7k/8/8/8/8/8/8/R6K w - - 0 1");
        let hash = board.hash();
        let mut state = SearchState::new(1);
        let stop = AtomicBool::new(false);
        let history = vec![hash, 1, 2, hash];
        let ctx = make_context(&mut board, &mut state, &stop, &history);

        assert!(!ctx.is_repetition());
    }

    #[test]
    fn test_game_history_feeds_repetition() {
        let mut board = Board::from_fen("7k/8/8/8/8/8/8/R6K w - - 8 20");
        let hash = board.hash();
        let mut state = SearchState::new(1);
        let stop = AtomicBool::new(false);
        let history = vec![hash, 1, 2, hash];
        let ctx = make_context(&mut board, &mut state, &stop, &history);

        assert!(ctx.is_repetition());
    }
}
