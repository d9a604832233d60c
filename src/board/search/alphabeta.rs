//! The negamax node.

use crate::board::{EMPTY_MOVE, MAX_PLY};
use crate::tt::{score_from_tt, score_to_tt, Bound};

use super::constants::{MATE_SCORE, NULL_MOVE_MIN_PIECES, PARTIAL_SORT_COUNT, SCORE_INFINITE};
use super::SearchContext;

impl SearchContext<'_> {
    /// Alpha-beta negamax. Returns the score of the position at `ply` from
    /// the side-to-move perspective; fails hard at the window edges.
    pub(crate) fn alphabeta(
        &mut self,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
        allow_null: bool,
    ) -> i32 {
        let is_root = ply == 0;
        self.pv.reset(ply);

        if self.should_stop() {
            return 0;
        }

        if !is_root {
            if self.board.is_fifty_move_draw() || self.is_repetition() {
                return 0;
            }
            if ply >= MAX_PLY {
                return self.evaluate();
            }
        }

        if depth == 0 {
            return self.quiesce(alpha, beta, ply);
        }

        self.nodes += 1;
        self.bump_seldepth(ply);

        // Probe the table. The stored move always seeds ordering; the score
        // may cut the node off, but never at the root.
        let mut tt_move = EMPTY_MOVE;
        if let Some(entry) = self.state.tt.probe(self.board.hash()) {
            tt_move = entry.best_move();
            if !is_root && entry.depth() >= depth {
                let score = score_from_tt(entry.score(), ply);
                match entry.bound() {
                    Bound::Exact => return score,
                    Bound::Lower => alpha = alpha.max(score),
                    Bound::Upper => beta = beta.min(score),
                }
                if alpha >= beta {
                    return score;
                }
            }
        }

        let mover = self.board.side_to_move();
        let in_check = self.board.is_in_check(mover);

        // Null-move pruning: hand the opponent a free tempo and prune when
        // a reduced search still fails high. Suppressed in check and with
        // few pieces, where zugzwang would make the bound unsound.
        if allow_null
            && !is_root
            && depth >= 3
            && !in_check
            && self.board.piece_count() >= NULL_MOVE_MIN_PIECES
        {
            let r = if depth >= 6 { 3 } else { 2 };
            let info = self.board.make_null_move();
            self.evaluator.push_null();
            self.path.push(self.board.hash());

            let score = -self.alphabeta(depth - 1 - r, -beta, -beta + 1, ply + 1, false);

            self.path.pop();
            self.evaluator.pop();
            self.board.unmake_null_move(info);

            if self.stopped {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        let moves = self.board.generate_pseudo_moves();
        let mut scored = self.order_moves(&moves, tt_move, ply);
        scored.sort_top(PARTIAL_SORT_COUNT);

        let mut best_move = EMPTY_MOVE;
        let mut raised_alpha = false;
        let mut legal_moves = 0u32;
        let mut quiet_moves = 0u32;

        for i in 0..scored.len() {
            let m = scored.as_slice()[i].mv;

            let info = self.board.make_move(m);
            if self.board.is_in_check(mover) {
                self.board.unmake_move(info);
                continue;
            }
            legal_moves += 1;

            let is_quiet = !m.is_capture() && !m.is_promotion();
            if is_quiet {
                quiet_moves += 1;
            }
            let gives_check = self.board.is_in_check(self.board.side_to_move());

            self.evaluator.push_move(info.prior(), self.board, m);
            self.path.push(self.board.hash());

            // Late-move reduction: late quiet moves that do not give check
            // search shallower first and only re-search on improvement.
            let mut reduction = 0u32;
            if depth >= 3 && is_quiet && !gives_check && quiet_moves > 3 {
                reduction = 1;
                if quiet_moves > 6 {
                    reduction = 2;
                }
                if depth >= 6 && quiet_moves > 12 {
                    reduction = 3;
                }
            }

            let mut score = -self.alphabeta(
                depth - 1 - reduction.min(depth - 1),
                -beta,
                -alpha,
                ply + 1,
                true,
            );
            if reduction > 0 && score > alpha && !self.stopped {
                score = -self.alphabeta(depth - 1, -beta, -alpha, ply + 1, true);
            }

            self.path.pop();
            self.evaluator.pop();
            self.board.unmake_move(info);

            if self.stopped {
                return 0;
            }

            if score >= beta {
                self.record_cutoff(m, ply, depth);
                self.state.tt.store(
                    self.board.hash(),
                    depth,
                    score_to_tt(beta, ply),
                    Bound::Lower,
                    m,
                    self.state.generation,
                );
                return beta;
            }

            if score > alpha {
                alpha = score;
                best_move = m;
                raised_alpha = true;
                self.pv.record(ply, m);
                if is_root {
                    self.root_best = m;
                }
            }
        }

        if legal_moves == 0 {
            return if in_check {
                // Mated here: worse the closer to the root it happens
                -(MATE_SCORE - ply as i32)
            } else {
                0
            };
        }

        debug_assert!(alpha.abs() <= SCORE_INFINITE);
        let bound = if raised_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.state.tt.store(
            self.board.hash(),
            depth,
            score_to_tt(alpha, ply),
            bound,
            best_move,
            self.state.generation,
        );

        alpha
    }
}
