//! Evaluation backend selected once per search.
//!
//! A sum type rather than a trait object: the evaluate call sits on the
//! hottest path in the engine and must not go through dynamic dispatch.

use std::sync::Arc;

use crate::board::nnue::{AccumulatorStack, Network};
use crate::board::{Board, Move};

/// Static evaluations are kept far away from the mate-score band
const EVAL_CLAMP: i32 = 25_000;

pub(crate) enum Evaluator {
    /// Material + piece-square tables
    Classical,
    /// Quantized network with an incrementally maintained accumulator
    Neural {
        network: Arc<Network>,
        stack: AccumulatorStack,
    },
}

impl Evaluator {
    /// Build the backend for a search rooted at `board`.
    pub fn new(network: Option<Arc<Network>>, board: &Board) -> Self {
        match network {
            Some(network) => {
                let stack = AccumulatorStack::new(&network, board);
                Evaluator::Neural { network, stack }
            }
            None => Evaluator::Classical,
        }
    }

    /// Static evaluation of `board` from the side-to-move perspective.
    #[inline]
    pub fn evaluate(&self, board: &Board) -> i32 {
        let score = match self {
            Evaluator::Classical => board.evaluate(),
            Evaluator::Neural { network, stack } => {
                stack.evaluate(network, board.white_to_move())
            }
        };
        score.clamp(-EVAL_CLAMP, EVAL_CLAMP)
    }

    /// Mirror a made move onto the accumulator stack.
    #[inline]
    pub fn push_move(&mut self, prior: &Board, board: &Board, m: Move) {
        if let Evaluator::Neural { network, stack } = self {
            stack.push_move(network, prior, board, m);
        }
    }

    /// Mirror a null move (unchanged copy).
    #[inline]
    pub fn push_null(&mut self) {
        if let Evaluator::Neural { stack, .. } = self {
            stack.push_null();
        }
    }

    /// Mirror an unmake.
    #[inline]
    pub fn pop(&mut self) {
        if let Evaluator::Neural { stack, .. } = self {
            stack.pop();
        }
    }
}
