//! A UCI chess engine core.
//!
//! The crate exposes a programmatic search interface: build a [`board::Board`],
//! a [`board::SearchState`] and [`board::SearchLimits`], then call
//! [`board::search`] to receive iteration reports and a best move. The
//! [`uci`] module wraps this in the line-oriented UCI protocol.

pub mod board;
pub mod tt;
pub mod uci;

mod zobrist;
