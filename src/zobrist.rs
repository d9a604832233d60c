//! Zobrist hashing for chess positions.
//!
//! Fixed-seed key tables so that every engine instance agrees on hashes;
//! required for repetition detection and reproducible search.

use rand::prelude::*;

use crate::board::{Color, Piece, Square};

pub(crate) struct ZobristKeys {
    /// piece_keys[piece][color][square]
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) black_to_move_key: u64,
    /// One key per 4-bit castling-rights mask value
    pub(crate) castling_keys: [u64; 16],
    /// en_passant_keys[file]
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x9E37_79B9_7F4A_7C15);
        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        let mut castling_keys = [0u64; 16];
        let mut en_passant_keys = [0u64; 8];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for key in &mut castling_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece_key(&self, piece: Piece, color: Color, sq: Square) -> u64 {
        self.piece_keys[piece.index()][color.index()][sq.index()]
    }
}

pub(crate) static ZOBRIST: std::sync::LazyLock<ZobristKeys> =
    std::sync::LazyLock::new(ZobristKeys::new);
