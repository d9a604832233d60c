use crate::zobrist::ZOBRIST;

use super::{Bitboard, CastlingRights, Color, Piece, Square};

/// The authoritative position: twelve piece bitboards plus game state.
///
/// Invariants: the piece bitboards are pairwise disjoint and their union is
/// `all_occupied`; exactly one king per color; `hash` is the XOR of the
/// Zobrist keys for every piece-square, the castling mask, the en passant
/// file (if any) and the side to move (if black); `material` caches the
/// non-pawn material of both sides in centipawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) white_to_move: bool,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) halfmove_clock: u8,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) material: i32,
}

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            board.set_piece(Square::new(0, file), Color::White, *piece);
            board.set_piece(Square::new(1, file), Color::White, Piece::Pawn);
            board.set_piece(Square::new(6, file), Color::Black, Piece::Pawn);
            board.set_piece(Square::new(7, file), Color::Black, *piece);
        }

        board.castling_rights = CastlingRights::all();
        board.hash = board.calculate_hash();
        board.material = board.calculate_material();
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            white_to_move: true,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            material: 0,
        }
    }

    /// Zobrist hash of the position
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.white_to_move
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub(crate) fn side_to_move(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Total number of pieces on the board, kings included
    #[inline]
    pub(crate) fn piece_count(&self) -> u32 {
        self.all_occupied.popcount()
    }

    /// Compute the position hash from scratch. Must always equal the
    /// incrementally maintained `hash` field.
    pub(crate) fn calculate_hash(&self) -> u64 {
        let mut hash = 0u64;

        for color in [Color::White, Color::Black] {
            for p_idx in 0..6 {
                for sq in self.pieces[color.index()][p_idx].iter() {
                    hash ^= ZOBRIST.piece_key(Piece::from_index(p_idx), color, sq);
                }
            }
        }

        hash ^= ZOBRIST.castling_keys[self.castling_rights.as_mask() as usize];

        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_keys[ep.file()];
        }

        if !self.white_to_move {
            hash ^= ZOBRIST.black_to_move_key;
        }

        hash
    }

    /// Non-pawn material of both sides from scratch
    pub(crate) fn calculate_material(&self) -> i32 {
        let mut total = 0;
        for c_idx in 0..2 {
            for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
                total += self.pieces[c_idx][piece.index()].popcount() as i32 * piece.value();
            }
        }
        total
    }

    /// Draw by the fifty-move rule
    #[inline]
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can ever deliver mate: bare kings, a lone minor, or
    /// same-colored bishops only.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy_or_pawn = [Piece::Pawn, Piece::Rook, Piece::Queen]
            .iter()
            .any(|p| {
                !self.pieces[0][p.index()].is_empty() || !self.pieces[1][p.index()].is_empty()
            });
        if heavy_or_pawn {
            return false;
        }

        let knights = self.pieces[0][Piece::Knight.index()]
            .or(self.pieces[1][Piece::Knight.index()]);
        let bishops = self.pieces[0][Piece::Bishop.index()]
            .or(self.pieces[1][Piece::Bishop.index()]);
        let minors = knights.popcount() + bishops.popcount();

        if minors <= 1 {
            return true;
        }
        if knights.is_empty() && bishops.popcount() == 2 {
            return bishops_on_one_color(bishops);
        }
        false
    }
}

fn bishops_on_one_color(bishops: Bitboard) -> bool {
    const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;
    bishops.0 & LIGHT_SQUARES == 0 || bishops.0 & !LIGHT_SQUARES == 0
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
