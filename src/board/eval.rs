//! Classical evaluation: material, piece-square tables, bishop pair and a
//! king-safety table blend.

use super::pst::{
    pst_index, BISHOP_PST, KING_EG_PST, KING_MG_PST, KNIGHT_PST, PAWN_PST, QUEEN_PST, ROOK_PST,
};
use super::{Board, Color, Piece};

/// Bonus for holding both bishops, in centipawns
const BISHOP_PAIR_BONUS: i32 = 30;

/// Below this much total non-pawn material the king walks to the center
const ENDGAME_MATERIAL: i32 = 1500;

impl Board {
    /// Static evaluation in centipawns from the side-to-move perspective.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        let endgame = self.material < ENDGAME_MATERIAL;
        let mut scores = [0i32; 2];

        for color in [Color::White, Color::Black] {
            let c_idx = color.index();
            let is_white = color == Color::White;
            let mut score = 0;

            for piece in [
                Piece::Pawn,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
            ] {
                let table = match piece {
                    Piece::Pawn => &PAWN_PST,
                    Piece::Knight => &KNIGHT_PST,
                    Piece::Bishop => &BISHOP_PST,
                    Piece::Rook => &ROOK_PST,
                    _ => &QUEEN_PST,
                };
                for sq in self.pieces[c_idx][piece.index()].iter() {
                    score += piece.value() + table[pst_index(sq.index(), is_white)];
                }
            }

            let king_table = if endgame { &KING_EG_PST } else { &KING_MG_PST };
            for sq in self.pieces[c_idx][Piece::King.index()].iter() {
                score += Piece::King.value() + king_table[pst_index(sq.index(), is_white)];
            }

            if self.pieces[c_idx][Piece::Bishop.index()].popcount() >= 2 {
                score += BISHOP_PAIR_BONUS;
            }

            scores[c_idx] = score;
        }

        let mut score = scores[0] - scores[1];
        if !self.white_to_move {
            score = -score;
        }

        // Move-number jitter keeps near-repetitions from evaluating
        // identically, which would let the search shuffle in place.
        score + (self.fullmove_number * 7 % 10) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_is_roughly_balanced() {
        let board = Board::new();
        assert!(board.evaluate().abs() < 30);
    }

    #[test]
    fn test_extra_queen_dominates() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1");
        assert!(board.evaluate() > 800);
        let board = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1");
        assert!(board.evaluate() < -800);
    }

    #[test]
    fn test_bishop_pair_counts() {
        let pair = Board::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1");
        let single = Board::from_fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1");
        let diff = pair.evaluate() - single.evaluate();
        // One bishop plus the pair bonus, modulo square bonuses
        assert!(diff > Piece::Bishop.value());
    }

    #[test]
    fn test_bare_kings_near_zero() {
        let board = Board::from_fen("7k/8/8/8/8/8/8/7K w - - 0 1");
        // Only king-table noise and the move-number jitter remain
        assert!(board.evaluate().abs() < 60);
    }
}
