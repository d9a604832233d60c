//! Draw detection tests.

use std::sync::atomic::AtomicBool;

use crate::board::{search, Board, SearchLimits, SearchState};

#[test]
fn test_fifty_move_rule_flag() {
    let board = Board::from_fen("7k/8/8/8/8/8/8/R6K w - - 99 80");
    assert!(!board.is_fifty_move_draw());
    let board = Board::from_fen("7k/8/8/8/8/8/8/R6K w - - 100 80");
    assert!(board.is_fifty_move_draw());
}

#[test]
fn test_search_sees_fifty_move_draw_coming() {
    // Up a full rook, but every legal move ticks the clock to 100
    let mut board = Board::from_fen("7k/8/8/8/8/8/8/R6K w - - 99 80");
    let mut state = SearchState::new(1);
    let stop = AtomicBool::new(false);

    let result = search(
        &mut board,
        &mut state,
        &SearchLimits::depth(3),
        &stop,
        None,
        &[],
    );
    assert_eq!(result.score, 0);
}

#[test]
fn test_shuffling_knights_reproduce_start_hash() {
    let mut board = Board::new();
    let start_hash = board.hash();
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        board.make_move_uci(mv).unwrap();
    }
    // Same position, same side to move; only the move counters moved on
    assert_eq!(board.hash(), start_hash);
}

#[test]
fn test_insufficient_material() {
    assert!(Board::from_fen("7k/8/8/8/8/8/8/7K w - - 0 1").is_insufficient_material());
    assert!(Board::from_fen("7k/8/8/8/8/8/8/5N1K w - - 0 1").is_insufficient_material());
    assert!(Board::from_fen("7k/8/8/8/8/8/8/5B1K w - - 0 1").is_insufficient_material());
    // Same-colored bishops cannot mate (c8 and f1 are both light squares)
    assert!(Board::from_fen("2b4k/8/8/8/8/8/8/5B1K w - - 0 1").is_insufficient_material());
    // Opposite-colored bishops retain mating chances
    assert!(!Board::from_fen("5b1k/8/8/8/8/8/8/5B1K w - - 0 1").is_insufficient_material());
    // A pawn, rook or queen keeps mating chances alive
    assert!(!Board::from_fen("7k/8/8/8/8/8/P7/7K w - - 0 1").is_insufficient_material());
    assert!(!Board::from_fen("7k/8/8/8/8/8/8/R6K w - - 0 1").is_insufficient_material());
    // Two knights count as sufficient here
    assert!(!Board::from_fen("7k/8/8/8/8/8/8/4NN1K w - - 0 1").is_insufficient_material());
}
