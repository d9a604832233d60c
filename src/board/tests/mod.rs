//! Board and search test suites.

mod draw;
mod eval;
mod search;

use super::Board;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[test]
fn test_startpos_fen_roundtrip_is_exact() {
    let board = Board::from_fen(START_FEN);
    assert_eq!(board.to_fen(), START_FEN);
    assert_eq!(Board::new().to_fen(), START_FEN);
}

#[test]
fn test_fen_defaults_for_missing_counters() {
    let board = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.fullmove_number(), 1);
}

#[test]
fn test_fen_rejects_garbage() {
    assert!(Board::try_from_fen("").is_err());
    assert!(Board::try_from_fen("only two fields").is_err());
    assert!(Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err());
    assert!(Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1").is_err());
    assert!(Board::try_from_fen("rnbqkbnX/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
}

#[test]
fn test_startpos_has_twenty_moves() {
    let mut board = Board::new();
    assert_eq!(board.generate_moves().len(), 20);
}

#[test]
fn test_kiwipete_has_forty_eight_moves() {
    let mut board = Board::from_fen(KIWIPETE_FEN);
    assert_eq!(board.generate_moves().len(), 48);
}

#[test]
fn test_parse_move_accepts_legal_rejects_illegal() {
    let mut board = Board::new();
    assert!(board.parse_move("e2e4").is_ok());
    assert!(board.parse_move("e2e5").is_err());
    assert!(board.parse_move("e7e5").is_err()); // black's move, white to play
    assert!(board.parse_move("xyz").is_err());
    assert!(board.parse_move("e2e4qq").is_err());
    // A rejected move leaves the board untouched
    assert_eq!(board.to_fen(), START_FEN);
}

#[test]
fn test_make_move_uci_advances_position() {
    let mut board = Board::new();
    board.make_move_uci("e2e4").unwrap();
    board.make_move_uci("c7c5").unwrap();
    assert_eq!(
        board.to_fen(),
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2"
    );
}

#[test]
fn test_hash_differs_between_positions() {
    let mut board = Board::new();
    let start_hash = board.hash();
    board.make_move_uci("e2e4").unwrap();
    assert_ne!(board.hash(), start_hash);
}

#[test]
fn test_material_cache_matches_recount() {
    let board = Board::from_fen(KIWIPETE_FEN);
    assert_eq!(board.material, board.calculate_material());
}
