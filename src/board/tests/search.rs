//! Search behavior tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::board::search::{MATE_SCORE, MATE_THRESHOLD};
use crate::board::{
    find_best_move, search, Board, InfoCallback, SearchLimits, SearchReport, SearchState,
};

fn run_search(fen: &str, depth: u32) -> (Option<String>, i32, Vec<SearchReport>) {
    let mut board = Board::from_fen(fen);
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);

    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let info: InfoCallback = Arc::new(move |report: &SearchReport| {
        sink.lock().unwrap().push(report.clone());
    });

    let result = search(
        &mut board,
        &mut state,
        &SearchLimits::depth(depth),
        &stop,
        Some(info),
        &[],
    );

    let collected = reports.lock().unwrap().clone();
    (result.best_move.map(|m| m.to_string()), result.score, collected)
}

#[test]
fn test_startpos_opening_move_is_sensible() {
    let (best, _, _) = run_search(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        4,
    );
    let best = best.expect("a best move must exist");
    assert!(
        ["e2e4", "d2d4", "g1f3", "b1c3", "c2c4"].contains(&best.as_str()),
        "dubious opening move {best}"
    );
}

#[test]
fn test_mate_in_one_is_found() {
    let (best, score, reports) = run_search("6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1", 4);
    assert_eq!(best.as_deref(), Some("d1d8"));
    assert_eq!(score, MATE_SCORE - 1);
    let last = reports.last().expect("at least one report");
    assert_eq!(last.mate_in, Some(1));
}

#[test]
fn test_rook_endgame_mating_line() {
    let (best, score, reports) = run_search("8/8/8/8/8/8/R7/4K2k w - - 0 1", 14);
    assert!(best.is_some());
    assert!(score >= MATE_THRESHOLD, "expected forced mate, got {score}");
    let last = reports.last().unwrap();
    let mate_in = last.mate_in.expect("mate should be reported");
    assert!(mate_in > 0);
    assert!(!last.pv.is_empty());
}

#[test]
fn test_mated_side_reports_negative_mate() {
    // Black to move, about to be mated by d1d8
    let (_, score, reports) = run_search("6k1/5ppp/8/3R4/8/8/5PPP/6K1 b - - 0 1", 5);
    if score <= -MATE_THRESHOLD {
        let last = reports.last().unwrap();
        assert!(last.mate_in.unwrap_or(0) < 0);
    }
}

#[test]
fn test_bare_kings_returns_any_legal_move() {
    let mut board = Board::from_fen("7k/8/8/8/8/8/8/7K w - - 0 1");
    let legal = board.generate_moves();
    let (best, score, _) = run_search("7k/8/8/8/8/8/8/7K w - - 0 1", 4);
    let best = best.expect("a king move must come back");
    assert!(legal.iter().any(|m| m.to_string() == best));
    assert!(score.abs() < 60);
}

#[test]
fn test_black_reply_after_ruy_lopez() {
    let mut board = Board::new();
    for mv in ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"] {
        board.make_move_uci(mv).unwrap();
    }
    let legal = board.generate_moves();

    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);
    let result = search(
        &mut board,
        &mut state,
        &SearchLimits::depth(4),
        &stop,
        None,
        &[],
    );
    let best = result.best_move.expect("black must have a reply");
    assert!(legal.contains(best));
}

#[test]
fn test_no_legal_moves_yields_none() {
    // Stalemate: black king in the corner, no move, no check
    let (best, score, _) = run_search("7k/5Q2/8/8/8/8/8/K7 b - - 0 1", 3);
    assert_eq!(best, None);
    assert_eq!(score, 0);

    // Back-rank checkmate: no move either
    let (best, _, _) = run_search("4R1k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", 3);
    assert_eq!(best, None);
}

#[test]
fn test_stop_flag_aborts_quickly_with_fallback_move() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);
    stop.store(true, Ordering::Relaxed);

    let result = search(
        &mut board,
        &mut state,
        &SearchLimits::depth(30),
        &stop,
        None,
        &[],
    );
    // Even an instant stop yields a legal bestmove
    let best = result.best_move.expect("fallback move expected");
    let legal = Board::new().generate_moves();
    assert!(legal.iter().any(|&m| m == best));
}

#[test]
fn test_depth_limit_is_respected_in_reports() {
    let (_, _, reports) = run_search(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        3,
    );
    assert!(!reports.is_empty());
    assert!(reports.iter().all(|r| r.depth <= 3));
    // Depths arrive in increasing order, each fully reported
    for pair in reports.windows(2) {
        assert!(pair[0].depth < pair[1].depth);
    }
    for report in &reports {
        assert!(report.nodes > 0);
        assert!(!report.pv.is_empty());
    }
}

#[test]
fn test_find_best_move_wrapper() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);
    let best = find_best_move(&mut board, &mut state, 3, &stop);
    assert!(best.is_some());
}

#[test]
fn test_tt_reuse_across_iterations_is_consistent() {
    // The same search run twice from a fresh state must agree with itself
    let (best_a, score_a, _) = run_search(
        "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        5,
    );
    let (best_b, score_b, _) = run_search(
        "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        5,
    );
    assert_eq!(best_a, best_b);
    assert_eq!(score_a, score_b);
}
