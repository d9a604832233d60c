//! Universal Chess Interface protocol loop.
//!
//! A thin line-oriented wrapper over the programmatic search API. The
//! reader loop stays responsive while a search runs on a worker thread;
//! `stop` flips the shared flag the search polls cooperatively.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::board::nnue::Network;
use crate::board::{
    search, Board, FenError, InfoCallback, MoveParseError, SearchLimits, SearchReport, SearchState,
};
use crate::tt::DEFAULT_TT_MB;

const ENGINE_NAME: &str = concat!("palisade ", env!("CARGO_PKG_VERSION"));
const ENGINE_AUTHOR: &str = "the palisade authors";

const MIN_HASH_MB: usize = 1;
const MAX_HASH_MB: usize = 4096;

/// Deep recursion plus per-frame board snapshots want room to breathe
const SEARCH_STACK_BYTES: usize = 32 * 1024 * 1024;

/// Error type for UCI command parsing
#[derive(Debug)]
pub enum UciError {
    /// Invalid FEN in a position command
    InvalidFen(FenError),
    /// Invalid move in a position command's move list
    InvalidMove {
        move_str: String,
        error: MoveParseError,
    },
    /// Command is missing required tokens
    MissingParts,
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "Missing required parts in command"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

struct Engine {
    board: Board,
    /// Zobrist hashes of the game so far, current position last
    game_history: Vec<u64>,
    state: Arc<Mutex<SearchState>>,
    stop: Arc<AtomicBool>,
    search_thread: Option<JoinHandle<()>>,
    hash_mb: usize,
    /// Weights loading failed once; stay classical for the process
    network_failed: bool,
}

impl Engine {
    fn new() -> Self {
        let board = Board::new();
        let game_history = vec![board.hash()];
        Engine {
            board,
            game_history,
            state: Arc::new(Mutex::new(SearchState::new(DEFAULT_TT_MB))),
            stop: Arc::new(AtomicBool::new(false)),
            search_thread: None,
            hash_mb: DEFAULT_TT_MB,
            network_failed: false,
        }
    }

    fn handle_uci(&self) {
        println!("id name {ENGINE_NAME}");
        println!("id author {ENGINE_AUTHOR}");
        println!(
            "option name Hash type spin default {DEFAULT_TT_MB} min {MIN_HASH_MB} max {MAX_HASH_MB}"
        );
        println!("option name EvalFile type string default <empty>");
        println!("uciok");
    }

    fn handle_setoption(&mut self, parts: &[&str]) {
        // setoption name <id> [value <x>]
        let Some(name_pos) = parts.iter().position(|&p| p == "name") else {
            eprintln!("Error: {}", UciError::MissingParts);
            return;
        };
        let value_pos = parts
            .iter()
            .position(|&p| p == "value")
            .filter(|&pos| pos > name_pos);
        let name = parts[name_pos + 1..value_pos.unwrap_or(parts.len())].join(" ");
        let value = value_pos.map(|pos| parts[pos + 1..].join(" "));

        match name.to_ascii_lowercase().as_str() {
            "hash" => {
                let Some(mb) = value.as_deref().and_then(|v| v.parse::<usize>().ok()) else {
                    eprintln!("Error: invalid Hash value");
                    return;
                };
                self.hash_mb = mb.clamp(MIN_HASH_MB, MAX_HASH_MB);
                self.state.lock().reset_tt(self.hash_mb);
            }
            "evalfile" => {
                let Some(path) = value.filter(|v| !v.is_empty() && v != "<empty>") else {
                    self.state.lock().set_network(None);
                    return;
                };
                self.load_network(&path);
            }
            other => eprintln!("Error: unknown option '{other}'"),
        }
    }

    /// One failure disables neural evaluation for the rest of the process;
    /// the search always has the classical fallback.
    fn load_network(&mut self, path: &str) {
        if self.network_failed {
            return;
        }
        match Network::load(path) {
            Ok(network) => {
                log::info!("loaded network weights from {path}");
                self.state.lock().set_network(Some(Arc::new(network)));
            }
            Err(e) => {
                log::warn!("failed to load network weights from {path}: {e}");
                self.network_failed = true;
                self.state.lock().set_network(None);
            }
        }
    }

    fn handle_ucinewgame(&mut self) {
        self.stop_search();
        self.board = Board::new();
        self.game_history = vec![self.board.hash()];
        let hash_mb = self.hash_mb;
        self.state.lock().reset_tt(hash_mb);
    }

    /// Parse a position command without touching engine state on failure.
    fn try_parse_position(&self, parts: &[&str]) -> Result<(Board, Vec<u64>), UciError> {
        let mut i = 1;
        let mut board = if parts.get(i) == Some(&"startpos") {
            i += 1;
            Board::new()
        } else if parts.get(i) == Some(&"fen") {
            if i + 6 >= parts.len() {
                return Err(UciError::MissingParts);
            }
            let fen = parts[i + 1..i + 7].join(" ");
            i += 7;
            Board::try_from_fen(&fen)?
        } else {
            return Err(UciError::MissingParts);
        };

        let mut history = vec![board.hash()];
        if parts.get(i) == Some(&"moves") {
            i += 1;
            while i < parts.len() {
                board
                    .parse_move(parts[i])
                    .map(|mv| board.make_move(mv))
                    .map_err(|error| UciError::InvalidMove {
                        move_str: parts[i].to_string(),
                        error,
                    })?;
                history.push(board.hash());
                i += 1;
            }
        }

        Ok((board, history))
    }

    fn handle_position(&mut self, parts: &[&str]) {
        match self.try_parse_position(parts) {
            Ok((board, history)) => {
                self.board = board;
                self.game_history = history;
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    fn handle_go(&mut self, parts: &[&str]) {
        self.stop_search();

        let limits = parse_go_limits(parts, self.board.white_to_move());

        self.stop.store(false, Ordering::Relaxed);
        let stop = Arc::clone(&self.stop);
        let state = Arc::clone(&self.state);
        let mut board = self.board;
        let history = self.game_history.clone();

        let spawned = std::thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_BYTES)
            .spawn(move || {
                let info: InfoCallback = Arc::new(print_info);
                let mut state = state.lock();
                let result = search(&mut board, &mut state, &limits, &stop, Some(info), &history);
                match result.best_move {
                    Some(mv) => println!("bestmove {mv}"),
                    None => println!("bestmove 0000"),
                }
                io::stdout().flush().ok();
            });

        match spawned {
            Ok(handle) => self.search_thread = Some(handle),
            Err(e) => {
                log::error!("failed to spawn search thread: {e}");
                println!("bestmove 0000");
            }
        }
    }

    fn stop_search(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.search_thread.take() {
            handle.join().ok();
        }
    }
}

/// Run the UCI loop over stdin until `quit`.
pub fn run() {
    let stdin = io::stdin();
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };

        match command {
            "uci" => engine.handle_uci(),
            "isready" => println!("readyok"),
            "setoption" => engine.handle_setoption(&parts),
            "ucinewgame" => engine.handle_ucinewgame(),
            "position" => engine.handle_position(&parts),
            "go" => engine.handle_go(&parts),
            "stop" => engine.stop_search(),
            "quit" => {
                engine.stop_search();
                break;
            }
            other => eprintln!("Error: unknown command '{other}'"),
        }
        io::stdout().flush().ok();
    }

    // Input closed without an explicit quit
    engine.stop_search();
}

/// Translate `go` tokens into search limits. With only a game clock, a
/// thirtieth of the remaining time plus half the increment is budgeted.
fn parse_go_limits(parts: &[&str], white_to_move: bool) -> SearchLimits {
    let mut limits = SearchLimits::default();
    let mut wtime: Option<u64> = None;
    let mut btime: Option<u64> = None;
    let mut winc = 0u64;
    let mut binc = 0u64;

    let mut i = 1;
    while i < parts.len() {
        let value = parts.get(i + 1).and_then(|v| v.parse::<u64>().ok());
        match parts[i] {
            "depth" => {
                if let Some(v) = value {
                    limits.depth = v as u32;
                }
                i += 2;
            }
            "movetime" => {
                if let Some(v) = value {
                    limits.time_limit_ms = v;
                }
                i += 2;
            }
            "nodes" => {
                if let Some(v) = value {
                    limits.node_limit = v;
                }
                i += 2;
            }
            "wtime" => {
                wtime = value;
                i += 2;
            }
            "btime" => {
                btime = value;
                i += 2;
            }
            "winc" => {
                winc = value.unwrap_or(0);
                i += 2;
            }
            "binc" => {
                binc = value.unwrap_or(0);
                i += 2;
            }
            "infinite" => {
                limits.time_limit_ms = 0;
                i += 1;
            }
            _ => i += 1,
        }
    }

    if limits.time_limit_ms == 0 {
        let (time, inc) = if white_to_move {
            (wtime, winc)
        } else {
            (btime, binc)
        };
        if let Some(time) = time {
            limits.time_limit_ms = (time / 30 + inc / 2).clamp(1, time.saturating_sub(50).max(1));
        }
    }

    limits
}

fn print_info(report: &SearchReport) {
    let score = match report.mate_in {
        Some(n) => format!("mate {n}"),
        None => format!("cp {}", report.score),
    };
    let mut line = format!(
        "info depth {} seldepth {} score {} nodes {} time {} nps {} hashfull {}",
        report.depth,
        report.seldepth,
        score,
        report.nodes,
        report.time_ms,
        report.nps,
        report.hashfull
    );
    if !report.pv.is_empty() {
        line.push_str(" pv ");
        line.push_str(&report.pv);
    }
    println!("{line}");
    io::stdout().flush().ok();
}
