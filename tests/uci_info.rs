use chesslens::eval::{LineAggregation, SearchTracker, Terminal, MATE_PAWNS};
use chesslens::uci::{parse_line, Bound, EngineMessage, InfoLine, RequestLedger, Score};
use cozy_chess::Board;

fn info(line: &str) -> InfoLine {
    match parse_line(line) {
        EngineMessage::Info(i) => i,
        other => panic!("not an info line: {:?}", other),
    }
}

fn black_to_move() -> Board {
    Board::from_fen(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        false,
    )
    .unwrap()
}

#[test]
fn parses_stockfish_info() {
    let i = info("info depth 18 seldepth 24 multipv 2 score cp -31 nodes 123456 nps 900000 hashfull 12 tbhits 0 time 137 pv e7e5 g1f3 b8c6");
    assert_eq!(i.depth, Some(18));
    assert_eq!(i.seldepth, Some(24));
    assert_eq!(i.multipv, Some(2));
    assert_eq!(i.score, Some(Score::Cp(-31)));
    assert_eq!(i.bound, Bound::Exact);
    assert_eq!(i.nodes, Some(123456));
    assert_eq!(i.time_ms, Some(137));
    assert_eq!(i.pv, vec!["e7e5", "g1f3", "b8c6"]);
}

#[test]
fn parses_mate_and_bounds() {
    let i = info("info depth 30 score mate -4 pv h7h8");
    assert_eq!(i.score, Some(Score::Mate(-4)));
    let lb = info("info depth 9 score cp 55 lowerbound nodes 10 pv e2e4");
    assert_eq!(lb.bound, Bound::Lower);
    assert_eq!(lb.nodes, Some(10));
    let ub = info("info depth 9 score cp 20 upperbound");
    assert_eq!(ub.bound, Bound::Upper);
}

#[test]
fn info_string_has_no_score() {
    let i = info("info string NNUE evaluation using nn-1111.nnue enabled");
    assert_eq!(i.score, None);
    assert!(i.pv.is_empty());
}

#[test]
fn handshake_and_bestmove_lines() {
    assert_eq!(parse_line("id name Stockfish 17"), EngineMessage::IdName("Stockfish 17".into()));
    assert_eq!(parse_line("uciok"), EngineMessage::UciOk);
    assert_eq!(parse_line("readyok"), EngineMessage::ReadyOk);
    assert_eq!(
        parse_line("bestmove e2e4 ponder e7e5"),
        EngineMessage::BestMove { mv: Some("e2e4".into()), ponder: Some("e7e5".into()) }
    );
    assert_eq!(
        parse_line("bestmove (none)"),
        EngineMessage::BestMove { mv: None, ponder: None }
    );
    assert_eq!(parse_line("option name Hash type spin"), EngineMessage::Other);
}

#[test]
fn depth_iterations_take_the_deepest_as_best() {
    let mut t = SearchTracker::new(&Board::default(), LineAggregation::DepthIterations, 0.2);
    t.observe(&info("info depth 1 score cp 80 pv e2e4"));
    t.observe(&info("info depth 2 score cp 40 pv d2d4"));
    t.observe(&info("info depth 3 score cp 30 lowerbound pv d2d4"));
    t.observe(&info("info depth 3 score cp 35 pv e2e4"));
    assert_eq!(t.sample_count(), 3);
    let e = t.finish(Some("e2e4".into()));
    assert_eq!(e.best, 0.35);
    assert_eq!(e.candidates.len(), 3);
    // 0.35 and 0.40 are within 0.2, 0.80 is not
    assert!((e.fragility - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(e.depth, 3);
    assert_eq!(e.pv, vec!["e2e4"]);
    assert_eq!(e.bestmove.as_deref(), Some("e2e4"));
}

#[test]
fn multipv_keeps_the_deepest_of_each_line() {
    let mut t = SearchTracker::new(&Board::default(), LineAggregation::MultiPv, 0.2);
    for line in [
        "info depth 10 multipv 1 score cp 30 pv e2e4",
        "info depth 10 multipv 2 score cp 25 pv d2d4",
        "info depth 10 multipv 3 score cp -60 pv g2g4",
        "info depth 11 multipv 1 score cp 28 pv e2e4",
        "info depth 11 multipv 2 score cp 20 pv d2d4",
        "info depth 11 multipv 3 score cp -90 pv g2g4",
    ] {
        t.observe(&info(line));
    }
    let e = t.finish(Some("e2e4".into()));
    assert_eq!(e.candidates, vec![0.28, 0.2, -0.9]);
    assert_eq!(e.best, 0.28);
    assert!((e.fragility - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(e.depth, 11);
}

#[test]
fn scores_are_turned_to_white_perspective() {
    let mut t = SearchTracker::new(&black_to_move(), LineAggregation::DepthIterations, 0.2);
    t.observe(&info("info depth 5 score cp 40 pv e7e5"));
    let e = t.finish(None);
    assert_eq!(e.best, -0.4);
    assert_eq!(e.score_label(), "-0.40");

    let mut t = SearchTracker::new(&black_to_move(), LineAggregation::DepthIterations, 0.2);
    t.observe(&info("info depth 20 score mate 3 pv d8h4"));
    let e = t.finish(Some("d8h4".into()));
    assert_eq!(e.best, -MATE_PAWNS);
    assert_eq!(e.mate, Some(-3));
    assert_eq!(e.score_label(), "-M3");
}

#[test]
fn checkmated_position_falls_back_to_terminal_score() {
    // fool's mate, white to move and mated
    let board = Board::from_fen(
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        false,
    )
    .unwrap();
    assert_eq!(Terminal::of(&board), Some(Terminal::Checkmate));
    let t = SearchTracker::new(&board, LineAggregation::DepthIterations, 0.2);
    let e = t.finish(None);
    assert_eq!(e.best, -MATE_PAWNS);
    assert_eq!(e.mate, Some(0));
    assert_eq!(e.fragility, 0.0);
    assert!(e.candidates.is_empty());
}

#[test]
fn stalemate_is_level() {
    let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", false).unwrap();
    assert_eq!(Terminal::of(&board), Some(Terminal::Draw));
    let e = SearchTracker::new(&board, LineAggregation::DepthIterations, 0.2).finish(None);
    assert_eq!(e.best, 0.0);
    assert_eq!(e.mate, None);
}

#[test]
fn ledger_reports_only_the_latest_request() {
    let mut ledger = RequestLedger::new();
    let board = Board::default();
    let tracker = || SearchTracker::new(&board, LineAggregation::DepthIterations, 0.2);

    let (first, busy) = ledger.issue(tracker());
    assert!(!busy);
    let (second, busy) = ledger.issue(tracker());
    assert!(busy, "second request must stop the first");
    assert_ne!(first, second);
    assert_eq!(ledger.latest(), Some(second));
    assert_eq!(ledger.in_flight(), 2);

    // output of the first (stopped) search
    assert!(ledger.feed("info depth 3 score cp 900 pv e2e4").is_none());
    let stale = ledger.feed("bestmove e2e4").unwrap();
    assert_eq!(stale.id, first);
    assert!(!stale.latest);
    assert_eq!(stale.evaluation.best, 9.0);

    // output of the second search goes to its own tracker
    ledger.feed("info depth 12 score cp 15 pv d2d4");
    let done = ledger.feed("bestmove d2d4 ponder d7d5").unwrap();
    assert_eq!(done.id, second);
    assert!(done.latest);
    assert_eq!(done.evaluation.best, 0.15);
    assert!(ledger.is_idle());

    // a stray bestmove with nothing in flight is ignored
    assert!(ledger.feed("bestmove a2a3").is_none());
}
