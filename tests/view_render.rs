use chesslens::eval::{Evaluation, LineAggregation, SearchTracker};
use chesslens::game::Game;
use chesslens::tui::app::{apply_evaluation, step, Step};
use chesslens::tui::view::render;
use chesslens::tui::{Action, App, EngineStatus, ViewState};
use chesslens::uci::RequestLedger;
use cozy_chess::Board;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
    terminal.draw(|f| render(app, f)).unwrap();
    let buffer = terminal.backend().buffer().clone();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn evaluation(best: f64, fragility: f64) -> Evaluation {
    Evaluation {
        best,
        mate: None,
        candidates: vec![best, best - 0.1],
        fragility,
        depth: 12,
        bestmove: Some("e2e4".into()),
        pv: vec!["e2e4".into(), "e7e5".into()],
    }
}

fn request_ids(n: usize) -> Vec<chesslens::uci::RequestId> {
    let board = Board::default();
    let mut ledger = RequestLedger::new();
    (0..n)
        .map(|_| {
            ledger
                .issue(SearchTracker::new(&board, LineAggregation::DepthIterations, 0.2))
                .0
        })
        .collect()
}

#[test]
fn offline_viewer_shows_placeholders() {
    let app = App::offline(Game::embedded().unwrap(), "stockfish not found");
    let text = screen(&app);
    assert!(text.contains("Gukesh D - Carlsen, Magnus"), "{}", text);
    assert!(text.contains("Eval: - | Fragility: -"), "{}", text);
    assert!(text.contains("no engine: stockfish not found"), "{}", text);
    assert!(text.contains("Start position") && text.contains("(0/123)"), "{}", text);
}

#[test]
fn stepping_updates_the_position_label() {
    let mut app = App::offline(Game::embedded().unwrap(), "off");
    app.dispatch(Action::Next).unwrap();
    app.dispatch(Action::Next).unwrap();
    app.dispatch(Action::Next).unwrap();
    let text = screen(&app);
    assert!(text.contains("2. Nf3") && text.contains("(3/123)"), "{}", text);

    app.dispatch(Action::Prev).unwrap();
    let text = screen(&app);
    assert!(text.contains("1... e5") && text.contains("(2/123)"), "{}", text);

    app.dispatch(Action::Last).unwrap();
    let text = screen(&app);
    assert!(text.contains("62. Kf4") && text.contains("(123/123)"), "{}", text);
    assert!(!app.game.is_empty());
}

#[test]
fn quit_stops_the_loop() {
    let mut app = App::offline(Game::embedded().unwrap(), "off");
    app.dispatch(Action::Quit).unwrap();
    assert!(!app.state.is_running);
}

#[test]
fn evaluation_is_shown_once_applied() {
    let mut app = App::offline(Game::embedded().unwrap(), "off");
    let id = request_ids(1)[0];
    app.state.pending = Some(id);
    app.state.engine = EngineStatus::Searching(id);

    assert!(apply_evaluation(&mut app.state, id, evaluation(0.31, 0.5)));
    assert!(app.state.evaluation_is_current());
    assert_eq!(app.state.engine, EngineStatus::Idle);

    let text = screen(&app);
    assert!(text.contains("Eval: 0.31 | Fragility: 50%"), "{}", text);
    assert!(text.contains("Best e4"), "{}", text);
    assert!(text.contains("PV e4 e5"), "{}", text);
}

#[test]
fn stale_evaluations_are_rejected() {
    let ids = request_ids(2);
    let mut state = ViewState::new(Game::embedded().unwrap().cursor());
    state.pending = Some(ids[1]);

    assert!(!apply_evaluation(&mut state, ids[0], evaluation(3.0, 1.0)));
    assert!(state.evaluation.is_none());

    assert!(step(&mut state, Step::Forward));
    assert!(apply_evaluation(&mut state, ids[1], evaluation(0.2, 1.0)));
    assert_eq!(state.evaluated_ply, Some(1));

    // moving on makes the shown evaluation stale until the next one lands
    assert!(step(&mut state, Step::Forward));
    assert!(!state.evaluation_is_current());
}

#[test]
fn cursor_steps_stop_at_the_ends() {
    let mut state = ViewState::new(Game::embedded().unwrap().cursor());
    assert!(!step(&mut state, Step::Back));
    assert!(step(&mut state, Step::End));
    assert!(!step(&mut state, Step::Forward));
    assert_eq!(state.cursor.index(), 123);
    assert!(step(&mut state, Step::Start));
    assert_eq!(state.cursor.index(), 0);
}
