//! Widgets: eval bar | board | fragility bar | info panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::{App, EngineStatus, ViewState};
use crate::board::{render_cells_oriented, Cell};
use crate::eval::{eval_bar_cells, eval_bar_fill, fragility_bar_cells, FillSide};
use crate::game::san::uci_line_to_san;

const BOARD_WIDTH: u16 = 2 + 8 * 3 + 2;
const BOARD_HEIGHT: u16 = 8 + 1 + 2;
const BAR_WIDTH: u16 = 4;
const MOVE_LIST_ROWS: usize = 8;

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub fn render(app: &App, frame: &mut Frame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(BOARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_header(app, frame, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BAR_WIDTH),
            Constraint::Length(BOARD_WIDTH),
            Constraint::Length(BAR_WIDTH),
            Constraint::Min(20),
        ])
        .split(rows[1]);
    let board_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(BOARD_HEIGHT), Constraint::Min(0)])
        .split(cols[1]);

    render_eval_bar(&app.state, frame, cols[0]);
    render_board(app, frame, board_rows[0]);
    render_fragility_bar(&app.state, frame, cols[2]);
    render_panel(app, frame, cols[3]);
    render_footer(&app.state, frame, rows[2]);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.game.title()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(event) = app.game.tag("Event") {
        spans.push(Span::raw(format!("| {} ", event)));
    }
    if let Some(round) = app.game.tag("Round") {
        spans.push(Span::raw(format!("| Round {} ", round)));
    }
    if let Some(result) = app.game.result() {
        spans.push(Span::raw(format!("| {}", result)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn square_span(cell: &Cell) -> Span<'static> {
    let fg = match cell.piece {
        Some((cozy_chess::Color::White, _)) => Color::White,
        _ => Color::Black,
    };
    Span::styled(
        format!(" {} ", cell.glyph()),
        Style::default()
            .bg(rgb(cell.shade.rgb()))
            .fg(fg)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_board(app: &App, frame: &mut Frame, area: Rect) {
    let flipped = app.state.flipped;
    let cells = render_cells_oriented(&app.board(), flipped);
    let mut lines: Vec<Line> = cells
        .chunks(8)
        .map(|row| {
            let rank = char::from(b'1' + row[0].square.rank() as u8);
            let mut spans = vec![Span::raw(format!("{} ", rank))];
            spans.extend(row.iter().map(square_span));
            Line::from(spans)
        })
        .collect();
    let files: String = (0..8)
        .map(|i| {
            let f = if flipped { 7 - i } else { i };
            format!(" {} ", char::from(b'a' + f as u8))
        })
        .collect();
    lines.push(Line::from(format!("  {}", files)));

    let block = Block::default().borders(Borders::ALL).title(" Board ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Vertical bar filled `filled` rows from the bottom.
fn bar_lines(height: u16, filled: u16, fill: Color, empty: Color, width: u16) -> Vec<Line<'static>> {
    (0..height)
        .map(|row| {
            let colour = if row >= height - filled.min(height) {
                fill
            } else {
                empty
            };
            Line::from(Span::styled(
                " ".repeat(width as usize),
                Style::default().bg(colour),
            ))
        })
        .collect()
}

fn render_eval_bar(state: &ViewState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let lines = match &state.evaluation {
        Some(eval) => {
            let filled = eval_bar_cells(eval.best, inner.height);
            let fill = match eval_bar_fill(eval.best) {
                FillSide::White => Color::White,
                FillSide::Black => Color::Black,
            };
            bar_lines(inner.height, filled, fill, Color::DarkGray, inner.width)
        }
        None => bar_lines(inner.height, 0, Color::DarkGray, Color::DarkGray, inner.width),
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_fragility_bar(state: &ViewState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let filled = state
        .evaluation
        .as_ref()
        .map_or(0, |e| fragility_bar_cells(e.fragility, inner.height));
    let lines = bar_lines(inner.height, filled, Color::Yellow, Color::DarkGray, inner.width);
    frame.render_widget(Paragraph::new(lines), inner);
}

fn engine_line(state: &ViewState) -> Line<'static> {
    let name = state.engine_name.clone().unwrap_or_else(|| "engine".to_string());
    match &state.engine {
        EngineStatus::Idle => Line::from(Span::styled(
            format!("{}: idle", name),
            Style::default().fg(Color::Green),
        )),
        EngineStatus::Searching(id) => Line::from(Span::styled(
            format!("{}: searching {}", name, id),
            Style::default().fg(Color::Yellow),
        )),
        EngineStatus::Unavailable(reason) => Line::from(Span::styled(
            format!("no engine: {}", reason),
            Style::default().fg(Color::Red),
        )),
    }
}

fn render_panel(app: &App, frame: &mut Frame, area: Rect) {
    let state = &app.state;
    let mut lines: Vec<Line> = Vec::new();

    let info = match &state.evaluation {
        Some(eval) => eval.info_text(),
        None => "Eval: - | Fragility: -".to_string(),
    };
    let info_style = if state.evaluation_is_current() {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    lines.push(Line::from(Span::styled(info, info_style)));

    if let Some(eval) = &state.evaluation {
        let board = match state.evaluated_ply {
            Some(ply) => app.game.position_at(ply),
            None => app.board(),
        };
        let pv_san = uci_line_to_san(&board, &eval.pv);
        let best = pv_san
            .first()
            .cloned()
            .or_else(|| eval.bestmove.clone())
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(format!(
            "Depth {}  Best {}  Lines {}",
            eval.depth,
            best,
            eval.candidates.len()
        )));
        if !pv_san.is_empty() {
            lines.push(Line::from(format!("PV {}", pv_san.join(" "))));
        }
    }
    lines.push(engine_line(state));
    lines.push(Line::from(""));

    let cursor = state.cursor;
    let position = match (cursor.last_move_label(), app.game.ply_before(cursor.index())) {
        (Some(label), Some(ply)) => format!("{} {}", label, ply.san),
        _ => "Start position".to_string(),
    };
    lines.push(Line::from(Span::styled(
        format!("{}  ({}/{})", position, cursor.index(), cursor.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let plies = app.game.plies();
    let current = cursor.index();
    let first = current.saturating_sub(MOVE_LIST_ROWS / 2 * 2) / 2 * 2;
    for start in (first..plies.len()).step_by(2).take(MOVE_LIST_ROWS) {
        let mut spans = vec![Span::raw(format!("{:>3}. ", start / 2 + 1))];
        for i in start..(start + 2).min(plies.len()) {
            let style = if i + 1 == current {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!("{:<7}", plies[i].san), style));
        }
        lines.push(Line::from(spans));
    }

    if state.show_help {
        lines.push(Line::from(""));
        for help in [
            "←/h/p  previous move",
            "→/l/n  next move",
            "g/Home start   G/End final position",
            "f  flip board   q  quit",
        ] {
            lines.push(Line::from(help));
        }
    }

    let block = Block::default().borders(Borders::ALL).title(" Analysis ");
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_footer(state: &ViewState, frame: &mut Frame, area: Rect) {
    let hint = if state.show_help {
        " ? hide help"
    } else {
        " ←/→ step  g/G start/end  f flip  ? help  q quit"
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(hint, Style::default().fg(Color::Gray)))),
        area,
    );
}
