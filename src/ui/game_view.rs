use crate::game::{Cell, GameEngine, GameStatus, PlayerId, Run};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Terminal color for a player's configured color name. Names ratatui does
/// not know fall back to red and blue.
pub fn player_color(game: &GameEngine, id: PlayerId) -> Color {
    game.player(id).color.parse().unwrap_or(match id {
        PlayerId::One => Color::Red,
        PlayerId::Two => Color::Blue,
    })
}

pub fn render(
    frame: &mut Frame,
    game: &GameEngine,
    selected_column: usize,
    message: Option<&str>,
) {
    let board_height = game.board().height() as u16 + 4;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),         // Header
            Constraint::Min(board_height), // Board
            Constraint::Length(3),         // Message
            Constraint::Length(3),         // Controls
        ])
        .split(frame.area());

    render_header(frame, game, chunks[0]);
    render_board(frame, game, selected_column, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, game: &GameEngine, area: Rect) {
    let (status, color) = match game.status() {
        GameStatus::InProgress => {
            let id = game.current_player();
            (
                format!("Current Player: {} ({})", id, game.player(id).color),
                player_color(game, id),
            )
        }
        GameStatus::Won(id) => (format!("Game Over  |  {} wins", id), player_color(game, id)),
        GameStatus::Tied => ("Game Over  |  Tie".to_string(), Color::White),
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, game: &GameEngine, selected_column: usize, area: Rect) {
    let board = game.board();
    let width = board.width();
    let run = game.winning_run();
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..width {
        let label = format!("{:^3}", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    let bar = "═".repeat(width * 3 + 1);
    lines.push(Line::from(format!("  ╔{bar}╗")));

    for (row, cells) in board.rows().enumerate() {
        let mut row_spans = vec![Span::raw("  ║")];
        for (col, &cell) in cells.iter().enumerate() {
            row_spans.push(cell_span(game, cell, in_run(run, row, col)));
        }
        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{bar}╝")));

    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..width {
        if col == selected_column && !game.is_terminal() {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn in_run(run: Option<Run>, row: usize, col: usize) -> bool {
    run.is_some_and(|run| run.contains(&(row, col)))
}

fn cell_span(game: &GameEngine, cell: Cell, highlighted: bool) -> Span<'static> {
    match cell {
        Cell::Empty => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
        Cell::Occupied(id) => {
            let mut style = Style::default().fg(player_color(game, id));
            if highlighted {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            Span::styled(" ● ", style)
        }
    }
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Paragraph::new(
        "←/→: Move  |  Enter: Drop  |  1-9: Drop in column  |  S: Save  |  R: Restart  |  Q: Quit",
    )
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Controls"),
    );

    frame.render_widget(controls, area);
}
