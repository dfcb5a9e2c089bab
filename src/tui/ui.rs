//! Stateless UI rendering for the card grid, stats and victory modal.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::input::GRID_COLUMNS;
use crate::ShellView;
use mindflip_core::{Card, CardFace};

const CELL_WIDTH: u16 = 9;
const CELL_HEIGHT: u16 = 3;
const MODAL_MIN_WIDTH: u16 = 36;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, view: &ShellView<'_>, cursor: usize) {
    let area = frame.area();
    let [title_area, stats_area, board_area, help_area] = screen_areas(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Mind", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
        Span::styled("Flip", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, title_area);

    draw_stats(frame, stats_area, view);

    for (card, cell) in view.cards.iter().zip(card_cells(board_area, view.cards.len())) {
        if !cell.is_empty() {
            draw_card(frame, cell, card, card.id().index() == cursor);
        }
    }

    let help = Paragraph::new("←↑↓→ move · Enter/Space flip · r restart · q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, help_area);

    if view.won {
        draw_victory(frame, area, view);
    }
}

/// Splits the screen into title, stats, board and help rows.
pub fn screen_areas(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Stats
            Constraint::Min(CELL_HEIGHT),
            Constraint::Length(1), // Help
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Screen rectangles of each card, in id order.
///
/// Cells below the visible board are clipped to an empty rectangle.
pub fn card_cells(board_area: Rect, card_count: usize) -> Vec<Rect> {
    let rows = to_u16(card_count.div_ceil(GRID_COLUMNS));
    let columns = to_u16(GRID_COLUMNS);
    let grid = center_rect(
        board_area,
        CELL_WIDTH.saturating_mul(columns),
        CELL_HEIGHT.saturating_mul(rows),
    );

    (0..card_count)
        .map(|index| {
            let row = to_u16(index / GRID_COLUMNS);
            let column = to_u16(index % GRID_COLUMNS);
            Rect::new(
                grid.x.saturating_add(column.saturating_mul(CELL_WIDTH)),
                grid.y.saturating_add(row.saturating_mul(CELL_HEIGHT)),
                CELL_WIDTH,
                CELL_HEIGHT,
            )
            .intersection(grid)
        })
        .collect()
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Finds the card under a screen position.
pub fn card_at(area: Rect, card_count: usize, column: u16, row: u16) -> Option<usize> {
    let [_, _, board_area, _] = screen_areas(area);
    card_cells(board_area, card_count)
        .iter()
        .position(|cell| cell.contains(Position::new(column, row)))
}

fn draw_stats(frame: &mut Frame, area: Rect, view: &ShellView<'_>) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(center_rect(area, 40, 3));

    let moves = Paragraph::new(view.move_count.to_string())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Moves"));
    frame.render_widget(moves, halves[0]);

    let pairs = Paragraph::new(format!("{} / {}", view.matched_pair_count, view.total_pairs))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Pairs Found"));
    frame.render_widget(pairs, halves[1]);
}

fn draw_card(frame: &mut Frame, area: Rect, card: &Card, selected: bool) {
    let (text, style) = match card.face() {
        CardFace::Hidden => ("?".to_string(), Style::default().fg(Color::DarkGray)),
        CardFace::FaceUp => (
            card.symbol().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        CardFace::Matched => (card.symbol().to_string(), Style::default().fg(Color::Green)),
    };

    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        style
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border_style));
    frame.render_widget(paragraph, area);
}

fn draw_victory(frame: &mut Frame, area: Rect, view: &ShellView<'_>) {
    let quote = if view.message_pending {
        Line::from(Span::styled(
            "AI Thinking...",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::SLOW_BLINK),
        ))
    } else {
        let message = view.victory_message.unwrap_or_default();
        Line::from(Span::styled(
            format!("\"{}\"", message),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
        ))
    };
    let accuracy = view
        .accuracy
        .map(|pct| format!("{}%", pct))
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from("🏆"),
        Line::from(Span::styled(
            "You Did It!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        quote,
        Line::from(""),
        Line::from(format!("Total Moves  {}", view.move_count)),
        Line::from(format!("Accuracy     {}", accuracy)),
        Line::from(""),
        Line::from(Span::styled("Press r to play again", Style::default().fg(Color::Yellow))),
    ];

    let width = modal_width(view.victory_message, area.width);
    let popup = center_rect(area, width, to_u16(lines.len()).saturating_add(2));

    let modal = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(modal, popup);
}

/// Modal width: the message plus padding, at least [`MODAL_MIN_WIDTH`], at most the screen.
fn modal_width(message: Option<&str>, screen_width: u16) -> u16 {
    let message_width = to_u16(message.map(|m| m.width()).unwrap_or(0));
    message_width
        .saturating_add(6)
        .clamp(MODAL_MIN_WIDTH, screen_width.max(MODAL_MIN_WIDTH))
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_cells_form_a_four_column_grid() {
        let cells = card_cells(Rect::new(0, 0, 80, 20), 16);
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0].y, cells[3].y);
        assert_eq!(cells[4].x, cells[0].x);
        assert!(cells[4].y > cells[0].y);
        assert!(cells[1].x > cells[0].x);
    }

    #[test]
    fn test_card_at_hits_cell_center() {
        let area = Rect::new(0, 0, 80, 24);
        let [_, _, board_area, _] = screen_areas(area);
        let cells = card_cells(board_area, 16);
        let target = cells[6];

        let hit = card_at(area, 16, target.x + target.width / 2, target.y + 1);
        assert_eq!(hit, Some(6));
        assert_eq!(card_at(area, 16, 0, 0), None);
    }

    #[test]
    fn test_card_cells_survive_huge_boards() {
        let area = Rect::new(0, 0, 80, 20);
        let cells = card_cells(area, 400_000);
        assert_eq!(cells.len(), 400_000);

        let visible: Vec<_> = cells.iter().filter(|cell| !cell.is_empty()).collect();
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|cell| area.intersection(**cell) == **cell));
    }

    #[test]
    fn test_modal_width_bounds() {
        assert_eq!(modal_width(None, 120), MODAL_MIN_WIDTH);
        assert_eq!(modal_width(Some("Nice one!"), 120), MODAL_MIN_WIDTH);
        assert_eq!(modal_width(Some(&"🧠".repeat(40)), 120), 86);

        let huge = "a".repeat(100_000);
        assert_eq!(modal_width(Some(&huge), 120), 120);
        assert_eq!(modal_width(Some(&huge), 10), MODAL_MIN_WIDTH);
    }
}
