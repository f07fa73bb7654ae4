//! Layout and drawing: board, falling piece, target preview, score, status, overlays.

use crate::board::{COLS, ROWS};
use crate::game::{GameState, Phase};
use crate::patterns::PatternMask;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each board cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
/// Duration of the board flash after a pattern match.
const CLEAR_FLASH_MS: u32 = 350;

/// Outer board rect (with border) centred in `area` next to the sidebar.
fn board_outer_rect(area: Rect) -> Rect {
    let bw = COLS as u16 * CELL_WIDTH + 2;
    let bh = ROWS as u16 + 2;
    let total_w = bw + SIDEBAR_WIDTH;
    Rect {
        x: area.x + area.width.saturating_sub(total_w) / 2,
        y: area.y + area.height.saturating_sub(bh) / 2,
        width: bw.min(area.width),
        height: bh.min(area.height),
    }
}

fn inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x + 1,
        y: rect.y + 1,
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

/// Rect of `w` x `h` centred inside `area`, clamped to it.
fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

/// Fade from the title colour back to the board after the board is wiped.
pub fn clear_flash(theme: &Theme) -> Effect {
    fx::fade_from(
        theme.title,
        theme.title,
        (CLEAR_FLASH_MS, Interpolation::QuadOut),
    )
}

/// Draw the whole screen. `flash` is advanced by `delta_ms` when present.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    flash: &mut Option<Effect>,
    delta_ms: u32,
) {
    let area = frame.area();
    let board_outer = board_outer_rect(area);
    draw_board(frame, state, theme, board_outer);

    let sidebar = Rect {
        x: board_outer.x + board_outer.width,
        y: board_outer.y,
        width: SIDEBAR_WIDTH.min(area.width.saturating_sub(board_outer.x + board_outer.width)),
        height: board_outer.height,
    };
    draw_sidebar(frame, state, theme, sidebar);

    if let Some(effect) = flash {
        frame.render_effect(effect, inner(board_outer), TfxDuration::from_millis(delta_ms));
    }

    match state.phase() {
        Phase::Falling => {}
        Phase::Paused => draw_pause_overlay(frame, theme, board_outer),
        Phase::GameOver => draw_game_over(frame, state, theme, board_outer),
    }
}

fn draw_board(frame: &mut Frame, state: &GameState, theme: &Theme, outer: Rect) {
    let empty = Style::default().fg(theme.grid).bg(theme.bg);
    let mut cells: Vec<Vec<u8>> = (0..ROWS)
        .map(|r| (0..COLS).map(|c| state.cell_at(r, c).unwrap_or(0)).collect())
        .collect();
    for (r, c, kind) in state.active_piece_cells() {
        if let Some(cell) = cells.get_mut(r).and_then(|row| row.get_mut(c)) {
            *cell = kind;
        }
    }

    let lines: Vec<Line> = cells
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&kind| {
                        if kind == 0 {
                            Span::styled(" ·", empty)
                        } else {
                            Span::styled("  ", Style::default().bg(theme.kind_color(kind)))
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.grid))
        .title(Span::styled(
            " bugstack ",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(theme.bg)),
        outer,
    );
}

/// Target preview: one line per mask row, two columns per cell.
fn pattern_lines(mask: &PatternMask, theme: &Theme) -> Vec<Line<'static>> {
    let on = Style::default().bg(theme.pattern);
    let off = Style::default().fg(theme.grid);
    mask.rows()
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&filled| {
                        if filled {
                            Span::styled("  ", on)
                        } else {
                            Span::styled(" ·", off)
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    if area.width < 4 {
        return;
    }
    let label = Style::default().fg(theme.main_fg);
    let title = Style::default().fg(theme.title).add_modifier(Modifier::BOLD);

    let target = state.active_target();
    let mut lines = vec![Line::from(Span::styled("Target", title))];
    lines.extend(pattern_lines(target, theme));
    lines.push(Line::from(Span::styled(target.name(), label)));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Score  ", label),
        Span::styled(state.score().to_string(), title),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Clears ", label),
        Span::styled(state.matches().to_string(), label),
    ]));
    let status = match state.phase() {
        Phase::Falling => "Playing...",
        Phase::Paused => "Paused",
        Phase::GameOver => "Game over",
    };
    lines.push(Line::from(Span::styled(status, label)));
    lines.push(Line::from(""));
    for help in [
        "←/→ move   ↑ rotate",
        "↓ soft drop",
        "Space hard drop",
        "P pause    Q quit",
    ] {
        lines.push(Line::from(Span::styled(help, Style::default().fg(theme.grid))));
    }

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.grid)),
        ),
        area,
    );
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, board: Rect) {
    let popup = centered(board, 14, 3);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(Span::styled(
            "PAUSED",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().bg(theme.bg)),
        popup,
    );
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, board: Rect) {
    let popup = centered(board, 20, 6);
    frame.render_widget(Clear, popup);
    let lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(theme.kind_color(1)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Final score: {}", state.score()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled("r restart  q quit", Style::default().fg(theme.grid))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().bg(theme.bg)),
        popup,
    );
}
