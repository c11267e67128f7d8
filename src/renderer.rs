use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    CELL_WIDTH, GLYPH_FOOD, GLYPH_RAIL, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD_DOWN,
    GLYPH_SNAKE_HEAD_IDLE, GLYPH_SNAKE_HEAD_LEFT, GLYPH_SNAKE_HEAD_RIGHT, GLYPH_SNAKE_HEAD_UP,
    GLYPH_WALL, GridSize, MAX_GRID_SIDE, MIN_GRID_SIDE, Theme,
};
use crate::game::GameStatus;
use crate::grid::MapModel;
use crate::input::Direction;
use crate::snake::Position;
use crate::snapshot::Snapshot;
use crate::ui::hud::{HUD_HEIGHT, HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Border columns and rows drawn around the board.
const FRAME_SIZE: u16 = 2;

/// Renders the full game frame from the latest snapshot over the static map.
pub fn render(
    frame: &mut Frame<'_>,
    snapshot: &Snapshot,
    map: &MapModel,
    hud_info: HudInfo<'_>,
) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, map, &hud_info);
    let theme = hud_info.theme;

    let board_area = board_rect(play_area, map.size());
    let block = Block::bordered().border_style(Style::new().fg(theme.border_fg));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    let buffer = frame.buffer_mut();
    render_map(buffer, inner, map, theme);
    render_food(buffer, inner, map.size(), snapshot, theme);
    render_snake(buffer, inner, map.size(), snapshot, theme);

    if snapshot.is_start_screen() && !hud_info.running {
        render_start_menu(frame, play_area, map.topology(), theme);
        return;
    }

    if snapshot.status == GameStatus::GameOver {
        render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            hud_info.elapsed,
            snapshot.death_reason,
        );
    } else if hud_info.paused {
        render_pause_menu(frame, play_area);
    }
}

/// Largest grid that fits a terminal of `columns` x `rows` with the HUD and
/// board frame, clamped to the playable side range.
#[must_use]
pub fn grid_for_terminal(columns: u16, rows: u16) -> GridSize {
    let width = columns.saturating_sub(FRAME_SIZE) / CELL_WIDTH;
    let height = rows.saturating_sub(FRAME_SIZE + HUD_HEIGHT);

    GridSize {
        width: width.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE),
        height: height.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE),
    }
}

/// Centers the framed board inside `area`, clipping when it does not fit.
fn board_rect(area: Rect, bounds: GridSize) -> Rect {
    let width = bounds
        .width
        .saturating_mul(CELL_WIDTH)
        .saturating_add(FRAME_SIZE)
        .min(area.width);
    let height = bounds.height.saturating_add(FRAME_SIZE).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_map(buffer: &mut Buffer, inner: Rect, map: &MapModel, theme: &Theme) {
    let bounds = map.size();
    let wall = Style::new().bg(theme.wall_bg);
    let rail = Style::new().fg(theme.rail_fg).bg(theme.play_bg);

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            let Some((column, row)) = logical_to_terminal(inner, bounds, position) else {
                continue;
            };

            if map.is_traversable(position) {
                buffer.set_string(column, row, GLYPH_RAIL, rail);
            } else {
                buffer.set_string(column, row, GLYPH_WALL, wall);
            }
        }
    }
}

fn render_food(
    buffer: &mut Buffer,
    inner: Rect,
    bounds: GridSize,
    snapshot: &Snapshot,
    theme: &Theme,
) {
    let style = Style::new().fg(theme.food).bg(theme.play_bg);

    for food in &snapshot.food {
        if let Some((x, y)) = logical_to_terminal(inner, bounds, *food) {
            buffer.set_string(x, y, GLYPH_FOOD, style);
        }
    }
}

fn render_snake(
    buffer: &mut Buffer,
    inner: Rect,
    bounds: GridSize,
    snapshot: &Snapshot,
    theme: &Theme,
) {
    let body_color = if snapshot.is_frenzy() {
        theme.snake_frenzy
    } else if snapshot.is_powered_up {
        theme.snake_powered
    } else {
        theme.snake_body
    };
    let body_style = Style::new().fg(body_color).bg(theme.play_bg);
    let head_style = Style::new()
        .fg(theme.snake_head)
        .bg(body_color)
        .add_modifier(Modifier::BOLD);

    for (index, segment) in snapshot.path.iter().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(x, y, head_glyph(snapshot.current_direction), head_style);
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, body_style);
        }
    }
}

fn head_glyph(direction: Option<Direction>) -> &'static str {
    match direction {
        Some(Direction::Up) => GLYPH_SNAKE_HEAD_UP,
        Some(Direction::Down) => GLYPH_SNAKE_HEAD_DOWN,
        Some(Direction::Left) => GLYPH_SNAKE_HEAD_LEFT,
        Some(Direction::Right) => GLYPH_SNAKE_HEAD_RIGHT,
        None => GLYPH_SNAKE_HEAD_IDLE,
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !bounds.contains(position) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
