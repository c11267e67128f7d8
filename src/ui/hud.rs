use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::{GLYPH_FOOD, Theme};
use crate::grid::MapModel;
use crate::snapshot::Snapshot;

/// Rows taken by the HUD below the board.
pub const HUD_HEIGHT: u16 = 2;

const SEPARATOR: &str = " │ ";

/// Values shown by the HUD that live outside the game state.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub elapsed: Duration,
    pub paused: bool,
    /// True once the session has started scheduling ticks.
    pub running: bool,
    pub theme: &'a Theme,
}

/// Formats play time as `MM:SS`; minutes keep growing past 99.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_seconds = elapsed.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Renders the two-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    map: &MapModel,
    info: &HudInfo<'_>,
) -> Rect {
    let [play_area, top_row, bottom_row] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let time = format_elapsed(info.elapsed);
    let speed = format!("{}ms", snapshot.tick_interval_ms);
    let top = [
        ("Score", "S", snapshot.score.to_string()),
        ("Length", "L", snapshot.path.len().to_string()),
        ("Speed", "V", speed),
        ("Time", "T", time),
    ];
    let compact = labeled_width(&top, false) > usize::from(top_row.width);
    frame.render_widget(
        Paragraph::new(labeled_line(&top, compact, info.theme)).alignment(Alignment::Center),
        top_row,
    );

    frame.render_widget(
        Paragraph::new(status_line(snapshot, map, info)).alignment(Alignment::Center),
        bottom_row,
    );

    play_area
}

fn labeled_width(items: &[(&str, &str, String)], compact: bool) -> usize {
    let separators = SEPARATOR.width() * items.len().saturating_sub(1);
    items
        .iter()
        .map(|(label, short, value)| {
            let label = if compact { short } else { label };
            label.width() + 2 + value.width()
        })
        .sum::<usize>()
        + separators
}

fn labeled_line(items: &[(&str, &str, String)], compact: bool, theme: &Theme) -> Line<'static> {
    let label_style = Style::default().fg(theme.hud_label);
    let value_style = Style::default().fg(theme.hud_value);

    let mut spans = Vec::with_capacity(items.len() * 3);
    for (index, (label, short, value)) in items.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, label_style));
        }
        let label = if compact { short } else { label };
        spans.push(Span::styled(format!("{label}: "), label_style));
        spans.push(Span::styled(value.clone(), value_style));
    }

    Line::from(spans)
}

fn status_line(snapshot: &Snapshot, map: &MapModel, info: &HudInfo<'_>) -> Line<'static> {
    let theme = info.theme;
    let label_style = Style::default().fg(theme.hud_label);
    let bounds = map.size();

    let mut spans = vec![
        Span::styled(
            format!("{}x{} {}", bounds.width, bounds.height, map.topology().label()),
            label_style,
        ),
        Span::styled(SEPARATOR, label_style),
        Span::styled(GLYPH_FOOD.trim_end().to_owned(), Style::default().fg(theme.food)),
        Span::styled(format!(" {}", snapshot.food.len()), Style::default().fg(theme.hud_value)),
    ];

    if snapshot.is_powered_up {
        spans.push(Span::styled(SEPARATOR, label_style));
        spans.push(Span::styled(
            format!("POWER {}", snapshot.power_up_ticks),
            Style::default()
                .fg(theme.snake_powered)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if info.paused {
        spans.push(Span::styled(SEPARATOR, label_style));
        spans.push(Span::styled("PAUSED", Style::default().fg(theme.hud_value)));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{format_elapsed, labeled_width};

    #[test]
    fn elapsed_is_formatted_as_minutes_and_seconds() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_elapsed(Duration::from_secs(83)), "01:23");
        assert_eq!(format_elapsed(Duration::from_secs(100 * 60 + 5)), "100:05");
    }

    #[test]
    fn compact_labels_are_narrower() {
        let items = [
            ("Score", "S", "12".to_owned()),
            ("Time", "T", "01:00".to_owned()),
        ];

        assert_eq!(labeled_width(&items, false), "Score: 12 │ Time: 01:00".chars().count());
        assert!(labeled_width(&items, true) < labeled_width(&items, false));
    }
}
