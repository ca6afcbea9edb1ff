// Christmas tree: star, foliage with ornaments, trunk, and the emoji lights
// row underneath.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use yuletide_core::page::PageState;

const TRUNK_ROWS: u16 = 2;
const SIENNA: Color = Color::Rgb(160, 82, 45);
const ORNAMENT_COLORS: [Color; 4] = [Color::Red, Color::Yellow, Color::Magenta, Color::Cyan];

pub fn render(frame: &mut Frame, tree_area: Rect, lights_area: Rect, state: &PageState) {
    let rows = foliage_rows(tree_area);
    let lines = tree_lines(rows);

    // Sit the tree on the lights row.
    let height = (lines.len() as u16).min(tree_area.height);
    let area = Rect::new(
        tree_area.x,
        tree_area.bottom().saturating_sub(height),
        tree_area.width,
        height,
    );
    frame.render_widget(Paragraph::new(lines), area);

    if !state.emojis.is_empty() {
        frame.render_widget(Paragraph::new(lights_line(&state.emojis)), lights_area);
    }
}

/// Number of foliage rows that fit: limited by height (after star and trunk)
/// and by width (row `r` is `2r + 1` cells wide).
pub fn foliage_rows(area: Rect) -> u16 {
    let by_height = area.height.saturating_sub(1 + TRUNK_ROWS);
    let by_width = area.width.saturating_sub(1) / 2;
    by_height.min(by_width)
}

/// Star, `rows` rows of foliage, then the trunk. Every line is centered.
pub fn tree_lines(rows: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(rows as usize + 1 + TRUNK_ROWS as usize);

    lines.push(
        Line::from(Span::styled(
            "★",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
        .centered(),
    );

    for r in 0..rows {
        let width = 2 * r + 1;
        let spans: Vec<Span<'static>> = (0..width)
            .map(|c| match ornament(r, c) {
                Some(color) => Span::styled("o", Style::default().fg(color)),
                None => Span::styled("*", Style::default().fg(Color::Green)),
            })
            .collect();
        lines.push(Line::from(spans).centered());
    }

    let trunk = "|".repeat(trunk_width(rows) as usize);
    for _ in 0..TRUNK_ROWS {
        lines.push(Line::from(Span::styled(trunk.clone(), Style::default().fg(SIENNA))).centered());
    }

    lines
}

/// Fixed scatter of ornaments; the top row stays plain.
fn ornament(row: u16, col: u16) -> Option<Color> {
    if row == 0 || (row as usize * 7 + col as usize * 3) % 11 != 0 {
        return None;
    }
    Some(ORNAMENT_COLORS[(row as usize + col as usize) % ORNAMENT_COLORS.len()])
}

/// Odd width, about a sixth of the widest foliage row, at least 1.
pub fn trunk_width(rows: u16) -> u16 {
    let w = (2 * rows + 1) / 6;
    if w % 2 == 0 {
        w + 1
    } else {
        w
    }
}

/// The emoji lights, spaced out on one centered row.
pub fn lights_line(emojis: &[String]) -> Line<'static> {
    let spans: Vec<Span<'static>> = emojis
        .iter()
        .enumerate()
        .flat_map(|(i, glyph)| {
            let sep = if i == 0 { "" } else { " " };
            [Span::raw(sep), Span::raw(glyph.clone())]
        })
        .collect();
    Line::from(spans).centered()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn foliage_rows_limited_by_height() {
        assert_eq!(foliage_rows(Rect::new(0, 0, 100, 10)), 7);
    }

    #[test]
    fn foliage_rows_limited_by_width() {
        assert_eq!(foliage_rows(Rect::new(0, 0, 11, 30)), 5);
    }

    #[test]
    fn foliage_rows_tiny_area() {
        assert_eq!(foliage_rows(Rect::new(0, 0, 10, 2)), 0);
    }

    #[test]
    fn tree_has_star_foliage_and_trunk() {
        let lines = tree_lines(4);
        assert_eq!(lines.len(), 1 + 4 + 2);
        assert_eq!(line_text(&lines[0]), "★");
        for (r, line) in lines[1..5].iter().enumerate() {
            assert_eq!(line_text(line).chars().count(), 2 * r + 1);
        }
        assert!(line_text(&lines[5]).chars().all(|c| c == '|'));
    }

    #[test]
    fn tree_has_some_ornaments() {
        let lines = tree_lines(12);
        let ornaments: usize = lines[1..13]
            .iter()
            .map(|l| line_text(l).matches('o').count())
            .sum();
        assert!(ornaments > 0);
        assert_eq!(line_text(&lines[1]), "*");
    }

    #[test]
    fn trunk_width_is_odd() {
        for rows in 0..40 {
            let w = trunk_width(rows);
            assert!(w >= 1 && w % 2 == 1, "rows {rows} -> width {w}");
        }
    }

    #[test]
    fn lights_line_spaces_glyphs() {
        let emojis = vec!["🎄".to_string(), "🔔".to_string(), "🎁".to_string()];
        assert_eq!(line_text(&lights_line(&emojis)), "🎄 🔔 🎁");
        assert_eq!(line_text(&lights_line(&[])), "");
    }

    #[test]
    fn render_does_not_panic_small_and_large() {
        for (w, h) in [(10, 3), (80, 30)] {
            let backend = ratatui::backend::TestBackend::new(w, h + 1);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            let mut state = PageState::default();
            state.emojis = vec!["✨".into(), "🌟".into()];
            terminal
                .draw(|frame| {
                    render(frame, Rect::new(0, 0, w, h), Rect::new(0, h, w, 1), &state)
                })
                .unwrap();
        }
    }
}
