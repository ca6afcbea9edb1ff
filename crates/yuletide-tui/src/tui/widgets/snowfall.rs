// Snowfall overlay. Drawn last, and only into blank cells so text stays
// readable.

use ratatui::layout::{Position, Rect};
use ratatui::style::Color;
use ratatui::Frame;
use tokio::time::Instant;

use yuletide_core::page::{FallingFlake, PageState};

pub fn render(frame: &mut Frame, area: Rect, state: &PageState, now: Instant) {
    let buf = frame.buffer_mut();
    for falling in state.snowflakes.values() {
        let Some(pos) = flake_position(area, falling, now) else {
            continue;
        };
        if let Some(cell) = buf.cell_mut(pos) {
            if cell.symbol() == " " {
                cell.set_symbol(glyph_for(falling.flake.size)).set_fg(Color::White);
            }
        }
    }
}

/// Screen cell of a flake: column from its `left` percentage, row from how
/// far through its fall it is.
pub fn flake_position(area: Rect, falling: &FallingFlake, now: Instant) -> Option<Position> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let col = ((falling.flake.left / 100.0) * area.width as f32) as u16;
    let row = (falling.progress(now) * (area.height - 1) as f32).round() as u16;
    Some(Position::new(
        area.x + col.min(area.width - 1),
        area.y + row.min(area.height - 1),
    ))
}

/// Bigger flakes get heavier glyphs.
pub fn glyph_for(size: f32) -> &'static str {
    if size < 15.0 {
        "·"
    } else if size < 20.0 {
        "*"
    } else {
        "❄"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use yuletide_core::effects::snow::{Snowflake, SnowflakeId};

    fn falling(left: f32, size: f32, born: Instant) -> FallingFlake {
        FallingFlake {
            flake: Snowflake {
                id: SnowflakeId {
                    created_ms: 0,
                    salt: left as u32,
                },
                left,
                size,
                fall: Duration::from_secs(10),
            },
            born,
        }
    }

    #[test]
    fn glyph_by_size() {
        assert_eq!(glyph_for(10.0), "·");
        assert_eq!(glyph_for(17.5), "*");
        assert_eq!(glyph_for(24.0), "❄");
    }

    #[tokio::test(start_paused = true)]
    async fn flake_starts_at_top_and_ends_at_bottom() {
        let area = Rect::new(0, 0, 100, 21);
        let born = Instant::now();
        let f = falling(50.0, 12.0, born);

        assert_eq!(flake_position(area, &f, born), Some(Position::new(50, 0)));
        assert_eq!(
            flake_position(area, &f, born + Duration::from_secs(5)),
            Some(Position::new(50, 10))
        );
        assert_eq!(
            flake_position(area, &f, born + Duration::from_secs(30)),
            Some(Position::new(50, 20))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn flake_position_stays_inside_offset_area() {
        let area = Rect::new(5, 3, 10, 4);
        let born = Instant::now();
        let f = falling(99.9, 12.0, born);
        let pos = flake_position(area, &f, born + Duration::from_secs(10)).unwrap();
        assert_eq!(pos, Position::new(14, 6));
        assert!(flake_position(Rect::new(0, 0, 0, 4), &f, born).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn snow_only_lands_on_blank_cells() {
        let backend = ratatui::backend::TestBackend::new(10, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let now = Instant::now();
        let mut state = PageState::default();
        for (left, size) in [(0.0, 24.0), (50.0, 24.0)] {
            let f = falling(left, size, now);
            state.snowflakes.insert(f.flake.id, f);
        }

        terminal
            .draw(|frame| {
                frame.render_widget(ratatui::widgets::Paragraph::new("X"), frame.area());
                render(frame, frame.area(), &state, now);
            })
            .unwrap();

        let buf = terminal.backend().buffer();
        assert_eq!(buf[(0, 0)].symbol(), "X", "text is not covered by snow");
        assert_eq!(buf[(5, 0)].symbol(), "❄");
    }
}
