// Banner rows above the tree: polled lucky number and pushed countdown.
//
// Each row renders nothing until its value has arrived.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use yuletide_core::page::PageState;

pub fn render(frame: &mut Frame, lucky_area: Rect, countdown_area: Rect, state: &PageState) {
    if let Some(line) = lucky_line(state.lucky_number) {
        frame.render_widget(Paragraph::new(line), lucky_area);
    }
    if let Some(line) = countdown_line(state.countdown) {
        frame.render_widget(Paragraph::new(line), countdown_area);
    }
}

pub fn lucky_line(number: Option<i64>) -> Option<Line<'static>> {
    let number = number?;
    Some(
        Line::from(vec![
            Span::styled(
                format!("🎉 Lucky number for next year: {number} 🎉"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" - polled every few seconds", Style::default().fg(Color::DarkGray)),
        ])
        .centered(),
    )
}

pub fn countdown_line(seconds: Option<i64>) -> Option<Line<'static>> {
    let seconds = seconds?;
    Some(
        Line::from(vec![
            Span::styled(
                format!(
                    "🎄 {seconds} seconds until Christmas ({}) 🎄",
                    format_duration(seconds)
                ),
                Style::default().fg(Color::Rgb(255, 105, 180)),
            ),
            Span::styled(" - pushed by the server", Style::default().fg(Color::Rgb(187, 255, 255))),
        ])
        .centered(),
    )
}

/// `90061` -> `"1d 01h 01m 01s"`. Negative values clamp to zero.
pub fn format_duration(seconds: i64) -> String {
    let s = seconds.max(0);
    let days = s / 86_400;
    let hours = (s % 86_400) / 3_600;
    let minutes = (s % 3_600) / 60;
    let secs = s % 60;
    format!("{days}d {hours:02}h {minutes:02}m {secs:02}s")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
