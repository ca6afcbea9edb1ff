// Lyrics panel: revealed lines, newest at the bottom.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use yuletide_core::effects::lyrics::RevealPhase;
use yuletide_core::page::PageState;

pub fn render(frame: &mut Frame, area: Rect, state: &PageState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title(state));

    let visible = (area.height as usize).saturating_sub(2);
    let lines: Vec<Line> = if state.displayed_lyrics.is_empty() {
        match state.lyrics_phase() {
            RevealPhase::Idle => vec![Line::from("Waiting for lyrics...")
                .style(Style::default().fg(Color::DarkGray))
                .centered()],
            _ => Vec::new(),
        }
    } else {
        visible_lines(&state.displayed_lyrics, visible)
            .iter()
            .map(|l| Line::from(l.as_str()).style(Style::default().fg(Color::Yellow)).centered())
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Panel title with reveal progress once the lyrics are loaded.
pub fn title(state: &PageState) -> String {
    match state.lyrics_total {
        Some(total) => format!("Lyrics {}/{}", state.displayed_lyrics.len(), total),
        None => "Lyrics".to_string(),
    }
}

/// The last `rows` lines, so the newest reveal is always on screen.
pub fn visible_lines(lines: &[String], rows: usize) -> &[String] {
    &lines[lines.len().saturating_sub(rows)..]
}
