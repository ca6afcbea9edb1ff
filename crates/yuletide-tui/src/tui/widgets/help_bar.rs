// Help bar: key hints plus a little live status.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use yuletide_core::page::PageState;

pub fn render(frame: &mut Frame, area: Rect, state: &PageState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        status_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn status_text(state: &PageState) -> String {
    let lyrics = match state.lyrics_total {
        Some(total) => format!("{}/{}", state.displayed_lyrics.len(), total),
        None => "--".to_string(),
    };
    format!(
        " q:Quit | Lyrics {} | Snowflakes {}",
        lyrics,
        state.snowflakes.len()
    )
}
