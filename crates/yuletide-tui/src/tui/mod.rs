// TUI scene: layout, input handling, and widget rendering.
//
// The render loop owns the page's receiving side. Effect events are applied
// to `PageState` as they arrive; the frame is redrawn on a fixed tick, which
// is also what moves the snow.

pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;
use ratatui::{DefaultTerminal, Frame};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use yuletide_core::page::{Page, PageState};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the complete scene. `now` positions the falling snow.
pub fn render_frame(frame: &mut Frame, state: &PageState, now: Instant) {
    let area = frame.area();
    let layout = build_layout(area);

    frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);

    widgets::banner::render(frame, layout.lucky, layout.countdown, state);
    widgets::tree::render(frame, layout.tree, layout.lights, state);
    widgets::lyrics::render(frame, layout.lyrics, state);
    widgets::help_bar::render(frame, layout.help_bar, state);
    widgets::snowfall::render(frame, layout.sky, state, now);
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// `q`, `Esc` and `Ctrl+C` quit. Key releases are ignored.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI until the user quits.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Runs the select loop: page events, keyboard input, render ticks.
/// 4. Restores the terminal, also when the loop fails.
pub async fn run(page: &mut Page, frame_interval: Duration) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let result = event_loop(&mut terminal, page, frame_interval).await;

    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    page: &mut Page,
    frame_interval: Duration,
) -> anyhow::Result<()> {
    let (state, events) = page.parts_mut();

    let mut event_stream = EventStream::new();
    let mut render_tick = tokio::time::interval(frame_interval);
    render_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Once every effect has finished the channel closes; stop polling it so
    // select! does not spin on a ready `None`.
    let mut events_open = true;

    loop {
        tokio::select! {
            event = events.recv(), if events_open => {
                match event {
                    Some(event) => state.apply(event, Instant::now()),
                    None => {
                        info!("All page effects have stopped");
                        events_open = false;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if is_quit_key(&key) => {
                        info!("Quit requested");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                let now = Instant::now();
                terminal.draw(|frame| render_frame(frame, state, now))?;
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit_key(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn other_keys_do_not_quit() {
        assert!(!is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&key(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&key(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn key_release_does_not_quit() {
        let mut release = key(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!is_quit_key(&release));
    }

    #[tokio::test(start_paused = true)]
    async fn render_frame_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = PageState::default();
        terminal
            .draw(|frame| render_frame(frame, &state, Instant::now()))
            .unwrap();
    }
}
