// Screen layout: zone arrangement and sizing.
//
// +--------------------------------------------------+
// | Lucky number (1 row)                              |
// | Countdown (1 row)                                 |
// +--------------------------------------------------+
// |                      *                            |
// |                     ***        Tree (fill)        |
// |                    *****                          |
// |                     |||                           |
// +--------------------------------------------------+
// | Lights (1 row)                                    |
// +--------------------------------------------------+
// | Lyrics (8 rows, bordered)                         |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The sky covers everything above the help bar; snow is drawn over it.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows given to the lyrics panel, borders included.
pub const LYRICS_HEIGHT: u16 = 8;

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct SceneLayout {
    pub lucky: Rect,
    pub countdown: Rect,
    pub tree: Rect,
    /// Emoji lights directly under the trunk.
    pub lights: Rect,
    pub lyrics: Rect,
    pub help_bar: Rect,
    /// Snowfall overlay area: the whole screen except the help bar.
    pub sky: Rect,
}

pub fn build_layout(area: Rect) -> SceneLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // lucky number
            Constraint::Length(1),             // countdown
            Constraint::Min(4),                // tree
            Constraint::Length(1),             // lights
            Constraint::Length(LYRICS_HEIGHT), // lyrics
            Constraint::Length(1),             // help bar
        ])
        .split(area);

    let sky = Rect::new(
        area.x,
        area.y,
        area.width,
        area.height.saturating_sub(vertical[5].height),
    );

    SceneLayout {
        lucky: vertical[0],
        countdown: vertical[1],
        tree: vertical[2],
        lights: vertical[3],
        lyrics: vertical[4],
        help_bar: vertical[5],
        sky,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
