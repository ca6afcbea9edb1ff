// TUI widget modules for each scene zone.

pub mod banner;
pub mod help_bar;
pub mod lyrics;
pub mod snowfall;
pub mod tree;
