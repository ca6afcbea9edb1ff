// Library root for the holiday page client: configuration, backend access,
// the background effects and the page that owns their state.

pub mod api;
pub mod config;
pub mod effect;
pub mod effects;
pub mod page;
pub mod protocol;
