// Library root: the terminal front end, exposed for integration tests.

pub mod tui;
