// The page's background effects. Each one reads from a `DataSource` and/or a
// timer and reports state changes as `PageEvent`s; none of them owns state
// the renderer reads.

pub mod countdown;
pub mod emojis;
pub mod lucky;
pub mod lyrics;
pub mod snow;

#[cfg(test)]
pub(crate) mod testing;
