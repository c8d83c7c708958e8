//! Pattern-similarity search: windowing, normalization, correlation, ranking.

mod correlation;
mod matcher;
mod normalize;
mod window;

pub use correlation::pearson;
pub use matcher::{
    MatchError, MatchQuery, PatternMatch, PatternMatcher, DEFAULT_NUM_CANDLES, DEFAULT_TOP_N,
};
pub use normalize::normalize;
pub use window::trailing_window;
