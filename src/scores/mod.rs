mod bundle;
mod window;

pub use bundle::{
    load_bundle, ContributionScoreBundle, HYPOTHETICAL_KEY, NUM_BASES, PROJECTED_KEY, RAW_KEY,
};
pub use window::{extract_windows, window_bounds, ScoreWindows, DEFAULT_HALF_WIDTH};
