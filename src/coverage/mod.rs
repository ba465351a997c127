mod peaks;
mod track;
mod weight;

pub use peaks::{read_peak_table, PeakTable};
pub use track::{BigWigSource, CoverageTrack, TrackSource};
pub use weight::{
    get_recommended_counts_loss_weight, summarize_counts, CountsSummary, DEFAULT_ALPHA,
};
