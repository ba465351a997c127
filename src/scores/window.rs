use super::bundle::ContributionScoreBundle;
use crate::utils::{Error, Result};
use ndarray::{s, Array2, Array3};

pub const DEFAULT_HALF_WIDTH: usize = 200;

/// Centered score windows with positions along the first axis and bases
/// along the second, one (2w × 4) array per example.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWindows {
    pub one_hot: Vec<Array2<f32>>,
    pub hypothetical: Vec<Array2<f32>>,
    pub contrib: Vec<Array2<f32>>,
}

impl ScoreWindows {
    pub fn num_examples(&self) -> usize {
        self.one_hot.len()
    }
}

/// Returns the half-open window `[center - w, center + w)` around the
/// midpoint of a sequence of length `seq_len`.
pub fn window_bounds(seq_len: usize, half_width: usize) -> Result<(usize, usize)> {
    if half_width == 0 {
        return Err(Error::invalid_bundle("window half-width must be positive"));
    }
    let center = seq_len / 2;
    if half_width > center {
        return Err(Error::invalid_bundle(format!(
            "window of width {} does not fit in sequences of length {}",
            2 * half_width,
            seq_len
        )));
    }
    Ok((center - half_width, center + half_width))
}

pub fn extract_windows(
    bundle: &ContributionScoreBundle,
    half_width: usize,
) -> Result<ScoreWindows> {
    bundle.validate()?;
    let (start, end) = window_bounds(bundle.seq_len(), half_width)?;
    log::debug!(
        "Extracting window [{}, {}) from {} examples",
        start,
        end,
        bundle.num_examples()
    );

    Ok(ScoreWindows {
        one_hot: slice_channel(&bundle.raw, start, end),
        hypothetical: slice_channel(&bundle.hypothetical, start, end),
        contrib: slice_channel(&bundle.projected, start, end),
    })
}

fn slice_channel(scores: &Array3<f32>, start: usize, end: usize) -> Vec<Array2<f32>> {
    scores
        .outer_iter()
        .map(|example| {
            example
                .slice(s![.., start..end])
                .t()
                .as_standard_layout()
                .into_owned()
        })
        .collect()
}
