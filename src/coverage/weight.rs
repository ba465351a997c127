//! Counts loss weight (lambda) for profile models.
//!
//! Setting lambda to `n_obs / 2`, where `n_obs` is the average total count per
//! peak region, gives the profile loss and the total counts loss roughly equal
//! weight. `alpha` rescales that balance: values below 1.0 upweight the
//! profile loss.

use super::{peaks::PeakTable, track::TrackSource};
use crate::utils::{Error, Result};
use rayon::prelude::*;

pub const DEFAULT_ALPHA: f64 = 1.0;

/// Coverage summed over peak regions, and the number of regions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CountsSummary {
    pub total_counts: f64,
    pub total_peaks: usize,
}

impl CountsSummary {
    fn merge(self, other: CountsSummary) -> CountsSummary {
        CountsSummary {
            total_counts: self.total_counts + other.total_counts,
            total_peaks: self.total_peaks + other.total_peaks,
        }
    }

    /// Average total count per peak region.
    pub fn n_obs(&self) -> Result<f64> {
        if self.total_peaks == 0 {
            return Err(Error::NoPeaks);
        }
        Ok(self.total_counts / self.total_peaks as f64)
    }

    pub fn counts_loss_weight(&self, alpha: f64) -> Result<f64> {
        Ok((alpha / 2.0) * self.n_obs()?)
    }
}

/// Sums coverage over every peak of every track/peak-table pair. Tables are
/// paired with tracks by position. Missing (NaN) coverage counts as zero.
pub fn summarize_counts<S: TrackSource>(
    sources: &[S],
    peak_tables: &[PeakTable],
) -> Result<CountsSummary> {
    if sources.len() != peak_tables.len() {
        return Err(Error::MismatchedInput {
            tracks: sources.len(),
            peak_tables: peak_tables.len(),
        });
    }

    if let Some(missing) = sources.iter().find(|source| !source.exists()) {
        return Err(Error::MissingFile(missing.path().to_path_buf()));
    }

    // Per-track tallies are reduced in input order
    let tallies = sources
        .par_iter()
        .zip(peak_tables.par_iter())
        .map(|(source, peaks)| tally_track(source, peaks))
        .collect::<Result<Vec<_>>>()?;

    Ok(tallies
        .into_iter()
        .fold(CountsSummary::default(), CountsSummary::merge))
}

pub fn get_recommended_counts_loss_weight<S: TrackSource>(
    sources: &[S],
    peak_tables: &[PeakTable],
    alpha: f64,
) -> Result<f64> {
    let summary = summarize_counts(sources, peak_tables)?;
    let weight = summary.counts_loss_weight(alpha)?;
    log::info!(
        "Total counts {:.2} over {} peaks, n_obs={:.4}",
        summary.total_counts,
        summary.total_peaks,
        summary.n_obs()?
    );
    Ok(weight)
}

fn tally_track<S: TrackSource>(source: &S, peaks: &PeakTable) -> Result<CountsSummary> {
    let mut track = source.open()?;
    let mut total_counts = 0.0;
    for region in &peaks.regions {
        let values = track.values(&region.contig, region.start, region.end)?;
        if values.len() != region.span() as usize {
            return Err(Error::Coverage {
                path: source.path().to_path_buf(),
                message: format!(
                    "expected {} values over {}, got {}",
                    region.span(),
                    region,
                    values.len()
                ),
            });
        }
        total_counts += values
            .iter()
            .map(|v| if v.is_nan() { 0.0 } else { *v as f64 })
            .sum::<f64>();
    }
    log::debug!(
        "{}: {:.2} counts over {} peaks",
        source.path().display(),
        total_counts,
        peaks.len()
    );
    Ok(CountsSummary {
        total_counts,
        total_peaks: peaks.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageTrack;
    use crate::utils::GenomicRegion;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory track: per chromosome, per-base values.
    struct MemorySource {
        path: PathBuf,
        present: bool,
        signal: HashMap<String, Vec<f32>>,
        opened: AtomicUsize,
    }

    impl MemorySource {
        fn new(signal: &[(&str, Vec<f32>)]) -> Self {
            Self {
                path: PathBuf::from("memory.bw"),
                present: true,
                signal: signal
                    .iter()
                    .map(|(chrom, values)| (chrom.to_string(), values.clone()))
                    .collect(),
                opened: AtomicUsize::new(0),
            }
        }

        fn missing(path: &str) -> Self {
            Self {
                path: PathBuf::from(path),
                present: false,
                ..Self::new(&[])
            }
        }
    }

    impl TrackSource for MemorySource {
        fn path(&self) -> &Path {
            &self.path
        }

        fn exists(&self) -> bool {
            self.present
        }

        fn open(&self) -> Result<Box<dyn CoverageTrack + '_>> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(|chrom: &str, start: u32, end: u32| -> Result<Vec<f32>> {
                let values = self.signal.get(chrom).ok_or_else(|| Error::Coverage {
                    path: self.path.clone(),
                    message: format!("unknown chromosome {}", chrom),
                })?;
                Ok(values[start as usize..end as usize].to_vec())
            }))
        }
    }

    fn peaks(regions: &[(&str, u32, u32)]) -> PeakTable {
        PeakTable::new(
            regions
                .iter()
                .map(|(chrom, start, end)| GenomicRegion::new(*chrom, *start, *end).unwrap())
                .collect(),
        )
    }

    #[test]
    fn weight_is_half_alpha_times_mean_counts() {
        // 10 peaks of width 5 with coverage 2.0 per base: 100 counts in total
        let source = MemorySource::new(&[("chr1", vec![2.0; 100])]);
        let regions: Vec<_> = (0..10).map(|i| ("chr1", i * 10, i * 10 + 5)).collect();
        let weight =
            get_recommended_counts_loss_weight(&[source], &[peaks(&regions)], 2.0).unwrap();
        assert_eq!(weight, 10.0);
    }

    #[test]
    fn default_alpha_halves_n_obs() {
        let source = MemorySource::new(&[("chr1", vec![1.0; 10])]);
        let weight = get_recommended_counts_loss_weight(
            &[source],
            &[peaks(&[("chr1", 0, 4), ("chr1", 4, 10)])],
            DEFAULT_ALPHA,
        )
        .unwrap();
        assert_eq!(weight, 2.5);
    }

    #[test]
    fn nan_coverage_counts_as_zero_but_peak_still_counts() {
        let mut signal = vec![f32::NAN; 10];
        signal.extend(vec![3.0; 10]);
        let source = MemorySource::new(&[("chr1", signal)]);
        let summary = summarize_counts(
            &[source],
            &[peaks(&[("chr1", 0, 10), ("chr1", 10, 20)])],
        )
        .unwrap();
        assert_eq!(
            summary,
            CountsSummary {
                total_counts: 30.0,
                total_peaks: 2
            }
        );
        assert_eq!(summary.n_obs().unwrap(), 15.0);
    }

    #[test]
    fn all_nan_region_contributes_zero() {
        let source = MemorySource::new(&[("chr1", vec![f32::NAN; 8])]);
        let summary = summarize_counts(&[source], &[peaks(&[("chr1", 0, 8)])]).unwrap();
        assert_eq!(summary.total_counts, 0.0);
        assert_eq!(summary.total_peaks, 1);
    }

    #[test]
    fn totals_combine_across_tracks() {
        let sources = [
            MemorySource::new(&[("chr1", vec![1.0; 10])]),
            MemorySource::new(&[("chr2", vec![4.0; 10])]),
            MemorySource::new(&[("chr3", vec![0.5; 10])]),
        ];
        let tables = [
            peaks(&[("chr1", 0, 10)]),
            peaks(&[("chr2", 0, 5), ("chr2", 5, 10)]),
            peaks(&[("chr3", 2, 4)]),
        ];
        let summary = summarize_counts(&sources, &tables).unwrap();
        assert_eq!(summary.total_counts, 10.0 + 40.0 + 1.0);
        assert_eq!(summary.total_peaks, 4);
        assert!(sources.iter().all(|s| s.opened.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn mismatched_inputs_fail_without_opening_tracks() {
        let sources = [
            MemorySource::new(&[("chr1", vec![1.0; 10])]),
            MemorySource::new(&[("chr1", vec![1.0; 10])]),
        ];
        let err = summarize_counts(&sources, &[peaks(&[("chr1", 0, 5)])]).unwrap_err();
        assert!(matches!(
            err,
            Error::MismatchedInput {
                tracks: 2,
                peak_tables: 1
            }
        ));
        assert!(sources.iter().all(|s| s.opened.load(Ordering::SeqCst) == 0));
    }

    #[test]
    fn missing_source_is_named_before_any_open() {
        let sources = [
            MemorySource::new(&[("chr1", vec![1.0; 10])]),
            MemorySource::missing("absent.bw"),
        ];
        let tables = [peaks(&[("chr1", 0, 5)]), peaks(&[("chr1", 0, 5)])];
        let err = summarize_counts(&sources, &tables).unwrap_err();
        assert_eq!(err.to_string(), "File does not exist: absent.bw");
        assert_eq!(sources[0].opened.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_peaks_is_an_error() {
        let source = MemorySource::new(&[("chr1", vec![1.0; 10])]);
        let err = get_recommended_counts_loss_weight(&[source], &[PeakTable::default()], 1.0)
            .unwrap_err();
        assert!(matches!(err, Error::NoPeaks));
    }

    #[test]
    fn no_tracks_is_an_error() {
        let sources: [MemorySource; 0] = [];
        let err = get_recommended_counts_loss_weight(&sources, &[], 1.0).unwrap_err();
        assert!(matches!(err, Error::NoPeaks));
    }

    #[test]
    fn query_failure_propagates() {
        let source = MemorySource::new(&[("chr1", vec![1.0; 10])]);
        let err = summarize_counts(&[source], &[peaks(&[("chrX", 0, 5)])]).unwrap_err();
        assert!(matches!(err, Error::Coverage { .. }));
    }

    struct TruncatingSource(PathBuf);

    impl TrackSource for TruncatingSource {
        fn path(&self) -> &Path {
            &self.0
        }

        fn exists(&self) -> bool {
            true
        }

        fn open(&self) -> Result<Box<dyn CoverageTrack + '_>> {
            Ok(Box::new(|_: &str, start: u32, end: u32| -> Result<Vec<f32>> {
                Ok(vec![1.0; (end - start - 1) as usize])
            }))
        }
    }

    #[test]
    fn short_track_query_is_rejected() {
        let source = TruncatingSource(PathBuf::from("short.bw"));
        let err = summarize_counts(&[source], &[peaks(&[("chr1", 10, 15)])]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Coverage track short.bw: expected 5 values over chr1:10-15, got 4"
        );
    }
}
