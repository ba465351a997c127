use crate::utils::{Error, Result};
use bigtools::BigWigRead;
use std::path::{Path, PathBuf};

/// Per-base signal over a half-open interval. Positions without data are
/// reported as NaN.
pub trait CoverageTrack {
    fn values(&mut self, chrom: &str, start: u32, end: u32) -> Result<Vec<f32>>;
}

impl<F> CoverageTrack for F
where
    F: FnMut(&str, u32, u32) -> Result<Vec<f32>>,
{
    fn values(&mut self, chrom: &str, start: u32, end: u32) -> Result<Vec<f32>> {
        self(chrom, start, end)
    }
}

/// Something a coverage track can be opened from. The returned track owns
/// its handle, which is released when the track is dropped.
pub trait TrackSource: Sync {
    fn path(&self) -> &Path;

    fn exists(&self) -> bool {
        self.path().exists()
    }

    fn open(&self) -> Result<Box<dyn CoverageTrack + '_>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BigWigSource {
    path: PathBuf,
}

impl BigWigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TrackSource for BigWigSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Box<dyn CoverageTrack + '_>> {
        let mut reader = BigWigRead::open_file(&self.path).map_err(|e| Error::Coverage {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let path = self.path.as_path();
        Ok(Box::new(move |chrom: &str, start: u32, end: u32| {
            reader
                .values(chrom, start, end)
                .map_err(|e| Error::Coverage {
                    path: path.to_path_buf(),
                    message: format!("cannot read {}:{}-{}: {}", chrom, start, end, e),
                })
        }))
    }
}
