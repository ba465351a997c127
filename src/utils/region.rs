use crate::utils::{Error, Result};
use std::fmt;

/// Half-open genomic interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicRegion {
    pub contig: String,
    pub start: u32,
    pub end: u32,
}

impl GenomicRegion {
    pub fn new(contig: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidRegion(format!(
                "start {} >= end {}",
                start, end
            )));
        }

        Ok(Self {
            contig: contig.into(),
            start,
            end,
        })
    }

    pub fn span(&self) -> u32 {
        self.end - self.start
    }
}

impl fmt::Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_reports_length_and_coordinates() {
        let region = GenomicRegion::new("chr1", 100, 200).unwrap();
        assert_eq!(region.contig, "chr1");
        assert_eq!(region.span(), 100);
        assert_eq!(region.to_string(), "chr1:100-200");
    }

    #[test]
    fn init_region_from_invalid_interval_err() {
        let err = GenomicRegion::new("chr1", 200, 100).unwrap_err();
        assert_eq!(err.to_string(), "Invalid region: start 200 >= end 100");
    }

    #[test]
    fn init_region_from_empty_interval_err() {
        assert!(matches!(
            GenomicRegion::new("chr1", 200, 200),
            Err(Error::InvalidRegion(_))
        ));
    }
}
