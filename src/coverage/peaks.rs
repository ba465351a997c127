use crate::utils::{open_table_reader, Error, GenomicRegion, Result};
use std::{io::BufRead, path::Path};

/// Regions of interest paired with one coverage track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeakTable {
    pub regions: Vec<GenomicRegion>,
}

impl PeakTable {
    pub fn new(regions: Vec<GenomicRegion>) -> Self {
        Self { regions }
    }

    /// Parses BED-like lines: `chrom start end [ignored columns...]`.
    /// Comment, `track` and `browser` lines are skipped, as is a leading
    /// `chrom start end` header.
    pub fn from_reader<R: BufRead>(reader: R, source: &Path) -> Result<Self> {
        let mut regions = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = line_number + 1;
            let trimmed = line.trim();
            if trimmed.is_empty()
                || trimmed.starts_with('#')
                || trimmed.starts_with("track")
                || trimmed.starts_with("browser")
            {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(Error::invalid_peaks(
                    source,
                    line_number,
                    format!("expected at least 3 fields (chrom start end), found {}", fields.len()),
                ));
            }
            if regions.is_empty() && fields[..3] == ["chrom", "start", "end"] {
                continue;
            }

            let parse = |value: &str, name: &str| {
                value.parse::<u32>().map_err(|_| {
                    Error::invalid_peaks(source, line_number, format!("invalid {}: {}", name, value))
                })
            };
            let start = parse(fields[1], "start")?;
            let end = parse(fields[2], "end")?;
            let region = GenomicRegion::new(fields[0], start, end)
                .map_err(|e| Error::invalid_peaks(source, line_number, e.to_string()))?;
            regions.push(region);
        }
        Ok(Self { regions })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

pub fn read_peak_table(path: &Path) -> Result<PeakTable> {
    let reader = open_table_reader(path)?;
    let table = PeakTable::from_reader(reader, path)?;
    log::debug!("Read {} peaks from {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<PeakTable> {
        PeakTable::from_reader(Cursor::new(text), Path::new("peaks.bed"))
    }

    #[test]
    fn parses_narrowpeak_rows() {
        let table = parse(
            "chr1\t100\t200\tpeak1\t0\t.\t5.0\t-1\t3.2\t50\n\
             chr2\t5\t10\n",
        )
        .unwrap();
        assert_eq!(
            table.regions,
            vec![
                GenomicRegion::new("chr1", 100, 200).unwrap(),
                GenomicRegion::new("chr2", 5, 10).unwrap(),
            ]
        );
    }

    #[test]
    fn skips_header_and_comments() {
        let table = parse("# peaks\ntrack name=x\nchrom\tstart\tend\nchr1\t1\t2\n\n").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn empty_input_has_no_peaks() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn short_line_is_rejected_with_line_number() {
        let err = parse("chr1\t1\t2\nchr1\t5\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid peaks in peaks.bed at line 2: expected at least 3 fields (chrom start end), found 2"
        );
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let err = parse("chr1\tfoo\t2\n").unwrap_err();
        assert!(matches!(err, Error::InvalidPeaks { line: 1, .. }));
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let err = parse("chr1\t20\t10\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid peaks in peaks.bed at line 1: Invalid region: start 20 >= end 10"
        );
    }

    #[test]
    fn reads_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peaks.bed");
        std::fs::write(&path, "chr1\t0\t10\nchr1\t20\t30\n").unwrap();
        assert_eq!(read_peak_table(&path).unwrap().len(), 2);
    }
}
