use super::{Error, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

/// Opens a plain or gzip-compressed text table.
pub fn open_table_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid gzip header: {}", path.to_string_lossy()),
            )))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}
