use crate::utils::{Error, Result};
use ndarray::{Array3, Ix3, OwnedRepr};
use ndarray_npy::{NpzReader, ReadNpyError, ReadNpzError};
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

pub const NUM_BASES: usize = 4;

const HDF5_SIGNATURE: &[u8; 8] = b"\x89HDF\r\n\x1a\n";

pub const RAW_KEY: &str = "raw/seq";
pub const HYPOTHETICAL_KEY: &str = "shap/seq";
pub const PROJECTED_KEY: &str = "projected_shap/seq";

/// Per-example score matrices, one array of shape (examples, 4, length) per
/// channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionScoreBundle {
    /// One-hot encoded input sequence
    pub raw: Array3<f32>,
    /// Hypothetical contributions of every base at every position
    pub hypothetical: Array3<f32>,
    /// Hypothetical contributions projected onto the observed bases
    pub projected: Array3<f32>,
}

impl ContributionScoreBundle {
    pub fn new(raw: Array3<f32>, hypothetical: Array3<f32>, projected: Array3<f32>) -> Self {
        Self {
            raw,
            hypothetical,
            projected,
        }
    }

    pub fn num_examples(&self) -> usize {
        self.raw.shape()[0]
    }

    pub fn seq_len(&self) -> usize {
        self.raw.shape()[2]
    }

    fn channels(&self) -> [(&'static str, &Array3<f32>); 3] {
        [
            ("raw", &self.raw),
            ("shap", &self.hypothetical),
            ("projected_shap", &self.projected),
        ]
    }

    /// Checks that the channels agree on example count and sequence length,
    /// carry one row per base, and have an even length.
    pub fn validate(&self) -> Result<()> {
        let (num_examples, seq_len) = (self.num_examples(), self.seq_len());
        for (name, scores) in self.channels() {
            let (examples, bases, len) = scores.dim();
            if bases != NUM_BASES {
                return Err(Error::invalid_bundle(format!(
                    "channel {} has {} rows per example, expected {}",
                    name, bases, NUM_BASES
                )));
            }
            if examples != num_examples {
                return Err(Error::invalid_bundle(format!(
                    "channel {} has {} examples, channel raw has {}",
                    name, examples, num_examples
                )));
            }
            if len != seq_len {
                return Err(Error::invalid_bundle(format!(
                    "channel {} has sequence length {}, channel raw has {}",
                    name, len, seq_len
                )));
            }
        }
        if seq_len % 2 != 0 {
            return Err(Error::invalid_bundle(format!(
                "sequence length {} is odd",
                seq_len
            )));
        }
        Ok(())
    }
}

pub fn load_bundle(path: &Path) -> Result<ContributionScoreBundle> {
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    if is_hdf5(path)? {
        return Err(Error::invalid_bundle(format!(
            "{} is an HDF5 file; convert its {}, {} and {} datasets to an NPZ archive",
            path.display(),
            RAW_KEY,
            HYPOTHETICAL_KEY,
            PROJECTED_KEY
        )));
    }
    let file = File::open(path)?;
    let mut npz = NpzReader::new(file).map_err(|e| npz_error(path, e))?;
    let names = npz.names().map_err(|e| npz_error(path, e))?;
    let entry = |key: &str| -> Result<String> {
        names
            .iter()
            .find(|name| name.as_str() == key || name.strip_suffix(".npy") == Some(key))
            .cloned()
            .ok_or_else(|| {
                Error::invalid_bundle(format!("{} has no {} entry", path.display(), key))
            })
    };
    let (raw, hypothetical, projected) = (
        entry(RAW_KEY)?,
        entry(HYPOTHETICAL_KEY)?,
        entry(PROJECTED_KEY)?,
    );

    let bundle = ContributionScoreBundle::new(
        read_channel(&mut npz, &raw, path)?,
        read_channel(&mut npz, &hypothetical, path)?,
        read_channel(&mut npz, &projected, path)?,
    );
    bundle.validate()?;
    log::debug!(
        "Loaded {} examples of length {} from {}",
        bundle.num_examples(),
        bundle.seq_len(),
        path.display()
    );
    Ok(bundle)
}

fn is_hdf5(path: &Path) -> Result<bool> {
    let mut magic = [0u8; 8];
    match File::open(path)?.read_exact(&mut magic) {
        Ok(()) => Ok(&magic == HDF5_SIGNATURE),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

// float64 archives are narrowed to f32
fn read_channel(npz: &mut NpzReader<File>, entry: &str, path: &Path) -> Result<Array3<f32>> {
    match npz.by_name::<OwnedRepr<f32>, Ix3>(entry) {
        Ok(scores) => Ok(scores),
        Err(ReadNpzError::Npy(ReadNpyError::WrongDescriptor(_))) => npz
            .by_name::<OwnedRepr<f64>, Ix3>(entry)
            .map(|scores| scores.mapv(|v| v as f32))
            .map_err(|e| npz_error(path, e)),
        Err(e) => Err(npz_error(path, e)),
    }
}

fn npz_error(path: &Path, err: ReadNpzError) -> Error {
    Error::invalid_bundle(format!("{}: {}", path.display(), err))
}
