use super::result::{Seqlet, SEQUENCE_TRACK};
use crate::utils::{write_atomically, Result};
use std::{io::Write, path::Path};

/// Base for each one-hot column. Discovery collaborators must use this order.
pub const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

/// Decodes a one-hot (or score) matrix by taking the highest scoring base at
/// each position. Ties go to the first base in `BASES` order.
pub fn decode_sequence(track: &[[f32; 4]]) -> String {
    track
        .iter()
        .map(|row| {
            let best = row
                .iter()
                .enumerate()
                .fold(0, |best, (index, value)| {
                    if *value > row[best] {
                        index
                    } else {
                        best
                    }
                });
            BASES[best]
        })
        .collect()
}

/// One-hot encodes a nucleotide sequence; `None` if it has a non-ACGT base.
pub fn one_hot_encode(seq: &str) -> Option<Vec<[f32; 4]>> {
    seq.chars()
        .map(|base| {
            let index = BASES.iter().position(|b| *b == base.to_ascii_uppercase())?;
            let mut row = [0.0; 4];
            row[index] = 1.0;
            Some(row)
        })
        .collect()
}

pub fn write_seqlet_records<'a, W, I>(writer: &mut W, seqlets: I) -> Result<usize>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a Seqlet>,
{
    let mut count = 0;
    for seqlet in seqlets {
        let sequence = decode_sequence(&seqlet.track(SEQUENCE_TRACK)?.fwd);
        let coor = &seqlet.coor;
        writeln!(writer, ">example{}:{}-{}", coor.example_idx, coor.start, coor.end)?;
        writeln!(writer, "{}", sequence)?;
        count += 1;
    }
    Ok(count)
}

/// Writes `>example<idx>:<start>-<end>` / sequence line pairs to `path`.
/// Returns the number of records written.
pub fn write_seqlets<'a, I>(path: &Path, seqlets: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Seqlet>,
{
    let mut count = 0;
    write_atomically(path, |writer| {
        count = write_seqlet_records(writer, seqlets)?;
        Ok(())
    })?;
    Ok(count)
}
