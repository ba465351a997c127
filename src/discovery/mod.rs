//! Pattern discovery collaborator and serialization of its results.

mod external;
mod plots;
mod result;
mod writers;

pub use external::{ExternalDiscovery, WorkflowParams};
pub use plots::PatternPlotter;
pub use result::{
    contrib_track_name, DiscoveryResult, Metacluster, Pattern, Seqlet,
    SeqletCoordinates, Track, SEQUENCE_TRACK,
};
pub use writers::{decode_sequence, one_hot_encode, write_seqlet_records, write_seqlets, BASES};

use crate::utils::Result;
use ndarray::Array2;
use std::collections::BTreeMap;

/// Per-task score windows keyed by task name.
pub type TaskScores = BTreeMap<String, Vec<Array2<f32>>>;

/// Motif discovery over centered score windows. Every window has shape
/// (positions × 4) with bases ordered A, C, G, T.
pub trait PatternDiscovery {
    fn discover(
        &self,
        task_names: &[String],
        contrib_scores: &TaskScores,
        hypothetical_contribs: &TaskScores,
        one_hot: &[Array2<f32>],
    ) -> Result<DiscoveryResult>;
}
