use crate::utils::{write_atomically, Error, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

pub const SEQUENCE_TRACK: &str = "sequence";

pub fn contrib_track_name(task: &str) -> String {
    format!("{}_contrib_scores", task)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqletCoordinates {
    pub example_idx: usize,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub is_revcomp: bool,
}

/// Score matrix with one row per position and one column per base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub fwd: Vec<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<Vec<[f32; 4]>>,
}

impl Track {
    pub fn new(fwd: Vec<[f32; 4]>) -> Self {
        Self { fwd, rev: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seqlet {
    pub coor: SeqletCoordinates,
    #[serde(default)]
    pub tracks: BTreeMap<String, Track>,
}

impl Seqlet {
    pub fn track(&self, name: &str) -> Result<&Track> {
        self.tracks.get(name).ok_or_else(|| {
            Error::InvalidDiscoveryResult(format!(
                "seqlet example{}:{}-{} has no {} track",
                self.coor.example_idx, self.coor.start, self.coor.end, name
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub seqlets: Vec<Seqlet>,
    #[serde(default)]
    pub tracks: BTreeMap<String, Track>,
}

impl Pattern {
    pub fn track(&self, name: &str) -> Result<&Track> {
        self.tracks.get(name).ok_or_else(|| {
            Error::InvalidDiscoveryResult(format!("pattern has no {} track", name))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metacluster {
    #[serde(default)]
    pub seqlets: Vec<Seqlet>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

impl Metacluster {
    /// Checks that every track needed to write seqlets and plot patterns for
    /// `task` is present.
    pub fn validate(&self, task: &str) -> Result<()> {
        let contrib = contrib_track_name(task);
        for seqlet in &self.seqlets {
            seqlet.track(SEQUENCE_TRACK)?;
        }
        for (idx, pattern) in self.patterns.iter().enumerate() {
            for name in [contrib.as_str(), SEQUENCE_TRACK] {
                pattern.track(name).map_err(|_| {
                    Error::InvalidDiscoveryResult(format!(
                        "pattern {} has no {} track",
                        idx, name
                    ))
                })?;
            }
            for seqlet in &pattern.seqlets {
                seqlet.track(SEQUENCE_TRACK)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscoveryResult {
    #[serde(default)]
    pub task_names: Vec<String>,
    pub metaclusters: Vec<Metacluster>,
}

impl DiscoveryResult {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::InvalidDiscoveryResult(format!(
                "result file {} was not written",
                path.display()
            )));
        }
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|e| {
            Error::InvalidDiscoveryResult(format!("{}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomically(path, |writer| {
            serde_json::to_writer(writer, self)?;
            Ok(())
        })
    }

    pub fn metacluster(&self, idx: usize) -> Result<&Metacluster> {
        self.metaclusters.get(idx).ok_or_else(|| {
            Error::InvalidDiscoveryResult(format!(
                "no metacluster {} in {} metaclusters",
                idx,
                self.metaclusters.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULT_JSON: &str = r#"{
        "metaclusters": [
            {
                "seqlets": [
                    {"coor": {"example_idx": 0, "start": 3, "end": 5},
                     "tracks": {"sequence": {"fwd": [[1,0,0,0],[0,0,0,1]]}}}
                ],
                "patterns": [
                    {"seqlets": [],
                     "tracks": {"sequence": {"fwd": [[0.5,0.5,0,0]], "rev": [[0,0,0.5,0.5]]}}}
                ]
            },
            {"seqlets": [
                {"coor": {"example_idx": 1, "start": 0, "end": 1, "is_revcomp": true}}
            ]}
        ]
    }"#;

    #[test]
    fn parses_nested_result() {
        let result: DiscoveryResult = serde_json::from_str(RESULT_JSON).unwrap();
        assert!(result.task_names.is_empty());
        assert_eq!(result.metaclusters.len(), 2);
        let metacluster = result.metacluster(0).unwrap();
        assert_eq!(metacluster.seqlets.len(), 1);
        assert_eq!(metacluster.patterns.len(), 1);

        let first = &metacluster.seqlets[0];
        assert_eq!(
            first.coor,
            SeqletCoordinates {
                example_idx: 0,
                start: 3,
                end: 5,
                is_revcomp: false
            }
        );
        assert_eq!(first.track(SEQUENCE_TRACK).unwrap().fwd[1], [0.0, 0.0, 0.0, 1.0]);

        let pattern = &metacluster.patterns[0];
        assert!(pattern.track(SEQUENCE_TRACK).unwrap().rev.is_some());
        assert!(matches!(
            pattern.track(&contrib_track_name("task0")),
            Err(Error::InvalidDiscoveryResult(_))
        ));
    }

    #[test]
    fn missing_track_is_reported_with_coordinates() {
        let result: DiscoveryResult = serde_json::from_str(RESULT_JSON).unwrap();
        let err = result.metacluster(1).unwrap().validate("task0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid discovery result: seqlet example1:0-1 has no sequence track"
        );
    }

    #[test]
    fn missing_metacluster_is_reported() {
        let result: DiscoveryResult = serde_json::from_str(RESULT_JSON).unwrap();
        assert!(matches!(
            result.metacluster(2),
            Err(Error::InvalidDiscoveryResult(ref msg)) if msg == "no metacluster 2 in 2 metaclusters"
        ));
    }

    #[test]
    fn validate_checks_every_pattern_track() {
        let result: DiscoveryResult = serde_json::from_str(RESULT_JSON).unwrap();
        let mut metacluster = result.metacluster(0).unwrap().clone();
        let err = metacluster.validate("task0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid discovery result: pattern 0 has no task0_contrib_scores track"
        );

        let sequence = metacluster.patterns[0].tracks[SEQUENCE_TRACK].clone();
        metacluster.patterns[0]
            .tracks
            .insert(contrib_track_name("task0"), sequence);
        metacluster.validate("task0").unwrap();

        let mut unnamed = metacluster.seqlets[0].clone();
        unnamed.tracks.clear();
        metacluster.patterns[0].seqlets.push(unnamed);
        assert!(matches!(
            metacluster.validate("task0"),
            Err(Error::InvalidDiscoveryResult(_))
        ));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modisco_results.json");
        let result: DiscoveryResult = serde_json::from_str(RESULT_JSON).unwrap();
        result.save(&path).unwrap();
        assert_eq!(DiscoveryResult::from_path(&path).unwrap(), result);
    }

    #[test]
    fn malformed_result_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"metaclusters\": 3}").unwrap();
        assert!(matches!(
            DiscoveryResult::from_path(&path),
            Err(Error::InvalidDiscoveryResult(_))
        ));
    }

    #[test]
    fn track_names_follow_task() {
        assert_eq!(contrib_track_name("task0"), "task0_contrib_scores");
        assert_eq!(contrib_track_name("ctcf"), "ctcf_contrib_scores");
    }
}
