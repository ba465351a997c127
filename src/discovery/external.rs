use super::{result::DiscoveryResult, PatternDiscovery, TaskScores};
use crate::utils::{Error, Result};
use ndarray::{stack, Array2, Array3, Axis};
use ndarray_npy::NpzWriter;
use serde::Serialize;
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    process::Command,
};

const INPUT_FILE: &str = "discovery_input.npz";
const PARAMS_FILE: &str = "discovery_params.json";
const OUTPUT_FILE: &str = "discovery_result.json";

/// Settings forwarded to the discovery workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowParams {
    pub sliding_window_size: usize,
    pub flank_size: usize,
    pub target_seqlet_fdr: f64,
    pub trim_to_window_size: usize,
    pub initial_flank_to_add: usize,
    pub final_min_cluster_size: usize,
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self {
            sliding_window_size: 21,
            flank_size: 10,
            target_seqlet_fdr: 0.05,
            trim_to_window_size: 30,
            initial_flank_to_add: 10,
            final_min_cluster_size: 30,
        }
    }
}

#[derive(Serialize)]
struct DiscoveryRequest<'a> {
    task_names: &'a [String],
    params: &'a WorkflowParams,
}

/// Runs an external discovery program. The program is called with its
/// configured arguments followed by `--input <npz> --params <json> --output
/// <json>` and must write a `DiscoveryResult` JSON document to the output path.
#[derive(Debug, Clone)]
pub struct ExternalDiscovery {
    program: PathBuf,
    args: Vec<String>,
    params: WorkflowParams,
}

impl ExternalDiscovery {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, params: WorkflowParams) -> Self {
        Self {
            program: program.into(),
            args,
            params,
        }
    }

    fn write_inputs(
        &self,
        workdir: &Path,
        task_names: &[String],
        contrib_scores: &TaskScores,
        hypothetical_contribs: &TaskScores,
        one_hot: &[Array2<f32>],
    ) -> Result<(PathBuf, PathBuf)> {
        let input_path = workdir.join(INPUT_FILE);
        let mut npz = NpzWriter::new_compressed(File::create(&input_path)?);
        let mut add = |name: String, windows: &[Array2<f32>]| -> Result<()> {
            let stacked = stack_windows(windows)?;
            npz.add_array(name, &stacked)
                .map_err(|e| Error::Discovery(format!("cannot write {}: {}", INPUT_FILE, e)))
        };

        add("one_hot".to_string(), one_hot)?;
        for task in task_names {
            let contrib = task_windows(contrib_scores, task, "contribution", one_hot.len())?;
            let hypothetical =
                task_windows(hypothetical_contribs, task, "hypothetical", one_hot.len())?;
            add(format!("{}/contrib_scores", task), contrib)?;
            add(format!("{}/hypothetical_contribs", task), hypothetical)?;
        }
        npz.finish()
            .map_err(|e| Error::Discovery(format!("cannot write {}: {}", INPUT_FILE, e)))?;

        let params_path = workdir.join(PARAMS_FILE);
        let request = DiscoveryRequest {
            task_names,
            params: &self.params,
        };
        serde_json::to_writer_pretty(BufWriter::new(File::create(&params_path)?), &request)?;

        Ok((input_path, params_path))
    }
}

impl PatternDiscovery for ExternalDiscovery {
    fn discover(
        &self,
        task_names: &[String],
        contrib_scores: &TaskScores,
        hypothetical_contribs: &TaskScores,
        one_hot: &[Array2<f32>],
    ) -> Result<DiscoveryResult> {
        let workdir = tempfile::tempdir()?;
        let (input_path, params_path) = self.write_inputs(
            workdir.path(),
            task_names,
            contrib_scores,
            hypothetical_contribs,
            one_hot,
        )?;
        let output_path = workdir.path().join(OUTPUT_FILE);

        log::info!(
            "Running pattern discovery on {} examples: {}",
            one_hot.len(),
            self.program.display()
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("--input")
            .arg(&input_path)
            .arg("--params")
            .arg(&params_path)
            .arg("--output")
            .arg(&output_path)
            .output()
            .map_err(|e| {
                Error::Discovery(format!("cannot run {}: {}", self.program.display(), e))
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log::debug!("{}", line);
        }
        if !output.status.success() {
            return Err(Error::Discovery(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        DiscoveryResult::from_path(&output_path)
    }
}

fn task_windows<'a>(
    scores: &'a TaskScores,
    task: &str,
    kind: &str,
    num_examples: usize,
) -> Result<&'a [Array2<f32>]> {
    let windows = scores
        .get(task)
        .ok_or_else(|| Error::Discovery(format!("no {} scores for task {}", kind, task)))?;
    if windows.len() != num_examples {
        return Err(Error::Discovery(format!(
            "task {} has {} {} windows for {} examples",
            task,
            windows.len(),
            kind,
            num_examples
        )));
    }
    Ok(windows)
}

/// Stacks per-example windows into an (examples × positions × 4) array.
fn stack_windows(windows: &[Array2<f32>]) -> Result<Array3<f32>> {
    if windows.is_empty() {
        return Err(Error::Discovery("no examples to analyze".to_string()));
    }
    let views: Vec<_> = windows.iter().map(|w| w.view()).collect();
    stack(Axis(0), &views).map_err(|e| Error::Discovery(format!("cannot stack windows: {}", e)))
}
