use crate::cli::ModiscoArgs;
use crate::discovery::{
    write_seqlets, ExternalDiscovery, PatternDiscovery, PatternPlotter, TaskScores,
    WorkflowParams,
};
use crate::scores::{extract_windows, load_bundle, ScoreWindows};
use crate::utils::{Error, Result};
use seqlogo::RenderConfig;
use std::{
    path::{Path, PathBuf},
    time,
};

pub const RESULTS_FILE: &str = "modisco_results.json";
pub const SEQLETS_FILE: &str = "seqlets.txt";

#[derive(Debug, Clone)]
pub struct ModiscoSettings {
    pub half_width: usize,
    pub task_name: String,
    pub metacluster: usize,
    pub plotter: PatternPlotter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutputs {
    pub results_path: PathBuf,
    pub seqlets_path: PathBuf,
    pub num_seqlets: usize,
    pub num_patterns: usize,
}

pub fn modisco(args: ModiscoArgs) -> Result<()> {
    let start_timer = time::Instant::now();

    let params = WorkflowParams {
        sliding_window_size: args.sliding_window_size,
        flank_size: args.flank_size,
        target_seqlet_fdr: args.target_seqlet_fdr,
        trim_to_window_size: args.trim_to_window_size,
        initial_flank_to_add: args.initial_flank_to_add,
        final_min_cluster_size: args.final_min_cluster_size,
    };
    let discovery = ExternalDiscovery::new(args.discovery_program, args.discovery_args, params);

    let render_config = RenderConfig {
        width: args.image_width,
        height: args.image_height,
        ..RenderConfig::default()
    };
    let settings = ModiscoSettings {
        half_width: args.half_width,
        task_name: args.task_name,
        metacluster: args.metacluster,
        plotter: PatternPlotter::new(render_config, args.image_format),
    };

    let outputs = run_pipeline(&args.scores_path, &args.output_dir, &discovery, &settings)?;
    log::info!(
        "Wrote {} seqlets and {} patterns",
        outputs.num_seqlets,
        outputs.num_patterns
    );
    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}

/// Loads scores, runs discovery on the centered windows, and writes the
/// results, seqlet files and pattern images into `output_dir`. Outputs are
/// staged in a hidden directory under `output_dir` and only moved into place
/// once every file of the run has been written.
pub fn run_pipeline<D: PatternDiscovery + ?Sized>(
    scores_path: &Path,
    output_dir: &Path,
    discovery: &D,
    settings: &ModiscoSettings,
) -> Result<PipelineOutputs> {
    if !output_dir.is_dir() {
        return Err(Error::MissingFile(output_dir.to_path_buf()));
    }

    let bundle = load_bundle(scores_path)?;
    let ScoreWindows {
        one_hot,
        hypothetical,
        contrib,
    } = extract_windows(&bundle, settings.half_width)?;
    drop(bundle);

    let task = settings.task_name.clone();
    let task_names = vec![task.clone()];
    let contrib_scores = TaskScores::from([(task.clone(), contrib)]);
    let hypothetical_contribs = TaskScores::from([(task.clone(), hypothetical)]);

    let result = discovery.discover(
        &task_names,
        &contrib_scores,
        &hypothetical_contribs,
        &one_hot,
    )?;
    let metacluster = result.metacluster(settings.metacluster)?;
    metacluster.validate(&task)?;

    let staging = tempfile::Builder::new()
        .prefix(".bpmotif-")
        .tempdir_in(output_dir)?;
    let stage_dir = staging.path();
    let mut staged = Vec::new();

    let results_path = stage_dir.join(RESULTS_FILE);
    result.save(&results_path)?;
    staged.push(results_path);

    let seqlets_path = stage_dir.join(SEQLETS_FILE);
    let num_seqlets = write_seqlets(&seqlets_path, &metacluster.seqlets)?;
    staged.push(seqlets_path);

    log::info!(
        "Rendering {} patterns of metacluster {}",
        metacluster.patterns.len(),
        settings.metacluster
    );
    for (idx, pattern) in metacluster.patterns.iter().enumerate() {
        log::info!("Pattern {}: {} seqlets", idx, pattern.seqlets.len());
        let pattern_path = stage_dir.join(format!("pattern{}_seqlets.txt", idx));
        write_seqlets(&pattern_path, &pattern.seqlets)?;
        staged.push(pattern_path);

        let (contrib_path, sequence_path) =
            settings.plotter.plot_pattern(pattern, idx, &task, stage_dir)?;
        staged.push(contrib_path);
        staged.push(sequence_path);
    }

    for path in &staged {
        let published = publish(path, output_dir)?;
        log::info!("Saved {}", published.display());
    }

    Ok(PipelineOutputs {
        results_path: output_dir.join(RESULTS_FILE),
        seqlets_path: output_dir.join(SEQLETS_FILE),
        num_seqlets,
        num_patterns: metacluster.patterns.len(),
    })
}

fn publish(staged: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_name = staged
        .file_name()
        .ok_or_else(|| Error::MissingFile(staged.to_path_buf()))?;
    let destination = output_dir.join(file_name);
    std::fs::rename(staged, &destination)?;
    Ok(destination)
}
