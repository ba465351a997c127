use crate::scores::DEFAULT_HALF_WIDTH;
use chrono::Datelike;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use seqlogo::FileType;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

type ParseResult<T> = std::result::Result<T, String>;

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="bpmotif",
          version=&**FULL_VERSION,
          about="Motif discovery and counts loss weighting for base-resolution models",
          long_about = None,
          disable_help_subcommand = true,
          after_help = format!("Copyright (C) 2020-{}     bpmotif developers
This program comes with ABSOLUTELY NO WARRANTY.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Discover motifs from contribution scores")]
    Modisco(ModiscoArgs),
    #[clap(about = "Recommend a counts loss weight from coverage over peaks")]
    CountsLossWeight(CountsLossWeightArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("modisco")))]
#[command(arg_required_else_help(true))]
pub struct ModiscoArgs {
    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "scores")]
    #[clap(help = "NPZ archive with raw/seq, shap/seq and projected_shap/seq arrays (convert HDF5 score files to NPZ first)")]
    #[clap(value_name = "SCORES")]
    #[arg(value_parser = check_file_exists)]
    pub scores_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-directory")]
    #[clap(help = "Existing directory for results, seqlets and images")]
    #[clap(value_name = "DIR")]
    #[arg(value_parser = check_dir_exists)]
    pub output_dir: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'd')]
    #[clap(long = "discovery")]
    #[clap(help = "Pattern discovery program")]
    #[clap(value_name = "PROGRAM")]
    pub discovery_program: PathBuf,

    #[clap(long = "discovery-arg")]
    #[clap(value_name = "ARG")]
    #[clap(help = "Extra argument passed to the discovery program (repeatable)")]
    #[clap(allow_hyphen_values = true)]
    pub discovery_args: Vec<String>,

    #[clap(long = "task")]
    #[clap(value_name = "TASK")]
    #[clap(help = "Task name used for the score tracks")]
    #[clap(default_value = "task0")]
    pub task_name: String,

    #[clap(long = "metacluster")]
    #[clap(value_name = "INDEX")]
    #[clap(help = "Metacluster whose seqlets and patterns are written")]
    #[clap(default_value = "0")]
    pub metacluster: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "half-width")]
    #[clap(value_name = "HALF_WIDTH")]
    #[clap(help = "Half-width of the window centered on each example")]
    #[clap(default_value_t = DEFAULT_HALF_WIDTH)]
    #[arg(value_parser = positive_integer)]
    pub half_width: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "sliding-window-size")]
    #[clap(value_name = "SIZE")]
    #[clap(help = "Window size used to score seqlet candidates")]
    #[clap(default_value = "21")]
    #[arg(value_parser = positive_integer)]
    pub sliding_window_size: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "flank-size")]
    #[clap(value_name = "SIZE")]
    #[clap(help = "Flank added on each side of a seqlet")]
    #[clap(default_value = "10")]
    pub flank_size: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "target-seqlet-fdr")]
    #[clap(value_name = "FDR")]
    #[clap(help = "Target false discovery rate for seqlets")]
    #[clap(default_value = "0.05")]
    #[arg(value_parser = ensure_unit_float)]
    pub target_seqlet_fdr: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "trim-to-window-size")]
    #[clap(value_name = "SIZE")]
    #[clap(help = "Width patterns are trimmed to")]
    #[clap(default_value = "30")]
    #[arg(value_parser = positive_integer)]
    pub trim_to_window_size: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "initial-flank-to-add")]
    #[clap(value_name = "SIZE")]
    #[clap(help = "Flank added to seqlets before clustering")]
    #[clap(default_value = "10")]
    pub initial_flank_to_add: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "final-min-cluster-size")]
    #[clap(value_name = "SIZE")]
    #[clap(help = "Minimum number of seqlets in a reported pattern")]
    #[clap(default_value = "30")]
    #[arg(value_parser = positive_integer)]
    pub final_min_cluster_size: usize,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "image-format")]
    #[clap(value_name = "FORMAT")]
    #[clap(help = "Image format of pattern plots (png, svg or pdf)")]
    #[clap(default_value = "png")]
    #[arg(value_parser = image_format)]
    pub image_format: FileType,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "image-width")]
    #[clap(value_name = "PIXELS")]
    #[clap(help = "Width of pattern plots")]
    #[clap(default_value = "2000")]
    #[arg(value_parser = positive_pixels)]
    pub image_width: u32,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "image-height")]
    #[clap(value_name = "PIXELS")]
    #[clap(help = "Height of pattern plots")]
    #[clap(default_value = "200")]
    #[arg(value_parser = positive_pixels)]
    pub image_height: u32,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("counts-loss-weight")))]
#[command(arg_required_else_help(true))]
pub struct CountsLossWeightArgs {
    #[clap(required = true)]
    #[clap(short = 'b')]
    #[clap(long = "bigwigs")]
    #[clap(help = "Coverage bigWig files")]
    #[clap(value_name = "BIGWIG")]
    #[clap(num_args = 1..)]
    pub bigwig_paths: Vec<PathBuf>,

    #[clap(required = true)]
    #[clap(short = 'p')]
    #[clap(long = "peaks")]
    #[clap(help = "BED files with peaks, one per bigWig and in the same order")]
    #[clap(value_name = "PEAKS")]
    #[clap(num_args = 1..)]
    pub peaks_paths: Vec<PathBuf>,

    #[clap(short = 'a')]
    #[clap(long = "alpha")]
    #[clap(value_name = "ALPHA")]
    #[clap(help = "Scale of the profile loss relative to the counts loss; values < 1.0 upweight the profile loss")]
    #[clap(default_value = "1.0")]
    #[arg(value_parser = positive_float)]
    pub alpha: f64,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_file_exists(s: &str) -> ParseResult<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_dir_exists(s: &str) -> ParseResult<PathBuf> {
    let path = Path::new(s);
    if !path.is_dir() {
        Err(format!("Directory does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn threads_in_range(s: &str) -> ParseResult<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn positive_integer(s: &str) -> ParseResult<usize> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid integer", s))?;
    if value >= 1 {
        Ok(value)
    } else {
        Err("The value must be at least 1".into())
    }
}

fn positive_pixels(s: &str) -> ParseResult<u32> {
    let value = positive_integer(s)?;
    u32::try_from(value).map_err(|_| format!("`{}` is too large", s))
}

fn positive_float(s: &str) -> ParseResult<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("The value must be positive, got: {}", value))
    }
}

fn ensure_unit_float(s: &str) -> ParseResult<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

fn image_format(s: &str) -> ParseResult<FileType> {
    FileType::from_extension(s)
        .ok_or_else(|| format!("Image format must be png, svg, or pdf, got: {}", s))
}
