use super::result::{contrib_track_name, Pattern, Track, SEQUENCE_TRACK};
use crate::utils::{Error, Result};
use seqlogo::{generate_image, FileType, Logo, RenderConfig};
use std::path::{Path, PathBuf};

/// Draws pattern tracks as sequence logos with the A/C/G/T colors
/// green/blue/orange/red.
#[derive(Debug, Clone)]
pub struct PatternPlotter {
    config: RenderConfig,
    file_type: FileType,
}

impl PatternPlotter {
    pub fn new(config: RenderConfig, file_type: FileType) -> Self {
        Self { config, file_type }
    }

    pub fn save_plot(&self, track: &Track, path: &Path) -> Result<()> {
        let weights = track.fwd.iter().map(|row| row.map(f64::from)).collect();
        let logo = Logo::dna(weights);
        generate_image(&logo, &self.config, path).map_err(|message| Error::Render {
            path: path.to_path_buf(),
            message,
        })?;
        log::debug!("Saved {}", path.display());
        Ok(())
    }

    /// Writes `contrib_<idx>` and `sequence_<idx>` images into `output_dir`.
    pub fn plot_pattern(
        &self,
        pattern: &Pattern,
        idx: usize,
        task: &str,
        output_dir: &Path,
    ) -> Result<(PathBuf, PathBuf)> {
        let extension = self.file_type.extension();
        let contrib_path = output_dir.join(format!("contrib_{}.{}", idx, extension));
        let sequence_path = output_dir.join(format!("sequence_{}.{}", idx, extension));

        self.save_plot(pattern.track(&contrib_track_name(task))?, &contrib_path)?;
        self.save_plot(pattern.track(SEQUENCE_TRACK)?, &sequence_path)?;
        Ok((contrib_path, sequence_path))
    }
}

impl Default for PatternPlotter {
    fn default() -> Self {
        Self::new(RenderConfig::default(), FileType::Png)
    }
}
