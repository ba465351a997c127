use crate::{pdf, png, svg, Logo, RenderConfig};
use std::path::Path;

/// Renders the logo to `path`, picking the image format from its extension.
/// An existing file is overwritten.
pub fn generate(logo: &Logo, config: &RenderConfig, path: &Path) -> Result<(), String> {
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        let file_type = FileType::from_extension(extension)
            .ok_or_else(|| format!("Unsupported file extension: {extension:?}"))?;
        let svg_content = svg::generate_string(logo, config);
        match file_type {
            FileType::Svg => svg::render_from_string(&svg_content, path),
            FileType::Png => png::render_from_string(&svg_content, path),
            FileType::Pdf => pdf::render_from_string(&svg_content, path),
        }
    } else {
        Err(format!("Failed to get extension from path: {path:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Svg,
    Png,
    Pdf,
}

impl FileType {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "svg" => Some(FileType::Svg),
            "png" => Some(FileType::Png),
            "pdf" => Some(FileType::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Svg => "svg",
            FileType::Png => "png",
            FileType::Pdf => "pdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_from_extension_is_case_insensitive() {
        assert_eq!(FileType::from_extension("PNG"), Some(FileType::Png));
        assert_eq!(FileType::from_extension("svg"), Some(FileType::Svg));
        assert_eq!(FileType::from_extension("Pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_extension("jpeg"), None);
    }

    #[test]
    fn generate_rejects_unknown_extension() {
        let logo = Logo::dna(vec![[1.0, 0.0, 0.0, 0.0]]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.bmp");
        let result = generate(&logo, &RenderConfig::default(), &path);
        assert_eq!(result, Err("Unsupported file extension: \"bmp\"".to_string()));
        assert!(!path.exists());
    }

    #[test]
    fn generate_writes_png_and_svg() {
        let logo = Logo::dna(vec![[0.5, -0.2, 0.1, 0.0], [0.0, 0.0, 1.0, -0.3]]);
        let dir = tempfile::tempdir().unwrap();
        for name in ["logo.png", "logo.svg"] {
            let path = dir.path().join(name);
            generate(&logo, &RenderConfig::default(), &path).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }
}
