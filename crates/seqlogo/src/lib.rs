/*!
This crate draws sequence logos: per-position stacks of nucleotide glyphs whose
heights are given by a weight matrix (length × 4). Positive weights stack
upwards from the baseline, negative weights stack downwards. Logos can be
rendered as SVG, PNG, and PDF images.

Logos are useful for showing contribution scores and position frequencies of
discovered motifs.
*/

mod common;
mod glyph;
mod image;
mod logo;
mod pdf;
mod png;
mod svg;

pub use glyph::Glyph;
pub use image::{generate as generate_image, FileType};
pub use logo::{Color, Letter, Logo, RenderConfig, DNA_LETTERS};
