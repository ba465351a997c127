use crate::glyph::Glyph;

pub type Color = &'static str;

#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    pub glyph: Glyph,
    pub color: Color,
}

/// Nucleotide letters in matrix column order.
pub const DNA_LETTERS: [Letter; 4] = [
    Letter {
        glyph: Glyph::A,
        color: "green",
    },
    Letter {
        glyph: Glyph::C,
        color: "blue",
    },
    Letter {
        glyph: Glyph::G,
        color: "orange",
    },
    Letter {
        glyph: Glyph::T,
        color: "red",
    },
];

#[derive(Debug)]
pub struct Logo {
    pub weights: Vec<[f64; 4]>,
    pub letters: [Letter; 4],
}

impl Logo {
    pub fn dna(weights: Vec<[f64; 4]>) -> Self {
        Self {
            weights,
            letters: DNA_LETTERS,
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Highest positive stack and lowest negative stack over all positions.
    pub fn stack_extent(&self) -> (f64, f64) {
        self.weights.iter().fold((0.0, 0.0), |(lo, hi), column| {
            let pos: f64 = column.iter().filter(|w| **w > 0.0).sum();
            let neg: f64 = column.iter().filter(|w| **w < 0.0).sum();
            (f64::min(lo, neg), f64::max(hi, pos))
        })
    }
}

/// Image geometry for a rendered logo.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub pad: f64,
    /// Fraction of the tallest stack added above and below the data range.
    pub height_padding_factor: f64,
    /// Empty positions added on each side of the logo.
    pub length_padding: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 2000,
            height: 200,
            pad: 12.0,
            height_padding_factor: 0.2,
            length_padding: 1.0,
        }
    }
}
